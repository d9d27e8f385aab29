// src/job_search/mod.rs
use crate::core::{RemoteJobSearch, SearchBackend, SearchSettings};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod indeed;
pub mod job_scraper;
pub mod linkedin;
pub mod types;

pub use job_scraper::ScraperJobSearch;
pub use types::JobListing;

/// Job boards the built-in scrapers know how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Indeed,
    #[serde(alias = "linked_in")]
    LinkedIn,
}

impl Site {
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Indeed => "indeed",
            Site::LinkedIn => "linkedin",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indeed" => Ok(Site::Indeed),
            "linkedin" | "linked_in" => Ok(Site::LinkedIn),
            other => anyhow::bail!("Unsupported job site: {}. Use indeed or linkedin", other),
        }
    }
}

/// Countries supported for search, with the Indeed domain serving them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Country {
    Usa,
    Uk,
    Canada,
    Australia,
    India,
    Germany,
    France,
}

impl Country {
    /// Location string sent to LinkedIn.
    pub fn name(&self) -> &'static str {
        match self {
            Country::Usa => "United States",
            Country::Uk => "United Kingdom",
            Country::Canada => "Canada",
            Country::Australia => "Australia",
            Country::India => "India",
            Country::Germany => "Germany",
            Country::France => "France",
        }
    }

    /// Name used in config files and by remote backends.
    pub fn code(&self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Uk => "UK",
            Country::Canada => "Canada",
            Country::Australia => "Australia",
            Country::India => "India",
            Country::Germany => "Germany",
            Country::France => "France",
        }
    }

    pub fn indeed_domain(&self) -> &'static str {
        match self {
            Country::Usa => "www.indeed.com",
            Country::Uk => "uk.indeed.com",
            Country::Canada => "ca.indeed.com",
            Country::Australia => "au.indeed.com",
            Country::India => "in.indeed.com",
            Country::Germany => "de.indeed.com",
            Country::France => "fr.indeed.com",
        }
    }

    /// Currency assumed when a salary only shows a bare `$`.
    pub fn currency(&self) -> &'static str {
        match self {
            Country::Usa => "USD",
            Country::Uk => "GBP",
            Country::Canada => "CAD",
            Country::Australia => "AUD",
            Country::India => "INR",
            Country::Germany | Country::France => "EUR",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Country {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usa" | "us" | "united states" => Ok(Country::Usa),
            "uk" | "united kingdom" | "great britain" => Ok(Country::Uk),
            "canada" | "ca" => Ok(Country::Canada),
            "australia" | "au" => Ok(Country::Australia),
            "india" | "in" => Ok(Country::India),
            "germany" | "de" => Ok(Country::Germany),
            "france" | "fr" => Ok(Country::France),
            other => anyhow::bail!("Unsupported country: {}", other),
        }
    }
}

/// Parameters of one search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub term: String,
    pub sites: Vec<Site>,
    /// Maximum listings kept per site.
    pub results_wanted: usize,
    pub hours_old: u32,
    pub country: Country,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{site} returned HTTP {status}")]
    Status { site: String, status: u16 },
    #[error("{site} is rate limiting requests")]
    RateLimited { site: String },
    #[error("Failed to parse {site} results: {message}")]
    Parse { site: String, message: String },
    #[error("Remote job search failed: {0}")]
    Remote(String),
    #[error("Scraper task failed: {0}")]
    Task(String),
}

/// A job-search backend.
#[rocket::async_trait]
pub trait JobSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError>;
}

/// Build the backend selected by the search settings.
pub fn from_settings(settings: &SearchSettings) -> anyhow::Result<Arc<dyn JobSearch>> {
    let search: Arc<dyn JobSearch> = match settings.backend {
        SearchBackend::Scraper => Arc::new(ScraperJobSearch::new(
            settings.timeout(),
            settings.linkedin_fetch_description,
        )?),
        SearchBackend::Remote => {
            let url = settings
                .remote_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("remote_url is required for the remote backend"))?;
            Arc::new(RemoteJobSearch::new(url, settings.timeout())?)
        }
    };
    Ok(search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_site() {
        assert_eq!("Indeed".parse::<Site>().unwrap(), Site::Indeed);
        assert_eq!(" linkedin ".parse::<Site>().unwrap(), Site::LinkedIn);
        assert!("glassdoor".parse::<Site>().is_err());
    }

    #[test]
    fn test_parse_country() {
        assert_eq!("USA".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!("united kingdom".parse::<Country>().unwrap(), Country::Uk);
        assert_eq!(Country::Usa.indeed_domain(), "www.indeed.com");
        assert!("atlantis".parse::<Country>().is_err());
    }
}
