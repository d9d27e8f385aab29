// src/core/service_client.rs
//! HTTP client for an external job-search service (e.g. a scraper sidecar)

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, trace, warn};

use crate::job_search::{JobListing, JobSearch, SearchError, SearchQuery};

const SEARCH_ENDPOINT: &str = "/search";

#[derive(Debug, Serialize)]
struct RemoteSearchRequest<'a> {
    search_term: &'a str,
    site_name: Vec<&'static str>,
    results_wanted: usize,
    hours_old: u32,
    country_indeed: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteSearchResponse {
    Wrapped { jobs: Vec<Value> },
    Bare(Vec<Value>),
}

impl RemoteSearchResponse {
    fn into_rows(self) -> Vec<Value> {
        match self {
            RemoteSearchResponse::Wrapped { jobs } => jobs,
            RemoteSearchResponse::Bare(jobs) => jobs,
        }
    }
}

pub struct RemoteJobSearch {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteJobSearch {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[rocket::async_trait]
impl JobSearch for RemoteJobSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError> {
        let url = format!("{}{}", self.base_url, SEARCH_ENDPOINT);
        let payload = RemoteSearchRequest {
            search_term: &query.term,
            site_name: query.sites.iter().map(|site| site.as_str()).collect(),
            results_wanted: query.results_wanted,
            hours_old: query.hours_old,
            country_indeed: query.country.code(),
        };

        info!("Calling job search service: {}", url);

        let response = self.client.post(&url).json(&payload).send().await?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited {
                site: self.base_url.clone(),
            });
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Remote(format!(
                "service returned status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        parse_listings(&body)
    }
}

/// Decode a search service body, skipping rows that are not objects.
pub fn parse_listings(body: &str) -> Result<Vec<JobListing>, SearchError> {
    let response: RemoteSearchResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Parse {
            site: "remote".to_string(),
            message: e.to_string(),
        })?;

    let rows = response.into_rows();
    let total = rows.len();
    let listings: Vec<JobListing> = rows.into_iter().filter_map(JobListing::from_value).collect();

    if listings.len() < total {
        warn!("Skipped {} malformed rows from job search service", total - listings.len());
    }

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let listings = parse_listings(r#"[{"id": "1", "title": "SWE"}, {"id": 2}]"#).unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title.as_deref(), Some("SWE"));
        assert_eq!(listings[1].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_wrapped_and_skip_bad_rows() {
        let listings =
            parse_listings(r#"{"jobs": [{"id": "a"}, "garbage", null, {"id": "b"}]}"#).unwrap();
        let ids: Vec<_> = listings.iter().filter_map(|l| l.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(
            parse_listings("<html>bad gateway</html>"),
            Err(SearchError::Parse { .. })
        ));
    }
}
