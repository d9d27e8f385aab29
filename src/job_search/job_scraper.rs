// src/job_search/job_scraper.rs
use super::indeed::IndeedScraper;
use super::linkedin::LinkedInScraper;
use super::{JobListing, JobSearch, SearchError, SearchQuery, Site};
use crate::utils::clean_text;
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Scrapes a single job board.
#[rocket::async_trait]
pub trait SiteScraper: Send + Sync {
    fn site(&self) -> Site;

    async fn scrape(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError>;
}

/// Queries every requested board concurrently and concatenates the results
/// in the order the sites were requested.
pub struct ScraperJobSearch {
    scrapers: HashMap<Site, Arc<dyn SiteScraper>>,
}

impl ScraperJobSearch {
    pub fn new(timeout: Duration, fetch_linkedin_descriptions: bool) -> Result<Self> {
        let client = build_client(timeout)?;
        let indeed: Arc<dyn SiteScraper> = Arc::new(IndeedScraper::new(client.clone()));
        let linkedin: Arc<dyn SiteScraper> =
            Arc::new(LinkedInScraper::new(client, fetch_linkedin_descriptions));

        Ok(Self::with_scrapers(vec![indeed, linkedin]))
    }

    pub fn with_scrapers(scrapers: Vec<Arc<dyn SiteScraper>>) -> Self {
        let scrapers = scrapers
            .into_iter()
            .map(|scraper| (scraper.site(), scraper))
            .collect();
        Self { scrapers }
    }
}

#[rocket::async_trait]
impl JobSearch for ScraperJobSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError> {
        let mut tasks = JoinSet::new();

        for (index, site) in query.sites.iter().enumerate() {
            let Some(scraper) = self.scrapers.get(site).cloned() else {
                warn!("No scraper registered for {}, skipping", site);
                continue;
            };
            let query = query.clone();
            tasks.spawn(async move { (index, scraper.site(), scraper.scrape(&query).await) });
        }

        let mut per_site: Vec<Option<Vec<JobListing>>> = vec![None; query.sites.len()];
        let mut first_error = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, site, Ok(mut listings))) => {
                    listings.truncate(query.results_wanted);
                    info!("{} returned {} listings", site, listings.len());
                    per_site[index] = Some(listings);
                }
                Ok((_, site, Err(e))) => {
                    warn!("Search on {} failed: {}", site, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    error!("Scraper task failed: {}", e);
                    first_error.get_or_insert(SearchError::Task(e.to_string()));
                }
            }
        }

        if per_site.iter().all(Option::is_none) {
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Ok(per_site.into_iter().flatten().flatten().collect())
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}

/// Send a request and return the body, mapping board refusals onto `SearchError`.
pub(crate) async fn fetch_html(site: Site, request: RequestBuilder) -> Result<String, SearchError> {
    let response = request.send().await?;
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SearchError::RateLimited {
            site: site.to_string(),
        });
    }

    if !status.is_success() {
        return Err(SearchError::Status {
            site: site.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Text of the first non-empty element matched by the selector cascade.
pub(crate) fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in scope.select(&selector) {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

/// First value of `attr` found by the selector cascade.
pub(crate) fn first_attr(scope: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            let value = scope
                .select(&selector)
                .filter_map(|element| element.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty());
            if let Some(value) = value {
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_search::Country;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubScraper {
        site: Site,
        result: std::result::Result<Vec<&'static str>, u16>,
        calls: AtomicUsize,
    }

    impl StubScraper {
        fn ok(site: Site, ids: Vec<&'static str>) -> Arc<dyn SiteScraper> {
            Self::ok_counted(site, ids)
        }

        fn ok_counted(site: Site, ids: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                site,
                result: Ok(ids),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(site: Site, status: u16) -> Arc<dyn SiteScraper> {
            Arc::new(Self {
                site,
                result: Err(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[rocket::async_trait]
    impl SiteScraper for StubScraper {
        fn site(&self) -> Site {
            self.site
        }

        async fn scrape(&self, _query: &SearchQuery) -> Result<Vec<JobListing>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(ids) => Ok(ids
                    .iter()
                    .map(|id| JobListing {
                        id: Some(id.to_string()),
                        site: Some(self.site.to_string()),
                        ..JobListing::default()
                    })
                    .collect()),
                Err(status) => Err(SearchError::Status {
                    site: self.site.to_string(),
                    status: *status,
                }),
            }
        }
    }

    fn query(sites: Vec<Site>, results_wanted: usize) -> SearchQuery {
        SearchQuery {
            term: "rust developer".to_string(),
            sites,
            results_wanted,
            hours_old: 72,
            country: Country::Usa,
        }
    }

    fn ids(listings: &[JobListing]) -> Vec<&str> {
        listings.iter().filter_map(|l| l.id.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_results_follow_site_order_and_limit() {
        let search = ScraperJobSearch::with_scrapers(vec![
            StubScraper::ok(Site::LinkedIn, vec!["li-1", "li-2", "li-3"]),
            StubScraper::ok(Site::Indeed, vec!["in-1", "in-2"]),
        ]);

        let listings = search
            .search(&query(vec![Site::Indeed, Site::LinkedIn], 2))
            .await
            .unwrap();

        assert_eq!(ids(&listings), vec!["in-1", "in-2", "li-1", "li-2"]);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_sites() {
        let search = ScraperJobSearch::with_scrapers(vec![
            StubScraper::failing(Site::Indeed, 403),
            StubScraper::ok(Site::LinkedIn, vec!["li-1"]),
        ]);

        let listings = search
            .search(&query(vec![Site::Indeed, Site::LinkedIn], 4))
            .await
            .unwrap();

        assert_eq!(ids(&listings), vec!["li-1"]);
    }

    #[tokio::test]
    async fn test_all_sites_failing_is_an_error() {
        let search = ScraperJobSearch::with_scrapers(vec![
            StubScraper::failing(Site::Indeed, 503),
            StubScraper::failing(Site::LinkedIn, 503),
        ]);

        let result = search
            .search(&query(vec![Site::Indeed, Site::LinkedIn], 4))
            .await;

        assert!(matches!(result, Err(SearchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_only_requested_sites_are_queried() {
        let indeed = StubScraper::ok_counted(Site::Indeed, vec!["in-1"]);
        let linkedin = StubScraper::ok_counted(Site::LinkedIn, vec!["li-1"]);
        let search = ScraperJobSearch::with_scrapers(vec![
            indeed.clone() as Arc<dyn SiteScraper>,
            linkedin.clone() as Arc<dyn SiteScraper>,
        ]);

        let listings = search.search(&query(vec![Site::LinkedIn], 4)).await.unwrap();

        assert_eq!(ids(&listings), vec!["li-1"]);
        assert_eq!(indeed.calls.load(Ordering::SeqCst), 0);
        assert_eq!(linkedin.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_results_are_not_an_error() {
        let search = ScraperJobSearch::with_scrapers(vec![StubScraper::ok(Site::Indeed, vec![])]);
        let listings = search.search(&query(vec![Site::Indeed], 4)).await.unwrap();
        assert!(listings.is_empty());
    }
}
