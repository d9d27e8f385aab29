// src/job_search/linkedin.rs
use super::job_scraper::{fetch_html, first_attr, first_text, SiteScraper};
use super::{Country, JobListing, SearchError, SearchQuery, Site};
use crate::utils::{normalize_job_type, parse_salary_range};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

const SEARCH_URL: &str = "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search";
const JOB_VIEW_URL: &str = "https://www.linkedin.com/jobs/view/";

pub struct LinkedInScraper {
    client: Client,
    fetch_descriptions: bool,
}

/// Extra fields only available on the job page itself.
#[derive(Debug, Default, PartialEq)]
pub struct JobDetails {
    pub description: Option<String>,
    pub job_type: Option<String>,
}

impl LinkedInScraper {
    pub fn new(client: Client, fetch_descriptions: bool) -> Self {
        Self {
            client,
            fetch_descriptions,
        }
    }

    async fn fetch_details(&self, job_url: &str) -> Result<JobDetails, SearchError> {
        let html = fetch_html(Site::LinkedIn, self.client.get(job_url)).await?;
        Ok(parse_job_page(&html))
    }
}

#[rocket::async_trait]
impl SiteScraper for LinkedInScraper {
    fn site(&self) -> Site {
        Site::LinkedIn
    }

    async fn scrape(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError> {
        let posted_within = format!("r{}", u64::from(query.hours_old) * 3600);
        info!("Searching LinkedIn for '{}'", query.term);

        let request = self.client.get(SEARCH_URL).query(&[
            ("keywords", query.term.as_str()),
            ("location", query.country.name()),
            ("f_TPR", posted_within.as_str()),
            ("start", "0"),
        ]);
        let html = fetch_html(Site::LinkedIn, request).await?;

        let mut listings = parse_search_results(&html, query.country);
        listings.truncate(query.results_wanted);

        if self.fetch_descriptions {
            for listing in listings.iter_mut() {
                let Some(job_url) = listing.job_url.clone() else {
                    continue;
                };
                match self.fetch_details(&job_url).await {
                    Ok(details) => {
                        listing.description = details.description;
                        listing.job_type = details.job_type;
                    }
                    Err(e) => warn!("Failed to fetch LinkedIn job page {}: {}", job_url, e),
                }
            }
        }

        Ok(listings)
    }
}

/// Parse the job cards of a LinkedIn guest search page.
pub fn parse_search_results(html: &str, country: Country) -> Vec<JobListing> {
    let document = Html::parse_document(html);
    let Ok(card_selector) = Selector::parse("div.base-search-card") else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .filter_map(|card| {
            let job_id = card
                .value()
                .attr("data-entity-urn")
                .and_then(|urn| urn.rsplit(':').next())
                .map(str::to_string)
                .or_else(|| {
                    first_attr(card, &["a.base-card__full-link"], "href")
                        .and_then(|href| job_id_from_href(&href))
                })
                .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))?;

            let salary = first_text(card, &["span.job-search-card__salary-info"])
                .map(|text| parse_salary_range(&text, country.currency()))
                .unwrap_or_default();

            Some(JobListing {
                id: Some(format!("li-{}", job_id)),
                site: Some(Site::LinkedIn.to_string()),
                job_url: Some(format!("{}{}", JOB_VIEW_URL, job_id)),
                title: first_text(card, &["h3.base-search-card__title", "span.sr-only"]),
                company: first_text(
                    card,
                    &["h4.base-search-card__subtitle a", "h4.base-search-card__subtitle"],
                ),
                location: first_text(card, &["span.job-search-card__location"]),
                date_posted: first_attr(card, &["time"], "datetime"),
                job_type: None,
                min_amount: salary.min_amount,
                max_amount: salary.max_amount,
                currency: salary.currency,
                description: None,
            })
        })
        .collect()
}

/// Extract description and employment type from a LinkedIn job page.
pub fn parse_job_page(html: &str) -> JobDetails {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let description = first_text(
        root,
        &[
            "div.show-more-less-html__markup",
            "div.description__text",
            ".jobs-description-content__text",
            "[data-test-id='job-description']",
        ],
    );

    let mut job_type = None;
    if let (Ok(item_selector), Ok(header_selector)) = (
        Selector::parse("li.description__job-criteria-item"),
        Selector::parse("h3.description__job-criteria-subheader"),
    ) {
        for item in root.select(&item_selector) {
            let is_employment_type = item
                .select(&header_selector)
                .next()
                .map(|h| h.text().collect::<String>().contains("Employment type"))
                .unwrap_or(false);
            if is_employment_type {
                job_type = first_text(item, &["span.description__job-criteria-text"])
                    .and_then(|label| normalize_job_type(&label));
                break;
            }
        }
    }

    JobDetails {
        description,
        job_type,
    }
}

fn job_id_from_href(href: &str) -> Option<String> {
    let path = href.split('?').next()?;
    let slug = path.trim_end_matches('/').rsplit('/').next()?;
    slug.rsplit('-').next().map(str::to_string)
}
