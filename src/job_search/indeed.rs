// src/job_search/indeed.rs
use super::job_scraper::{fetch_html, first_attr, first_text, SiteScraper};
use super::{Country, JobListing, SearchError, SearchQuery, Site};
use crate::utils::{clean_text, normalize_job_type, parse_relative_date, parse_salary_range};
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

pub struct IndeedScraper {
    client: Client,
}

impl IndeedScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[rocket::async_trait]
impl SiteScraper for IndeedScraper {
    fn site(&self) -> Site {
        Site::Indeed
    }

    async fn scrape(&self, query: &SearchQuery) -> Result<Vec<JobListing>, SearchError> {
        let domain = query.country.indeed_domain();
        // Indeed filters by whole days only
        let days = query.hours_old.div_ceil(24).max(1).to_string();
        info!("Searching Indeed ({}) for '{}'", domain, query.term);

        let request = self
            .client
            .get(format!("https://{}/jobs", domain))
            .query(&[("q", query.term.as_str()), ("fromage", days.as_str()), ("start", "0")]);
        let html = fetch_html(Site::Indeed, request).await?;

        let mut listings = parse_search_results(&html, query.country, Utc::now().date_naive());
        listings.truncate(query.results_wanted);
        Ok(listings)
    }
}

/// Parse the job cards of an Indeed search page.
///
/// `today` anchors relative dates such as "Posted 3 days ago".
pub fn parse_search_results(html: &str, country: Country, today: NaiveDate) -> Vec<JobListing> {
    let document = Html::parse_document(html);
    let (Ok(card_selector), Ok(chip_selector)) = (
        Selector::parse("div.job_seen_beacon"),
        Selector::parse("[data-testid='attribute_snippet_testid']"),
    ) else {
        return Vec::new();
    };

    let domain = country.indeed_domain();

    document
        .select(&card_selector)
        .filter_map(|card| {
            let job_key = first_attr(card, &["a[data-jk]", "[data-jk]"], "data-jk")?;

            let salary = first_text(
                card,
                &["div.salary-snippet-container", "span.estimated-salary", ".salary-snippet"],
            )
            .filter(|text| text.chars().any(|c| c.is_ascii_digit()))
            .map(|text| parse_salary_range(&text, country.currency()))
            .unwrap_or_default();

            let job_type = card
                .select(&chip_selector)
                .map(|chip| clean_text(&chip.text().collect::<Vec<_>>().join(" ")))
                .find_map(|label| normalize_job_type(&label));

            let date_posted = first_text(card, &["span.date", "[data-testid='myJobsStateDate']"])
                .and_then(|text| parse_relative_date(&text, today))
                .map(|date| date.to_string());

            Some(JobListing {
                id: Some(format!("in-{}", job_key)),
                site: Some(Site::Indeed.to_string()),
                job_url: Some(format!("https://{}/viewjob?jk={}", domain, job_key)),
                title: first_text(
                    card,
                    &["h2.jobTitle span[title]", "h2.jobTitle a span", "h2.jobTitle"],
                ),
                company: first_text(card, &["[data-testid='company-name']", "span.companyName"]),
                location: first_text(
                    card,
                    &["[data-testid='text-location']", "div.companyLocation"],
                ),
                date_posted,
                job_type,
                min_amount: salary.min_amount,
                max_amount: salary.max_amount,
                currency: salary.currency,
                description: first_text(card, &["div.job-snippet", "[data-testid='jobsnippet_footer']"]),
            })
        })
        .collect()
}
