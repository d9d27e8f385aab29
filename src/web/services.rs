// src/web/services.rs
use crate::core::SearchSettings;
use crate::formatter::render;
use crate::job_search::{JobListing, JobSearch, SearchQuery};
use crate::web::error::ApiError;
use crate::web::types::{ChatRequest, ChatResponse};
use rocket::serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Turns chat requests into job searches and wraps the rendered listings
/// into the chat completion envelope.
pub struct ChatService {
    search: Arc<dyn JobSearch>,
    settings: SearchSettings,
}

impl ChatService {
    pub fn new(search: Arc<dyn JobSearch>, settings: SearchSettings) -> Self {
        Self { search, settings }
    }

    /// Handle one raw request body end to end.
    pub async fn handle(&self, body: &str) -> Result<ChatResponse, ApiError> {
        let term = extract_query(body)?;
        info!("Job search requested: '{}'", term);

        let query = self.search_query(term);
        let listings = self.run_search(&query).await?;
        info!("Rendering {} listings", listings.len());

        Ok(ChatResponse::from_content(render(&listings)))
    }

    /// Build a search with the configured defaults.
    pub fn search_query(&self, term: String) -> SearchQuery {
        SearchQuery {
            term,
            sites: self.settings.sites.clone(),
            results_wanted: self.settings.results_wanted,
            hours_old: self.settings.hours_old,
            country: self.settings.country,
        }
    }

    /// Run a search under the configured timeout.
    pub async fn run_search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, ApiError> {
        match tokio::time::timeout(self.settings.timeout(), self.search.search(query)).await {
            Ok(Ok(listings)) => Ok(listings),
            Ok(Err(e)) => {
                error!("Job search for '{}' failed: {}", query.term, e);
                Err(ApiError::UpstreamFailure(e.to_string()))
            }
            Err(_) => {
                error!(
                    "Job search for '{}' timed out after {}s",
                    query.term, self.settings.timeout_seconds
                );
                Err(ApiError::UpstreamTimeout(self.settings.timeout_seconds))
            }
        }
    }
}

/// Pull the search term out of `messages[0].content`.
pub fn extract_query(body: &str) -> Result<String, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidRequest(format!("body is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ApiError::InvalidRequest(
            "body must be a JSON object".to_string(),
        ));
    }

    let request = ChatRequest::deserialize(value)
        .map_err(|e| ApiError::InvalidRequest(format!("malformed chat request: {}", e)))?;

    let messages = request
        .messages
        .ok_or_else(|| ApiError::InvalidRequest("missing field: messages".to_string()))?;

    let first = messages.into_iter().next().ok_or_else(|| {
        ApiError::InvalidRequest("messages must contain at least one message".to_string())
    })?;

    let content = first
        .content
        .ok_or_else(|| ApiError::InvalidRequest("missing field: messages[0].content".to_string()))?;

    let term = content.as_text().trim().to_string();
    if term.is_empty() {
        return Err(ApiError::InvalidRequest(
            "messages[0].content must not be empty".to_string(),
        ));
    }

    Ok(term)
}
