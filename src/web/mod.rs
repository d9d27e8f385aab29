// src/web/mod.rs

pub mod cors_utils;
pub mod error;
pub mod handlers;
pub mod services;
pub mod types;

pub use cors_utils::Cors;
pub use error::ApiError;
pub use services::ChatService;
pub use types::*;

use crate::core::AppConfig;
use crate::job_search::{self, JobSearch};
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catchers, get, post, routes, Build, Request, Rocket, State};
use std::sync::Arc;
use tracing::info;

#[post("/chat/completions", data = "<body>")]
pub async fn chat_completions(
    body: String,
    service: &State<ChatService>,
) -> Result<Json<ChatResponse>, ApiError> {
    handlers::chat_completions_handler(body, service).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

// Error catchers, so clients always receive a JSON body
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "INVALID_REQUEST".to_string(),
        vec!["Check your request JSON format".to_string()],
    ))
}

#[rocket::catch(404)]
pub fn not_found(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("No route for {} {}", request.method(), request.uri()),
        "NOT_FOUND".to_string(),
        vec!["POST your query to /chat/completions".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec!["Send a shorter search query".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

#[rocket::catch(default)]
pub fn default_catcher(status: Status, _request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        status.reason_lossy().to_string(),
        format!("HTTP_{}", status.code),
        Vec::new(),
    ))
}

/// Assemble the Rocket instance around an already constructed search backend.
pub fn build_rocket(config: &AppConfig, search: Arc<dyn JobSearch>) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address))
        .merge(("port", config.server.port))
        .merge(("log_level", "critical"))
        .merge(("limits", Limits::default().limit("string", 64.kibibytes())));

    let service = ChatService::new(search, config.search.clone());

    rocket::custom(figment)
        .attach(Cors)
        .manage(service)
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                internal_error,
                default_catcher
            ],
        )
        .mount(
            "/",
            routes![
                chat_completions,
                health,
                cors_utils::universal_options_handler
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let search = job_search::from_settings(&config.search)?;

    info!("Starting job search chat API server");
    info!(
        "Search backend: {:?}, sites: {:?}, country: {}, timeout: {}s",
        config.search.backend,
        config.search.sites,
        config.search.country,
        config.search.timeout_seconds
    );
    info!(
        "Server: http://{}:{}",
        config.server.address, config.server.port
    );

    build_rocket(&config, search)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}
