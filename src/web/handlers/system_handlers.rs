// src/web/handlers/system_handlers.rs
use crate::web::types::TextResponse;

use rocket::serde::json::Json;
use tracing::debug;

pub async fn health_handler() -> Json<TextResponse> {
    debug!("Health check");
    Json(TextResponse::success("OK".to_string()))
}
