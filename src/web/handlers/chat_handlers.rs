// src/web/handlers/chat_handlers.rs
use crate::web::error::ApiError;
use crate::web::services::ChatService;
use crate::web::types::ChatResponse;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

pub async fn chat_completions_handler(
    body: String,
    service: &State<ChatService>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat_request", %request_id);

    async {
        info!("Received chat completion request ({} bytes)", body.len());
        let response = service.handle(&body).await?;
        info!("Chat completion request served");
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}
