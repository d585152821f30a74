//! Generation proxy handler.
//!
//! Forwards the caller's conversation to the upstream text endpoint with the
//! product system prompt prepended, and relays the raw response body without
//! parsing it. Nothing is persisted here; the client decides what to keep
//! and saves it through the project routes.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::generation::{assemble_messages, DEFAULT_MODEL};
use crate::domain::ports::GenerationSourceError;
use crate::domain::{ChatMessage, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body for the generation proxy.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateRequest {
    /// Full conversation history, oldest first.
    #[serde(default)]
    pub conversation: Vec<ChatMessage>,
    /// Upstream model identifier; defaults to the product standard.
    #[serde(default)]
    pub model: Option<String>,
}

fn map_generation_error(err: GenerationSourceError) -> Error {
    match err {
        GenerationSourceError::Timeout => {
            Error::upstream_timeout("generation request timed out")
        }
        GenerationSourceError::Upstream { message } => Error::upstream_error(message),
    }
}

/// Forward a conversation to the upstream generator.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Raw upstream response", content_type = "text/plain"),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 502, description = "Upstream failure", body = Error),
        (status = 504, description = "Upstream timeout", body = Error)
    ),
    tags = ["generation"],
    operation_id = "generate"
)]
#[post("/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    session.require()?;
    let messages = assemble_messages(&payload.conversation);
    let model = payload.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let body = state
        .generation
        .generate(&messages, model)
        .await
        .map_err(map_generation_error)?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body))
}
