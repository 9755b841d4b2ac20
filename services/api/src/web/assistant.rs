//! services/api/src/web/assistant.rs
//!
//! Handlers for the career assistant: chat and CV summarization.

use crate::adapters::pdf::{extract_pdf_text, is_pdf};
use crate::web::rejection::Rejection;
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use career_portal_core::{CareerAssistant, ChatTurn, PortalError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

/// Multipart part the CV is uploaded under.
const CV_FIELD: &str = "file";

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    message: String,
    /// Earlier turns of the conversation, oldest first.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    history: Vec<ChatTurn>,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    reply: String,
}

#[derive(Serialize, ToSchema)]
pub struct CvSummaryResponse {
    #[schema(value_type = Object)]
    summary: Value,
    raw_text: String,
}

fn assistant(app_state: &AppState) -> Result<CareerAssistant, Rejection> {
    app_state
        .assistant
        .clone()
        .map(CareerAssistant::new)
        .ok_or_else(|| Rejection::assistant_unavailable(app_state.config.notice_dismiss_after))
}

/// Send a message to the career assistant.
#[utoipa::path(
    post,
    path = "/assistant/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's reply", body = ChatResponse),
        (status = 422, description = "Empty message"),
        (status = 503, description = "The assistant is not configured")
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Rejection> {
    let reply = assistant(&app_state)?
        .chat(&request.message, &request.history)
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(ChatResponse { reply }))
}

/// Summarize an uploaded CV into skills, tools and roles.
///
/// Accepts a multipart/form-data request with a PDF under the `file` part.
#[utoipa::path(
    post,
    path = "/assistant/summarize-cv",
    request_body(content_type = "multipart/form-data", description = "The CV as a PDF."),
    responses(
        (status = 200, description = "Extracted CV summary", body = CvSummaryResponse),
        (status = 422, description = "Missing, non-PDF or unreadable file"),
        (status = 503, description = "The assistant is not configured")
    )
)]
pub async fn summarize_cv_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CvSummaryResponse>, Rejection> {
    let assistant = assistant(&app_state)?;
    let invalid = |message: &str| app_state.reject(PortalError::Validation(message.to_string()));

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| invalid(&format!("Failed to read multipart data: {e}")))?
    {
        if field.name() != Some(CV_FIELD) {
            continue;
        }
        if !is_pdf(field.content_type()) {
            return Err(invalid("Please upload a PDF file."));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| invalid(&format!("Failed to read file bytes: {e}")))?;
        upload = Some(data);
        break;
    }
    let data = upload.ok_or_else(|| invalid("No file uploaded."))?;

    let text = extract_pdf_text(data).await.map_err(|e| {
        warn!("CV text extraction failed: {e}");
        invalid("Could not read the PDF file.")
    })?;

    let summary = assistant
        .summarize_cv(text)
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(CvSummaryResponse {
        summary: summary.data,
        raw_text: summary.raw_text,
    }))
}
