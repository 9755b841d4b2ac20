//! crates/career_portal_core/src/assistant.rs
//!
//! The career assistant: chat relay and CV summarization. Text extraction
//! from the uploaded PDF happens in the service; everything after that lives here.

use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{PortalError, PortalResult};
use crate::ports::{CareerAssistantService, ChatTurn};

pub const EMPTY_CHAT_REPLY: &str = "I'm sorry, I couldn't generate a response. Please try again.";
pub const EMPTY_SUMMARY_REPLY: &str = "Unable to generate summary. Please try again.";

/// Structured CV extraction plus the text it was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvSummary {
    /// The model's JSON object, or `{"summary": <reply>}` when it was not valid JSON.
    pub data: Value,
    pub raw_text: String,
}

/// Strips markdown code fences the model tends to wrap JSON in.
pub fn strip_code_fences(reply: &str) -> &str {
    let mut cleaned = reply.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Interprets the model's reply to a CV summarization request.
pub fn interpret_cv_reply(reply: &str) -> Value {
    let reply = if reply.trim().is_empty() {
        EMPTY_SUMMARY_REPLY
    } else {
        reply
    };
    serde_json::from_str(strip_code_fences(reply)).unwrap_or_else(|err| {
        warn!("CV summary was not valid JSON ({err}); returning it as text");
        json!({ "summary": reply })
    })
}

pub struct CareerAssistant {
    service: Arc<dyn CareerAssistantService>,
}

impl CareerAssistant {
    pub fn new(service: Arc<dyn CareerAssistantService>) -> Self {
        Self { service }
    }

    pub async fn chat(&self, message: &str, history: &[ChatTurn]) -> PortalResult<String> {
        if message.trim().is_empty() {
            return Err(PortalError::Validation("Please enter a message.".to_string()));
        }
        let reply = self.service.chat(message, history).await?;
        if reply.trim().is_empty() {
            return Ok(EMPTY_CHAT_REPLY.to_string());
        }
        Ok(reply)
    }

    /// Summarizes CV text that has already been extracted from the upload.
    pub async fn summarize_cv(&self, cv_text: String) -> PortalResult<CvSummary> {
        if cv_text.trim().is_empty() {
            return Err(PortalError::Validation("No text found in PDF.".to_string()));
        }
        info!(chars = cv_text.len(), "summarizing CV");
        let reply = self.service.summarize_cv_text(&cv_text).await?;
        Ok(CvSummary {
            data: interpret_cv_reply(&reply),
            raw_text: cv_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ChatRole, PortResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedAssistant {
        reply: String,
        seen_history: Mutex<usize>,
    }

    #[async_trait]
    impl CareerAssistantService for CannedAssistant {
        async fn chat(&self, _message: &str, history: &[ChatTurn]) -> PortResult<String> {
            *self.seen_history.lock().unwrap() = history.len();
            Ok(self.reply.clone())
        }

        async fn summarize_cv_text(&self, _cv_text: &str) -> PortResult<String> {
            Ok(self.reply.clone())
        }
    }

    fn assistant(reply: &str) -> (CareerAssistant, Arc<CannedAssistant>) {
        let service = Arc::new(CannedAssistant {
            reply: reply.to_string(),
            seen_history: Mutex::new(0),
        });
        (CareerAssistant::new(service.clone()), service)
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn fenced_json_reply_is_parsed() {
        let data = interpret_cv_reply(
            "```json\n{\"keySkills\":[\"Rust\"],\"toolsTechnologies\":[],\"rolesAndDomains\":[]}\n```",
        );
        assert_eq!(data["keySkills"], json!(["Rust"]));
    }

    #[test]
    fn prose_reply_becomes_a_summary() {
        let data = interpret_cv_reply("The candidate knows Rust.");
        assert_eq!(data, json!({ "summary": "The candidate knows Rust." }));
    }

    #[tokio::test]
    async fn empty_chat_reply_falls_back() {
        let (assistant, service) = assistant("   ");
        let history = vec![ChatTurn {
            role: ChatRole::User,
            content: "hi".into(),
        }];
        let reply = assistant.chat("How do I write a CV?", &history).await.unwrap();
        assert_eq!(reply, EMPTY_CHAT_REPLY);
        assert_eq!(*service.seen_history.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_cv_text_is_rejected_before_the_model() {
        let (assistant, _) = assistant("{}");
        let err = assistant.summarize_cv("\n \n".into()).await.unwrap_err();
        assert_eq!(err, PortalError::Validation("No text found in PDF.".into()));
    }

    #[tokio::test]
    async fn summary_keeps_the_raw_text() {
        let (assistant, _) = assistant("{\"keySkills\":[\"SQL\"]}");
        let summary = assistant.summarize_cv("Jane Doe\nSQL".into()).await.unwrap();
        assert_eq!(summary.raw_text, "Jane Doe\nSQL");
        assert_eq!(summary.data["keySkills"], json!(["SQL"]));
    }
}
