//! services/api/src/adapters/assistant_llm.rs
//!
//! This module contains the adapter for the career assistant LLM.
//! It implements the `CareerAssistantService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = "You are a friendly career assistant on a job portal. \
Help users with job searching, CVs and cover letters, interview preparation, and choosing \
learning resources. Keep answers practical and reasonably short.";

const CV_PROMPT: &str = r#"You are an expert CV analyzer. Extract and list ONLY the following from this CV in a structured JSON format:

Return ONLY a valid JSON object with these exact keys:
{
  "keySkills": ["skill1", "skill2", ...],
  "toolsTechnologies": ["tool1", "tool2", ...],
  "rolesAndDomains": ["role/domain1", "role/domain2", ...]
}

Instructions:
- keySkills: List all technical and soft skills (e.g., Python, Communication, Problem Solving)
- toolsTechnologies: List all programming languages, frameworks, software, platforms (e.g., React, Docker, AWS)
- rolesAndDomains: List job titles AND industry domains (e.g., Software Engineer, Web Development, Healthcare)
- Extract only what is explicitly mentioned in the CV
- Return ONLY the JSON object, no additional text

CV Content:

"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use career_portal_core::ports::{
    CareerAssistantService, ChatRole, ChatTurn, PortError, PortResult,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CareerAssistantService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAssistantAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAssistantAdapter {
    /// Creates a new `OpenAiAssistantAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn user_message(content: String) -> PortResult<ChatCompletionRequestMessage> {
        Ok(ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into())
    }

    fn history_message(turn: &ChatTurn) -> PortResult<ChatCompletionRequestMessage> {
        match turn.role {
            ChatRole::User => Self::user_message(turn.content.clone()),
            ChatRole::Model => Ok(ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.clone())
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into()),
        }
    }

    /// Sends one chat completion and returns the first choice's text, or an empty string.
    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> PortResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        debug!(chars = text.len(), "assistant reply received");
        Ok(text)
    }
}

//=========================================================================================
// `CareerAssistantService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CareerAssistantService for OpenAiAssistantAdapter {
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> PortResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );
        for turn in history {
            messages.push(Self::history_message(turn)?);
        }
        messages.push(Self::user_message(message.to_string())?);

        self.complete(messages).await
    }

    async fn summarize_cv_text(&self, cv_text: &str) -> PortResult<String> {
        let prompt = format!("{CV_PROMPT}{cv_text}");
        self.complete(vec![Self::user_message(prompt)?]).await
    }
}
