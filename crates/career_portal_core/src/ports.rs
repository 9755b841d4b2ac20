//! crates/career_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the portal's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the hosted document store, the identity provider, and
//! the language model behind the career assistant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::domain::{Collection, Document, Identity, StoredDocument};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote document store.
///
/// Field names are free-form; the only convention the core relies on is the
/// `Applicant_<n>` prefix on job documents.
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Returns every document of a collection, in the store's order.
    async fn list_all(&self, collection: Collection) -> PortResult<Vec<StoredDocument>>;

    /// Returns one document, or `PortError::NotFound` when the key is absent.
    async fn get_one(&self, collection: Collection, key: &str) -> PortResult<Document>;

    /// Merges `fields` into the top level of a document, creating it when absent.
    /// Fields not named in `fields` are left untouched.
    async fn patch_fields(
        &self,
        collection: Collection,
        key: &str,
        fields: Document,
    ) -> PortResult<()>;

    /// Creates a document under a store-assigned key and returns that key.
    async fn add_document(&self, collection: Collection, fields: Document) -> PortResult<String>;
}

/// Authentication state as a subscription.
///
/// The receiver holds the current identity (or `None`) immediately and is
/// updated on every sign-in and sign-out.
pub trait IdentityObserver: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One earlier message of an assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[async_trait]
pub trait CareerAssistantService: Send + Sync {
    /// Answers `message` given the earlier turns of the conversation.
    async fn chat(&self, message: &str, history: &[ChatTurn]) -> PortResult<String>;

    /// Asks the model to extract skills, tools and roles from CV text.
    /// Returns the model's raw reply.
    async fn summarize_cv_text(&self, cv_text: &str) -> PortResult<String>;
}
