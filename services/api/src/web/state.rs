//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-request portal session.

use crate::config::Config;
use crate::web::middleware::CurrentIdentity;
use crate::web::rejection::Rejection;
use career_portal_core::ports::{CareerAssistantService, DocumentGateway};
use career_portal_core::{IdentityCell, InFlightApplies, Portal, PortalError};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn DocumentGateway>,
    /// `None` when no assistant credentials were configured.
    pub assistant: Option<Arc<dyn CareerAssistantService>>,
    pub config: Arc<Config>,
    /// Apply attempts in progress across all requests.
    pub applying: InFlightApplies,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        assistant: Option<Arc<dyn CareerAssistantService>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            gateway,
            assistant,
            config,
            applying: InFlightApplies::new(),
        }
    }

    /// Opens a portal session for one request, seen as `identity`.
    ///
    /// Sessions are per request, but they share the in-flight apply set, so a
    /// second submit of the same job by the same user is refused while the first runs.
    pub fn portal(&self, identity: &CurrentIdentity) -> Portal {
        let cell = IdentityCell::new(identity.0.clone());
        Portal::new(self.gateway.clone(), &cell).with_in_flight(self.applying.clone())
    }

    /// Turns a portal failure into the notice response the browser shows.
    pub fn reject(&self, err: PortalError) -> Rejection {
        Rejection::new(err, self.config.notice_dismiss_after)
    }
}
