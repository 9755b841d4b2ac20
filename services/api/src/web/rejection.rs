//! services/api/src/web/rejection.rs
//!
//! Failed requests answer with a transient notice for the browser to show,
//! never with a fatal error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use career_portal_core::{ApplyState, Notice, NoticeLevel, PortalError};
use serde_json::json;
use std::time::Duration;
use tracing::error;

#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    code: &'static str,
    notice: Notice,
    apply_state: Option<ApplyState>,
}

impl Rejection {
    pub fn new(err: PortalError, dismiss_after: Duration) -> Self {
        let (status, code) = match &err {
            PortalError::NetworkFailure(detail) => {
                error!("Backend failure: {detail}");
                (StatusCode::BAD_GATEWAY, "NETWORK_FAILURE")
            }
            PortalError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PortalError::AlreadyApplied => (StatusCode::CONFLICT, "ALREADY_APPLIED"),
            PortalError::ApplyInFlight => (StatusCode::CONFLICT, "APPLY_IN_FLIGHT"),
            PortalError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            PortalError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
        };
        Self {
            status,
            code,
            notice: err.notice(dismiss_after),
            apply_state: None,
        }
    }

    /// The assistant is not configured on this deployment.
    pub fn assistant_unavailable(dismiss_after: Duration) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "ASSISTANT_UNAVAILABLE",
            notice: Notice {
                level: NoticeLevel::Warning,
                message: "The career assistant is not available right now.".to_string(),
                dismiss_after,
            },
            apply_state: None,
        }
    }

    pub fn with_apply_state(mut self, state: ApplyState) -> Self {
        self.apply_state = Some(state);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let mut body = json!({
            "error": {
                "code": self.code,
                "notice": self.notice,
            }
        });
        if let Some(state) = self.apply_state {
            body["apply_state"] = json!(state);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_statuses() {
        let ttl = Duration::from_secs(3);
        let cases = [
            (PortalError::NetworkFailure("down".into()), StatusCode::BAD_GATEWAY),
            (PortalError::NotFound("Jobs/1".into()), StatusCode::NOT_FOUND),
            (PortalError::AlreadyApplied, StatusCode::CONFLICT),
            (PortalError::ApplyInFlight, StatusCode::CONFLICT),
            (
                PortalError::Unauthenticated { action: "apply for jobs" },
                StatusCode::UNAUTHORIZED,
            ),
            (
                PortalError::Validation("bad".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(Rejection::new(err, ttl).status(), status);
        }
    }
}
