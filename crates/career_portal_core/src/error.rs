//! crates/career_portal_core/src/error.rs
//!
//! The failures the portal operations report to the view layer.

use crate::notice::{Notice, NoticeLevel};
use crate::ports::PortError;
use std::time::Duration;

/// Every portal failure is recoverable: it is shown as a transient notice and
/// the user may retry by triggering the action again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortalError {
    /// The backend is unreachable or answered with an error.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("You have already applied to this job.")]
    AlreadyApplied,

    /// The action needs a signed-in identity. Carries the action for the message.
    #[error("Please sign in to {action}.")]
    Unauthenticated { action: &'static str },

    /// An application for the same job is already being submitted in this session.
    #[error("Your application is already being submitted.")]
    ApplyInFlight,

    #[error("{0}")]
    Validation(String),
}

pub type PortalResult<T> = Result<T, PortalError>;

impl From<PortError> for PortalError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => PortalError::NotFound(what),
            PortError::Unexpected(msg) => PortalError::NetworkFailure(msg),
            PortError::Unauthorized => PortalError::Unauthenticated {
                action: "continue",
            },
        }
    }
}

impl PortalError {
    /// The transient notification shown for this failure.
    pub fn notice(&self, dismiss_after: Duration) -> Notice {
        let (level, message) = match self {
            PortalError::NetworkFailure(_) => (
                NoticeLevel::Error,
                "Something went wrong talking to the server. Please try again.".to_string(),
            ),
            PortalError::NotFound(_) => (
                NoticeLevel::Error,
                "The requested item could not be found.".to_string(),
            ),
            PortalError::AlreadyApplied | PortalError::ApplyInFlight => {
                (NoticeLevel::Info, self.to_string())
            }
            PortalError::Unauthenticated { .. } | PortalError::Validation(_) => {
                (NoticeLevel::Warning, self.to_string())
            }
        };
        Notice {
            level,
            message,
            dismiss_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_onto_the_portal_taxonomy() {
        assert_eq!(
            PortalError::from(PortError::Unexpected("connection reset".into())),
            PortalError::NetworkFailure("connection reset".into())
        );
        assert_eq!(
            PortalError::from(PortError::NotFound("Jobs/42".into())),
            PortalError::NotFound("Jobs/42".into())
        );
        assert!(matches!(
            PortalError::from(PortError::Unauthorized),
            PortalError::Unauthenticated { .. }
        ));
    }

    #[test]
    fn network_notice_hides_transport_details() {
        let notice = PortalError::NetworkFailure("tcp: connection refused".into())
            .notice(Duration::from_secs(3));
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(!notice.message.contains("tcp"));
        assert_eq!(notice.dismiss_after, Duration::from_secs(3));
    }

    #[test]
    fn sign_in_notice_names_the_action() {
        let notice = PortalError::Unauthenticated {
            action: "apply for jobs",
        }
        .notice(Duration::from_secs(3));
        assert_eq!(notice.message, "Please sign in to apply for jobs.");
        assert_eq!(notice.level, NoticeLevel::Warning);
    }
}
