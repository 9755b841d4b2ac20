//! crates/career_portal_core/src/notice.rs
//!
//! Transient user-facing notifications. The view shows a notice and removes it
//! once `dismiss_after` has elapsed.

use serde::{Serialize, Serializer};
use std::time::Duration;

/// How long a notice stays on screen unless configured otherwise.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(rename = "dismiss_after_ms", serialize_with = "as_millis")]
    pub dismiss_after: Duration,
}

impl Notice {
    pub fn success(message: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            dismiss_after,
        }
    }
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
