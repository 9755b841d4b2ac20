//! crates/career_portal_core/src/application.rs
//!
//! The per-(identity, job) application state machine. This module holds the
//! pure decisions; `Portal::apply_to_job` drives them against the store.
//!
//! ```text
//! Unauthenticated --apply--> Unauthenticated          (rejected, no backend call)
//! NotApplied      --apply--> Applying                 (re-read the job document)
//! Applying        --------> Applied                   (patch Applicant_<n> = email)
//! Applying        --------> Applied                   (already present, no patch)
//! any             --error-> ApplyFailed --> NotApplied
//! ```
//!
//! Ordinals are computed client-side from the re-read, so two different
//! identities applying at the same moment may be given the same ordinal and
//! the later patch replaces the earlier field. Membership of the applying
//! identity is never lost; only the index can double-assign. The same identity
//! applying twice at once is stopped by `InFlightApplies`.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ApplicantRecord, Identity, JobListing};
use crate::error::{PortalError, PortalResult};
use crate::normalize::applicant_field_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyState {
    Unauthenticated,
    NotApplied,
    Applying,
    Applied,
    ApplyFailed,
}

impl ApplyState {
    /// Whether an apply control should be enabled in this state.
    pub fn can_apply(&self) -> bool {
        matches!(self, ApplyState::NotApplied)
    }

    /// The state to report once an apply attempt has finished.
    ///
    /// `ApplyFailed` is reported once; the next load of the job shows `NotApplied` again.
    pub fn settled(result: &PortalResult<ApplyOutcome>) -> Self {
        match result {
            Ok(_) | Err(PortalError::AlreadyApplied) => ApplyState::Applied,
            Err(PortalError::Unauthenticated { .. }) => ApplyState::Unauthenticated,
            Err(PortalError::ApplyInFlight) => ApplyState::Applying,
            Err(_) => ApplyState::ApplyFailed,
        }
    }
}

/// The state shown for a job from the locally held listing.
pub fn state_for(job: &JobListing, identity: Option<&Identity>, in_flight: bool) -> ApplyState {
    match identity {
        None => ApplyState::Unauthenticated,
        Some(_) if job.has_applied => ApplyState::Applied,
        Some(_) if in_flight => ApplyState::Applying,
        Some(_) => ApplyState::NotApplied,
    }
}

/// `max(existing ordinals) + 1`, or `1` for a job without applicants.
/// Gaps are kept; ordinals are never reused. `None` once the ordinal space is used up.
pub fn next_ordinal(applicants: &[ApplicantRecord]) -> Option<u64> {
    match applicants.iter().map(|a| a.ordinal).max() {
        None => Some(1),
        Some(max) => max.checked_add(1),
    }
}

/// What the re-read of a job document tells the state machine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyPlan {
    AlreadyApplied,
    Append(ApplicantRecord),
    /// No ordinal is left above the highest stored one.
    Exhausted,
}

impl ApplyPlan {
    pub fn decide(applicants: &[ApplicantRecord], email: &str) -> Self {
        if applicants.iter().any(|a| a.email == email) {
            return ApplyPlan::AlreadyApplied;
        }
        match next_ordinal(applicants) {
            Some(ordinal) => ApplyPlan::Append(ApplicantRecord {
                ordinal,
                email: email.to_string(),
            }),
            None => ApplyPlan::Exhausted,
        }
    }
}

impl ApplicantRecord {
    /// The `Applicant_<n>` field name this record is stored under.
    pub fn field_name(&self) -> String {
        applicant_field_name(self.ordinal)
    }
}

/// A successful application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub job_id: String,
    pub ordinal: u64,
    /// Key of the `Applications` document, when it could be created.
    pub application_id: Option<String>,
}

/// Apply attempts currently running, keyed by `(user_id, job_id)`.
///
/// Clones share one set, so every session built from the same registry sees
/// the others' attempts.
#[derive(Debug, Clone, Default)]
pub struct InFlightApplies {
    active: Arc<Mutex<HashSet<(String, String)>>>,
}

impl InFlightApplies {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<(String, String)>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks an attempt as running. `None` when the same identity is already applying to the job.
    pub fn begin(&self, user_id: &str, job_id: &str) -> Option<InFlightGuard> {
        let key = (user_id.to_string(), job_id.to_string());
        if !self.lock().insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            key,
        })
    }

    pub fn contains(&self, user_id: &str, job_id: &str) -> bool {
        self.lock()
            .contains(&(user_id.to_string(), job_id.to_string()))
    }
}

/// Clears the in-flight mark when the apply attempt ends, however it ends.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightApplies,
    key: (String, String),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::sample_jobs;

    fn applicant(ordinal: u64, email: &str) -> ApplicantRecord {
        ApplicantRecord {
            ordinal,
            email: email.to_string(),
        }
    }

    #[test]
    fn first_applicant_gets_ordinal_one() {
        assert_eq!(next_ordinal(&[]), Some(1));
    }

    #[test]
    fn ordinal_follows_the_maximum_not_the_length() {
        let existing = [applicant(1, "a@x.com"), applicant(3, "c@x.com")];
        assert_eq!(next_ordinal(&existing), Some(4));
    }

    #[test]
    fn ordinal_space_ends_at_the_integer_limit() {
        let near = [applicant(u64::from(u32::MAX), "a@x.com")];
        assert_eq!(next_ordinal(&near), Some(u64::from(u32::MAX) + 1));

        let full = [applicant(u64::MAX, "a@x.com")];
        assert_eq!(next_ordinal(&full), None);
        assert_eq!(ApplyPlan::decide(&full, "b@x.com"), ApplyPlan::Exhausted);
        assert_eq!(ApplyPlan::decide(&full, "a@x.com"), ApplyPlan::AlreadyApplied);
    }

    #[test]
    fn plan_appends_a_new_applicant() {
        let existing = [applicant(1, "a@x.com")];
        let plan = ApplyPlan::decide(&existing, "b@x.com");
        assert_eq!(plan, ApplyPlan::Append(applicant(2, "b@x.com")));
        if let ApplyPlan::Append(record) = plan {
            assert_eq!(record.field_name(), "Applicant_2");
        }
    }

    #[test]
    fn plan_short_circuits_for_an_existing_applicant() {
        let existing = [applicant(1, "a@x.com"), applicant(2, "b@x.com")];
        assert_eq!(
            ApplyPlan::decide(&existing, "b@x.com"),
            ApplyPlan::AlreadyApplied
        );
    }

    #[test]
    fn settled_states_follow_the_outcome() {
        let failed: PortalResult<ApplyOutcome> =
            Err(PortalError::NetworkFailure("timeout".into()));
        assert_eq!(ApplyState::settled(&failed), ApplyState::ApplyFailed);

        let duplicate: PortalResult<ApplyOutcome> = Err(PortalError::AlreadyApplied);
        assert_eq!(ApplyState::settled(&duplicate), ApplyState::Applied);

        let racing: PortalResult<ApplyOutcome> = Err(PortalError::ApplyInFlight);
        assert_eq!(ApplyState::settled(&racing), ApplyState::Applying);
    }

    #[test]
    fn in_flight_marks_are_per_identity_and_released_on_drop() {
        let registry = InFlightApplies::new();
        let shared = registry.clone();

        let guard = registry.begin("u-1", "job-1").unwrap();
        assert!(shared.begin("u-1", "job-1").is_none());
        assert!(shared.contains("u-1", "job-1"));

        let other = shared.begin("u-2", "job-1");
        assert!(other.is_some());

        drop(guard);
        assert!(!registry.contains("u-1", "job-1"));
        assert!(shared.begin("u-1", "job-1").is_some());
    }

    #[test]
    fn state_for_each_situation() {
        let mut job = sample_jobs().remove(0);
        let who = Identity {
            user_id: "u-1".into(),
            email: "a@x.com".into(),
            display_name: None,
        };
        assert_eq!(state_for(&job, None, false), ApplyState::Unauthenticated);
        assert_eq!(state_for(&job, Some(&who), false), ApplyState::NotApplied);
        assert_eq!(state_for(&job, Some(&who), true), ApplyState::Applying);
        job.has_applied = true;
        assert_eq!(state_for(&job, Some(&who), false), ApplyState::Applied);
        assert!(!ApplyState::Applied.can_apply());
        assert!(ApplyState::NotApplied.can_apply());
    }
}
