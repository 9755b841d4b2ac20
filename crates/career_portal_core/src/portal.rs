//! crates/career_portal_core/src/portal.rs
//!
//! The operations the view layer calls. One `Portal` is one user session: it
//! holds the gateway handle, a subscription to the identity, and the
//! session's listing snapshots, which are only ever replaced wholesale.

use chrono::{DateTime, Utc};
use futures::try_join;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::application::{
    state_for, ApplyOutcome, ApplyPlan, ApplyState, InFlightApplies, InFlightGuard,
};
use crate::domain::{
    ApplicationRecord, ApplicationStatus, Collection, Document, Identity, JobListing,
    ResourceEntry, StoredDocument, UserProfile,
};
use crate::error::{PortalError, PortalResult};
use crate::normalize::{normalize_application, normalize_job, normalize_resource, parse_applicants};
use crate::placeholder::{sample_jobs, sample_resources, Loaded};
use crate::ports::{DocumentGateway, IdentityObserver, PortError};
use crate::profile::{profile_from_document, profile_patch, ProfileForm};
use crate::search::{self, CategoryFilter, JobFilters};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Everything the profile page shows, loaded together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileOverview {
    pub identity: Identity,
    pub profile: UserProfile,
    pub applications: Vec<ApplicationRecord>,
}

pub struct Portal {
    gateway: Arc<dyn DocumentGateway>,
    identity: watch::Receiver<Option<Identity>>,
    jobs: RwLock<Arc<[JobListing]>>,
    resources: RwLock<Arc<[ResourceEntry]>>,
    applying: InFlightApplies,
    clock: Clock,
}

impl Portal {
    pub fn new(gateway: Arc<dyn DocumentGateway>, identity: &dyn IdentityObserver) -> Self {
        Self {
            gateway,
            identity: identity.subscribe(),
            jobs: RwLock::new(Arc::from(Vec::new())),
            resources: RwLock::new(Arc::from(Vec::new())),
            applying: InFlightApplies::new(),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Shares in-flight apply attempts with every other session built from `applying`.
    pub fn with_in_flight(mut self, applying: InFlightApplies) -> Self {
        self.applying = applying;
        self
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    fn require_identity(&self, action: &'static str) -> PortalResult<Identity> {
        self.current_identity()
            .ok_or(PortalError::Unauthenticated { action })
    }

    //=====================================================================================
    // Jobs
    //=====================================================================================

    /// The job listing as last loaded by this session.
    pub fn jobs(&self) -> Arc<[JobListing]> {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetches and normalizes every job, replacing the session's listing.
    pub async fn fetch_jobs(&self) -> PortalResult<Vec<JobListing>> {
        let viewer = self.current_identity();
        let docs = self.gateway.list_all(Collection::Jobs).await?;
        let jobs: Vec<JobListing> = docs
            .iter()
            .map(|doc| normalize_job(doc, viewer.as_ref()))
            .collect();
        info!(count = jobs.len(), "loaded job listings");
        *self.jobs.write().unwrap_or_else(PoisonError::into_inner) = Arc::from(jobs.clone());
        Ok(jobs)
    }

    /// Like `fetch_jobs`, but falls back to placeholder listings when the store fails.
    /// The placeholders become the session's listing as well.
    pub async fn load_jobs(&self) -> Loaded<JobListing> {
        match self.fetch_jobs().await {
            Ok(jobs) => Loaded::Live(jobs),
            Err(error) => {
                warn!("job listings unavailable, showing placeholders: {error}");
                let records = sample_jobs();
                *self.jobs.write().unwrap_or_else(PoisonError::into_inner) =
                    Arc::from(records.clone());
                Loaded::Degraded { records, error }
            }
        }
    }

    /// Fetches one job and swaps it into the session's listing.
    pub async fn load_job(&self, job_id: &str) -> PortalResult<JobListing> {
        let fields = self.gateway.get_one(Collection::Jobs, job_id).await?;
        let viewer = self.current_identity();
        let job = normalize_job(
            &StoredDocument {
                key: job_id.to_string(),
                fields,
            },
            viewer.as_ref(),
        );

        let mut listing = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let mut jobs = listing.to_vec();
        match jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job.clone(),
            None => jobs.push(job.clone()),
        }
        *listing = Arc::from(jobs);
        Ok(job)
    }

    /// Reloads the listing and filters it by `term` and `filters`.
    pub async fn search_jobs(
        &self,
        term: &str,
        filters: &JobFilters,
    ) -> PortalResult<Vec<JobListing>> {
        let jobs = self.fetch_jobs().await?;
        Ok(search::search_jobs(&jobs, term, filters))
    }

    //=====================================================================================
    // Applying
    //=====================================================================================

    /// The apply state of a job according to the session's listing.
    pub fn apply_state(&self, job_id: &str) -> ApplyState {
        let identity = self.current_identity();
        let in_flight = identity
            .as_ref()
            .is_some_and(|who| self.applying.contains(&who.user_id, job_id));
        match self.jobs().iter().find(|job| job.id == job_id) {
            Some(job) => state_for(job, identity.as_ref(), in_flight),
            None if identity.is_none() => ApplyState::Unauthenticated,
            None if in_flight => ApplyState::Applying,
            None => ApplyState::NotApplied,
        }
    }

    fn begin_apply(&self, user_id: &str, job_id: &str) -> PortalResult<InFlightGuard> {
        self.applying
            .begin(user_id, job_id)
            .ok_or(PortalError::ApplyInFlight)
    }

    /// Applies the current identity to a job.
    ///
    /// Re-reads the job before writing so a stale listing cannot cause a
    /// duplicate application, then reloads the listing on success.
    pub async fn apply_to_job(&self, job_id: &str) -> PortalResult<ApplyOutcome> {
        let Some(identity) = self.current_identity() else {
            info!(job_id, "apply rejected: no signed-in identity");
            return Err(PortalError::Unauthenticated {
                action: "apply for jobs",
            });
        };
        let _in_flight = self.begin_apply(&identity.user_id, job_id)?;

        let result = self.submit_application(job_id, &identity).await;
        match &result {
            Ok(outcome) => info!(job_id, ordinal = outcome.ordinal, "application submitted"),
            Err(PortalError::AlreadyApplied) => info!(job_id, "already applied"),
            Err(err) => warn!(job_id, "application failed: {err}"),
        }
        result
    }

    async fn submit_application(
        &self,
        job_id: &str,
        identity: &Identity,
    ) -> PortalResult<ApplyOutcome> {
        let fields = self.gateway.get_one(Collection::Jobs, job_id).await?;
        let applicants = parse_applicants(&fields);

        let record = match ApplyPlan::decide(&applicants, &identity.email) {
            ApplyPlan::AlreadyApplied => return Err(PortalError::AlreadyApplied),
            ApplyPlan::Exhausted => {
                return Err(PortalError::Validation(
                    "This job is not accepting more applications.".to_string(),
                ))
            }
            ApplyPlan::Append(record) => record,
        };

        let mut patch = Document::new();
        patch.insert(record.field_name(), Value::String(record.email.clone()));
        self.gateway
            .patch_fields(Collection::Jobs, job_id, patch)
            .await?;

        let application_id = match self
            .gateway
            .add_document(Collection::Applications, self.application_document(job_id, identity))
            .await
        {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(job_id, "applicant recorded but the application entry was not: {err}");
                None
            }
        };

        if let Err(err) = self.fetch_jobs().await {
            warn!(job_id, "listing reload after apply failed: {err}");
        }

        Ok(ApplyOutcome {
            job_id: job_id.to_string(),
            ordinal: record.ordinal,
            application_id,
        })
    }

    fn application_document(&self, job_id: &str, identity: &Identity) -> Document {
        let mut doc = Document::new();
        doc.insert("jobId".into(), Value::String(job_id.to_string()));
        doc.insert("userId".into(), Value::String(identity.user_id.clone()));
        doc.insert("userEmail".into(), Value::String(identity.email.clone()));
        doc.insert(
            "status".into(),
            Value::String(ApplicationStatus::Pending.as_str().to_string()),
        );
        doc.insert(
            "appliedAt".into(),
            Value::String((self.clock)().to_rfc3339()),
        );
        doc
    }

    /// The signed-in identity's applications, newest first.
    pub async fn load_applications(&self) -> PortalResult<Vec<ApplicationRecord>> {
        let identity = self.require_identity("view your applications")?;
        let docs = self.gateway.list_all(Collection::Applications).await?;
        let mut applications: Vec<ApplicationRecord> = docs
            .iter()
            .map(normalize_application)
            .filter(|app| app.user_id == identity.user_id)
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    //=====================================================================================
    // Profile
    //=====================================================================================

    /// Loads a profile. A user without a document or without a profile gets the empty default.
    pub async fn load_profile(&self, user_id: &str) -> PortalResult<UserProfile> {
        match self.gateway.get_one(Collection::Users, user_id).await {
            Ok(fields) => Ok(profile_from_document(&fields)),
            Err(PortError::NotFound(_)) => Ok(UserProfile::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces the stored profile with the form's values.
    pub async fn save_profile(&self, user_id: &str, form: ProfileForm) -> PortalResult<UserProfile> {
        let identity = self.require_identity("edit your profile")?;
        if identity.user_id != user_id {
            warn!(user_id, "refusing to save another user's profile");
            return Err(PortalError::Unauthenticated {
                action: "edit your profile",
            });
        }
        let profile = form.into_profile();
        self.gateway
            .patch_fields(Collection::Users, user_id, profile_patch(&profile))
            .await?;
        info!(user_id, skills = profile.skills.len(), "profile saved");
        Ok(profile)
    }

    /// Loads the signed-in identity's profile and applications concurrently.
    pub async fn load_profile_overview(&self) -> PortalResult<ProfileOverview> {
        let identity = self.require_identity("view your profile")?;
        let (profile, applications) =
            try_join!(self.load_profile(&identity.user_id), self.load_applications())?;
        Ok(ProfileOverview {
            identity,
            profile,
            applications,
        })
    }

    //=====================================================================================
    // Resources
    //=====================================================================================

    pub fn resources(&self) -> Arc<[ResourceEntry]> {
        self.resources
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn fetch_resources(&self) -> PortalResult<Vec<ResourceEntry>> {
        let docs = self.gateway.list_all(Collection::Resources).await?;
        let resources: Vec<ResourceEntry> = docs.iter().map(normalize_resource).collect();
        info!(count = resources.len(), "loaded resources");
        *self
            .resources
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Arc::from(resources.clone());
        Ok(resources)
    }

    pub async fn load_resources(&self) -> Loaded<ResourceEntry> {
        match self.fetch_resources().await {
            Ok(resources) => Loaded::Live(resources),
            Err(error) => {
                warn!("resources unavailable, showing placeholders: {error}");
                let records = sample_resources();
                *self
                    .resources
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Arc::from(records.clone());
                Loaded::Degraded { records, error }
            }
        }
    }

    /// Filters the resources this session last loaded.
    pub fn filter_resources(&self, term: &str, category: CategoryFilter) -> Vec<ResourceEntry> {
        search::filter_resources(&self.resources(), term, category)
    }
}
