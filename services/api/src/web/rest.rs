//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the job, profile and resource endpoints and
//! the master definition for the OpenAPI specification.

use crate::web::assistant::{ChatRequest, ChatResponse, CvSummaryResponse};
use crate::web::middleware::CurrentIdentity;
use crate::web::rejection::Rejection;
use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use career_portal_core::{
    ApplicationRecord, ApplyOutcome, ApplyState, CategoryFilter, Identity, JobFilters, JobListing,
    Loaded, Notice, PortalError, ProfileForm, ProfileOverview, ResourceEntry, UserProfile,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_jobs_handler,
        search_jobs_handler,
        get_job_handler,
        apply_handler,
        get_profile_handler,
        save_profile_handler,
        list_applications_handler,
        list_resources_handler,
        crate::web::assistant::chat_handler,
        crate::web::assistant::summarize_cv_handler,
        healthz_handler,
    ),
    components(
        schemas(
            JobsResponse,
            JobDetailResponse,
            ApplyResponse,
            ProfileRequest,
            ProfileResponse,
            SavedProfileResponse,
            ApplicationsResponse,
            ResourcesResponse,
            ChatRequest,
            ChatResponse,
            CvSummaryResponse,
        )
    ),
    tags(
        (name = "Career Portal API", description = "Job listings, applications, profiles, learning resources and the career assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A job listing page. `degraded` listings hold sample data and must not be acted on.
#[derive(Serialize, ToSchema)]
pub struct JobsResponse {
    degraded: bool,
    #[schema(value_type = Vec<Object>)]
    jobs: Vec<JobListing>,
    #[schema(value_type = Option<Object>)]
    notice: Option<Notice>,
}

#[derive(Serialize, ToSchema)]
pub struct JobDetailResponse {
    #[schema(value_type = Object)]
    job: JobListing,
    #[schema(value_type = String)]
    apply_state: ApplyState,
    /// Whether the apply control should be enabled.
    can_apply: bool,
}

#[derive(Serialize, ToSchema)]
pub struct ApplyResponse {
    #[schema(value_type = Object)]
    outcome: ApplyOutcome,
    #[schema(value_type = String)]
    apply_state: ApplyState,
    #[schema(value_type = Object)]
    notice: Notice,
}

/// The profile form. Skills are one comma-separated string.
#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRequest {
    bio: String,
    skills: String,
    experience: String,
    location: String,
    education: String,
    career_track: String,
}

impl From<ProfileRequest> for ProfileForm {
    fn from(req: ProfileRequest) -> Self {
        ProfileForm {
            bio: req.bio,
            skills: req.skills,
            experience: req.experience,
            location: req.location,
            education: req.education,
            career_track: req.career_track,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    #[schema(value_type = Object)]
    identity: Identity,
    #[schema(value_type = Object)]
    profile: UserProfile,
    #[schema(value_type = Vec<Object>)]
    applications: Vec<ApplicationRecord>,
    /// The edit form pre-filled from `profile`.
    #[schema(value_type = Object)]
    form: ProfileForm,
}

impl From<ProfileOverview> for ProfileResponse {
    fn from(overview: ProfileOverview) -> Self {
        Self {
            form: ProfileForm::from_profile(&overview.profile),
            identity: overview.identity,
            profile: overview.profile,
            applications: overview.applications,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SavedProfileResponse {
    #[schema(value_type = Object)]
    profile: UserProfile,
    #[schema(value_type = Object)]
    notice: Notice,
}

#[derive(Serialize, ToSchema)]
pub struct ApplicationsResponse {
    #[schema(value_type = Vec<Object>)]
    applications: Vec<ApplicationRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct ResourcesResponse {
    degraded: bool,
    #[schema(value_type = Vec<Object>)]
    resources: Vec<ResourceEntry>,
    #[schema(value_type = Option<Object>)]
    notice: Option<Notice>,
}

#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct JobSearchParams {
    /// Case-insensitive text matched against title, company and description.
    #[serde(default)]
    q: String,
    location: Option<String>,
    employment_type: Option<String>,
}

#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct ResourceParams {
    /// Case-insensitive text matched against title, description and tags.
    #[serde(default)]
    q: String,
    /// A category name, or `All`.
    #[serde(default)]
    category: String,
}

fn split_loaded<T>(loaded: Loaded<T>, state: &AppState) -> (bool, Vec<T>, Option<Notice>) {
    match loaded {
        Loaded::Live(records) => (false, records, None),
        Loaded::Degraded { records, error } => {
            (true, records, Some(error.notice(state.config.notice_dismiss_after)))
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Health check.
#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Service is up")))]
pub async fn healthz_handler() -> &'static str {
    "ok"
}

/// List all jobs. Falls back to sample listings when the store is unreachable.
#[utoipa::path(
    get,
    path = "/jobs",
    responses((status = 200, description = "Job listings", body = JobsResponse))
)]
pub async fn list_jobs_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Json<JobsResponse> {
    let portal = app_state.portal(&identity);
    let (degraded, jobs, notice) = split_loaded(portal.load_jobs().await, &app_state);
    Json(JobsResponse {
        degraded,
        jobs,
        notice,
    })
}

/// Search jobs by free text and optional location / employment type.
#[utoipa::path(
    get,
    path = "/jobs/search",
    params(JobSearchParams),
    responses(
        (status = 200, description = "Matching jobs", body = JobsResponse),
        (status = 502, description = "The document store is unreachable")
    )
)]
pub async fn search_jobs_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
    Query(params): Query<JobSearchParams>,
) -> Result<Json<JobsResponse>, Rejection> {
    let portal = app_state.portal(&identity);
    let filters = JobFilters {
        location: params.location,
        employment_type: params.employment_type,
    };
    let jobs = portal
        .search_jobs(&params.q, &filters)
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(JobsResponse {
        degraded: false,
        jobs,
        notice: None,
    }))
}

/// Fetch one job together with the caller's apply state for it.
#[utoipa::path(
    get,
    path = "/jobs/{job_id}",
    params(("job_id" = String, Path, description = "The job document key.")),
    responses(
        (status = 200, description = "The job", body = JobDetailResponse),
        (status = 404, description = "No such job")
    )
)]
pub async fn get_job_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
    Path(job_id): Path<String>,
) -> Result<Json<JobDetailResponse>, Rejection> {
    let portal = app_state.portal(&identity);
    let job = portal
        .load_job(&job_id)
        .await
        .map_err(|e| app_state.reject(e))?;
    let apply_state = portal.apply_state(&job_id);
    Ok(Json(JobDetailResponse {
        job,
        apply_state,
        can_apply: apply_state.can_apply(),
    }))
}

/// Apply to a job as the signed-in user.
#[utoipa::path(
    post,
    path = "/jobs/{job_id}/apply",
    params(("job_id" = String, Path, description = "The job document key.")),
    responses(
        (status = 201, description = "Application recorded", body = ApplyResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No such job"),
        (status = 409, description = "Already applied, or an application is already in flight"),
        (status = 502, description = "The document store is unreachable")
    )
)]
pub async fn apply_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, Rejection> {
    let portal = app_state.portal(&identity);
    let result = portal.apply_to_job(&job_id).await;
    let apply_state = ApplyState::settled(&result);

    match result {
        Ok(outcome) => {
            info!(job_id = %outcome.job_id, ordinal = outcome.ordinal, "application accepted");
            let response = ApplyResponse {
                outcome,
                apply_state,
                notice: Notice::success(
                    "Application submitted successfully!",
                    app_state.config.notice_dismiss_after,
                ),
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => Err(app_state.reject(e).with_apply_state(apply_state)),
    }
}

/// The signed-in user's identity, profile and applications.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile overview", body = ProfileResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn get_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<Json<ProfileResponse>, Rejection> {
    let portal = app_state.portal(&identity);
    let overview = portal
        .load_profile_overview()
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(overview.into()))
}

/// Replace the signed-in user's profile.
#[utoipa::path(
    put,
    path = "/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = SavedProfileResponse),
        (status = 401, description = "Not signed in"),
        (status = 502, description = "The document store is unreachable")
    )
)]
pub async fn save_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<SavedProfileResponse>, Rejection> {
    let user_id = identity
        .0
        .as_ref()
        .map(|i| i.user_id.clone())
        .ok_or_else(|| {
            app_state.reject(PortalError::Unauthenticated {
                action: "edit your profile",
            })
        })?;
    let portal = app_state.portal(&identity);
    let profile = portal
        .save_profile(&user_id, request.into())
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(SavedProfileResponse {
        profile,
        notice: Notice::success(
            "Profile updated successfully!",
            app_state.config.notice_dismiss_after,
        ),
    }))
}

/// The signed-in user's applications, newest first.
#[utoipa::path(
    get,
    path = "/applications",
    responses(
        (status = 200, description = "Applications", body = ApplicationsResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_applications_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
) -> Result<Json<ApplicationsResponse>, Rejection> {
    let portal = app_state.portal(&identity);
    let applications = portal
        .load_applications()
        .await
        .map_err(|e| app_state.reject(e))?;
    Ok(Json(ApplicationsResponse { applications }))
}

/// Learning resources, filtered by text and category.
#[utoipa::path(
    get,
    path = "/resources",
    params(ResourceParams),
    responses(
        (status = 200, description = "Resources", body = ResourcesResponse),
        (status = 422, description = "Unknown category")
    )
)]
pub async fn list_resources_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(identity): Extension<CurrentIdentity>,
    Query(params): Query<ResourceParams>,
) -> Result<Json<ResourcesResponse>, Rejection> {
    let category: CategoryFilter = params
        .category
        .trim()
        .parse()
        .map_err(|e: String| app_state.reject(PortalError::Validation(e)))?;

    let portal = app_state.portal(&identity);
    let (degraded, _, notice) = split_loaded(portal.load_resources().await, &app_state);
    let resources = portal.filter_resources(&params.q, category);
    Ok(Json(ResourcesResponse {
        degraded,
        resources,
        notice,
    }))
}
