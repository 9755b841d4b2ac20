pub mod assistant;
pub mod middleware;
pub mod rejection;
pub mod rest;
pub mod state;

use crate::web::assistant::{chat_handler, summarize_cv_handler};
use crate::web::middleware::attach_identity;
use crate::web::rest::{
    apply_handler, get_job_handler, get_profile_handler, healthz_handler,
    list_applications_handler, list_jobs_handler, list_resources_handler, save_profile_handler,
    search_jobs_handler,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Uploaded CVs are capped at 10 MiB.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT])
}

/// Builds the API router. Every route sees the request identity via `attach_identity`.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.cors_origins);

    Router::new()
        .route("/healthz", get(healthz_handler))
        .route("/jobs", get(list_jobs_handler))
        .route("/jobs/search", get(search_jobs_handler))
        .route("/jobs/{job_id}", get(get_job_handler))
        .route("/jobs/{job_id}/apply", post(apply_handler))
        .route("/profile", get(get_profile_handler).put(save_profile_handler))
        .route("/applications", get(list_applications_handler))
        .route("/resources", get(list_resources_handler))
        .route("/assistant/chat", post(chat_handler))
        .route("/assistant/summarize-cv", post(summarize_cv_handler))
        .layer(axum_middleware::from_fn(attach_identity))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
