use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    apply_to_job, get_application, job_applications, my_applications, update_application_status,
};

/// Resume uploads can exceed axum's 2MB default body limit.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn init_applications_router() -> Router<AppState> {
    Router::new()
        .route(
            "/jobs/{job_id}/apply",
            post(apply_to_job).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/my/applications", get(my_applications))
        .route("/jobs/{job_id}/applications", get(job_applications))
        .route("/{id}/status", put(update_application_status))
        .route("/{id}", get(get_application))
}
