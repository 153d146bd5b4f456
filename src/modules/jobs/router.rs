use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_job, delete_job, get_job, list_jobs, my_jobs, update_job};

pub fn init_jobs_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/my/jobs", get(my_jobs))
        .route("/{id}", get(get_job).put(update_job).delete(delete_job))
}
