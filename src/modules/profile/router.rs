use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_my_profile, update_my_profile, upload_avatar, upload_resume};

/// File uploads can exceed axum's 2MB default body limit.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_profile).put(update_my_profile))
        .route(
            "/me/avatar",
            post(upload_avatar).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/me/resume",
            post(upload_resume).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}
