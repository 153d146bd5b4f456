use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login, register, request_password_reset, reset_password, verify_email};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-email", post(verify_email))
        .route("/password/request", post(request_password_reset))
        .route("/password/reset", post(reset_password))
}
