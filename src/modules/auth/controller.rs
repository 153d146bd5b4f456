use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use jobdesk_core::AppError;

use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

use super::model::{
    LoginRequest, LoginResponse, OkResponse, PasswordResetRequest, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, VerifyEmailRequest, VerifyEmailResponse,
};
use super::service::AuthService;

/// Error body shape for documentation purposes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let user =
        AuthService::register_user(&state.db, state.cache.as_ref(), &email_service, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            email: user.email,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = VerifyEmailResponse),
        (status = 400, description = "Invalid token", body = ErrorResponse),
        (status = 503, description = "Token store unavailable", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, AppError> {
    let response = AuthService::verify_email(&state.db, state.cache.as_ref(), &dto.token).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/password/request",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Acknowledged regardless of account existence", body = OkResponse),
        (status = 503, description = "Token store unavailable", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<PasswordResetRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    AuthService::request_password_reset(&state.db, state.cache.as_ref(), &email_service, &dto.email)
        .await?;
    Ok(Json(OkResponse { ok: true }))
}

#[utoipa::path(
    post,
    path = "/api/auth/password/reset",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = OkResponse),
        (status = 400, description = "Invalid token", body = ErrorResponse),
        (status = 503, description = "Token store unavailable", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<OkResponse>, AppError> {
    AuthService::reset_password(&state.db, state.cache.as_ref(), &dto.token, &dto.password)
        .await?;
    Ok(Json(OkResponse { ok: true }))
}
