use axum::{
    Json,
    extract::{Multipart, State},
};
use uuid::Uuid;

use jobdesk_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::applications::model::ResumeValidator;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{AvatarValidator, Profile, UpdateProfileDto};
use super::service::ProfileService;

#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "Caller's profile, created on first access", body = Profile),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::get_or_create(&state.db, auth_user.user_id()?).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    put,
    path = "/api/profile/me",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
pub async fn update_my_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileService::update_profile(&state.db, auth_user.user_id()?, dto).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile/me/avatar",
    responses(
        (status = 200, description = "Avatar stored", body = Profile),
        (status = 400, description = "Missing or invalid avatar file"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Profile>, AppError> {
    let (filename, bytes) = read_upload_field(multipart, "avatar").await?;
    AvatarValidator::validate(&filename, bytes.len())?;

    let key = format!(
        "profiles/profile-{}.{}",
        Uuid::new_v4(),
        AvatarValidator::extension(&filename)
    );
    let profile = ProfileService::set_avatar(
        &state.db,
        state.files.as_ref(),
        auth_user.user_id()?,
        &key,
        &bytes,
    )
    .await?;
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/api/profile/me/resume",
    responses(
        (status = 200, description = "Resume stored", body = Profile),
        (status = 400, description = "Missing or invalid resume file"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Profile",
    security(("bearer_auth" = []))
)]
pub async fn upload_resume(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Profile>, AppError> {
    let (filename, bytes) = read_upload_field(multipart, "resume").await?;
    ResumeValidator::validate(&filename, bytes.len())?;

    let key = format!(
        "resumes/resume-{}.{}",
        Uuid::new_v4(),
        ResumeValidator::extension(&filename)
    );
    let profile = ProfileService::set_resume(
        &state.db,
        state.files.as_ref(),
        auth_user.user_id()?,
        &key,
        &bytes,
    )
    .await?;
    Ok(Json(profile))
}

/// Pulls the named file field out of a multipart request.
async fn read_upload_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<(String, axum::body::Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::bad_request(anyhow::anyhow!("Invalid multipart request: {}", e))
    })? {
        if field.name() == Some(field_name) {
            let filename = field.file_name().unwrap_or(field_name).to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError::bad_request(anyhow::anyhow!("Invalid {} field: {}", field_name, e))
            })?;
            return Ok((filename, bytes));
        }
    }

    Err(AppError::bad_request(anyhow::anyhow!(
        "{} file is required",
        field_name
    )))
}
