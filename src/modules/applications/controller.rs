use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use jobdesk_core::{AppError, PaginationParams};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    ApplicationDetail, ApplicationWithApplicant, ApplyRequest, PaginatedApplicationsResponse,
    PaginatedJobApplicationsResponse, ResumeValidator, UpdateStatusRequest,
};
use super::service::ApplicationService;

#[utoipa::path(
    post,
    path = "/api/applications/jobs/{job_id}/apply",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 201, description = "Application submitted", body = ApplicationWithApplicant),
        (status = 400, description = "Job closed, expired, or already applied"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - seekers only"),
        (status = 404, description = "Job not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
pub async fn apply_to_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationWithApplicant>), AppError> {
    if !auth_user.is_seeker() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only job seekers can apply to jobs"
        )));
    }

    let mut cover_letter: Option<String> = None;
    let mut resume_path: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::bad_request(anyhow::anyhow!("Invalid multipart request: {}", e))
    })? {
        match field.name() {
            Some("coverLetter") => {
                let text = field.text().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid cover letter field: {}", e))
                })?;
                if !text.is_empty() {
                    cover_letter = Some(text);
                }
            }
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::bad_request(anyhow::anyhow!("Invalid resume field: {}", e))
                })?;

                ResumeValidator::validate(&filename, bytes.len())?;

                let key = format!(
                    "resumes/resume-{}.{}",
                    Uuid::new_v4(),
                    ResumeValidator::extension(&filename)
                );
                state.files.save(&key, &bytes).await.map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to store resume: {}", e))
                })?;
                resume_path = Some(key);
            }
            _ => {}
        }
    }

    let request = ApplyRequest { cover_letter };
    request
        .validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let application = ApplicationService::apply_to_job(
        &state.db,
        auth_user.user_id()?,
        job_id,
        request.cover_letter,
        resume_path,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

#[utoipa::path(
    get,
    path = "/api/applications/my/applications",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-50)")
    ),
    responses(
        (status = 200, description = "Seeker's applications", body = PaginatedApplicationsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - seekers only")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
pub async fn my_applications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedApplicationsResponse>, AppError> {
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    if !auth_user.is_seeker() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only job seekers can view their applications"
        )));
    }

    let applications =
        ApplicationService::my_applications(&state.db, auth_user.user_id()?, pagination).await?;
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications/jobs/{job_id}/applications",
    params(
        ("job_id" = Uuid, Path, description = "Job ID"),
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-50)")
    ),
    responses(
        (status = 200, description = "Applications to the job", body = PaginatedJobApplicationsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - employers only"),
        (status = 404, description = "Job not found or not owned by the caller")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
pub async fn job_applications(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(job_id): Path<Uuid>,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedJobApplicationsResponse>, AppError> {
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    if !auth_user.is_employer() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only employers can view job applications"
        )));
    }

    let applications = ApplicationService::job_applications(
        &state.db,
        auth_user.user_id()?,
        job_id,
        pagination,
    )
    .await?;
    Ok(Json(applications))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApplicationWithApplicant),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the posting employer"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
pub async fn update_application_status(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ApplicationWithApplicant>, AppError> {
    if !auth_user.is_employer() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only employers can update application status"
        )));
    }

    let application =
        ApplicationService::update_status(&state.db, auth_user.user_id()?, id, dto).await?;
    Ok(Json(application))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application details", body = ApplicationDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Application not found")
    ),
    tag = "Applications",
    security(("bearer_auth" = []))
)]
pub async fn get_application(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application = ApplicationService::get_application(&state.db, &auth_user, id).await?;
    Ok(Json(application))
}
