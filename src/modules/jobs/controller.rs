use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::{Value, json};
use uuid::Uuid;

use jobdesk_core::{AppError, PaginationParams};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CreateJobDto, JobFilterParams, JobWithEmployer, PaginatedJobsResponse, UpdateJobDto};
use super::service::JobService;

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-50)"),
        ("sort" = Option<String>, Query, description = "Sort field (default createdAt)"),
        ("order" = Option<String>, Query, description = "Sort direction, asc or desc"),
        ("search" = Option<String>, Query, description = "Full-text search"),
        ("location" = Option<String>, Query, description = "Location substring filter"),
        ("employmentType" = Option<String>, Query, description = "Employment type filter"),
        ("experienceLevel" = Option<String>, Query, description = "Experience level filter"),
        ("minSalary" = Option<i64>, Query, description = "Minimum salary floor"),
        ("maxSalary" = Option<i64>, Query, description = "Maximum salary ceiling")
    ),
    responses(
        (status = 200, description = "Paginated list of active jobs", body = PaginatedJobsResponse),
        (status = 400, description = "Malformed filter parameters")
    ),
    tag = "Jobs"
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(raw_query): Query<HashMap<String, String>>,
    filters: Result<Query<JobFilterParams>, QueryRejection>,
) -> Result<Json<PaginatedJobsResponse>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let jobs =
        JobService::list_jobs(&state.db, state.cache.as_ref(), raw_query, filters).await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job details", body = JobWithEmployer),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs"
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobWithEmployer>, AppError> {
    let job = JobService::get_job_by_id(&state.db, id).await?;
    JobService::increment_views(&state.db, id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body = CreateJobDto,
    responses(
        (status = 201, description = "Job created", body = JobWithEmployer),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - employers only")
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
pub async fn create_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateJobDto>,
) -> Result<(axum::http::StatusCode, Json<JobWithEmployer>), AppError> {
    if !auth_user.is_employer() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only employers can create jobs"
        )));
    }

    let job = JobService::create_job(
        &state.db,
        state.cache.as_ref(),
        auth_user.user_id()?,
        dto,
    )
    .await?;
    Ok((axum::http::StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateJobDto,
    responses(
        (status = 200, description = "Job updated", body = JobWithEmployer),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the posting employer"),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
pub async fn update_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateJobDto>,
) -> Result<Json<JobWithEmployer>, AppError> {
    let job = JobService::update_job(
        &state.db,
        state.cache.as_ref(),
        id,
        auth_user.user_id()?,
        auth_user.is_admin(),
        dto,
    )
    .await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not the posting employer"),
        (status = 404, description = "Job not found")
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
pub async fn delete_job(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    JobService::delete_job(
        &state.db,
        state.cache.as_ref(),
        id,
        auth_user.user_id()?,
        auth_user.is_admin(),
    )
    .await?;
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

#[utoipa::path(
    get,
    path = "/api/jobs/my/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number (1-indexed)"),
        ("limit" = Option<i64>, Query, description = "Items per page (1-50)")
    ),
    responses(
        (status = 200, description = "Employer's own jobs", body = PaginatedJobsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - employers only")
    ),
    tag = "Jobs",
    security(("bearer_auth" = []))
)]
pub async fn my_jobs(
    State(state): State<AppState>,
    auth_user: AuthUser,
    pagination: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<PaginatedJobsResponse>, AppError> {
    let Query(pagination) = pagination
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    if !auth_user.is_employer() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only employers can view their jobs"
        )));
    }

    let jobs = JobService::my_jobs(&state.db, auth_user.user_id()?, pagination).await?;
    Ok(Json(jobs))
}
