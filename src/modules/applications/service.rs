use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use jobdesk_core::{AppError, PaginationMeta, PaginationParams};

use crate::middleware::auth::AuthUser;
use crate::modules::jobs::model::JobStatus;

use super::model::{
    APPLICATION_COLUMNS, ApplicationDetail, ApplicationStatus, ApplicationWithApplicant,
    ApplicationWithJob, JOB_BRIEF_COLUMNS, PaginatedApplicationsResponse,
    PaginatedJobApplicationsResponse, UpdateStatusRequest, sort_column,
};

pub struct ApplicationService;

impl ApplicationService {
    /// Files an application against an active, unexpired job.
    ///
    /// The job's `applications_count` is bumped here as an explicit
    /// follow-up operation, not as a persistence-layer side effect.
    #[instrument(skip(db, cover_letter, resume_path), fields(job.id = %job_id, applicant.id = %applicant_id, db.operation = "INSERT", db.table = "applications"))]
    pub async fn apply_to_job(
        db: &PgPool,
        applicant_id: Uuid,
        job_id: Uuid,
        cover_letter: Option<String>,
        resume_path: Option<String>,
    ) -> Result<ApplicationWithApplicant, AppError> {
        #[derive(sqlx::FromRow)]
        struct JobGate {
            status: JobStatus,
            expires_at: Option<chrono::DateTime<Utc>>,
        }

        let job = sqlx::query_as::<_, JobGate>("SELECT status, expires_at FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error fetching job for application");
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Job not found")))?;

        let expired = job.expires_at.is_some_and(|at| at < Utc::now());
        if job.status != JobStatus::Active || expired {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "This job is no longer accepting applications"
            )));
        }

        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM applications WHERE job_id = $1 AND applicant_id = $2",
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(job.id = %job_id, error = %e, "Database error checking existing application");
            AppError::from(e)
        })?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "You have already applied to this job"
            )));
        }

        let application_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO applications (job_id, applicant_id, cover_letter, resume_path) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(job_id)
        .bind(applicant_id)
        .bind(cover_letter)
        .bind(resume_path)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(job.id = %job_id, error = %e, "Database error creating application");
            AppError::from(e)
        })?;

        Self::increment_applications_count(db, job_id).await?;

        info!(
            application.id = %application_id,
            job.id = %job_id,
            "Application submitted"
        );

        Self::fetch_with_applicant(db, application_id).await
    }

    /// Bumps the denormalized application counter on the job row.
    #[instrument(skip(db), fields(job.id = %job_id, db.operation = "UPDATE", db.table = "jobs"))]
    pub async fn increment_applications_count(db: &PgPool, job_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET applications_count = applications_count + 1 WHERE id = $1")
            .bind(job_id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error incrementing applications count");
                AppError::from(e)
            })?;

        Ok(())
    }

    /// A seeker's own applications with job summaries.
    #[instrument(skip(db, pagination), fields(applicant.id = %applicant_id, db.operation = "SELECT", db.table = "applications"))]
    pub async fn my_applications(
        db: &PgPool,
        applicant_id: Uuid,
        pagination: PaginationParams,
    ) -> Result<PaginatedApplicationsResponse, AppError> {
        let page = pagination.page();
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM applications WHERE applicant_id = $1",
        )
        .bind(applicant_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(applicant.id = %applicant_id, error = %e, "Database error counting applications");
            AppError::from(e)
        })?;

        let data_query = format!(
            "SELECT {}, {} FROM applications a INNER JOIN jobs j ON j.id = a.job_id \
             WHERE a.applicant_id = $1 ORDER BY a.{} {} LIMIT {} OFFSET {}",
            APPLICATION_COLUMNS,
            JOB_BRIEF_COLUMNS,
            sort_column(pagination.sort()),
            pagination.order().as_sql(),
            limit,
            offset
        );
        let applications = sqlx::query_as::<_, ApplicationWithJob>(&data_query)
            .bind(applicant_id)
            .fetch_all(db)
            .await
            .map_err(|e| {
                error!(applicant.id = %applicant_id, error = %e, "Database error fetching applications");
                AppError::from(e)
            })?;

        debug!(
            applicant.id = %applicant_id,
            total = %total,
            returned = %applications.len(),
            "Applications fetched"
        );

        Ok(PaginatedApplicationsResponse {
            data: applications,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Applications to one of the employer's own jobs.
    #[instrument(skip(db, pagination), fields(job.id = %job_id, employer.id = %employer_id, db.operation = "SELECT", db.table = "applications"))]
    pub async fn job_applications(
        db: &PgPool,
        employer_id: Uuid,
        job_id: Uuid,
        pagination: PaginationParams,
    ) -> Result<PaginatedJobApplicationsResponse, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT employer_id FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error fetching job owner");
                AppError::from(e)
            })?;

        if owner != Some(employer_id) {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Job not found or you don't have permission to view its applications"
            )));
        }

        let page = pagination.page();
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM applications WHERE job_id = $1")
                .bind(job_id)
                .fetch_one(db)
                .await
                .map_err(|e| {
                    error!(job.id = %job_id, error = %e, "Database error counting applications");
                    AppError::from(e)
                })?;

        let data_query = format!(
            "SELECT {}, u.name AS applicant_name, u.email AS applicant_email \
             FROM applications a INNER JOIN users u ON u.id = a.applicant_id \
             WHERE a.job_id = $1 ORDER BY a.{} {} LIMIT {} OFFSET {}",
            APPLICATION_COLUMNS,
            sort_column(pagination.sort()),
            pagination.order().as_sql(),
            limit,
            offset
        );
        let applications = sqlx::query_as::<_, ApplicationWithApplicant>(&data_query)
            .bind(job_id)
            .fetch_all(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error fetching applications");
                AppError::from(e)
            })?;

        Ok(PaginatedJobApplicationsResponse {
            data: applications,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    /// Moves an application through the review pipeline.
    ///
    /// The first transition out of `pending` stamps `reviewed_at`; the
    /// stamp is computed here and written explicitly.
    #[instrument(skip(db, dto), fields(application.id = %application_id, db.operation = "UPDATE", db.table = "applications"))]
    pub async fn update_status(
        db: &PgPool,
        employer_id: Uuid,
        application_id: Uuid,
        dto: UpdateStatusRequest,
    ) -> Result<ApplicationWithApplicant, AppError> {
        #[derive(sqlx::FromRow)]
        struct StatusTarget {
            job_employer_id: Uuid,
            reviewed_at: Option<chrono::DateTime<Utc>>,
        }

        let target = sqlx::query_as::<_, StatusTarget>(
            "SELECT j.employer_id AS job_employer_id, a.reviewed_at \
             FROM applications a INNER JOIN jobs j ON j.id = a.job_id WHERE a.id = $1",
        )
        .bind(application_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(application.id = %application_id, error = %e, "Database error fetching application");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Application not found")))?;

        if target.job_employer_id != employer_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You can only update applications for your own jobs"
            )));
        }

        let newly_reviewed = (dto.status != ApplicationStatus::Pending
            && target.reviewed_at.is_none())
        .then(Utc::now);

        sqlx::query(
            "UPDATE applications SET status = $2, notes = COALESCE($3, notes), \
             reviewed_at = COALESCE(reviewed_at, $4), updated_at = NOW() WHERE id = $1",
        )
        .bind(application_id)
        .bind(dto.status)
        .bind(dto.notes)
        .bind(newly_reviewed)
        .execute(db)
        .await
        .map_err(|e| {
            error!(application.id = %application_id, error = %e, "Database error updating application");
            AppError::from(e)
        })?;

        info!(
            application.id = %application_id,
            status = ?dto.status,
            "Application status updated"
        );

        Self::fetch_with_applicant(db, application_id).await
    }

    /// Shared detail view, visible to the applicant, the job's employer,
    /// and admins.
    #[instrument(skip(db, auth_user), fields(application.id = %application_id, db.operation = "SELECT", db.table = "applications"))]
    pub async fn get_application(
        db: &PgPool,
        auth_user: &AuthUser,
        application_id: Uuid,
    ) -> Result<ApplicationDetail, AppError> {
        let query = format!(
            "SELECT {}, {}, j.employer_id AS job_employer_id, \
             u.name AS applicant_name, u.email AS applicant_email \
             FROM applications a \
             INNER JOIN jobs j ON j.id = a.job_id \
             INNER JOIN users u ON u.id = a.applicant_id \
             WHERE a.id = $1",
            APPLICATION_COLUMNS, JOB_BRIEF_COLUMNS
        );

        let detail = sqlx::query_as::<_, ApplicationDetail>(&query)
            .bind(application_id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(application.id = %application_id, error = %e, "Database error fetching application");
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Application not found")))?;

        let user_id = auth_user.user_id()?;
        let can_view = user_id == detail.application.applicant_id
            || user_id == detail.job_employer_id
            || auth_user.is_admin();

        if !can_view {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You don't have permission to view this application"
            )));
        }

        Ok(detail)
    }

    async fn fetch_with_applicant(
        db: &PgPool,
        application_id: Uuid,
    ) -> Result<ApplicationWithApplicant, AppError> {
        let query = format!(
            "SELECT {}, u.name AS applicant_name, u.email AS applicant_email \
             FROM applications a INNER JOIN users u ON u.id = a.applicant_id WHERE a.id = $1",
            APPLICATION_COLUMNS
        );

        sqlx::query_as::<_, ApplicationWithApplicant>(&query)
            .bind(application_id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(application.id = %application_id, error = %e, "Database error fetching application");
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Application not found")))
    }
}
