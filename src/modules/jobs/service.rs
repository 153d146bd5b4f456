use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use jobdesk_cache::{RedisCache, invalidate, keys};
use jobdesk_core::{AppError, PaginationMeta, PaginationParams};

use super::model::{
    CreateJobDto, EmploymentType, ExperienceLevel, FilterBind, JOB_WITH_EMPLOYER_COLUMNS,
    JobFilterParams, JobListingFilter, JobStatus, JobWithEmployer, PaginatedJobsResponse,
    UpdateJobDto, sort_column,
};

pub struct JobService;

impl JobService {
    /// The public listing read path: cache lookup, then a filtered data
    /// query plus an independent count query on a miss, then cache
    /// population with the listing TTL.
    ///
    /// `raw_query` is the unparsed query string map; the normalized
    /// page/limit/sort/order are merged into it before the cache key is
    /// built so explicit and default pagination land on the same key.
    #[instrument(skip(db, cache, raw_query, filters), fields(db.operation = "SELECT", db.table = "jobs"))]
    pub async fn list_jobs(
        db: &PgPool,
        cache: Option<&RedisCache>,
        mut raw_query: HashMap<String, String>,
        filters: JobFilterParams,
    ) -> Result<PaginatedJobsResponse, AppError> {
        let page = filters.pagination.page();
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();
        let sort = filters.pagination.sort().to_string();
        let order = filters.pagination.order();

        raw_query.insert("page".to_string(), page.to_string());
        raw_query.insert("limit".to_string(), limit.to_string());
        raw_query.insert("sort".to_string(), sort.clone());
        raw_query.insert("order".to_string(), order.as_str().to_string());

        let cache_key = keys::job_list(&raw_query);

        if let Some(cache) = cache
            && let Some(hit) = cache.get::<PaginatedJobsResponse>(&cache_key).await
        {
            debug!(cache.key = %cache_key, "Serving job listing from cache");
            return Ok(hit);
        }

        let filter = JobListingFilter::from_params(&filters);
        let where_sql = filter.where_sql();

        let count_query = format!("SELECT COUNT(*) FROM jobs j {}", where_sql);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for bind in &filter.binds {
            count_sql = match bind {
                FilterBind::Text(s) => count_sql.bind(s),
                FilterBind::Int(i) => count_sql.bind(i),
            };
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting jobs");
            AppError::from(e)
        })?;

        let data_query = format!(
            "SELECT {} FROM jobs j INNER JOIN users u ON u.id = j.employer_id {} \
             ORDER BY j.{} {} LIMIT {} OFFSET {}",
            JOB_WITH_EMPLOYER_COLUMNS,
            where_sql,
            sort_column(&sort),
            order.as_sql(),
            limit,
            offset
        );
        let mut data_sql = sqlx::query_as::<_, JobWithEmployer>(&data_query);
        for bind in &filter.binds {
            data_sql = match bind {
                FilterBind::Text(s) => data_sql.bind(s),
                FilterBind::Int(i) => data_sql.bind(i),
            };
        }
        let jobs = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching jobs");
            AppError::from(e)
        })?;

        let response = PaginatedJobsResponse {
            data: jobs,
            pagination: PaginationMeta::new(page, limit, total),
        };

        if let Some(cache) = cache
            && let Err(e) = cache.set(&cache_key, &response).await
        {
            warn!(cache.key = %cache_key, error = %e, "Failed to cache job listing");
        }

        debug!(
            total = %total,
            returned = %response.data.len(),
            page = %page,
            "Job listing fetched"
        );

        Ok(response)
    }

    #[instrument(skip(db), fields(job.id = %job_id, db.operation = "SELECT", db.table = "jobs"))]
    pub async fn get_job_by_id(db: &PgPool, job_id: Uuid) -> Result<JobWithEmployer, AppError> {
        Self::fetch_with_employer(db, job_id)
            .await?
            .ok_or_else(|| {
                debug!(job.id = %job_id, "Job not found");
                AppError::not_found(anyhow::anyhow!("Job not found"))
            })
    }

    /// Bumps the view counter for a job detail read.
    ///
    /// A standalone operation invoked by the detail handler, not a side
    /// effect of fetching.
    #[instrument(skip(db), fields(job.id = %job_id, db.operation = "UPDATE", db.table = "jobs"))]
    pub async fn increment_views(db: &PgPool, job_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE jobs SET views_count = views_count + 1 WHERE id = $1")
            .bind(job_id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error incrementing views");
                AppError::from(e)
            })?;

        Ok(())
    }

    #[instrument(skip(db, cache, dto), fields(job.title = %dto.title, db.operation = "INSERT", db.table = "jobs"))]
    pub async fn create_job(
        db: &PgPool,
        cache: Option<&RedisCache>,
        employer_id: Uuid,
        dto: CreateJobDto,
    ) -> Result<JobWithEmployer, AppError> {
        let status = dto.status.unwrap_or(JobStatus::Draft);
        // Activation stamps the publish time explicitly at the call site.
        let published_at = (status == JobStatus::Active).then(Utc::now);

        let job_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO jobs (title, description, location, salary_min, salary_max, \
             salary_currency, employment_type, experience_level, skills, status, employer_id, \
             published_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING id",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.location)
        .bind(dto.salary_min)
        .bind(dto.salary_max)
        .bind(dto.salary_currency.as_deref().unwrap_or("USD"))
        .bind(dto.employment_type.unwrap_or(EmploymentType::FullTime))
        .bind(dto.experience_level.unwrap_or(ExperienceLevel::Entry))
        .bind(dto.skills.unwrap_or_default())
        .bind(status)
        .bind(employer_id)
        .bind(published_at)
        .bind(dto.expires_at)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error creating job");
            AppError::from(e)
        })?;

        Self::invalidate_listings(cache).await?;

        info!(job.id = %job_id, employer.id = %employer_id, "Job created");

        Self::get_job_by_id(db, job_id).await
    }

    #[instrument(skip(db, cache, dto), fields(job.id = %job_id, db.operation = "UPDATE", db.table = "jobs"))]
    pub async fn update_job(
        db: &PgPool,
        cache: Option<&RedisCache>,
        job_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
        dto: UpdateJobDto,
    ) -> Result<JobWithEmployer, AppError> {
        let existing = Self::get_job_by_id(db, job_id).await?;

        if existing.employer_id != user_id && !is_admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You can only update your own jobs"
            )));
        }

        // First transition to active stamps the publish time; later
        // updates leave it untouched.
        let newly_published = (dto.status == Some(JobStatus::Active)
            && existing.published_at.is_none())
        .then(Utc::now);

        sqlx::query(
            "UPDATE jobs SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             location = COALESCE($4, location), \
             salary_min = COALESCE($5, salary_min), \
             salary_max = COALESCE($6, salary_max), \
             salary_currency = COALESCE($7, salary_currency), \
             employment_type = COALESCE($8, employment_type), \
             experience_level = COALESCE($9, experience_level), \
             skills = COALESCE($10, skills), \
             status = COALESCE($11, status), \
             expires_at = COALESCE($12, expires_at), \
             published_at = COALESCE(published_at, $13), \
             updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.location)
        .bind(dto.salary_min)
        .bind(dto.salary_max)
        .bind(dto.salary_currency)
        .bind(dto.employment_type)
        .bind(dto.experience_level)
        .bind(dto.skills)
        .bind(dto.status)
        .bind(dto.expires_at)
        .bind(newly_published)
        .execute(db)
        .await
        .map_err(|e| {
            error!(job.id = %job_id, error = %e, "Database error updating job");
            AppError::from(e)
        })?;

        Self::invalidate_listings(cache).await?;

        info!(job.id = %job_id, "Job updated");

        Self::get_job_by_id(db, job_id).await
    }

    #[instrument(skip(db, cache), fields(job.id = %job_id, db.operation = "DELETE", db.table = "jobs"))]
    pub async fn delete_job(
        db: &PgPool,
        cache: Option<&RedisCache>,
        job_id: Uuid,
        user_id: Uuid,
        is_admin: bool,
    ) -> Result<(), AppError> {
        let existing = Self::get_job_by_id(db, job_id).await?;

        if existing.employer_id != user_id && !is_admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "You can only delete your own jobs"
            )));
        }

        // Applications go first so none are left dangling mid-delete.
        sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(job_id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error deleting applications");
                AppError::from(e)
            })?;

        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error deleting job");
                AppError::from(e)
            })?;

        Self::invalidate_listings(cache).await?;

        info!(job.id = %job_id, "Job deleted");

        Ok(())
    }

    /// An employer's own postings regardless of status, uncached.
    #[instrument(skip(db, pagination), fields(employer.id = %employer_id, db.operation = "SELECT", db.table = "jobs"))]
    pub async fn my_jobs(
        db: &PgPool,
        employer_id: Uuid,
        pagination: PaginationParams,
    ) -> Result<PaginatedJobsResponse, AppError> {
        let page = pagination.page();
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE employer_id = $1")
            .bind(employer_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(employer.id = %employer_id, error = %e, "Database error counting own jobs");
                AppError::from(e)
            })?;

        let data_query = format!(
            "SELECT {} FROM jobs j INNER JOIN users u ON u.id = j.employer_id \
             WHERE j.employer_id = $1 ORDER BY j.{} {} LIMIT {} OFFSET {}",
            JOB_WITH_EMPLOYER_COLUMNS,
            sort_column(pagination.sort()),
            pagination.order().as_sql(),
            limit,
            offset
        );
        let jobs = sqlx::query_as::<_, JobWithEmployer>(&data_query)
            .bind(employer_id)
            .fetch_all(db)
            .await
            .map_err(|e| {
                error!(employer.id = %employer_id, error = %e, "Database error fetching own jobs");
                AppError::from(e)
            })?;

        Ok(PaginatedJobsResponse {
            data: jobs,
            pagination: PaginationMeta::new(page, limit, total),
        })
    }

    async fn fetch_with_employer(
        db: &PgPool,
        job_id: Uuid,
    ) -> Result<Option<JobWithEmployer>, AppError> {
        let query = format!(
            "SELECT {} FROM jobs j INNER JOIN users u ON u.id = j.employer_id WHERE j.id = $1",
            JOB_WITH_EMPLOYER_COLUMNS
        );

        sqlx::query_as::<_, JobWithEmployer>(&query)
            .bind(job_id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(job.id = %job_id, error = %e, "Database error fetching job");
                AppError::from(e)
            })
    }

    /// Sweeps the listing namespace after a mutation. A failed sweep is
    /// surfaced to the caller: reporting success while stale pages
    /// linger would hide them until operators notice.
    async fn invalidate_listings(cache: Option<&RedisCache>) -> Result<(), AppError> {
        match invalidate::job_listings(cache).await {
            Ok(deleted) => {
                debug!(cache.deleted = %deleted, "Listing cache invalidated");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Listing cache invalidation failed");
                Err(AppError::service_unavailable(anyhow::anyhow!(
                    "Failed to invalidate listing cache: {}",
                    e
                )))
            }
        }
    }
}
