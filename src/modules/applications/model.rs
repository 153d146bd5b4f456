//! Application data models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use jobdesk_core::PaginationMeta;

use crate::modules::jobs::model::{EmploymentType, JobStatus};

/// Review pipeline status of an application. Any move out of `pending`
/// stamps the review time once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Hired,
}

/// A job application as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Job summary denormalized into a seeker's application list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobBrief {
    #[sqlx(rename = "job_title")]
    pub title: String,
    #[sqlx(rename = "job_location")]
    pub location: String,
    #[sqlx(rename = "job_employment_type")]
    pub employment_type: EmploymentType,
    #[sqlx(rename = "job_status")]
    pub status: JobStatus,
    #[sqlx(rename = "job_salary_min")]
    pub salary_min: Option<i64>,
    #[sqlx(rename = "job_salary_max")]
    pub salary_max: Option<i64>,
    #[sqlx(rename = "job_salary_currency")]
    pub salary_currency: String,
}

/// Applicant contact details denormalized into employer-facing views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApplicantInfo {
    #[sqlx(rename = "applicant_name")]
    pub name: String,
    #[sqlx(rename = "applicant_email")]
    pub email: String,
}

/// An application with its job summary, as seekers see it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    #[sqlx(flatten)]
    pub job: JobBrief,
}

/// An application with applicant contact details, as employers see it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    #[sqlx(flatten)]
    pub applicant: ApplicantInfo,
}

/// Full application view with both sides joined, used by the shared
/// detail endpoint. The job's employer id drives the permission check.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    #[sqlx(flatten)]
    pub job: JobBrief,
    #[sqlx(flatten)]
    pub applicant: ApplicantInfo,
    #[sqlx(rename = "job_employer_id")]
    pub job_employer_id: Uuid,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[validate(length(max = 2000, message = "cover letter must be at most 2000 characters"))]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedApplicationsResponse {
    pub data: Vec<ApplicationWithJob>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedJobApplicationsResponse {
    pub data: Vec<ApplicationWithApplicant>,
    pub pagination: PaginationMeta,
}

/// Columns for [`Application`] fields, qualified with the `a` alias.
pub const APPLICATION_COLUMNS: &str = "a.id, a.job_id, a.applicant_id, a.cover_letter, \
     a.resume_path, a.status, a.applied_at, a.reviewed_at, a.notes, a.created_at, a.updated_at";

/// Columns for [`JobBrief`], qualified with the `j` alias.
pub const JOB_BRIEF_COLUMNS: &str = "j.title AS job_title, j.location AS job_location, \
     j.employment_type AS job_employment_type, j.status AS job_status, \
     j.salary_min AS job_salary_min, j.salary_max AS job_salary_max, \
     j.salary_currency AS job_salary_currency";

/// Maps an API sort field name onto a whitelisted applications column.
pub fn sort_column(name: &str) -> &'static str {
    match name {
        "appliedAt" => "applied_at",
        "reviewedAt" => "reviewed_at",
        "status" => "status",
        _ => "created_at",
    }
}

/// Validator for uploaded resumes.
pub struct ResumeValidator;

impl ResumeValidator {
    const ALLOWED_EXTENSIONS: &'static [&'static str] = &["pdf", "doc", "docx"];

    /// Maximum resume size: 5MB
    pub const MAX_SIZE_BYTES: usize = 5 * 1024 * 1024;

    pub fn validate(filename: &str, size_bytes: usize) -> Result<(), jobdesk_core::AppError> {
        if size_bytes > Self::MAX_SIZE_BYTES {
            return Err(jobdesk_core::AppError::bad_request(anyhow::anyhow!(
                "Resume exceeds the 5MB limit"
            )));
        }

        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        if !Self::ALLOWED_EXTENSIONS.contains(&ext.as_str()) || !filename.contains('.') {
            return Err(jobdesk_core::AppError::bad_request(anyhow::anyhow!(
                "Only PDF, DOC, and DOCX files are allowed for resumes"
            )));
        }

        Ok(())
    }

    pub fn extension(filename: &str) -> String {
        filename.rsplit('.').next().unwrap_or("bin").to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("appliedAt"), "applied_at");
        assert_eq!(sort_column("status"), "status");
        assert_eq!(sort_column("createdAt"), "created_at");
        assert_eq!(sort_column("'; DROP TABLE applications"), "created_at");
    }

    #[test]
    fn test_resume_validator_accepts_documents() {
        assert!(ResumeValidator::validate("cv.pdf", 1024).is_ok());
        assert!(ResumeValidator::validate("cv.DOCX", 1024).is_ok());
    }

    #[test]
    fn test_resume_validator_rejects_other_types() {
        assert!(ResumeValidator::validate("cv.exe", 1024).is_err());
        assert!(ResumeValidator::validate("no-extension", 1024).is_err());
    }

    #[test]
    fn test_resume_validator_rejects_oversized_files() {
        assert!(ResumeValidator::validate("cv.pdf", 6 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_application_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Shortlisted).unwrap(),
            r#""shortlisted""#
        );
    }
}
