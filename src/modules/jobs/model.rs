//! Job data models, DTOs, and the listing filter builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use jobdesk_core::pagination::{PaginationMeta, PaginationParams, deserialize_optional_i64};

/// Lifecycle status of a job posting. Only `active` postings appear in
/// the public listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum JobStatus {
    Draft,
    Active,
    Paused,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "employment_type", rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "full-time",
            Self::PartTime => "part-time",
            Self::Contract => "contract",
            Self::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "experience_level", rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
}

impl ExperienceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Executive => "executive",
        }
    }
}

/// Employer contact details denormalized into job responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmployerInfo {
    #[sqlx(rename = "employer_name")]
    pub name: String,
    #[sqlx(rename = "employer_email")]
    pub email: String,
}

/// A job posting joined with its employer's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobWithEmployer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub skills: Vec<String>,
    pub status: JobStatus,
    pub employer_id: Uuid,
    pub applications_count: i64,
    pub views_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub employer: EmployerInfo,
}

/// Columns selected for [`JobWithEmployer`], shared by the listing and
/// detail queries.
pub const JOB_WITH_EMPLOYER_COLUMNS: &str = "j.id, j.title, j.description, j.location, \
     j.salary_min, j.salary_max, j.salary_currency, j.employment_type, j.experience_level, \
     j.skills, j.status, j.employer_id, j.applications_count, j.views_count, \
     j.published_at, j.expires_at, j.created_at, j.updated_at, \
     u.name AS employer_name, u.email AS employer_email";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: String,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Option<Vec<String>>,
    pub status: Option<JobStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "location must not be empty"))]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub experience_level: Option<ExperienceLevel>,
    pub skills: Option<Vec<String>>,
    pub status: Option<JobStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Deserializes an optional enum-valued query parameter, treating an
/// empty string as absent.
fn deserialize_optional_variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some(v) => serde_json::from_value(serde_json::Value::String(v.to_string()))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Query parameters accepted by the public job listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobFilterParams {
    /// Full-text search over title, description, location, and skills
    pub search: Option<String>,
    /// Case-insensitive substring match on location
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_variant")]
    pub employment_type: Option<EmploymentType>,
    #[serde(default, deserialize_with = "deserialize_optional_variant")]
    pub experience_level: Option<ExperienceLevel>,
    /// Lower bound on the advertised salary floor
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub min_salary: Option<i64>,
    /// Upper bound on the advertised salary ceiling
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub max_salary: Option<i64>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// A bind value produced by the filter builder.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterBind {
    Text(String),
    Int(i64),
}

/// Dynamic WHERE clause for the job listing query.
///
/// Every listing query is restricted to active, unexpired postings;
/// user-supplied filters append further conditions. Absent parameters
/// contribute nothing. The same clause and binds feed both the data
/// query and the independent count query, so the pagination metadata
/// always reflects the full match count.
#[derive(Debug)]
pub struct JobListingFilter {
    conditions: Vec<String>,
    pub binds: Vec<FilterBind>,
}

impl JobListingFilter {
    pub fn from_params(filters: &JobFilterParams) -> Self {
        let mut filter = Self {
            conditions: vec![
                "j.status = 'active'".to_string(),
                "(j.expires_at IS NULL OR j.expires_at > NOW())".to_string(),
            ],
            binds: Vec::new(),
        };

        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            filter.push_text("j.search_tsv @@ plainto_tsquery('english', ${})", search);
        }

        if let Some(location) = filters.location.as_deref().filter(|s| !s.is_empty()) {
            filter.push_text("j.location ILIKE ${}", &format!("%{}%", location));
        }

        if let Some(employment_type) = filters.employment_type {
            filter.push_text(
                "j.employment_type = ${}::employment_type",
                employment_type.as_str(),
            );
        }

        if let Some(experience_level) = filters.experience_level {
            filter.push_text(
                "j.experience_level = ${}::experience_level",
                experience_level.as_str(),
            );
        }

        // Salary bounds are independent filters on the floor and ceiling
        // fields, not a joint range check on one field.
        if let Some(min_salary) = filters.min_salary {
            filter.push_int("j.salary_min >= ${}", min_salary);
        }

        if let Some(max_salary) = filters.max_salary {
            filter.push_int("j.salary_max <= ${}", max_salary);
        }

        filter
    }

    fn push_text(&mut self, template: &str, value: &str) {
        self.binds.push(FilterBind::Text(value.to_string()));
        let placeholder = format!("${}", self.binds.len());
        self.conditions.push(template.replace("${}", &placeholder));
    }

    fn push_int(&mut self, template: &str, value: i64) {
        self.binds.push(FilterBind::Int(value));
        let placeholder = format!("${}", self.binds.len());
        self.conditions.push(template.replace("${}", &placeholder));
    }

    /// The complete `WHERE ...` fragment with `$n` placeholders matching
    /// [`Self::binds`] in order.
    pub fn where_sql(&self) -> String {
        format!("WHERE {}", self.conditions.join(" AND "))
    }
}

/// Maps an API sort field name onto a whitelisted column. Unknown names
/// fall back to the creation timestamp; sort input is interpolated into
/// SQL and must never pass through verbatim.
pub fn sort_column(name: &str) -> &'static str {
    match name {
        "title" => "title",
        "location" => "location",
        "salaryMin" => "salary_min",
        "salaryMax" => "salary_max",
        "publishedAt" => "published_at",
        "expiresAt" => "expires_at",
        "viewsCount" => "views_count",
        "applicationsCount" => "applications_count",
        _ => "created_at",
    }
}

/// Paginated job listing response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedJobsResponse {
    pub data: Vec<JobWithEmployer>,
    pub pagination: PaginationMeta,
}
