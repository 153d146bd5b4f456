use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::applications::model::{
    Application, ApplicationDetail, ApplicationStatus, ApplicationWithApplicant,
    ApplicationWithJob, ApplicantInfo, JobBrief, PaginatedApplicationsResponse,
    PaginatedJobApplicationsResponse, UpdateStatusRequest,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, OkResponse, PasswordResetRequest, RegisterRequest,
    RegisterResponse, ResetPasswordRequest, User, UserRole, VerifiedUser, VerifyEmailRequest,
    VerifyEmailResponse,
};
use crate::modules::jobs::model::{
    CreateJobDto, EmployerInfo, EmploymentType, ExperienceLevel, JobFilterParams, JobStatus,
    JobWithEmployer, PaginatedJobsResponse, UpdateJobDto,
};
use crate::modules::profile::model::{Profile, UpdateProfileDto};

use jobdesk_core::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::verify_email,
        crate::modules::auth::controller::request_password_reset,
        crate::modules::auth::controller::reset_password,
        crate::modules::jobs::controller::list_jobs,
        crate::modules::jobs::controller::get_job,
        crate::modules::jobs::controller::create_job,
        crate::modules::jobs::controller::update_job,
        crate::modules::jobs::controller::delete_job,
        crate::modules::jobs::controller::my_jobs,
        crate::modules::applications::controller::apply_to_job,
        crate::modules::applications::controller::my_applications,
        crate::modules::applications::controller::job_applications,
        crate::modules::applications::controller::update_application_status,
        crate::modules::applications::controller::get_application,
        crate::modules::profile::controller::get_my_profile,
        crate::modules::profile::controller::update_my_profile,
        crate::modules::profile::controller::upload_avatar,
        crate::modules::profile::controller::upload_resume,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            VerifyEmailRequest,
            VerifyEmailResponse,
            VerifiedUser,
            PasswordResetRequest,
            ResetPasswordRequest,
            OkResponse,
            ErrorResponse,
            JobStatus,
            EmploymentType,
            ExperienceLevel,
            EmployerInfo,
            JobWithEmployer,
            CreateJobDto,
            UpdateJobDto,
            JobFilterParams,
            PaginatedJobsResponse,
            Application,
            ApplicationStatus,
            ApplicationDetail,
            ApplicationWithApplicant,
            ApplicationWithJob,
            ApplicantInfo,
            JobBrief,
            UpdateStatusRequest,
            PaginatedApplicationsResponse,
            PaginatedJobApplicationsResponse,
            Profile,
            UpdateProfileDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login, and account recovery"),
        (name = "Jobs", description = "Job postings and the public listing"),
        (name = "Applications", description = "Applications and review pipeline"),
        (name = "Profile", description = "Profiles and media uploads")
    ),
    info(
        title = "Jobdesk API",
        version = "0.1.0",
        description = "A job board REST API built with Rust, Axum, and PostgreSQL. Employers post jobs, seekers apply, and the public listing is served through a Redis-backed cache.",
        contact(
            name = "API Support",
            email = "support@jobdesk.local"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
