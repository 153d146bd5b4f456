//! Profile data models and upload validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use jobdesk_core::AppError;

/// A seeker or employer profile. Created lazily on first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub avatar_path: Option<String>,
    pub resume_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(max = 120, message = "headline must be at most 120 characters"))]
    pub headline: Option<String>,
    #[validate(length(max = 2000, message = "bio must be at most 2000 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 120, message = "location must be at most 120 characters"))]
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
}

/// Validator for uploaded avatars.
pub struct AvatarValidator;

impl AvatarValidator {
    const ALLOWED_EXTENSIONS: &'static [&'static str] = &["jpg", "jpeg", "png", "gif"];

    /// Maximum avatar size: 2MB
    pub const MAX_SIZE_BYTES: usize = 2 * 1024 * 1024;

    pub fn validate(filename: &str, size_bytes: usize) -> Result<(), AppError> {
        if size_bytes > Self::MAX_SIZE_BYTES {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Avatar exceeds the 2MB limit"
            )));
        }

        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        if !Self::ALLOWED_EXTENSIONS.contains(&ext.as_str()) || !filename.contains('.') {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only JPG, JPEG, PNG, and GIF files are allowed for avatars"
            )));
        }

        Ok(())
    }

    pub fn extension(filename: &str) -> String {
        filename.rsplit('.').next().unwrap_or("bin").to_lowercase()
    }
}
