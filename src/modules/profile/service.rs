use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use jobdesk_core::{AppError, FileStorage};

use super::model::{Profile, UpdateProfileDto};

const PROFILE_COLUMNS: &str = "id, user_id, headline, bio, location, skills, avatar_path, \
     resume_path, created_at, updated_at";

pub struct ProfileService;

impl ProfileService {
    /// Fetches the caller's profile, creating an empty one on first
    /// access. The no-op conflict update makes the insert return the
    /// existing row instead of racing a separate select.
    #[instrument(skip(db), fields(user.id = %user_id, db.operation = "INSERT", db.table = "profiles"))]
    pub async fn get_or_create(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        let query = format!(
            "INSERT INTO profiles (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = profiles.user_id \
             RETURNING {}",
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(user.id = %user_id, error = %e, "Database error fetching profile");
                AppError::from(e)
            })
    }

    #[instrument(skip(db, dto), fields(user.id = %user_id, db.operation = "UPDATE", db.table = "profiles"))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<Profile, AppError> {
        let query = format!(
            "INSERT INTO profiles (user_id, headline, bio, location, skills) \
             VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}')) \
             ON CONFLICT (user_id) DO UPDATE SET \
             headline = COALESCE($2, profiles.headline), \
             bio = COALESCE($3, profiles.bio), \
             location = COALESCE($4, profiles.location), \
             skills = COALESCE($5, profiles.skills), \
             updated_at = NOW() \
             RETURNING {}",
            PROFILE_COLUMNS
        );

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(dto.headline)
            .bind(dto.bio)
            .bind(dto.location)
            .bind(dto.skills)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(user.id = %user_id, error = %e, "Database error updating profile");
                AppError::from(e)
            })?;

        debug!(user.id = %user_id, "Profile updated");

        Ok(profile)
    }

    /// Stores a new avatar and records its path, removing the previous
    /// file from storage.
    #[instrument(skip(db, files, bytes), fields(user.id = %user_id, file.size = bytes.len(), db.operation = "UPDATE", db.table = "profiles"))]
    pub async fn set_avatar(
        db: &PgPool,
        files: &dyn FileStorage,
        user_id: Uuid,
        storage_key: &str,
        bytes: &[u8],
    ) -> Result<Profile, AppError> {
        let existing = Self::get_or_create(db, user_id).await?;

        files.save(storage_key, bytes).await.map_err(|e| {
            error!(user.id = %user_id, error = %e, "Failed to store avatar");
            AppError::internal(anyhow::anyhow!("Failed to store avatar: {}", e))
        })?;

        if let Some(old_path) = &existing.avatar_path {
            // Best effort; the file may already be gone.
            let _ = files.delete(old_path).await;
        }

        let query = format!(
            "UPDATE profiles SET avatar_path = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(storage_key)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(user.id = %user_id, error = %e, "Database error recording avatar path");
                AppError::from(e)
            })?;

        info!(user.id = %user_id, "Avatar updated");

        Ok(profile)
    }

    /// Stores a new resume and records its path, removing the previous
    /// file from storage.
    #[instrument(skip(db, files, bytes), fields(user.id = %user_id, file.size = bytes.len(), db.operation = "UPDATE", db.table = "profiles"))]
    pub async fn set_resume(
        db: &PgPool,
        files: &dyn FileStorage,
        user_id: Uuid,
        storage_key: &str,
        bytes: &[u8],
    ) -> Result<Profile, AppError> {
        let existing = Self::get_or_create(db, user_id).await?;

        files.save(storage_key, bytes).await.map_err(|e| {
            error!(user.id = %user_id, error = %e, "Failed to store resume");
            AppError::internal(anyhow::anyhow!("Failed to store resume: {}", e))
        })?;

        if let Some(old_path) = &existing.resume_path {
            let _ = files.delete(old_path).await;
        }

        let query = format!(
            "UPDATE profiles SET resume_path = $2, updated_at = NOW() \
             WHERE user_id = $1 RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(storage_key)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(user.id = %user_id, error = %e, "Database error recording resume path");
                AppError::from(e)
            })?;

        info!(user.id = %user_id, "Resume updated");

        Ok(profile)
    }
}
