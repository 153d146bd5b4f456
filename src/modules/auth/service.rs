use std::time::Duration;

use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use jobdesk_cache::{RedisCache, keys};
use jobdesk_core::{AppError, hash_password, verify_password};

use crate::config::jwt::JwtConfig;
use crate::utils::email::EmailService;
use crate::utils::jwt::create_token;
use crate::utils::tokens::generate_token;

use super::model::{
    LoginRequest, LoginResponse, RegisterRequest, User, UserRole, VerifiedUser,
    VerifyEmailResponse,
};

/// Email verification tokens live for a day.
const VERIFY_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Password reset tokens live for an hour.
const RESET_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

const USER_COLUMNS: &str = "id, email, name, role, is_email_verified, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    /// Registers a new account and issues an email verification token.
    ///
    /// The token lives in Redis with an explicit TTL; without a token
    /// store the account is still created and verification is deferred.
    #[instrument(skip(db, cache, email_service, dto), fields(user.email = %dto.email, db.operation = "INSERT", db.table = "users"))]
    pub async fn register_user(
        db: &PgPool,
        cache: Option<&RedisCache>,
        email_service: &EmailService,
        dto: RegisterRequest,
    ) -> Result<User, AppError> {
        let email = dto.email.to_lowercase();

        let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error checking existing email");
                AppError::from(e)
            })?;

        if existing.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Email already in use"
            )));
        }

        let hashed = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or(UserRole::Seeker);

        let query = format!(
            "INSERT INTO users (email, password, name, role) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&email)
            .bind(&hashed)
            .bind(&dto.name)
            .bind(role)
            .fetch_one(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error creating user");
                AppError::from(e)
            })?;

        match cache {
            Some(cache) => {
                let token = generate_token();
                cache
                    .set_with_ttl(
                        &keys::auth::email_verification(&token),
                        &user.id,
                        VERIFY_TOKEN_TTL,
                    )
                    .await
                    .map_err(|e| {
                        error!(error = %e, "Failed to store verification token");
                        AppError::service_unavailable(anyhow::anyhow!(
                            "Verification token store unavailable"
                        ))
                    })?;

                email_service
                    .send_verification_email(&user.email, &user.name, &token)
                    .await?;
            }
            None => {
                warn!(user.id = %user.id, "No token store configured, skipping verification email");
            }
        }

        info!(user.id = %user.id, user.role = ?user.role, "User registered");

        Ok(user)
    }

    /// Consumes an email verification token.
    ///
    /// Tokens are single-use: the Redis entry is deleted as soon as the
    /// account is flagged verified.
    #[instrument(skip(db, cache, token), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn verify_email(
        db: &PgPool,
        cache: Option<&RedisCache>,
        token: &str,
    ) -> Result<VerifyEmailResponse, AppError> {
        let cache = cache.ok_or_else(|| {
            AppError::service_unavailable(anyhow::anyhow!("Verification token store unavailable"))
        })?;

        let key = keys::auth::email_verification(token);
        let user_id: Uuid = cache
            .get(&key)
            .await
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid token")))?;

        let user = sqlx::query_as::<_, VerifiedUser>(
            "UPDATE users SET is_email_verified = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING id, is_email_verified",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(user.id = %user_id, error = %e, "Database error verifying email");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if let Err(e) = cache.delete(&key).await {
            warn!(error = %e, "Failed to delete consumed verification token");
        }

        info!(user.id = %user_id, "Email verified");

        Ok(VerifyEmailResponse { ok: true, user })
    }

    #[instrument(skip(db, dto, jwt_config), fields(user.email = %dto.email, db.operation = "SELECT", db.table = "users"))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            email: String,
            role: UserRole,
            password: String,
        }

        let user = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, email, role, password FROM users WHERE email = $1",
        )
        .bind(dto.email.to_lowercase())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching user for login");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid credentials")))?;

        let is_valid = verify_password(&dto.password, &user.password)?;
        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid credentials"
            )));
        }

        let token = create_token(user.id, &user.email, user.role, jwt_config)?;

        debug!(user.id = %user.id, "Login successful");

        Ok(LoginResponse { token })
    }

    /// Issues a password reset token when the account exists.
    ///
    /// Callers always receive the same acknowledgement so the endpoint
    /// cannot be used to enumerate registered addresses.
    #[instrument(skip(db, cache, email_service, email), fields(db.operation = "SELECT", db.table = "users"))]
    pub async fn request_password_reset(
        db: &PgPool,
        cache: Option<&RedisCache>,
        email_service: &EmailService,
        email: &str,
    ) -> Result<(), AppError> {
        let cache = cache.ok_or_else(|| {
            AppError::service_unavailable(anyhow::anyhow!("Reset token store unavailable"))
        })?;

        #[derive(sqlx::FromRow)]
        struct ResetTarget {
            id: Uuid,
            email: String,
            name: String,
        }

        let user = sqlx::query_as::<_, ResetTarget>(
            "SELECT id, email, name FROM users WHERE email = $1",
        )
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching user for password reset");
            AppError::from(e)
        })?;

        if let Some(user) = user {
            let token = generate_token();
            cache
                .set_with_ttl(&keys::auth::password_reset(&token), &user.id, RESET_TOKEN_TTL)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to store reset token");
                    AppError::service_unavailable(anyhow::anyhow!(
                        "Reset token store unavailable"
                    ))
                })?;

            email_service
                .send_password_reset_email(&user.email, &user.name, &token)
                .await?;

            debug!(user.id = %user.id, "Password reset token issued");
        }

        Ok(())
    }

    /// Consumes a reset token and replaces the account password.
    #[instrument(skip(db, cache, token, password), fields(db.operation = "UPDATE", db.table = "users"))]
    pub async fn reset_password(
        db: &PgPool,
        cache: Option<&RedisCache>,
        token: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let cache = cache.ok_or_else(|| {
            AppError::service_unavailable(anyhow::anyhow!("Reset token store unavailable"))
        })?;

        let key = keys::auth::password_reset(token);
        let user_id: Uuid = cache
            .get(&key)
            .await
            .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Invalid token")))?;

        let hashed = hash_password(password)?;

        let updated = sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&hashed)
            .execute(db)
            .await
            .map_err(|e| {
                error!(user.id = %user_id, error = %e, "Database error resetting password");
                AppError::from(e)
            })?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        if let Err(e) = cache.delete(&key).await {
            warn!(error = %e, "Failed to delete consumed reset token");
        }

        info!(user.id = %user_id, "Password reset");

        Ok(())
    }
}
