use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use jobdesk_core::AppError;

use crate::modules::auth::model::{Claims, UserRole};
use crate::state::AppState;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer token and provides the
/// authenticated user's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn is_seeker(&self) -> bool {
        self.0.role == UserRole::Seeker
    }

    pub fn is_employer(&self) -> bool {
        self.0.role == UserRole::Employer
    }

    pub fn is_admin(&self) -> bool {
        self.0.role == UserRole::Admin
    }

    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    /// Get the user's email
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_role_helpers() {
        assert!(AuthUser(claims(UserRole::Seeker)).is_seeker());
        assert!(AuthUser(claims(UserRole::Employer)).is_employer());
        assert!(AuthUser(claims(UserRole::Admin)).is_admin());
        assert!(!AuthUser(claims(UserRole::Seeker)).is_employer());
    }

    #[test]
    fn test_user_id_parses_sub() {
        let user_id = Uuid::new_v4();
        let mut c = claims(UserRole::Seeker);
        c.sub = user_id.to_string();
        assert_eq!(AuthUser(c).user_id().unwrap(), user_id);
    }

    #[test]
    fn test_user_id_rejects_garbage_sub() {
        let mut c = claims(UserRole::Seeker);
        c.sub = "not-a-uuid".to_string();
        assert!(AuthUser(c).user_id().is_err());
    }
}
