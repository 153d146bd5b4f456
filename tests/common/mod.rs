use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::json;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use tower::ServiceExt;
use uuid::Uuid;

use jobdesk::jobdesk_core::hash_password;
use jobdesk::modules::auth::model::UserRole;
use jobdesk::modules::jobs::model::JobStatus;
use jobdesk::router::init_router;
use jobdesk::state::test_state;

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Create a test user with the given role.
pub async fn create_test_user(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password: &str,
    role: UserRole,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (email, password, name, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(email)
    .bind(&hashed)
    .bind("Test User")
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

#[allow(dead_code)]
pub struct TestJob {
    pub id: Uuid,
    pub title: String,
    pub employer_id: Uuid,
}

/// Create a job posting owned by `employer_id`.
#[allow(dead_code)]
pub async fn create_test_job(
    tx: &mut Transaction<'_, Postgres>,
    employer_id: Uuid,
    title: &str,
    status: JobStatus,
) -> TestJob {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO jobs (title, description, location, salary_min, salary_max, skills, \
         status, employer_id, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                 CASE WHEN $7 = 'active'::job_status THEN NOW() ELSE NULL END) \
         RETURNING id",
    )
    .bind(title)
    .bind("Build and operate backend services.")
    .bind("Berlin")
    .bind(60_000_i64)
    .bind(90_000_i64)
    .bind(vec!["rust".to_string(), "postgres".to_string()])
    .bind(status)
    .bind(employer_id)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestJob {
        id,
        title: title.to_string(),
        employer_id,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Build the app router around a test pool (no cache, email disabled).
pub async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    init_router(test_state(pool))
}

/// Log in and return the bearer token.
#[allow(dead_code)]
pub async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    body["token"].as_str().unwrap().to_string()
}
