mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{create_test_user, generate_unique_email, setup_test_app};
use jobdesk::modules::auth::model::UserRole;

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_creates_account(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let email = generate_unique_email();

    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "secret123",
                "name": "New Seeker"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["email"], email);
    assert!(body["id"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_duplicate_email(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_user(&mut tx, &email, "secret123", UserRole::Seeker).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "secret123",
                "name": "Duplicate"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_short_password(pool: PgPool) {
    let app = setup_test_app(pool).await;

    let response = app
        .oneshot(json_request(
            "/api/auth/register",
            json!({
                "email": generate_unique_email(),
                "password": "short",
                "name": "New Seeker"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_returns_token(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_user(&mut tx, &email, "secret123", UserRole::Employer).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({
                "email": email,
                "password": "secret123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(body["token"].as_str().unwrap().contains('.'));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejects_wrong_password(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_user(&mut tx, &email, "secret123", UserRole::Seeker).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({
                "email": email,
                "password": "wrong-password"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_rejects_unknown_account(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(json_request(
            "/api/auth/login",
            json!({
                "email": generate_unique_email(),
                "password": "secret123"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_verify_email_without_token_store_is_unavailable(pool: PgPool) {
    // Test state runs without Redis, so the one-time token store is
    // explicitly reported unavailable instead of silently failing.
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(json_request(
            "/api/auth/verify-email",
            json!({ "token": "some-token" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_endpoint(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["ok"], true);
}
