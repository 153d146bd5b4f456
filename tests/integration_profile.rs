mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{create_test_user, generate_unique_email, get_auth_token, setup_test_app};
use jobdesk::modules::auth::model::UserRole;

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_created_on_first_access(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let user = create_test_user(&mut tx, &email, "secret123", UserRole::Seeker).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "secret123").await;

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/profile/me")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["userId"], user.id.to_string());
    assert_eq!(body["skills"].as_array().unwrap().len(), 0);
    assert!(body["headline"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_update_merges_fields(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_user(&mut tx, &email, "secret123", UserRole::Seeker).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/profile/me")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "headline": "Backend engineer",
                "skills": ["rust", "postgres"]
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A later partial update keeps the fields it doesn't mention.
    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/profile/me")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "location": "Berlin" })).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["headline"], "Backend engineer");
    assert_eq!(body["location"], "Berlin");
    assert_eq!(body["skills"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_update_rejects_overlong_headline(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    create_test_user(&mut tx, &email, "secret123", UserRole::Seeker).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "secret123").await;

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("PUT")
        .uri("/api/profile/me")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            serde_json::to_string(&json!({ "headline": "x".repeat(121) })).unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_profile_requires_auth(pool: PgPool) {
    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/profile/me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
