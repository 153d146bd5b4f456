mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{create_test_job, create_test_user, generate_unique_email, get_auth_token, setup_test_app};
use jobdesk::modules::auth::model::UserRole;
use jobdesk::modules::jobs::model::JobStatus;

const BOUNDARY: &str = "test-boundary";

/// Multipart body with just a cover letter field.
fn apply_body(cover_letter: &str) -> Body {
    Body::from(format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"coverLetter\"\r\n\r\n{cl}\r\n--{b}--\r\n",
        b = BOUNDARY,
        cl = cover_letter
    ))
}

fn apply_request(job_id: uuid::Uuid, token: &str, cover_letter: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/applications/jobs/{}/apply", job_id))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("authorization", format!("Bearer {}", token))
        .body(apply_body(cover_letter))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_seeker_applies_to_active_job(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(apply_request(job.id, &token, "I am very interested."))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["coverLetter"], "I am very interested.");
    assert_eq!(body["applicant"]["name"], "Test User");

    // The job's denormalized counter is bumped by the apply operation.
    let count: i64 = sqlx::query_scalar("SELECT applications_count FROM jobs WHERE id = $1")
        .bind(job.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_application_rejected(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let first = app
        .oneshot(apply_request(job.id, &token, "First attempt"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let app = setup_test_app(pool).await;
    let second = app
        .oneshot(apply_request(job.id, &token, "Second attempt"))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cannot_apply_to_draft_job(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Unpublished Role", JobStatus::Draft).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(apply_request(job.id, &token, "Please?"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employer_cannot_apply(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let email = generate_unique_email();
    let employer = create_test_user(&mut tx, &email, "secret123", UserRole::Employer).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &email, "secret123").await;

    let app = setup_test_app(pool).await;
    let response = app
        .oneshot(apply_request(job.id, &token, "Hiring myself"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_applications_include_job_summary(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(apply_request(job.id, &token, "Interested"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/applications/my/applications")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["job"]["title"], "Backend Engineer");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_job_applications_require_ownership(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let owner =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let other_email = generate_unique_email();
    create_test_user(&mut tx, &other_email, "secret123", UserRole::Employer).await;
    let job = create_test_job(&mut tx, owner.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let token = get_auth_token(app, &other_email, "secret123").await;

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/applications/jobs/{}/applications", job.id))
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_update_stamps_review_time(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer_email = generate_unique_email();
    let employer = create_test_user(&mut tx, &employer_email, "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let seeker_token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(apply_request(job.id, &seeker_token, "Interested"))
        .await
        .unwrap();
    let application = json_body(response).await;
    let application_id = application["id"].as_str().unwrap().to_string();
    assert!(application["reviewedAt"].is_null());

    let app = setup_test_app(pool.clone()).await;
    let employer_token = get_auth_token(app, &employer_email, "secret123").await;

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/applications/{}/status", application_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", employer_token))
        .body(Body::from(
            serde_json::to_string(&json!({
                "status": "shortlisted",
                "notes": "Strong submission"
            }))
            .unwrap(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "shortlisted");
    assert!(body["reviewedAt"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_application_detail_permissions(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let employer =
        create_test_user(&mut tx, &generate_unique_email(), "secret123", UserRole::Employer).await;
    let seeker_email = generate_unique_email();
    create_test_user(&mut tx, &seeker_email, "secret123", UserRole::Seeker).await;
    let stranger_email = generate_unique_email();
    create_test_user(&mut tx, &stranger_email, "secret123", UserRole::Seeker).await;
    let job = create_test_job(&mut tx, employer.id, "Backend Engineer", JobStatus::Active).await;
    tx.commit().await.unwrap();

    let app = setup_test_app(pool.clone()).await;
    let seeker_token = get_auth_token(app, &seeker_email, "secret123").await;

    let app = setup_test_app(pool.clone()).await;
    let response = app
        .oneshot(apply_request(job.id, &seeker_token, "Interested"))
        .await
        .unwrap();
    let application = json_body(response).await;
    let application_id = application["id"].as_str().unwrap().to_string();

    // The applicant can view their own application.
    let app = setup_test_app(pool.clone()).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/applications/{}", application_id))
        .header("authorization", format!("Bearer {}", seeker_token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // An unrelated seeker cannot.
    let app = setup_test_app(pool.clone()).await;
    let stranger_token = get_auth_token(app, &stranger_email, "secret123").await;

    let app = setup_test_app(pool).await;
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/applications/{}", application_id))
        .header("authorization", format!("Bearer {}", stranger_token))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
