use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use shiftboard::{
    clock::{Clock, FixedClock},
    config::AppConfig,
    seeds::demo_records,
    server::{AppState, create_app},
    telemetry::TRACE_ID_HEADER,
};
use tower::ServiceExt;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
}

fn app() -> Router {
    let config = AppConfig {
        simulated_latency: false,
        ..AppConfig::default()
    };
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(today().and_hms_opt(8, 0, 0).unwrap()));
    let state = AppState::build(config, clock, demo_records(today())).expect("state builds");
    create_app(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, Method::GET, uri, None).await;
    (status, body)
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = app();

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "shiftboard");

    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["profile"], "local");
}

#[tokio::test]
async fn openapi_document_lists_schedule_path() {
    let (status, body) = get(&app(), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/schedule"].is_object());
    assert!(body["paths"]["/api/job-roles/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn schedule_for_the_demo_week() {
    let (status, body) = get(&app(), "/api/schedule").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["employees"].as_array().unwrap().len(), 8);
    assert_eq!(body["shifts"].as_array().unwrap().len(), 20);
    assert_eq!(body["weekStart"], "2025-01-06T00:00:00");
    assert_eq!(body["grid"]["days"].as_array().unwrap().len(), 7);
    assert_eq!(body["readiness"]["draftCount"], 5);
    assert_eq!(body["readiness"]["canPublish"], true);
    assert_eq!(body["filterOptions"]["locations"][0], "All");
}

#[tokio::test]
async fn schedule_location_filter_keeps_downtown_staff() {
    let (status, body) = get(&app(), "/api/schedule?location=Downtown&department=All").await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<i64> = body["employees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    // Facets still describe every employee
    assert_eq!(body["filterOptions"]["locations"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn schedule_rejects_unknown_location() {
    let (status, headers, body) =
        send(&app(), Method::GET, "/api/schedule?location=Midtown", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn publish_clears_every_draft() {
    let app = app();

    let (status, _, body) = send(&app, Method::POST, "/api/shifts/publish", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedCount"], 5);

    let (_, body) = get(&app, "/api/schedule").await;
    assert_eq!(body["readiness"]["draftCount"], 0);
    assert_eq!(body["readiness"]["canPublish"], false);
    assert!(
        body["shifts"]
            .as_array()
            .unwrap()
            .iter()
            .all(|s| s["status"] == "published")
    );

    let (_, _, body) = send(&app, Method::POST, "/api/shifts/publish", None).await;
    assert_eq!(body["updatedCount"], 0);
}

#[tokio::test]
async fn add_shift_creates_drafts_and_validates_input() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/shifts",
        Some(json!({
            "employeeId": 6,
            "startTime": "2025-01-11T10:00:00",
            "endTime": "2025-01-11T18:00:00",
            "status": "published"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 21);
    assert_eq!(body["status"], "draft");

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/shifts",
        Some(json!({
            "employeeId": 6,
            "startTime": "2025-01-11T18:00:00",
            "endTime": "2025-01-11T10:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/shifts",
        Some(json!({
            "employeeId": 99,
            "startTime": "2025-01-11T10:00:00",
            "endTime": "2025-01-11T18:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["id"], 99);
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let (status, _, body) = send(
        &app(),
        Method::POST,
        "/api/job-roles",
        Some(json!({ "name": "Host" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (status, body) = get(&app(), "/api/users/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["details"]["entity"], "user");
}

#[tokio::test]
async fn updating_unknown_employee_is_not_found_even_with_bad_roles() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        "/api/employees/999",
        Some(json!({ "jobRoleIds": [42] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["entity"], "employee");

    let (status, _, _) = send(
        &app,
        Method::PATCH,
        "/api/users/999",
        Some(json!({ "jobRoleIds": [42] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_profile_and_update() {
    let app = app();

    let (status, body) = get(&app, "/api/users/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Bob Williams");
    assert_eq!(body["allJobRoles"].as_array().unwrap().len(), 5);

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        "/api/users/2",
        Some(json!({ "name": "Robert Williams", "location": "Uptown" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Robert Williams");
    assert_eq!(body["location"], "Uptown");
    assert_eq!(body["permissionRole"], "Employee");
}

#[tokio::test]
async fn owner_sees_everyone_else_on_the_team() {
    let (status, body) = get(&app(), "/api/team").await;
    assert_eq!(status, StatusCode::OK);

    let team = body.as_array().unwrap();
    assert_eq!(team.len(), 7);
    assert!(team.iter().all(|member| member["id"] != 8));
    assert_eq!(team[1]["roleLabel"], "Chef");
}

#[tokio::test]
async fn signing_out_ends_the_session() {
    let app = app();

    let (status, _, _) = send(&app, Method::POST, "/api/auth/sign-out", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/api/auth/session").await;
    assert!(body["user"].is_null());

    let (status, body) = get(&app, "/api/team").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authenticated");

    let (status, _, body) = send(&app, Method::POST, "/api/auth/sign-in", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], 8);
}

#[tokio::test]
async fn deleting_a_job_role_unassigns_it() {
    let app = app();

    let (status, _, _) = send(&app, Method::DELETE, "/api/job-roles/3", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, "/api/company").await;
    assert_eq!(body["jobRoles"].as_array().unwrap().len(), 4);
    let charlie = body["employees"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == 3)
        .unwrap();
    assert_eq!(charlie["jobRoleIds"], json!([]));
    assert_eq!(charlie["jobRolesLabel"], "N/A");

    let (status, _, _) = send(&app, Method::DELETE, "/api/job-roles/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn job_role_create_and_edit() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/job-roles",
        Some(json!({ "name": "Host", "department": "Front of House" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 6);

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        "/api/job-roles/6",
        Some(json!({ "department": "Bar" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Host");
    assert_eq!(body["department"], "Bar");

    let (status, _, _) = send(
        &app,
        Method::PATCH,
        "/api/job-roles/60",
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employees_join_the_signed_in_users_company() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/employees",
        Some(json!({
            "name": "Ivan Petrov",
            "permissionRole": "Employee",
            "jobRoleIds": [2],
            "location": "Uptown"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 9);
    assert_eq!(body["companyId"], 1);

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        "/api/employees/9",
        Some(json!({ "permissionRole": "Manager" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permissionRole"], "Manager");
}

#[tokio::test]
async fn owner_renames_company() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::PATCH,
        "/api/company/1",
        Some(json!({ "name": "ShiftVibe Group" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ShiftVibe Group");

    let (status, body) = get(&app, "/api/company/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "ShiftVibe Group");

    let (status, _) = get(&app, "/api/company/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn billing_checkout_and_portal() {
    let app = app();

    let (status, _, body) = send(
        &app,
        Method::POST,
        "/api/billing/checkout",
        Some(json!({ "priceId": "price_team_monthly" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(
        body["sessionId"]
            .as_str()
            .unwrap()
            .starts_with("cs_test_mock_")
    );

    let (status, _, _) = send(
        &app,
        Method::POST,
        "/api/billing/checkout",
        Some(json!({ "priceId": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(&app, Method::POST, "/api/billing/portal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["url"].as_str().unwrap().starts_with("https://"));
}

#[tokio::test]
async fn trace_id_is_echoed_and_reported_in_errors() {
    let request = Request::builder()
        .uri("/api/users/404")
        .header(TRACE_ID_HEADER, "test-trace-1")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.headers().get(TRACE_ID_HEADER).unwrap(), "test-trace-1");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["trace_id"], "test-trace-1");
}

#[tokio::test]
async fn trace_id_is_generated_when_absent() {
    let (_, headers, _) = send(&app(), Method::GET, "/healthz", None).await;
    let trace_id = headers.get(TRACE_ID_HEADER).unwrap().to_str().unwrap();
    assert_eq!(trace_id.len(), 32);
}
