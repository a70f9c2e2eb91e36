use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use coursetrack::api::router;
use coursetrack::state::AppState;

async fn test_app() -> Router {
    // One connection: every pooled connection would otherwise open its own
    // in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    router(AppState { db: pool })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            builder.body(Body::from(value.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_course(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/courses/create", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_task(app: &Router, task: Value) -> i64 {
    let (status, body) = send(app, "POST", "/tasks/create", Some(task)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn list_sorts_by_priority_then_due_date_with_undated_last() {
    let app = test_app().await;

    create_task(
        &app,
        json!({ "title": "low-dated", "priority": "low", "due_date": "2025-01-01T00:00:00" }),
    )
    .await;
    create_task(&app, json!({ "title": "high-undated", "priority": "high" })).await;
    create_task(
        &app,
        json!({ "title": "high-dated", "priority": "high", "due_date": "2025-01-02T00:00:00" }),
    )
    .await;
    create_task(&app, json!({ "title": "medium-undated", "priority": "medium" })).await;

    let (status, body) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);

    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        vec!["high-dated", "high-undated", "medium-undated", "low-dated"]
    );
}

#[tokio::test]
async fn filter_restricts_tasks_and_resolves_course_name() {
    let app = test_app().await;
    let chem = create_course(&app, "Chemistry").await;
    let math = create_course(&app, "Math").await;

    create_task(&app, json!({ "title": "Titration lab", "course_id": chem })).await;
    create_task(&app, json!({ "title": "Unassigned" })).await;

    let (status, body) = send(&app, "GET", &format!("/tasks?course_id={chem}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Titration lab");
    assert_eq!(tasks[0]["course_name"], "Chemistry");
    assert_eq!(body["filtered_course"], "Chemistry");
    assert_eq!(body["selected_course_id"], chem);

    // The filter name resolves even for a course with zero tasks.
    let (_, body) = send(&app, "GET", &format!("/tasks?course_id={math}"), None).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
    assert_eq!(body["filtered_course"], "Math");
}

#[tokio::test]
async fn reminder_projection_subtracts_lead_time() {
    let app = test_app().await;

    let id = create_task(
        &app,
        json!({
            "title": "Final paper",
            "due_date": "2025-12-01T10:00:00",
            "reminder_enabled": true,
            "reminder_value": 60,
            "reminder_unit": "minutes"
        }),
    )
    .await;

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    let reminders = body["reminders"].as_array().unwrap();
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0]["task_id"], id);
    assert_eq!(reminders[0]["fire_at"], "2025-12-01T09:00:00");
}

#[tokio::test]
async fn reminder_projection_covers_whole_store_even_when_filtered() {
    let app = test_app().await;
    let chem = create_course(&app, "Chemistry").await;

    // Reminder-bearing task lives outside the filtered course.
    create_task(
        &app,
        json!({
            "title": "Unrelated",
            "due_date": "2025-12-01T10:00:00",
            "reminder_enabled": true,
            "reminder_value": 1,
            "reminder_unit": "hours"
        }),
    )
    .await;

    let (_, body) = send(&app, "GET", &format!("/tasks?course_id={chem}"), None).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
    assert_eq!(body["reminders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn reminder_round_trips_through_days() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks/create",
        Some(json!({
            "title": "Essay",
            "reminder_enabled": true,
            "reminder_value": 3,
            "reminder_unit": "days"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reminder_minutes_before"], 4320);
    let id = body["id"].as_i64().unwrap();

    let (_, body) = send(&app, "GET", &format!("/tasks/edit/{id}"), None).await;
    assert_eq!(body["values"]["reminder_value"], 3);
    assert_eq!(body["values"]["reminder_unit"], "days");
    assert_eq!(body["values"]["reminder_enabled"], true);
}

#[tokio::test]
async fn odd_minute_count_decodes_as_minutes() {
    let app = test_app().await;

    let id = create_task(
        &app,
        json!({
            "title": "Quiz prep",
            "reminder_enabled": true,
            "reminder_value": 90,
            "reminder_unit": "minutes"
        }),
    )
    .await;

    let (_, body) = send(&app, "GET", &format!("/tasks/edit/{id}"), None).await;
    assert_eq!(body["values"]["reminder_value"], 90);
    assert_eq!(body["values"]["reminder_unit"], "minutes");
}

#[tokio::test]
async fn disabled_reminder_forces_zero_minutes() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks/create",
        Some(json!({
            "title": "Essay",
            "reminder_enabled": false,
            "reminder_value": 3,
            "reminder_unit": "days"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reminder_minutes_before"], 0);
    let id = body["id"].as_i64().unwrap();

    // Edit form falls back to the default lead time, still disabled.
    let (_, body) = send(&app, "GET", &format!("/tasks/edit/{id}"), None).await;
    assert_eq!(body["values"]["reminder_enabled"], false);
    assert_eq!(body["values"]["reminder_value"], 60);
    assert_eq!(body["values"]["reminder_unit"], "minutes");
}

#[tokio::test]
async fn unrecognized_unit_falls_back_to_sixty_minutes_per_unit() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks/create",
        Some(json!({
            "title": "Essay",
            "reminder_enabled": true,
            "reminder_value": 2,
            "reminder_unit": "fortnights"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["reminder_minutes_before"], 120);
}

#[tokio::test]
async fn create_rejects_empty_title_and_echoes_input() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks/create",
        Some(json!({ "title": "", "description": "kept" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "title");
    assert_eq!(body["values"]["description"], "kept");

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_course_reference_is_rejected() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/tasks/create",
        Some(json!({ "title": "Orphan", "course_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_with_mismatched_id_is_not_found_and_writes_nothing() {
    let app = test_app().await;
    let id = create_task(&app, json!({ "title": "Original" })).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/tasks/edit/{id}"),
        Some(json!({ "id": id + 1, "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", &format!("/tasks/edit/{id}"), None).await;
    assert_eq!(body["values"]["title"], "Original");
}

#[tokio::test]
async fn edit_of_absent_task_is_not_found() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/tasks/edit/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/tasks/edit/42",
        Some(json!({ "id": 42, "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_task_then_delete_again_is_a_noop() {
    let app = test_app().await;
    let id = create_task(&app, json!({ "title": "Done soon" })).await;

    let (status, _) = send(&app, "POST", &format!("/tasks/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "POST", &format!("/tasks/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/tasks", None).await;
    assert!(body["tasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn calendar_lists_only_dated_tasks() {
    let app = test_app().await;
    let chem = create_course(&app, "Chemistry").await;

    create_task(
        &app,
        json!({ "title": "Dated", "due_date": "2025-03-01T09:00:00", "course_id": chem }),
    )
    .await;
    create_task(&app, json!({ "title": "Undated" })).await;

    let (status, body) = send(&app, "GET", "/tasks/calendar", None).await;
    assert_eq!(status, StatusCode::OK);

    let tasks = body.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Dated");
    assert_eq!(tasks[0]["course_name"], "Chemistry");
}

#[tokio::test]
async fn new_form_includes_course_dropdown_and_defaults() {
    let app = test_app().await;
    create_course(&app, "Chemistry").await;

    let (status, body) = send(&app, "GET", "/tasks/create", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"]["priority"], "medium");
    assert_eq!(body["values"]["reminder_enabled"], false);
    assert_eq!(body["courses"].as_array().unwrap().len(), 1);
}
