use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::db::repository;
use crate::error::{AppError, validation_rejection};
use crate::models::{TaskFormPage, TaskInput, TaskListPage, TaskWithCourse};
use crate::reminder;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    #[serde(default, alias = "courseId")]
    pub course_id: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListPage>, AppError> {
    let tasks = repository::fetch_tasks(&state.db, params.course_id).await?;

    let filtered_course = match params.course_id {
        Some(id) => repository::find_course_by_id(&state.db, id)
            .await?
            .map(|c| c.name),
        None => None,
    };

    let courses = repository::fetch_courses(&state.db).await?;

    // Reminders cover the whole store, not just the filtered rows.
    let reminders = repository::fetch_reminder_candidates(&state.db)
        .await?
        .iter()
        .filter_map(reminder::project)
        .collect();

    Ok(Json(TaskListPage {
        tasks,
        courses,
        selected_course_id: params.course_id,
        filtered_course,
        reminders,
    }))
}

pub async fn new_form(State(state): State<AppState>) -> Result<Json<TaskFormPage>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(TaskFormPage {
        values: TaskInput::default(),
        courses,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<TaskInput>,
) -> Result<Response, AppError> {
    let reminder_minutes = reminder::normalize(
        input.reminder_enabled,
        input.reminder_value,
        &input.reminder_unit,
    );

    let errors = input.validate();
    if !errors.is_empty() {
        return Ok(validation_rejection(&input, &errors));
    }

    let task = repository::insert_task(&state.db, &input, reminder_minutes).await?;
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskFormPage>, AppError> {
    let task = repository::find_task_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let courses = repository::fetch_courses(&state.db).await?;

    Ok(Json(TaskFormPage {
        values: TaskInput::from_task(task),
        courses,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TaskInput>,
) -> Result<Response, AppError> {
    if input.id != Some(id) {
        return Err(AppError::NotFound);
    }

    let reminder_minutes = reminder::normalize(
        input.reminder_enabled,
        input.reminder_value,
        &input.reminder_unit,
    );

    let errors = input.validate();
    if !errors.is_empty() {
        return Ok(validation_rejection(&input, &errors));
    }

    let task = repository::update_task(&state.db, id, &input, reminder_minutes)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(task).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repository::delete_task(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn calendar(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskWithCourse>>, AppError> {
    let tasks = repository::fetch_calendar_tasks(&state.db).await?;
    Ok(Json(tasks))
}
