use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::repository;
use crate::error::{AppError, validation_rejection};
use crate::models::{Course, CourseInput, CourseWithTasks};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CourseWithTasks>>, AppError> {
    let courses = repository::fetch_courses_with_tasks(&state.db).await?;
    Ok(Json(courses))
}

pub async fn new_form() -> Json<CourseInput> {
    Json(CourseInput::default())
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CourseInput>,
) -> Result<Response, AppError> {
    let errors = input.validate();
    if !errors.is_empty() {
        return Ok(validation_rejection(&input, &errors));
    }

    let course = repository::insert_course(&state.db, &input.name).await?;
    Ok((StatusCode::CREATED, Json(course)).into_response())
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    let course = repository::find_course_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CourseInput>,
) -> Result<Response, AppError> {
    if input.id != Some(id) {
        return Err(AppError::NotFound);
    }

    let errors = input.validate();
    if !errors.is_empty() {
        return Ok(validation_rejection(&input, &errors));
    }

    let course = repository::update_course(&state.db, id, &input.name)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    repository::delete_course_cascade(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseWithTasks>, AppError> {
    let course = repository::find_course_with_tasks(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}
