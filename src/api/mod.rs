pub mod courses;
pub mod tasks;

use axum::{Router, extract::State, http::StatusCode, routing::{get, post}};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(courses::list))
        .route("/courses/create", get(courses::new_form).post(courses::create))
        .route("/courses/edit/{id}", get(courses::edit_form).post(courses::update))
        .route("/courses/delete/{id}", post(courses::delete))
        .route("/courses/details/{id}", get(courses::details))
        .route("/tasks", get(tasks::list))
        .route("/tasks/create", get(tasks::new_form).post(tasks::create))
        .route("/tasks/edit/{id}", get(tasks::edit_form).post(tasks::update))
        .route("/tasks/delete/{id}", post(tasks::delete))
        .route("/tasks/calendar", get(tasks::calendar))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, crate::error::AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
