use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::FieldError;
use crate::models::task::Task;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

/// Course plus its tasks, resolved through the foreign key at query time.
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithTasks {
    pub id: i64,
    pub name: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

impl CourseInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name must not be empty"));
        }
        errors
    }
}
