use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::FieldError;
use crate::models::course::Course;
use crate::reminder::{self, ReminderProjection};

/// Stored as its ordinal so the task list can sort High before Low in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    pub course_id: Option<i64>,
    pub reminder_enabled: bool,
    pub reminder_minutes_before: i64,
}

/// Task list row with the course name joined in for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskWithCourse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub priority: Priority,
    pub course_id: Option<i64>,
    pub reminder_enabled: bool,
    pub reminder_minutes_before: i64,
    pub course_name: Option<String>,
}

/// Form payload for create/edit. The reminder value/unit pair is transient
/// input; only the derived minute count is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub reminder_enabled: bool,
    #[serde(default = "default_reminder_value")]
    pub reminder_value: i64,
    #[serde(default = "default_reminder_unit")]
    pub reminder_unit: String,
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_reminder_value() -> i64 {
    60
}

fn default_reminder_unit() -> String {
    "minutes".to_string()
}

impl Default for TaskInput {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            due_date: None,
            priority: default_priority(),
            course_id: None,
            reminder_enabled: false,
            reminder_value: default_reminder_value(),
            reminder_unit: default_reminder_unit(),
        }
    }
}

impl TaskInput {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "title must not be empty"));
        }
        if self.reminder_value < 0 {
            errors.push(FieldError::new(
                "reminder_value",
                "reminder lead time must not be negative",
            ));
        }
        errors
    }

    /// Edit-form view of a stored task, with the lead time broken back down
    /// into a value/unit pair. The stored enabled flag is authoritative.
    pub fn from_task(task: Task) -> Self {
        let display = reminder::display_breakdown(task.reminder_minutes_before);
        Self {
            id: Some(task.id),
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            course_id: task.course_id,
            reminder_enabled: task.reminder_enabled,
            reminder_value: display.value,
            reminder_unit: display.unit.as_str().to_string(),
        }
    }
}

/// Everything the task list page needs in one response: the filtered rows,
/// dropdown options, the resolved filter name, and the reminder projection
/// over the whole store.
#[derive(Debug, Serialize)]
pub struct TaskListPage {
    pub tasks: Vec<TaskWithCourse>,
    pub courses: Vec<Course>,
    pub selected_course_id: Option<i64>,
    pub filtered_course: Option<String>,
    pub reminders: Vec<ReminderProjection>,
}

#[derive(Debug, Serialize)]
pub struct TaskFormPage {
    pub values: TaskInput,
    pub courses: Vec<Course>,
}
