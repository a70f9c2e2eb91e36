use std::collections::HashMap;

use sqlx::SqlitePool;

use crate::models::{Course, CourseWithTasks, Task, TaskInput, TaskWithCourse};

const TASK_COLUMNS: &str =
    "id, title, description, due_date, priority, course_id, reminder_enabled, reminder_minutes_before";

const TASK_WITH_COURSE_SELECT: &str = "SELECT t.id, t.title, t.description, t.due_date, t.priority, \
     t.course_id, t.reminder_enabled, t.reminder_minutes_before, c.name AS course_name \
     FROM tasks t LEFT JOIN courses c ON c.id = t.course_id";

// High before Medium before Low, earliest due date first, undated tasks last.
const TASK_LIST_ORDER: &str = " ORDER BY t.priority DESC, t.due_date IS NULL, t.due_date ASC";

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, name FROM courses ORDER BY name ASC")
        .fetch_all(db)
        .await
}

pub async fn fetch_courses_with_tasks(
    db: &SqlitePool,
) -> Result<Vec<CourseWithTasks>, sqlx::Error> {
    let courses = fetch_courses(db).await?;
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE course_id IS NOT NULL"
    ))
    .fetch_all(db)
    .await?;

    let mut by_course: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in tasks {
        if let Some(course_id) = task.course_id {
            by_course.entry(course_id).or_default().push(task);
        }
    }

    Ok(courses
        .into_iter()
        .map(|course| CourseWithTasks {
            tasks: by_course.remove(&course.id).unwrap_or_default(),
            id: course.id,
            name: course.name,
        })
        .collect())
}

pub async fn find_course_by_id(db: &SqlitePool, id: i64) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT id, name FROM courses WHERE id = ?1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_course_with_tasks(
    db: &SqlitePool,
    id: i64,
) -> Result<Option<CourseWithTasks>, sqlx::Error> {
    let course = match find_course_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE course_id = ?1"
    ))
    .bind(id)
    .fetch_all(db)
    .await?;

    Ok(Some(CourseWithTasks {
        id: course.id,
        name: course.name,
        tasks,
    }))
}

pub async fn insert_course(db: &SqlitePool, name: &str) -> Result<Course, sqlx::Error> {
    let result = sqlx::query("INSERT INTO courses (name) VALUES (?1)")
        .bind(name)
        .execute(db)
        .await?;

    Ok(Course {
        id: result.last_insert_rowid(),
        name: name.to_string(),
    })
}

pub async fn update_course(
    db: &SqlitePool,
    id: i64,
    name: &str,
) -> Result<Option<Course>, sqlx::Error> {
    let result = sqlx::query("UPDATE courses SET name = ?1 WHERE id = ?2")
        .bind(name)
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Course {
        id,
        name: name.to_string(),
    }))
}

/// Deletes a course and every task referencing it as one committed unit.
/// No-op when the course does not exist.
pub async fn delete_course_cascade(db: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM tasks WHERE course_id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM courses WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

pub async fn fetch_tasks(
    db: &SqlitePool,
    course_id: Option<i64>,
) -> Result<Vec<TaskWithCourse>, sqlx::Error> {
    match course_id {
        Some(id) => {
            sqlx::query_as::<_, TaskWithCourse>(&format!(
                "{TASK_WITH_COURSE_SELECT} WHERE t.course_id = ?1{TASK_LIST_ORDER}"
            ))
            .bind(id)
            .fetch_all(db)
            .await
        }
        None => {
            sqlx::query_as::<_, TaskWithCourse>(&format!(
                "{TASK_WITH_COURSE_SELECT}{TASK_LIST_ORDER}"
            ))
            .fetch_all(db)
            .await
        }
    }
}

pub async fn fetch_calendar_tasks(db: &SqlitePool) -> Result<Vec<TaskWithCourse>, sqlx::Error> {
    sqlx::query_as::<_, TaskWithCourse>(&format!(
        "{TASK_WITH_COURSE_SELECT} WHERE t.due_date IS NOT NULL"
    ))
    .fetch_all(db)
    .await
}

/// Tasks eligible for the reminder projection, regardless of any list filter.
pub async fn fetch_reminder_candidates(db: &SqlitePool) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE reminder_enabled = 1 AND due_date IS NOT NULL"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_task_by_id(db: &SqlitePool, id: i64) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_task(
    db: &SqlitePool,
    input: &TaskInput,
    reminder_minutes: i64,
) -> Result<Task, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO tasks \
         (title, description, due_date, priority, course_id, reminder_enabled, reminder_minutes_before) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.due_date)
    .bind(input.priority)
    .bind(input.course_id)
    .bind(input.reminder_enabled)
    .bind(reminder_minutes)
    .execute(db)
    .await?;

    Ok(Task {
        id: result.last_insert_rowid(),
        title: input.title.clone(),
        description: input.description.clone(),
        due_date: input.due_date,
        priority: input.priority,
        course_id: input.course_id,
        reminder_enabled: input.reminder_enabled,
        reminder_minutes_before: reminder_minutes,
    })
}

pub async fn update_task(
    db: &SqlitePool,
    id: i64,
    input: &TaskInput,
    reminder_minutes: i64,
) -> Result<Option<Task>, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE tasks \
         SET title = ?1, description = ?2, due_date = ?3, priority = ?4, course_id = ?5, \
             reminder_enabled = ?6, reminder_minutes_before = ?7 \
         WHERE id = ?8",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.due_date)
    .bind(input.priority)
    .bind(input.course_id)
    .bind(input.reminder_enabled)
    .bind(reminder_minutes)
    .bind(id)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Task {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        due_date: input.due_date,
        priority: input.priority,
        course_id: input.course_id,
        reminder_enabled: input.reminder_enabled,
        reminder_minutes_before: reminder_minutes,
    }))
}

pub async fn delete_task(db: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
