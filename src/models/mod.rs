pub mod course;
pub mod task;

pub use course::{Course, CourseInput, CourseWithTasks};
pub use task::{Priority, Task, TaskFormPage, TaskInput, TaskListPage, TaskWithCourse};
