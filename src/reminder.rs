//! Reminder lead-time rules: unit conversion for form input, back-derivation
//! for the edit form, and the fire-time projection exposed to clients.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::Task;

/// Minutes per unit when the submitted unit string is not recognized.
pub const UNRECOGNIZED_UNIT_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderUnit {
    Minutes,
    Hours,
    Days,
}

impl ReminderUnit {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minutes" => Some(ReminderUnit::Minutes),
            "hours" => Some(ReminderUnit::Hours),
            "days" => Some(ReminderUnit::Days),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderUnit::Minutes => "minutes",
            ReminderUnit::Hours => "hours",
            ReminderUnit::Days => "days",
        }
    }

    pub fn minutes_per_unit(self) -> i64 {
        match self {
            ReminderUnit::Minutes => 1,
            ReminderUnit::Hours => 60,
            ReminderUnit::Days => 1440,
        }
    }
}

fn minutes_per_unit(unit: &str) -> i64 {
    ReminderUnit::parse(unit)
        .map(ReminderUnit::minutes_per_unit)
        .unwrap_or(UNRECOGNIZED_UNIT_MINUTES)
}

/// Lead time in minutes for a submitted value/unit pair. Disabled reminders
/// are always stored as zero minutes.
pub fn normalize(enabled: bool, value: i64, unit: &str) -> i64 {
    if !enabled {
        return 0;
    }
    value * minutes_per_unit(unit)
}

/// Value/unit pair shown on the edit form for a stored lead time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDisplay {
    pub value: i64,
    pub unit: ReminderUnit,
}

/// Picks the largest unit that divides the stored minutes evenly. Zero means
/// no reminder is stored, so the form falls back to its default lead time.
pub fn display_breakdown(minutes: i64) -> ReminderDisplay {
    if minutes > 0 && minutes % 1440 == 0 {
        ReminderDisplay {
            value: minutes / 1440,
            unit: ReminderUnit::Days,
        }
    } else if minutes > 0 && minutes % 60 == 0 {
        ReminderDisplay {
            value: minutes / 60,
            unit: ReminderUnit::Hours,
        }
    } else if minutes > 0 {
        ReminderDisplay {
            value: minutes,
            unit: ReminderUnit::Minutes,
        }
    } else {
        ReminderDisplay {
            value: 60,
            unit: ReminderUnit::Minutes,
        }
    }
}

pub fn fire_time(due_date: NaiveDateTime, minutes_before: i64) -> NaiveDateTime {
    due_date - Duration::minutes(minutes_before)
}

/// When a client should surface a reminder for a task. Computed, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderProjection {
    pub task_id: i64,
    pub title: String,
    pub due_date: NaiveDateTime,
    pub fire_at: NaiveDateTime,
}

pub fn project(task: &Task) -> Option<ReminderProjection> {
    let due_date = task.due_date?;
    Some(ReminderProjection {
        task_id: task.id,
        title: task.title.clone(),
        due_date,
        fire_at: fire_time(due_date, task.reminder_minutes_before),
    })
}
