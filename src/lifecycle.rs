//! Rules for creating, editing and re-classifying tasks.
//!
//! Every function here is pure: it takes the current time as an argument
//! and returns a new [`Task`] without touching storage. Callers persist the
//! result only when the rule succeeded, which makes each mutation
//! all-or-nothing.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::*;
use crate::title_macros::{detect_priority, extract_deadline_at};

pub const TITLE_MIN_LEN: usize = 4;
pub const TITLE_MAX_LEN: usize = 255;

/// Whether `title` has an acceptable length, counted in characters, and
/// holds something other than whitespace.
pub fn is_title_valid(title: &str) -> bool {
    !title.trim().is_empty() && (TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&title.chars().count())
}

pub fn validate_title(title: &str) -> TaskResult<()> {
    if is_title_valid(title) {
        Ok(())
    } else {
        Err(TaskError::InvalidTitle)
    }
}

/// Builds a new active task.
///
/// An explicit `deadline` must not be before `now`; without one the deadline
/// comes from a `!before` token in the title. Without an explicit `priority`
/// it comes from a `!1`..`!4` token.
pub fn new_task(input: CreateTaskInput, now: DateTime<Utc>) -> TaskResult<Task> {
    validate_title(&input.title)?;

    let deadline = match input.deadline {
        Some(deadline) => Some(ensure_not_past(deadline, now)?),
        None => extract_deadline_at(&input.title, now)?,
    };

    let priority = input
        .priority
        .unwrap_or_else(|| detect_priority(&input.title));

    Ok(Task {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description.unwrap_or_default(),
        deadline,
        priority,
        status: TaskStatus::Active,
        create_date: now,
        update_date: now,
    })
}

/// Applies an edit to a copy of `task`.
///
/// - A new title re-derives the deadline (unless one is given explicitly)
///   and the priority (unless one is given explicitly). A title without a
///   `!before` token keeps the current deadline.
/// - `deadline: null` clears the deadline.
/// - Priority is always rewritten: with neither a title nor a priority in the
///   input it falls back to [`Priority::Medium`].
pub fn apply_edit(task: &Task, input: UpdateTaskInput, now: DateTime<Utc>) -> TaskResult<Task> {
    let mut edited = task.clone();

    if let Some(title) = &input.title {
        validate_title(title)?;
    }

    edited.deadline = match input.deadline {
        Patch::Value(deadline) => Some(ensure_not_past(deadline, now)?),
        Patch::Null => None,
        Patch::Missing => match &input.title {
            Some(title) => extract_deadline_at(title, now)?.or(task.deadline),
            None => task.deadline,
        },
    };

    // Known quirk: resets to Medium when neither a title nor a priority is sent.
    edited.priority = input
        .priority
        .or_else(|| input.title.as_deref().map(detect_priority))
        .unwrap_or_default();

    if let Some(title) = input.title {
        edited.title = title;
    }
    if let Some(description) = input.description {
        edited.description = description;
    }

    edited.update_date = now;
    Ok(edited)
}

/// Re-classifies `task` after it was marked complete or reopened.
pub fn change_status(task: &Task, completed: bool, now: DateTime<Utc>) -> Task {
    let mut changed = task.clone();
    changed.status = next_status(task.status, task.deadline, completed, now);
    changed.update_date = now;
    changed
}

/// Status a task moves to when marked `completed` (or reopened) at `now`.
///
/// Overdue detection is lazy: an `Active` task past its deadline is first
/// seen as `Overdue` here, then classified by the requested completion.
pub fn next_status(
    current: TaskStatus,
    deadline: Option<DateTime<Utc>>,
    completed: bool,
    now: DateTime<Utc>,
) -> TaskStatus {
    let past_deadline = is_past_deadline(deadline, now);

    if current == TaskStatus::Active && past_deadline {
        tracing::debug!("active task is past its deadline, now overdue");
    }

    match (completed, past_deadline) {
        (true, true) => TaskStatus::Late,
        (true, false) => TaskStatus::Completed,
        (false, true) => TaskStatus::Overdue,
        (false, false) => TaskStatus::Active,
    }
}

pub fn is_past_deadline(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    deadline.is_some_and(|deadline| now > deadline)
}

fn ensure_not_past(deadline: DateTime<Utc>, now: DateTime<Utc>) -> TaskResult<DateTime<Utc>> {
    if deadline < now {
        Err(TaskError::DeadlineInPast)
    } else {
        Ok(deadline)
    }
}
