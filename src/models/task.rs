use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Patch;

/// A to-do item.
///
/// The `title` is stored exactly as the client sent it, macro tokens
/// included. Structured fields (`priority`, `deadline`) are derived from those
/// tokens when the client does not supply them explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// End of the day the task is due, when one is set.
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

/// How urgent a task is. Ordered from most to least urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Self::Critical),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Classification of a task relative to completion and its deadline.
///
/// - `Active`: open, deadline (if any) not yet passed
/// - `Completed`: closed on time
/// - `Overdue`: open past its deadline
/// - `Late`: closed after its deadline
///
/// Status is only recomputed by the status-change action, so a stored
/// `Active` task may already be past its deadline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Active,
    Completed,
    Overdue,
    Late,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::Late => "late",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "overdue" => Some(Self::Overdue),
            "late" => Some(Self::Late),
            _ => None,
        }
    }
}

/// Ordering of task listings by creation date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Input for creating a task.
///
/// `deadline` and `priority` left as `None` are derived from macro tokens in
/// the title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::deadline::deserialize_option")]
    pub deadline: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

/// Input for editing a task. Absent fields are left alone, except for the
/// derivations described on [`crate::lifecycle::apply_edit`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absent: derive from a new title. `null`: clear. Value: set explicitly.
    #[serde(
        default,
        skip_serializing_if = "Patch::is_missing",
        deserialize_with = "super::deadline::deserialize_patch"
    )]
    pub deadline: Patch<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

/// Input for the status-change action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChangeStatusInput {
    pub completed: bool,
}

/// Filters and ordering for task listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub sort: SortDirection,
}

/// A task as returned by the API, with its macro-free title for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub display_title: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        let display_title = crate::title_macros::clean_title(&task.title);
        Self {
            task,
            display_title,
        }
    }
}
