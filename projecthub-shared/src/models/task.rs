/// Task model
///
/// Tasks belong to exactly one project and reach their organization through
/// it. The parent project never changes after creation.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('TODO', 'IN_PROGRESS', 'DONE');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'TODO',
///     assignee_email VARCHAR(254) NOT NULL DEFAULT '',
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Task progress status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Parses a status from its stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TODO" => Some(TaskStatus::Todo),
            "IN_PROGRESS" => Some(TaskStatus::InProgress),
            "DONE" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// Task within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Primary key
    pub id: i64,

    /// Parent project (immutable)
    pub project_id: i64,

    /// Short title
    pub title: String,

    /// Free-form description (empty when not provided)
    pub description: String,

    /// Current status
    pub status: TaskStatus,

    /// Assignee email (empty when unassigned)
    pub assignee_email: String,

    /// Optional deadline
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTask {
    /// Parent project
    pub project_id: i64,

    /// Task title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Assignee email, empty for unassigned
    #[serde(default)]
    #[validate(custom(function = "validate_assignee_email"))]
    pub assignee_email: String,

    /// Deadline
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateTask {
    /// Unassigned task with no description or deadline
    pub fn new(project_id: i64, title: impl Into<String>) -> Self {
        Self {
            project_id,
            title: title.into(),
            description: String::new(),
            assignee_email: String::new(),
            due_date: None,
        }
    }
}

/// Partial update for a task
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTask {
    /// New title
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New assignee email (empty string unassigns)
    #[validate(custom(function = "validate_assignee_email"))]
    pub assignee_email: Option<String>,
}

impl UpdateTask {
    /// Applies the provided fields to `task`
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(assignee_email) = &self.assignee_email {
            task.assignee_email = assignee_email.clone();
        }
    }
}

/// Empty means unassigned; anything else must look like an email address
fn validate_assignee_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        return Ok(());
    }

    let mut error = ValidationError::new("email");
    error.message = Some("Assignee email must be a valid email address".into());
    Err(error)
}
