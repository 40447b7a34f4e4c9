/// Task comment model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_comments (
///     id BIGSERIAL PRIMARY KEY,
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     content TEXT NOT NULL,
///     author_email VARCHAR(254) NOT NULL,
///     timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Comment left on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    /// Primary key
    pub id: i64,

    /// Task the comment belongs to
    pub task_id: i64,

    /// Comment body
    pub content: String,

    /// Author's email
    pub author_email: String,

    /// When the comment was posted
    pub timestamp: DateTime<Utc>,
}

/// Input for adding a comment to a task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaskComment {
    /// Task to comment on
    pub task_id: i64,

    /// Comment body
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,

    /// Author's email
    #[validate(email(message = "Author email must be a valid email address"))]
    pub author_email: String,
}

impl CreateTaskComment {
    pub fn new(task_id: i64, content: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self {
            task_id,
            content: content.into(),
            author_email: author_email.into(),
        }
    }
}
