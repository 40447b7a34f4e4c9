/// Project model
///
/// Projects belong to exactly one organization. The owning organization is set
/// at creation and never changes: `UpdateProject` has no parent field.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('ACTIVE', 'COMPLETED', 'ON_HOLD');
///
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     organization_id BIGINT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
///     name VARCHAR(200) NOT NULL,
///     status project_status NOT NULL DEFAULT 'ACTIVE',
///     description TEXT NOT NULL DEFAULT '',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT projects_organization_id_name_key UNIQUE (organization_id, name)
/// );
/// ```
///
/// # Status
///
/// Status changes are unrestricted: any status may be set from any other.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Composite unique constraint on `(organization_id, name)`
pub const NAME_UNIQUE_CONSTRAINT: &str = "projects_organization_id_name_key";

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Work is ongoing
    #[default]
    Active,

    /// All work is finished
    Completed,

    /// Paused
    OnHold,
}

impl ProjectStatus {
    /// Converts status to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
        }
    }

    /// Parses a status from its stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(ProjectStatus::Active),
            "COMPLETED" => Some(ProjectStatus::Completed),
            "ON_HOLD" => Some(ProjectStatus::OnHold),
            _ => None,
        }
    }
}

/// Project owned by an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Primary key
    pub id: i64,

    /// Owning organization (immutable)
    pub organization_id: i64,

    /// Name, unique within the organization
    pub name: String,

    /// Current status
    pub status: ProjectStatus,

    /// Free-form description (empty when not provided)
    pub description: String,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProject {
    /// Owning organization
    pub organization_id: i64,

    /// Project name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Due date
    pub due_date: Option<NaiveDate>,
}

impl CreateProject {
    /// Input with an empty description and no due date
    pub fn new(organization_id: i64, name: impl Into<String>) -> Self {
        Self {
            organization_id,
            name: name.into(),
            description: String::new(),
            due_date: None,
        }
    }
}

/// Partial update for a project
///
/// Only `Some` fields are written; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProject {
    /// New name
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<ProjectStatus>,

    /// New due date
    pub due_date: Option<NaiveDate>,
}

impl UpdateProject {
    /// Applies the provided fields to `project`
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(due_date) = self.due_date {
            project.due_date = Some(due_date);
        }
    }
}
