/// Entity store abstraction
///
/// `EntityStore` is the persistence seam of ProjectHub: the services only ever
/// talk to this trait, never to a database driver directly.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx, constraints enforced by the schema
/// - [`memory::MemoryStore`]: in-process tables with the same constraints
///
/// Both enforce the same contract:
///
/// - organization `name` and `slug` are unique
/// - `(organization_id, name)` is unique for projects
/// - creating a child whose parent does not exist fails
/// - deletes cascade organization → projects → tasks → comments
/// - lists are ordered newest first (`created_at DESC, id DESC`), except
///   organizations which are ordered by name

use async_trait::async_trait;
use std::sync::Arc;

use crate::db::pool::PoolStats;
use crate::models::{
    CreateOrganization, CreateProject, CreateTask, CreateTaskComment, Organization, Project,
    ProjectCounts, Task, TaskComment, TaskCounts, UpdateProject, UpdateTask,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store handle shared across requests
pub type SharedStore = Arc<dyn EntityStore>;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced parent row does not exist
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

/// Filter for project listings and counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Only projects owned by this organization
    pub organization_id: Option<i64>,
}

impl ProjectFilter {
    /// Unfiltered
    pub fn all() -> Self {
        Self::default()
    }

    /// Projects of one organization
    pub fn organization(organization_id: i64) -> Self {
        Self {
            organization_id: Some(organization_id),
        }
    }
}

/// Filter for task listings and counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks of this project
    pub project_id: Option<i64>,

    /// Only tasks whose project is owned by this organization
    pub organization_id: Option<i64>,
}

impl TaskFilter {
    /// Tasks of one project
    pub fn project(project_id: i64) -> Self {
        Self {
            project_id: Some(project_id),
            organization_id: None,
        }
    }
}

/// Persistence operations over the organization → project → task → comment graph
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Connection pool occupancy, for backends that have one
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }

    /// Verifies the store is reachable
    async fn health_check(&self) -> StoreResult<()>;

    /// Releases store resources during shutdown
    async fn close(&self);

    /// Inserts an organization, deriving its slug when none is given
    async fn create_organization(&self, data: CreateOrganization) -> StoreResult<Organization>;

    async fn find_organization(&self, id: i64) -> StoreResult<Option<Organization>>;

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>>;

    /// All organizations, alphabetical
    async fn list_organizations(&self) -> StoreResult<Vec<Organization>>;

    /// Deletes an organization and everything below it
    async fn delete_organization(&self, id: i64) -> StoreResult<bool>;

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;

    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>>;

    async fn list_projects(&self, filter: ProjectFilter) -> StoreResult<Vec<Project>>;

    async fn count_projects(&self, filter: ProjectFilter) -> StoreResult<ProjectCounts>;

    /// Writes only the provided fields; `None` when the project does not exist
    async fn update_project(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>>;

    async fn delete_project(&self, id: i64) -> StoreResult<bool>;

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>>;

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>>;

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<TaskCounts>;

    /// Writes only the provided fields; `None` when the task does not exist
    async fn update_task(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>>;

    async fn delete_task(&self, id: i64) -> StoreResult<bool>;

    async fn create_comment(&self, data: CreateTaskComment) -> StoreResult<TaskComment>;

    /// Comments of a task, newest first
    async fn list_comments(&self, task_id: i64) -> StoreResult<Vec<TaskComment>>;

    async fn count_comments(&self, task_id: i64) -> StoreResult<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        assert_eq!(ProjectFilter::all().organization_id, None);
        assert_eq!(ProjectFilter::organization(4).organization_id, Some(4));

        let filter = TaskFilter::project(9);
        assert_eq!(filter.project_id, Some(9));
        assert_eq!(filter.organization_id, None);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::UniqueViolation("organizations_slug_key".to_string());
        assert!(err.to_string().contains("organizations_slug_key"));

        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }
}
