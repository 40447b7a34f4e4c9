/// Data model for ProjectHub
///
/// # Models
///
/// - `organization`: Tenants, addressed by slug
/// - `project`: Projects owned by an organization
/// - `task`: Tasks within a project
/// - `comment`: Comments on a task
/// - `stats`: Derived counts and completion rates
///
/// Ownership runs comment → task → project → organization, and deletes
/// cascade down the same chain.

pub mod comment;
pub mod organization;
pub mod project;
pub mod stats;
pub mod task;

pub use comment::{CreateTaskComment, TaskComment};
pub use organization::{CreateOrganization, Organization};
pub use project::{CreateProject, Project, ProjectStatus, UpdateProject};
pub use stats::{ProjectCounts, ProjectStats, TaskCounts};
pub use task::{CreateTask, Task, TaskStatus, UpdateTask};
