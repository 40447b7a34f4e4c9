/// Access-scoped services
///
/// The only path from a transport layer to the store. Both services take the
/// request's [`TenantContext`](crate::access::TenantContext) explicitly.
///
/// - `query`: reads, absent on tenant mismatch
/// - `mutation`: writes, `ACCESS_DENIED` on tenant mismatch

pub mod error;
pub mod mutation;
pub mod query;

pub use error::{ServiceError, ServiceResult};
pub use mutation::{MutationService, NewProject, NewTask, ProjectChanges, TaskChanges};
pub use query::QueryService;

use crate::models::Task;
use crate::store::EntityStore;

/// Organization owning `task`, through its project
///
/// `None` when the project vanished between reads.
pub(crate) async fn task_owner(store: &dyn EntityStore, task: &Task) -> ServiceResult<Option<i64>> {
    Ok(store
        .find_project(task.project_id)
        .await?
        .map(|project| project.organization_id))
}
