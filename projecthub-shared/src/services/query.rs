/// Access-scoped read operations
///
/// Every read that can cross a tenant boundary takes the request's
/// [`TenantContext`]. A resolved tenant always wins over an explicit scope
/// argument, and an entity owned by another tenant is reported as absent
/// rather than forbidden.

use tracing::debug;

use crate::access::{is_visible, TenantContext};
use crate::models::{
    Organization, Project, ProjectStats, Task, TaskComment, TaskCounts,
};
use crate::store::{ProjectFilter, SharedStore, TaskFilter};

use super::error::ServiceResult;
use super::task_owner;

/// Read side of the entity graph
#[derive(Clone)]
pub struct QueryService {
    store: SharedStore,
}

impl QueryService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All organizations, alphabetical
    pub async fn list_organizations(&self) -> ServiceResult<Vec<Organization>> {
        Ok(self.store.list_organizations().await?)
    }

    pub async fn organization_by_slug(&self, slug: &str) -> ServiceResult<Option<Organization>> {
        Ok(self.store.find_organization_by_slug(slug).await?)
    }

    /// Resolves the project scope of a listing
    ///
    /// Returns `None` when the explicit slug names no organization, which
    /// callers turn into an empty result.
    async fn project_scope(
        &self,
        ctx: &TenantContext,
        organization_slug: Option<&str>,
    ) -> ServiceResult<Option<ProjectFilter>> {
        if let Some(tenant_id) = ctx.organization_id() {
            return Ok(Some(ProjectFilter::organization(tenant_id)));
        }

        match organization_slug.filter(|slug| !slug.is_empty()) {
            Some(slug) => {
                let org = self.store.find_organization_by_slug(slug).await?;
                if org.is_none() {
                    debug!(slug, "Unknown organization slug in project scope");
                }
                Ok(org.map(|org| ProjectFilter::organization(org.id)))
            }
            None => Ok(Some(ProjectFilter::all())),
        }
    }

    /// Projects visible to the request, newest first
    pub async fn list_projects(
        &self,
        ctx: &TenantContext,
        organization_slug: Option<&str>,
    ) -> ServiceResult<Vec<Project>> {
        match self.project_scope(ctx, organization_slug).await? {
            Some(filter) => Ok(self.store.list_projects(filter).await?),
            None => Ok(Vec::new()),
        }
    }

    /// A single project; `None` when missing or owned by another tenant
    pub async fn project(&self, ctx: &TenantContext, id: i64) -> ServiceResult<Option<Project>> {
        let project = self.store.find_project(id).await?;
        Ok(project.filter(|p| {
            let visible = is_visible(ctx, p.organization_id);
            if !visible {
                debug!(project_id = id, "Project hidden from tenant");
            }
            visible
        }))
    }

    /// Tasks visible to the request, optionally of one project
    pub async fn list_tasks(
        &self,
        ctx: &TenantContext,
        project_id: Option<i64>,
    ) -> ServiceResult<Vec<Task>> {
        let filter = TaskFilter {
            project_id,
            organization_id: ctx.organization_id(),
        };
        Ok(self.store.list_tasks(filter).await?)
    }

    /// A single task; `None` when missing or owned by another tenant
    pub async fn task(&self, ctx: &TenantContext, id: i64) -> ServiceResult<Option<Task>> {
        let Some(task) = self.store.find_task(id).await? else {
            return Ok(None);
        };

        if !ctx.is_scoped() {
            return Ok(Some(task));
        }

        match task_owner(self.store.as_ref(), &task).await? {
            Some(owner) if is_visible(ctx, owner) => Ok(Some(task)),
            _ => {
                debug!(task_id = id, "Task hidden from tenant");
                Ok(None)
            }
        }
    }

    /// Comments of a task, newest first; empty when the task is not visible
    pub async fn list_task_comments(
        &self,
        ctx: &TenantContext,
        task_id: i64,
    ) -> ServiceResult<Vec<TaskComment>> {
        if ctx.is_scoped() && self.task(ctx, task_id).await?.is_none() {
            return Ok(Vec::new());
        }
        Ok(self.store.list_comments(task_id).await?)
    }

    /// Aggregate project and task counts over the scoped project set
    pub async fn project_stats(
        &self,
        ctx: &TenantContext,
        organization_slug: Option<&str>,
    ) -> ServiceResult<ProjectStats> {
        let Some(filter) = self.project_scope(ctx, organization_slug).await? else {
            return Ok(ProjectStats::default());
        };

        let projects = self.store.count_projects(filter).await?;
        let tasks = self
            .store
            .count_tasks(TaskFilter {
                project_id: None,
                organization_id: filter.organization_id,
            })
            .await?;

        Ok(ProjectStats::from_counts(projects, tasks))
    }

    pub async fn project_task_counts(&self, project_id: i64) -> ServiceResult<TaskCounts> {
        Ok(self.store.count_tasks(TaskFilter::project(project_id)).await?)
    }

    pub async fn task_comment_count(&self, task_id: i64) -> ServiceResult<i64> {
        Ok(self.store.count_comments(task_id).await?)
    }

    // Relation lookups behind nested fields. The parent was already
    // scope-checked, so these follow the ownership chain without a context.

    pub async fn organization_of(&self, project: &Project) -> ServiceResult<Option<Organization>> {
        Ok(self.store.find_organization(project.organization_id).await?)
    }

    pub async fn project_of(&self, task: &Task) -> ServiceResult<Option<Project>> {
        Ok(self.store.find_project(task.project_id).await?)
    }

    pub async fn task_of(&self, comment: &TaskComment) -> ServiceResult<Option<Task>> {
        Ok(self.store.find_task(comment.task_id).await?)
    }

    pub async fn projects_of_organization(
        &self,
        organization_id: i64,
    ) -> ServiceResult<Vec<Project>> {
        Ok(self
            .store
            .list_projects(ProjectFilter::organization(organization_id))
            .await?)
    }

    pub async fn tasks_of_project(&self, project_id: i64) -> ServiceResult<Vec<Task>> {
        Ok(self.store.list_tasks(TaskFilter::project(project_id)).await?)
    }

    pub async fn comments_of_task(&self, task_id: i64) -> ServiceResult<Vec<TaskComment>> {
        Ok(self.store.list_comments(task_id).await?)
    }
}
