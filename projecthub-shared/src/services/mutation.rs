/// Access-scoped write operations
///
/// Each mutation that touches an existing project, task or comment loads the
/// target, walks its ownership chain to the organization and checks it
/// against the [`TenantContext`] before anything is written. Input is
/// validated with `validator` after the ownership check.

use chrono::NaiveDate;
use tracing::{info, warn};
use validator::Validate;

use crate::access::{require_ownership, AccessDenied, TenantContext};
use crate::models::organization::SLUG_MAX_LEN;
use crate::models::{
    CreateOrganization, CreateProject, CreateTask, CreateTaskComment, Organization, Project,
    ProjectStatus, Task, TaskComment, TaskStatus, UpdateProject, UpdateTask,
};
use crate::store::SharedStore;

use super::error::{ServiceError, ServiceResult};
use super::task_owner;

/// Arguments of `create_project`
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Used only when the request has no tenant
    pub organization_slug: Option<String>,
}

/// Arguments of `update_project`; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Arguments of `create_task`
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignee_email: Option<String>,
}

/// Arguments of `update_task`; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assignee_email: Option<String>,
}

/// Parses a project status name such as `ON_HOLD`
pub fn parse_project_status(value: &str) -> ServiceResult<ProjectStatus> {
    ProjectStatus::parse(value).ok_or_else(|| {
        ServiceError::Validation(format!(
            "Invalid project status '{}'; expected one of ACTIVE, COMPLETED, ON_HOLD",
            value
        ))
    })
}

/// Parses a task status name such as `IN_PROGRESS`
pub fn parse_task_status(value: &str) -> ServiceResult<TaskStatus> {
    TaskStatus::parse(value).ok_or_else(|| {
        ServiceError::Validation(format!(
            "Invalid task status '{}'; expected one of TODO, IN_PROGRESS, DONE",
            value
        ))
    })
}

/// Write side of the entity graph
#[derive(Clone)]
pub struct MutationService {
    store: SharedStore,
}

impl MutationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Creates an organization with a slug derived from its name
    pub async fn create_organization(&self, data: CreateOrganization) -> ServiceResult<Organization> {
        data.validate()?;
        let slug = data.resolved_slug();
        if slug.is_empty() {
            return Err(ServiceError::Validation(
                "Slug must contain at least one letter or digit".to_string(),
            ));
        }
        if slug.len() > SLUG_MAX_LEN {
            return Err(ServiceError::Validation(format!(
                "Slug must be at most {} characters",
                SLUG_MAX_LEN
            )));
        }

        let org = self.store.create_organization(data).await?;
        info!(organization_id = org.id, slug = %org.slug, "Organization created");
        Ok(org)
    }

    /// Creates a project in the tenant's organization, or the one named by slug
    pub async fn create_project(
        &self,
        ctx: &TenantContext,
        input: NewProject,
    ) -> ServiceResult<Project> {
        let slug = input.organization_slug.as_deref().filter(|slug| !slug.is_empty());
        let organization_id = match (ctx.organization_id(), slug) {
            (Some(tenant_id), _) => tenant_id,
            (None, Some(slug)) => {
                self.store
                    .find_organization_by_slug(slug)
                    .await?
                    .ok_or(ServiceError::NotFound("Organization"))?
                    .id
            }
            (None, None) => return Err(ServiceError::OrganizationRequired),
        };

        let data = CreateProject {
            organization_id,
            name: input.name,
            description: input.description.unwrap_or_default(),
            due_date: input.due_date,
        };
        data.validate()?;

        let project = self.store.create_project(data).await?;
        info!(
            project_id = project.id,
            organization_id,
            "Project created"
        );
        Ok(project)
    }

    /// Applies the provided fields to a project the tenant owns
    pub async fn update_project(
        &self,
        ctx: &TenantContext,
        id: i64,
        changes: ProjectChanges,
    ) -> ServiceResult<Project> {
        let project = self
            .store
            .find_project(id)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;
        require_ownership(ctx, project.organization_id).map_err(denied)?;

        let update = UpdateProject {
            name: changes.name,
            description: changes.description,
            status: changes.status.as_deref().map(parse_project_status).transpose()?,
            due_date: changes.due_date,
        };
        update.validate()?;

        let project = self
            .store
            .update_project(id, update)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;
        info!(project_id = id, status = project.status.as_str(), "Project updated");
        Ok(project)
    }

    /// Creates a task under a project the tenant owns
    pub async fn create_task(&self, ctx: &TenantContext, input: NewTask) -> ServiceResult<Task> {
        let project = self
            .store
            .find_project(input.project_id)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;
        require_ownership(ctx, project.organization_id).map_err(denied)?;

        let data = CreateTask {
            project_id: project.id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            assignee_email: input.assignee_email.unwrap_or_default(),
            due_date: None,
        };
        data.validate()?;

        let task = self.store.create_task(data).await?;
        info!(task_id = task.id, project_id = project.id, "Task created");
        Ok(task)
    }

    /// Applies the provided fields to a task the tenant owns
    pub async fn update_task(
        &self,
        ctx: &TenantContext,
        id: i64,
        changes: TaskChanges,
    ) -> ServiceResult<Task> {
        let task = self
            .store
            .find_task(id)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;
        self.require_task_ownership(ctx, &task).await?;

        let update = UpdateTask {
            title: changes.title,
            description: changes.description,
            status: changes.status.as_deref().map(parse_task_status).transpose()?,
            assignee_email: changes.assignee_email,
        };
        update.validate()?;

        let task = self
            .store
            .update_task(id, update)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;
        info!(task_id = id, status = task.status.as_str(), "Task updated");
        Ok(task)
    }

    /// Adds a comment to a task the tenant owns
    pub async fn add_task_comment(
        &self,
        ctx: &TenantContext,
        data: CreateTaskComment,
    ) -> ServiceResult<TaskComment> {
        let task = self
            .store
            .find_task(data.task_id)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;
        self.require_task_ownership(ctx, &task).await?;
        data.validate()?;

        let comment = self.store.create_comment(data).await?;
        info!(comment_id = comment.id, task_id = task.id, "Comment added");
        Ok(comment)
    }

    async fn require_task_ownership(&self, ctx: &TenantContext, task: &Task) -> ServiceResult<()> {
        if !ctx.is_scoped() {
            return Ok(());
        }
        let owner = task_owner(self.store.as_ref(), task)
            .await?
            .ok_or(ServiceError::NotFound("Project"))?;
        require_ownership(ctx, owner).map_err(denied)?;
        Ok(())
    }
}

fn denied(err: AccessDenied) -> ServiceError {
    warn!(
        owner_organization_id = err.owner_organization_id,
        tenant_organization_id = err.tenant_organization_id,
        "Cross-tenant write rejected"
    );
    ServiceError::AccessDenied(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityStore, MemoryStore};
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryStore>, MutationService) {
        let store = Arc::new(MemoryStore::new());
        let service = MutationService::new(store.clone());
        (store, service)
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_project_status("ON_HOLD").unwrap(), ProjectStatus::OnHold);
        assert_eq!(parse_task_status("DONE").unwrap(), TaskStatus::Done);
        assert_eq!(parse_task_status("FINISHED").unwrap_err().code(), "VALIDATION");
    }

    #[tokio::test]
    async fn test_create_organization_derives_slug() {
        let (_, service) = setup().await;
        let org = service
            .create_organization(CreateOrganization::new("Site Redesign Co", "ops@site.test"))
            .await
            .unwrap();
        assert_eq!(org.slug, "site-redesign-co");
    }

    #[tokio::test]
    async fn test_create_organization_rejects_symbol_only_name() {
        let (_, service) = setup().await;
        let err = service
            .create_organization(CreateOrganization::new("!!!", "ops@site.test"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
    }

    #[tokio::test]
    async fn test_create_organization_normalizes_explicit_slug() {
        let (_, service) = setup().await;
        let mut data = CreateOrganization::new("Acme", "ops@acme.test");
        data.slug = Some("Not A Slug/../x?".to_string());

        let org = service.create_organization(data).await.unwrap();
        assert_eq!(org.slug, "not-a-slug-x");
    }

    #[tokio::test]
    async fn test_create_organization_rejects_overlong_slug() {
        let (store, service) = setup().await;
        let err = service
            .create_organization(CreateOrganization::new("Æ".repeat(100), "ops@ae.test"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION");
        assert!(store.list_organizations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_project_requires_organization() {
        let (_, service) = setup().await;
        let input = NewProject {
            name: "Orphan".to_string(),
            ..Default::default()
        };
        let err = service
            .create_project(&TenantContext::Unscoped, input)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::OrganizationRequired));
    }

    #[tokio::test]
    async fn test_create_project_unknown_slug() {
        let (_, service) = setup().await;
        let input = NewProject {
            name: "Orphan".to_string(),
            organization_slug: Some("nobody".to_string()),
            ..Default::default()
        };
        let err = service
            .create_project(&TenantContext::Unscoped, input)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Organization not found");
    }

    #[tokio::test]
    async fn test_create_project_tenant_wins_over_slug() {
        let (_, service) = setup().await;
        let acme = service
            .create_organization(CreateOrganization::new("Acme", "ops@acme.test"))
            .await
            .unwrap();
        service
            .create_organization(CreateOrganization::new("Globex", "ops@globex.test"))
            .await
            .unwrap();

        let input = NewProject {
            name: "Website".to_string(),
            organization_slug: Some("globex".to_string()),
            ..Default::default()
        };
        let project = service
            .create_project(&TenantContext::scoped(acme.clone()), input)
            .await
            .unwrap();
        assert_eq!(project.organization_id, acme.id);
        assert_eq!(project.description, "");
    }

    #[tokio::test]
    async fn test_update_project_rejects_unknown_status() {
        let (store, service) = setup().await;
        let org = service
            .create_organization(CreateOrganization::new("Acme", "ops@acme.test"))
            .await
            .unwrap();
        let project = store
            .create_project(CreateProject::new(org.id, "Website"))
            .await
            .unwrap();

        let changes = ProjectChanges {
            status: Some("ARCHIVED".to_string()),
            ..Default::default()
        };
        let err = service
            .update_project(&TenantContext::Unscoped, project.id, changes)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "VALIDATION");

        let stored = store.find_project(project.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::Active);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let (_, service) = setup().await;
        let err = service
            .update_task(&TenantContext::Unscoped, 404, TaskChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Task not found");
    }
}
