/// Mutation root
///
/// Each mutation returns a payload object wrapping the written entity, e.g.
/// `createProject { project { id } }`. Ownership checks and validation live
/// in [`MutationService`].

use async_graphql::{Context, Object, Result, ID};
use chrono::NaiveDate;
use projecthub_shared::models::{CreateOrganization, CreateTaskComment};
use projecthub_shared::services::{
    MutationService, NewProject, NewTask, ProjectChanges, TaskChanges,
};

use super::error::{require_id, service_error};
use super::tenant;
use super::types::{
    AddTaskCommentPayload, CreateOrganizationPayload, CreateProjectPayload, CreateTaskPayload,
    OrganizationType, ProjectType, TaskCommentType, TaskType, UpdateProjectPayload,
    UpdateTaskPayload,
};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_organization(
        &self,
        ctx: &Context<'_>,
        name: String,
        contact_email: String,
    ) -> Result<CreateOrganizationPayload> {
        let mutation = ctx.data::<MutationService>()?;
        let organization = mutation
            .create_organization(CreateOrganization::new(name, contact_email))
            .await
            .map_err(service_error)?;

        Ok(CreateOrganizationPayload {
            organization: OrganizationType(organization),
        })
    }

    async fn create_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: Option<String>,
        due_date: Option<NaiveDate>,
        organization_slug: Option<String>,
    ) -> Result<CreateProjectPayload> {
        let mutation = ctx.data::<MutationService>()?;
        let input = NewProject {
            name,
            description,
            due_date,
            organization_slug,
        };
        let project = mutation
            .create_project(tenant(ctx), input)
            .await
            .map_err(service_error)?;

        Ok(CreateProjectPayload {
            project: ProjectType(project),
        })
    }

    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        status: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<UpdateProjectPayload> {
        let id = require_id(&id, "Project")?;
        let mutation = ctx.data::<MutationService>()?;
        let changes = ProjectChanges {
            name,
            description,
            status,
            due_date,
        };
        let project = mutation
            .update_project(tenant(ctx), id, changes)
            .await
            .map_err(service_error)?;

        Ok(UpdateProjectPayload {
            project: ProjectType(project),
        })
    }

    async fn create_task(
        &self,
        ctx: &Context<'_>,
        project_id: ID,
        title: String,
        description: Option<String>,
        assignee_email: Option<String>,
    ) -> Result<CreateTaskPayload> {
        let project_id = require_id(&project_id, "Project")?;
        let mutation = ctx.data::<MutationService>()?;
        let input = NewTask {
            project_id,
            title,
            description,
            assignee_email,
        };
        let task = mutation
            .create_task(tenant(ctx), input)
            .await
            .map_err(service_error)?;

        Ok(CreateTaskPayload {
            task: TaskType(task),
        })
    }

    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        description: Option<String>,
        status: Option<String>,
        assignee_email: Option<String>,
    ) -> Result<UpdateTaskPayload> {
        let id = require_id(&id, "Task")?;
        let mutation = ctx.data::<MutationService>()?;
        let changes = TaskChanges {
            title,
            description,
            status,
            assignee_email,
        };
        let task = mutation
            .update_task(tenant(ctx), id, changes)
            .await
            .map_err(service_error)?;

        Ok(UpdateTaskPayload {
            task: TaskType(task),
        })
    }

    async fn add_task_comment(
        &self,
        ctx: &Context<'_>,
        task_id: ID,
        content: String,
        author_email: String,
    ) -> Result<AddTaskCommentPayload> {
        let task_id = require_id(&task_id, "Task")?;
        let mutation = ctx.data::<MutationService>()?;
        let comment = mutation
            .add_task_comment(
                tenant(ctx),
                CreateTaskComment::new(task_id, content, author_email),
            )
            .await
            .map_err(service_error)?;

        Ok(AddTaskCommentPayload {
            comment: TaskCommentType(comment),
        })
    }
}
