/// Query root
///
/// Thin resolvers over [`QueryService`]; every call passes the request's
/// tenant. Unparseable IDs resolve to an absent result.

use async_graphql::{Context, Object, Result, ID};
use projecthub_shared::services::QueryService;

use super::error::{parse_id, service_error};
use super::tenant;
use super::types::{
    OrganizationType, ProjectStatsType, ProjectType, TaskCommentType, TaskType,
};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All organizations, alphabetical
    async fn organizations(&self, ctx: &Context<'_>) -> Result<Vec<OrganizationType>> {
        let query = ctx.data::<QueryService>()?;
        let organizations = query.list_organizations().await.map_err(service_error)?;
        Ok(organizations.into_iter().map(OrganizationType).collect())
    }

    async fn organization(&self, ctx: &Context<'_>, slug: String) -> Result<Option<OrganizationType>> {
        let query = ctx.data::<QueryService>()?;
        let organization = query.organization_by_slug(&slug).await.map_err(service_error)?;
        Ok(organization.map(OrganizationType))
    }

    /// Projects of the tenant, or of `organizationSlug` when unscoped
    async fn projects(
        &self,
        ctx: &Context<'_>,
        organization_slug: Option<String>,
    ) -> Result<Vec<ProjectType>> {
        let query = ctx.data::<QueryService>()?;
        let projects = query
            .list_projects(tenant(ctx), organization_slug.as_deref())
            .await
            .map_err(service_error)?;
        Ok(projects.into_iter().map(ProjectType).collect())
    }

    async fn project(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ProjectType>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };

        let query = ctx.data::<QueryService>()?;
        let project = query.project(tenant(ctx), id).await.map_err(service_error)?;
        Ok(project.map(ProjectType))
    }

    async fn tasks(&self, ctx: &Context<'_>, project_id: Option<ID>) -> Result<Vec<TaskType>> {
        let project_id = match project_id {
            Some(id) => match parse_id(&id) {
                Some(id) => Some(id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let query = ctx.data::<QueryService>()?;
        let tasks = query
            .list_tasks(tenant(ctx), project_id)
            .await
            .map_err(service_error)?;
        Ok(tasks.into_iter().map(TaskType).collect())
    }

    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskType>> {
        let Some(id) = parse_id(&id) else {
            return Ok(None);
        };

        let query = ctx.data::<QueryService>()?;
        let task = query.task(tenant(ctx), id).await.map_err(service_error)?;
        Ok(task.map(TaskType))
    }

    async fn task_comments(&self, ctx: &Context<'_>, task_id: ID) -> Result<Vec<TaskCommentType>> {
        let Some(task_id) = parse_id(&task_id) else {
            return Ok(Vec::new());
        };

        let query = ctx.data::<QueryService>()?;
        let comments = query
            .list_task_comments(tenant(ctx), task_id)
            .await
            .map_err(service_error)?;
        Ok(comments.into_iter().map(TaskCommentType).collect())
    }

    async fn project_stats(
        &self,
        ctx: &Context<'_>,
        organization_slug: Option<String>,
    ) -> Result<ProjectStatsType> {
        let query = ctx.data::<QueryService>()?;
        let stats = query
            .project_stats(tenant(ctx), organization_slug.as_deref())
            .await
            .map_err(service_error)?;
        Ok(stats.into())
    }
}
