/// GraphQL object types
///
/// Each type wraps a shared model. Nested relations and derived counts are
/// resolved lazily through the [`QueryService`] in the schema data.

use async_graphql::{Context, Enum, Object, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use projecthub_shared::models::{
    Organization, Project, ProjectStats, ProjectStatus, Task, TaskComment, TaskStatus,
};
use projecthub_shared::services::QueryService;

use super::error::service_error;
use super::tenant;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "ProjectStatus")]
pub enum ProjectStatusType {
    Active,
    Completed,
    OnHold,
}

impl From<ProjectStatus> for ProjectStatusType {
    fn from(status: ProjectStatus) -> Self {
        match status {
            ProjectStatus::Active => ProjectStatusType::Active,
            ProjectStatus::Completed => ProjectStatusType::Completed,
            ProjectStatus::OnHold => ProjectStatusType::OnHold,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(name = "TaskStatus")]
pub enum TaskStatusType {
    Todo,
    InProgress,
    Done,
}

impl From<TaskStatus> for TaskStatusType {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Todo => TaskStatusType::Todo,
            TaskStatus::InProgress => TaskStatusType::InProgress,
            TaskStatus::Done => TaskStatusType::Done,
        }
    }
}

pub struct OrganizationType(pub Organization);

#[Object(name = "Organization")]
impl OrganizationType {
    async fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn contact_email(&self) -> &str {
        &self.0.contact_email
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    /// Projects of this organization, empty when it is not the request's tenant
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<ProjectType>> {
        if !tenant(ctx).owns(self.0.id) {
            return Ok(Vec::new());
        }

        let query = ctx.data::<QueryService>()?;
        let projects = query
            .projects_of_organization(self.0.id)
            .await
            .map_err(service_error)?;
        Ok(projects.into_iter().map(ProjectType).collect())
    }
}

pub struct ProjectType(pub Project);

#[Object(name = "Project")]
impl ProjectType {
    async fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn status(&self) -> ProjectStatusType {
        self.0.status.into()
    }

    async fn due_date(&self) -> Option<NaiveDate> {
        self.0.due_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn organization(&self, ctx: &Context<'_>) -> Result<Option<OrganizationType>> {
        let query = ctx.data::<QueryService>()?;
        let organization = query.organization_of(&self.0).await.map_err(service_error)?;
        Ok(organization.map(OrganizationType))
    }

    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<TaskType>> {
        let query = ctx.data::<QueryService>()?;
        let tasks = query.tasks_of_project(self.0.id).await.map_err(service_error)?;
        Ok(tasks.into_iter().map(TaskType).collect())
    }

    async fn task_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let query = ctx.data::<QueryService>()?;
        let counts = query.project_task_counts(self.0.id).await.map_err(service_error)?;
        Ok(counts.total)
    }

    async fn completed_task_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let query = ctx.data::<QueryService>()?;
        let counts = query.project_task_counts(self.0.id).await.map_err(service_error)?;
        Ok(counts.completed)
    }

    /// Percentage of DONE tasks, 0 when the project has none
    async fn completion_rate(&self, ctx: &Context<'_>) -> Result<f64> {
        let query = ctx.data::<QueryService>()?;
        let counts = query.project_task_counts(self.0.id).await.map_err(service_error)?;
        Ok(counts.completion_rate())
    }
}

pub struct TaskType(pub Task);

#[Object(name = "Task")]
impl TaskType {
    async fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn description(&self) -> &str {
        &self.0.description
    }

    async fn status(&self) -> TaskStatusType {
        self.0.status.into()
    }

    async fn assignee_email(&self) -> &str {
        &self.0.assignee_email
    }

    async fn due_date(&self) -> Option<DateTime<Utc>> {
        self.0.due_date
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    async fn project(&self, ctx: &Context<'_>) -> Result<Option<ProjectType>> {
        let query = ctx.data::<QueryService>()?;
        let project = query.project_of(&self.0).await.map_err(service_error)?;
        Ok(project.map(ProjectType))
    }

    async fn comments(&self, ctx: &Context<'_>) -> Result<Vec<TaskCommentType>> {
        let query = ctx.data::<QueryService>()?;
        let comments = query.comments_of_task(self.0.id).await.map_err(service_error)?;
        Ok(comments.into_iter().map(TaskCommentType).collect())
    }

    async fn comment_count(&self, ctx: &Context<'_>) -> Result<i64> {
        let query = ctx.data::<QueryService>()?;
        query.task_comment_count(self.0.id).await.map_err(service_error)
    }
}

pub struct TaskCommentType(pub TaskComment);

#[Object(name = "TaskComment")]
impl TaskCommentType {
    async fn id(&self) -> ID {
        ID::from(self.0.id.to_string())
    }

    async fn content(&self) -> &str {
        &self.0.content
    }

    async fn author_email(&self) -> &str {
        &self.0.author_email
    }

    async fn timestamp(&self) -> DateTime<Utc> {
        self.0.timestamp
    }

    async fn task(&self, ctx: &Context<'_>) -> Result<Option<TaskType>> {
        let query = ctx.data::<QueryService>()?;
        let task = query.task_of(&self.0).await.map_err(service_error)?;
        Ok(task.map(TaskType))
    }
}

#[derive(SimpleObject)]
#[graphql(name = "ProjectStats")]
pub struct ProjectStatsType {
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub overall_completion_rate: f64,
}

impl From<ProjectStats> for ProjectStatsType {
    fn from(stats: ProjectStats) -> Self {
        Self {
            total_projects: stats.total_projects,
            active_projects: stats.active_projects,
            completed_projects: stats.completed_projects,
            total_tasks: stats.total_tasks,
            completed_tasks: stats.completed_tasks,
            overall_completion_rate: stats.overall_completion_rate,
        }
    }
}

// Mutation payloads, named after the mutations that return them.

#[derive(SimpleObject)]
#[graphql(name = "CreateOrganization")]
pub struct CreateOrganizationPayload {
    pub organization: OrganizationType,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateProject")]
pub struct CreateProjectPayload {
    pub project: ProjectType,
}

#[derive(SimpleObject)]
#[graphql(name = "UpdateProject")]
pub struct UpdateProjectPayload {
    pub project: ProjectType,
}

#[derive(SimpleObject)]
#[graphql(name = "CreateTask")]
pub struct CreateTaskPayload {
    pub task: TaskType,
}

#[derive(SimpleObject)]
#[graphql(name = "UpdateTask")]
pub struct UpdateTaskPayload {
    pub task: TaskType,
}

#[derive(SimpleObject)]
#[graphql(name = "AddTaskComment")]
pub struct AddTaskCommentPayload {
    pub comment: TaskCommentType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProjectStatusType::from(ProjectStatus::OnHold), ProjectStatusType::OnHold);
        assert_eq!(TaskStatusType::from(TaskStatus::InProgress), TaskStatusType::InProgress);
    }

    #[test]
    fn test_stats_conversion() {
        let stats = ProjectStats {
            total_projects: 2,
            active_projects: 1,
            completed_projects: 1,
            total_tasks: 4,
            completed_tasks: 2,
            overall_completion_rate: 50.0,
        };
        let converted = ProjectStatsType::from(stats);
        assert_eq!(converted.total_tasks, 4);
        assert_eq!(converted.overall_completion_rate, 50.0);
    }
}
