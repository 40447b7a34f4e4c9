/// PostgreSQL entity store
///
/// Uniqueness, foreign keys and cascades are enforced by the schema in
/// `migrations/`; this module maps rows to models and constraint failures to
/// [`StoreError`].
///
/// # Example
///
/// ```no_run
/// use projecthub_shared::db::pool::{create_pool, DatabaseConfig};
/// use projecthub_shared::models::CreateOrganization;
/// use projecthub_shared::store::{EntityStore, PgStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
///
/// let org = store
///     .create_organization(CreateOrganization::new("Acme", "ops@acme.test"))
///     .await?;
/// assert_eq!(org.slug, "acme");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{EntityStore, ProjectFilter, StoreResult, TaskFilter};
use crate::db::pool::{close_pool, health_check, pool_stats, PoolStats};
use crate::models::{
    CreateOrganization, CreateProject, CreateTask, CreateTaskComment, Organization, Project,
    ProjectCounts, Task, TaskComment, TaskCounts, UpdateProject, UpdateTask,
};

/// Entity store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(pool_stats(&self.pool))
    }

    async fn health_check(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        close_pool(self.pool.clone()).await;
    }

    async fn create_organization(&self, data: CreateOrganization) -> StoreResult<Organization> {
        let slug = data.resolved_slug();
        debug!(name = %data.name, slug = %slug, "Inserting organization");

        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (name, slug, contact_email)
            VALUES ($1, $2, $3)
            RETURNING id, name, slug, contact_email, created_at
            "#,
        )
        .bind(data.name)
        .bind(slug)
        .bind(data.contact_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_organization(&self, id: i64) -> StoreResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, contact_email, created_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, contact_email, created_at
            FROM organizations
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let organizations = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, slug, contact_email, created_at
            FROM organizations
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    async fn delete_organization(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (organization_id, name, description, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, organization_id, name, status, description, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.organization_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, organization_id, name, status, description, due_date,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(&self, filter: ProjectFilter) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, organization_id, name, status, description, due_date,
                   created_at, updated_at
            FROM projects
            WHERE ($1::BIGINT IS NULL OR organization_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn count_projects(&self, filter: ProjectFilter) -> StoreResult<ProjectCounts> {
        let (total, active, completed): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'ACTIVE'),
                   COUNT(*) FILTER (WHERE status = 'COMPLETED')
            FROM projects
            WHERE ($1::BIGINT IS NULL OR organization_id = $1)
            "#,
        )
        .bind(filter.organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ProjectCounts {
            total,
            active,
            completed,
        })
    }

    async fn update_project(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, organization_id, name, status, description, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let project = q.fetch_optional(&self.pool).await?;

        Ok(project)
    }

    async fn delete_project(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (project_id, title, description, assignee_email, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, project_id, title, description, status, assignee_email, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.assignee_email)
        .bind(data.due_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, project_id, title, description, status, assignee_email, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.status, t.assignee_email,
                   t.due_date, t.created_at, t.updated_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE ($1::BIGINT IS NULL OR t.project_id = $1)
              AND ($2::BIGINT IS NULL OR p.organization_id = $2)
            ORDER BY t.created_at DESC, t.id DESC
            "#,
        )
        .bind(filter.project_id)
        .bind(filter.organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<TaskCounts> {
        let (total, completed): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE t.status = 'DONE')
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE ($1::BIGINT IS NULL OR t.project_id = $1)
              AND ($2::BIGINT IS NULL OR p.organization_id = $2)
            "#,
        )
        .bind(filter.project_id)
        .bind(filter.organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskCounts { total, completed })
    }

    async fn update_task(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.assignee_email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_email = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, project_id, title, description, status, assignee_email, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(assignee_email) = data.assignee_email {
            q = q.bind(assignee_email);
        }

        let task = q.fetch_optional(&self.pool).await?;

        Ok(task)
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_comment(&self, data: CreateTaskComment) -> StoreResult<TaskComment> {
        let comment = sqlx::query_as::<_, TaskComment>(
            r#"
            INSERT INTO task_comments (task_id, content, author_email)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, content, author_email, "timestamp"
            "#,
        )
        .bind(data.task_id)
        .bind(data.content)
        .bind(data.author_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, task_id: i64) -> StoreResult<Vec<TaskComment>> {
        let comments = sqlx::query_as::<_, TaskComment>(
            r#"
            SELECT id, task_id, content, author_email, "timestamp"
            FROM task_comments
            WHERE task_id = $1
            ORDER BY "timestamp" DESC, id DESC
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn count_comments(&self, task_id: i64) -> StoreResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM task_comments WHERE task_id = $1")
                .bind(task_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
