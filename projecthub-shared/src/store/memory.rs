/// In-memory entity store
///
/// Keeps every table in a single `RwLock` so each operation is atomic with
/// respect to the others, the same guarantee a single-statement commit gives
/// the PostgreSQL store. Constraint names match the schema so callers can
/// treat both backends alike.
///
/// Used by the test suites and by `store.backend = "memory"` development runs.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{EntityStore, ProjectFilter, StoreError, StoreResult, TaskFilter};
use crate::models::{
    organization, project, CreateOrganization, CreateProject, CreateTask, CreateTaskComment,
    Organization, Project, ProjectCounts, ProjectStatus, Task, TaskComment, TaskCounts,
    TaskStatus, UpdateProject, UpdateTask,
};

const PROJECT_ORGANIZATION_FKEY: &str = "projects_organization_id_fkey";
const TASK_PROJECT_FKEY: &str = "tasks_project_id_fkey";
const COMMENT_TASK_FKEY: &str = "task_comments_task_id_fkey";

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    organizations: BTreeMap<i64, Organization>,
    projects: BTreeMap<i64, Project>,
    tasks: BTreeMap<i64, Task>,
    comments: BTreeMap<i64, TaskComment>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn project_in_scope(&self, project: &Project, filter: ProjectFilter) -> bool {
        filter
            .organization_id
            .map_or(true, |org_id| project.organization_id == org_id)
    }

    fn task_in_scope(&self, task: &Task, filter: TaskFilter) -> bool {
        if filter.project_id.is_some_and(|id| task.project_id != id) {
            return false;
        }
        match filter.organization_id {
            Some(org_id) => self
                .projects
                .get(&task.project_id)
                .is_some_and(|project| project.organization_id == org_id),
            None => true,
        }
    }

    fn remove_task_cascade(&mut self, task_id: i64) -> bool {
        let removed = self.tasks.remove(&task_id).is_some();
        if removed {
            self.comments.retain(|_, comment| comment.task_id != task_id);
        }
        removed
    }

    fn remove_project_cascade(&mut self, project_id: i64) -> bool {
        if self.projects.remove(&project_id).is_none() {
            return false;
        }
        let task_ids: Vec<i64> = self
            .tasks
            .values()
            .filter(|task| task.project_id == project_id)
            .map(|task| task.id)
            .collect();
        for task_id in task_ids {
            self.remove_task_cascade(task_id);
        }
        true
    }

    fn project_name_taken(&self, organization_id: i64, name: &str, except: Option<i64>) -> bool {
        self.projects.values().any(|project| {
            project.organization_id == organization_id
                && project.name == name
                && Some(project.id) != except
        })
    }
}

/// Newest first, id breaking ties between rows created in the same instant
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// Entity store holding all rows in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        debug!("Memory store closed");
    }

    async fn create_organization(&self, data: CreateOrganization) -> StoreResult<Organization> {
        let slug = data.resolved_slug();
        let mut tables = self.tables.write().await;

        if tables.organizations.values().any(|org| org.name == data.name) {
            return Err(StoreError::UniqueViolation(
                organization::NAME_UNIQUE_CONSTRAINT.to_string(),
            ));
        }
        if tables.organizations.values().any(|org| org.slug == slug) {
            return Err(StoreError::UniqueViolation(
                organization::SLUG_UNIQUE_CONSTRAINT.to_string(),
            ));
        }

        let organization = Organization {
            id: tables.allocate_id(),
            name: data.name,
            slug,
            contact_email: data.contact_email,
            created_at: Utc::now(),
        };
        tables
            .organizations
            .insert(organization.id, organization.clone());

        Ok(organization)
    }

    async fn find_organization(&self, id: i64) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let tables = self.tables.read().await;
        Ok(tables
            .organizations
            .values()
            .find(|org| org.slug == slug)
            .cloned())
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let tables = self.tables.read().await;
        let mut organizations: Vec<Organization> = tables.organizations.values().cloned().collect();
        organizations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(organizations)
    }

    async fn delete_organization(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.organizations.remove(&id).is_none() {
            return Ok(false);
        }

        let project_ids: Vec<i64> = tables
            .projects
            .values()
            .filter(|project| project.organization_id == id)
            .map(|project| project.id)
            .collect();
        for project_id in project_ids {
            tables.remove_project_cascade(project_id);
        }

        Ok(true)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        if !tables.organizations.contains_key(&data.organization_id) {
            return Err(StoreError::ForeignKeyViolation(
                PROJECT_ORGANIZATION_FKEY.to_string(),
            ));
        }
        if tables.project_name_taken(data.organization_id, &data.name, None) {
            return Err(StoreError::UniqueViolation(
                project::NAME_UNIQUE_CONSTRAINT.to_string(),
            ));
        }

        let now = Utc::now();
        let project = Project {
            id: tables.allocate_id(),
            organization_id: data.organization_id,
            name: data.name,
            status: ProjectStatus::default(),
            description: data.description,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.projects.insert(project.id, project.clone());

        Ok(project)
    }

    async fn find_project(&self, id: i64) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self, filter: ProjectFilter) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|project| tables.project_in_scope(project, filter))
            .cloned()
            .collect();
        newest_first(&mut projects, |p| (p.created_at, p.id));
        Ok(projects)
    }

    async fn count_projects(&self, filter: ProjectFilter) -> StoreResult<ProjectCounts> {
        let tables = self.tables.read().await;
        let mut counts = ProjectCounts::default();
        for project in tables
            .projects
            .values()
            .filter(|project| tables.project_in_scope(project, filter))
        {
            counts.total += 1;
            match project.status {
                ProjectStatus::Active => counts.active += 1,
                ProjectStatus::Completed => counts.completed += 1,
                ProjectStatus::OnHold => {}
            }
        }
        Ok(counts)
    }

    async fn update_project(&self, id: i64, data: UpdateProject) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        let Some(organization_id) = tables.projects.get(&id).map(|p| p.organization_id) else {
            return Ok(None);
        };
        if let Some(name) = &data.name {
            if tables.project_name_taken(organization_id, name, Some(id)) {
                return Err(StoreError::UniqueViolation(
                    project::NAME_UNIQUE_CONSTRAINT.to_string(),
                ));
            }
        }

        let Some(project) = tables.projects.get_mut(&id) else {
            return Ok(None);
        };
        data.apply_to(project);
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_project_cascade(id))
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;

        if !tables.projects.contains_key(&data.project_id) {
            return Err(StoreError::ForeignKeyViolation(TASK_PROJECT_FKEY.to_string()));
        }

        let now = Utc::now();
        let task = Task {
            id: tables.allocate_id(),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: TaskStatus::default(),
            assignee_email: data.assignee_email,
            due_date: data.due_date,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: i64) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| tables.task_in_scope(task, filter))
            .cloned()
            .collect();
        newest_first(&mut tasks, |t| (t.created_at, t.id));
        Ok(tasks)
    }

    async fn count_tasks(&self, filter: TaskFilter) -> StoreResult<TaskCounts> {
        let tables = self.tables.read().await;
        let mut counts = TaskCounts::default();
        for task in tables
            .tasks
            .values()
            .filter(|task| tables.task_in_scope(task, filter))
        {
            counts.total += 1;
            if task.status == TaskStatus::Done {
                counts.completed += 1;
            }
        }
        Ok(counts)
    }

    async fn update_task(&self, id: i64, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(None);
        };
        data.apply_to(task);
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.remove_task_cascade(id))
    }

    async fn create_comment(&self, data: CreateTaskComment) -> StoreResult<TaskComment> {
        let mut tables = self.tables.write().await;

        if !tables.tasks.contains_key(&data.task_id) {
            return Err(StoreError::ForeignKeyViolation(COMMENT_TASK_FKEY.to_string()));
        }

        let comment = TaskComment {
            id: tables.allocate_id(),
            task_id: data.task_id,
            content: data.content,
            author_email: data.author_email,
            timestamp: Utc::now(),
        };
        tables.comments.insert(comment.id, comment.clone());

        Ok(comment)
    }

    async fn list_comments(&self, task_id: i64) -> StoreResult<Vec<TaskComment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<TaskComment> = tables
            .comments
            .values()
            .filter(|comment| comment.task_id == task_id)
            .cloned()
            .collect();
        newest_first(&mut comments, |c| (c.timestamp, c.id));
        Ok(comments)
    }

    async fn count_comments(&self, task_id: i64) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|comment| comment.task_id == task_id)
            .count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_unique_across_tables() {
        let store = MemoryStore::new();
        let org = store
            .create_organization(CreateOrganization::new("Acme", "ops@acme.test"))
            .await
            .unwrap();
        let project = store
            .create_project(CreateProject {
                organization_id: org.id,
                name: "Site Redesign".to_string(),
                description: String::new(),
                due_date: None,
            })
            .await
            .unwrap();

        assert_ne!(org.id, project.id);
        assert_eq!(project.status, ProjectStatus::Active);
    }

    #[tokio::test]
    async fn test_create_project_requires_organization() {
        let store = MemoryStore::new();
        let result = store
            .create_project(CreateProject {
                organization_id: 42,
                name: "Orphan".to_string(),
                description: String::new(),
                due_date: None,
            })
            .await;

        assert!(matches!(result, Err(StoreError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_rows() {
        let store = MemoryStore::new();
        assert!(store
            .update_project(7, UpdateProject::default())
            .await
            .unwrap()
            .is_none());
        assert!(store
            .update_task(7, UpdateTask::default())
            .await
            .unwrap()
            .is_none());
    }
}
