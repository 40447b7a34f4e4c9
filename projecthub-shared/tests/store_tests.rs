/// Entity store contract tests
///
/// Each scenario runs against the in-memory store and, when a database is
/// available, against PostgreSQL:
/// cargo test --test store_tests -- --include-ignored --test-threads=1

mod common;

use common::{memory_store, postgres_store, seed_two_tenants};
use projecthub_shared::models::{
    CreateOrganization, CreateProject, CreateTask, CreateTaskComment, ProjectStatus, TaskStatus,
    UpdateProject, UpdateTask,
};
use projecthub_shared::store::{EntityStore, ProjectFilter, StoreError, TaskFilter};

async fn slug_is_derived_and_unique(store: &dyn EntityStore) {
    let org = store
        .create_organization(CreateOrganization::new("Site Redesign Co", "ops@site.test"))
        .await
        .unwrap();
    assert_eq!(org.slug, "site-redesign-co");

    let found = store.find_organization_by_slug("site-redesign-co").await.unwrap();
    assert_eq!(found, Some(org));

    let err = store
        .create_organization(CreateOrganization::new("Site Redesign Co", "other@site.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(c) if c == "organizations_name_key"));

    // Different name, same derived slug
    let err = store
        .create_organization(CreateOrganization::new("site redesign co", "other@site.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(c) if c == "organizations_slug_key"));
}

async fn project_names_unique_per_organization(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;

    // Same name in another organization is fine (seeded), same organization is not
    let err = store
        .create_project(CreateProject::new(tenants.acme.id, "Site Redesign"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(c) if c == "projects_organization_id_name_key"));

    let other = store
        .create_project(CreateProject::new(tenants.acme.id, "Mobile App"))
        .await
        .unwrap();
    let rename = UpdateProject {
        name: Some("Site Redesign".to_string()),
        ..Default::default()
    };
    let err = store.update_project(other.id, rename).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation(_)));
}

async fn missing_parent_is_rejected(store: &dyn EntityStore) {
    let err = store
        .create_project(CreateProject::new(999_999, "Orphan"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKeyViolation(_)));

    let err = store
        .create_comment(CreateTaskComment::new(999_999, "Hello", "dev@acme.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKeyViolation(_)));
}

async fn partial_update_keeps_other_fields(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;
    let before = tenants.acme_project.clone();

    let update = UpdateProject {
        status: Some(ProjectStatus::Completed),
        ..Default::default()
    };
    let after = store.update_project(before.id, update).await.unwrap().unwrap();

    assert_eq!(after.status, ProjectStatus::Completed);
    assert_eq!(after.name, before.name);
    assert_eq!(after.description, before.description);
    assert_eq!(after.due_date, before.due_date);
    assert_eq!(after.organization_id, before.organization_id);
    assert!(after.updated_at >= before.updated_at);

    let update = UpdateTask {
        assignee_email: Some("dana@acme.test".to_string()),
        ..Default::default()
    };
    let task = store
        .update_task(tenants.acme_task.id, update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.assignee_email, "dana@acme.test");
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.title, "Wireframes");

    assert!(store
        .update_project(999_999, UpdateProject::default())
        .await
        .unwrap()
        .is_none());
}

async fn delete_cascades_from_organization(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;
    let comment = store
        .create_comment(CreateTaskComment::new(
            tenants.acme_task.id,
            "Draft attached",
            "dana@acme.test",
        ))
        .await
        .unwrap();
    assert_eq!(comment.task_id, tenants.acme_task.id);

    assert!(store.delete_organization(tenants.acme.id).await.unwrap());

    assert!(store.find_project(tenants.acme_project.id).await.unwrap().is_none());
    assert!(store.find_task(tenants.acme_task.id).await.unwrap().is_none());
    assert_eq!(store.count_comments(tenants.acme_task.id).await.unwrap(), 0);

    // The other tenant is untouched
    assert!(store.find_project(tenants.globex_project.id).await.unwrap().is_some());
    assert!(store.find_task(tenants.globex_task.id).await.unwrap().is_some());

    assert!(!store.delete_organization(tenants.acme.id).await.unwrap());
}

async fn delete_cascades_from_project(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;
    let second = store
        .create_task(CreateTask::new(tenants.acme_project.id, "Copy"))
        .await
        .unwrap();
    store
        .create_comment(CreateTaskComment::new(second.id, "Outline", "dana@acme.test"))
        .await
        .unwrap();

    assert!(store.delete_project(tenants.acme_project.id).await.unwrap());

    assert!(store.find_project(tenants.acme_project.id).await.unwrap().is_none());
    assert!(store.find_task(tenants.acme_task.id).await.unwrap().is_none());
    assert!(store.find_task(second.id).await.unwrap().is_none());
    assert_eq!(store.count_comments(second.id).await.unwrap(), 0);

    // The organization and the other tenant survive
    assert!(store.find_organization(tenants.acme.id).await.unwrap().is_some());
    assert!(store.find_task(tenants.globex_task.id).await.unwrap().is_some());

    assert!(!store.delete_project(tenants.acme_project.id).await.unwrap());
}

async fn delete_cascades_from_task(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;
    let sibling = store
        .create_task(CreateTask::new(tenants.acme_project.id, "Copy"))
        .await
        .unwrap();
    for task_id in [tenants.acme_task.id, sibling.id] {
        store
            .create_comment(CreateTaskComment::new(task_id, "Noted", "dana@acme.test"))
            .await
            .unwrap();
    }

    assert!(store.delete_task(tenants.acme_task.id).await.unwrap());

    assert!(store.find_task(tenants.acme_task.id).await.unwrap().is_none());
    assert!(store.list_comments(tenants.acme_task.id).await.unwrap().is_empty());
    assert_eq!(store.count_comments(sibling.id).await.unwrap(), 1);
    assert!(store.find_project(tenants.acme_project.id).await.unwrap().is_some());

    assert!(!store.delete_task(tenants.acme_task.id).await.unwrap());
}

async fn counts_and_filters(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;

    let done = UpdateTask {
        status: Some(TaskStatus::Done),
        ..Default::default()
    };
    store.update_task(tenants.acme_task.id, done).await.unwrap();

    let acme_only = TaskFilter {
        project_id: None,
        organization_id: Some(tenants.acme.id),
    };
    let counts = store.count_tasks(acme_only).await.unwrap();
    assert_eq!(counts.total, 1);
    assert_eq!(counts.completed, 1);

    let all = store.count_tasks(TaskFilter::default()).await.unwrap();
    assert_eq!(all.total, 2);
    assert_eq!(all.completed, 1);

    let projects = store.count_projects(ProjectFilter::all()).await.unwrap();
    assert_eq!(projects.total, 2);
    assert_eq!(projects.active, 2);
    assert_eq!(projects.completed, 0);

    let listed = store
        .list_tasks(TaskFilter::project(tenants.globex_project.id))
        .await
        .unwrap();
    assert_eq!(listed, vec![tenants.globex_task.clone()]);
}

async fn listings_are_ordered(store: &dyn EntityStore) {
    let tenants = seed_two_tenants(store).await;

    let names: Vec<String> = store
        .list_organizations()
        .await
        .unwrap()
        .into_iter()
        .map(|org| org.name)
        .collect();
    assert_eq!(names, vec!["Acme".to_string(), "Globex".to_string()]);

    let newer = store
        .create_project(CreateProject::new(tenants.acme.id, "Mobile App"))
        .await
        .unwrap();
    let projects = store
        .list_projects(ProjectFilter::organization(tenants.acme.id))
        .await
        .unwrap();
    assert_eq!(projects.first().map(|p| p.id), Some(newer.id));
    assert_eq!(projects.len(), 2);

    let newer_task = store
        .create_task(CreateTask::new(tenants.acme_project.id, "Copy"))
        .await
        .unwrap();
    let task_ids: Vec<i64> = store
        .list_tasks(TaskFilter::project(tenants.acme_project.id))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(task_ids, vec![newer_task.id, tenants.acme_task.id]);

    let first = store
        .create_comment(CreateTaskComment::new(tenants.acme_task.id, "First", "dana@acme.test"))
        .await
        .unwrap();
    let second = store
        .create_comment(CreateTaskComment::new(tenants.acme_task.id, "Second", "dana@acme.test"))
        .await
        .unwrap();
    let comment_ids: Vec<i64> = store
        .list_comments(tenants.acme_task.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(comment_ids, vec![second.id, first.id]);
}

macro_rules! store_contract {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test]
                async fn $name() {
                    let store = super::memory_store();
                    super::$name(store.as_ref()).await;
                }
            )*
        }

        mod postgres {
            $(
                #[tokio::test]
                #[ignore = "requires PostgreSQL (DATABASE_URL)"]
                async fn $name() {
                    let store = super::postgres_store().await;
                    super::$name(store.as_ref()).await;
                    store.close().await;
                }
            )*
        }
    };
}

store_contract!(
    slug_is_derived_and_unique,
    project_names_unique_per_organization,
    missing_parent_is_rejected,
    partial_update_keeps_other_fields,
    delete_cascades_from_organization,
    delete_cascades_from_project,
    delete_cascades_from_task,
    counts_and_filters,
    listings_are_ordered,
);
