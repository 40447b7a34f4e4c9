//! Common test utilities for API integration tests
//!
//! Builds the full router over a `MemoryStore` and drives it in-process
//! with `tower::ServiceExt::oneshot`; no network or database is involved.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use projecthub_api::app::{build_router, AppState};
use projecthub_api::config::{Config, StoreBackend};
use projecthub_api::middleware::tenant::ORGANIZATION_HEADER;
use projecthub_shared::models::{
    CreateOrganization, CreateProject, CreateTask, Organization, Project, Task,
};
use projecthub_shared::store::{EntityStore, MemoryStore, SharedStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Test context with two seeded tenants
pub struct TestContext {
    pub store: SharedStore,
    pub app: axum::Router,
    pub config: Config,
    pub acme: Organization,
    pub globex: Organization,
    pub acme_project: Project,
    pub globex_project: Project,
    pub globex_task: Task,
}

/// Response status with its JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// `extensions.code` of the first GraphQL error
    pub fn error_code(&self) -> Option<&str> {
        self.body["errors"][0]["extensions"]["code"].as_str()
    }

    pub fn has_errors(&self) -> bool {
        self.body
            .get("errors")
            .and_then(Value::as_array)
            .map_or(false, |errors| !errors.is_empty())
    }
}

impl TestContext {
    pub async fn new() -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;

        let store: SharedStore = Arc::new(MemoryStore::new());

        let acme = store
            .create_organization(CreateOrganization::new("Acme", "ops@acme.test"))
            .await?;
        let globex = store
            .create_organization(CreateOrganization::new("Globex", "ops@globex.test"))
            .await?;
        let acme_project = store
            .create_project(CreateProject::new(acme.id, "Site Redesign"))
            .await?;
        let globex_project = store
            .create_project(CreateProject::new(globex.id, "Site Redesign"))
            .await?;
        let globex_task = store
            .create_task(CreateTask::new(globex_project.id, "Wireframes"))
            .await?;

        let app = build_router(AppState::new(store.clone(), config.clone()));

        Ok(TestContext {
            store,
            app,
            config,
            acme,
            globex,
            acme_project,
            globex_project,
            globex_task,
        })
    }

    /// Sends a request through the router
    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<TestResponse> {
        let response = self.app.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok(TestResponse { status, body })
    }

    /// POSTs a GraphQL document to `uri`, optionally with the tenant header
    pub async fn graphql(
        &self,
        uri: &str,
        org_slug: Option<&str>,
        query: &str,
    ) -> anyhow::Result<TestResponse> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(slug) = org_slug {
            builder = builder.header(ORGANIZATION_HEADER, slug);
        }
        let request = builder.body(Body::from(json!({ "query": query }).to_string()))?;

        self.send(request).await
    }
}
