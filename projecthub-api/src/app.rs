/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use projecthub_api::{app::{build_router, AppState}, config::Config};
/// use projecthub_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, graphql, middleware::tenant::resolve_tenant, routes};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use projecthub_shared::{
    services::{MutationService, QueryService},
    store::SharedStore,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Entity store backing both services
    pub store: SharedStore,

    /// Read service, also used by the tenant resolver
    pub query: QueryService,

    /// GraphQL schema
    pub schema: graphql::AppSchema,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: SharedStore, config: Config) -> Self {
        let query = QueryService::new(store.clone());
        let schema = graphql::build_schema(query.clone(), MutationService::new(store.clone()));

        Self {
            store,
            query,
            schema,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /                 # API info
/// ├── GET  /health           # Store health
/// └── <graphql_path>[/]      # POST GraphQL, GET GraphiQL
/// ```
///
/// The tenant resolver runs on every route; it only resolves below the
/// GraphQL path.
pub fn build_router(state: AppState) -> Router {
    let graphql_path = state.config.api.graphql_path.clone();

    let graphql_route: MethodRouter<AppState> = if state.config.api.graphiql {
        get(graphql::graphiql).post(graphql::graphql_handler)
    } else {
        post(graphql::graphql_handler)
    };

    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                HeaderName::from_static(crate::middleware::tenant::ORGANIZATION_HEADER),
            ])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/", get(routes::info::api_info))
        .route("/health", get(routes::health::health_check))
        .route(&graphql_path, graphql_route.clone())
        .route(&format!("{}/", graphql_path), graphql_route)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_tenant,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
