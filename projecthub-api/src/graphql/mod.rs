/// GraphQL surface
///
/// An async-graphql schema whose resolvers delegate to the shared query and
/// mutation services. The tenant resolved by the middleware travels as
/// request data and is read back with [`tenant`].
///
/// # Endpoints
///
/// ```text
/// POST <graphql_path>    # execute a GraphQL request
/// GET  <graphql_path>    # GraphiQL page (when enabled)
/// ```

use async_graphql::{http::GraphiQLSource, Context, EmptySubscription, Schema};
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Extension, Json,
};
use projecthub_shared::access::TenantContext;
use projecthub_shared::services::{MutationService, QueryService};
use tracing::debug;

use crate::app::AppState;

pub mod error;
pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

/// Complete ProjectHub schema
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Maximum selection depth accepted by the schema
pub const MAX_QUERY_DEPTH: usize = 12;

static UNSCOPED: TenantContext = TenantContext::Unscoped;

/// Builds the schema with both services as schema data
pub fn build_schema(query: QueryService, mutation: MutationService) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(query)
        .data(mutation)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

/// Tenant of the current request, `Unscoped` when none was attached
pub fn tenant<'a>(ctx: &Context<'a>) -> &'a TenantContext {
    ctx.data_opt::<TenantContext>().unwrap_or(&UNSCOPED)
}

/// Executes a GraphQL request in the request's tenant scope
pub async fn graphql_handler(
    State(state): State<AppState>,
    tenant: Option<Extension<TenantContext>>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    let tenant = tenant.map(|Extension(tenant)| tenant).unwrap_or_default();
    debug!(
        operation = request.operation_name.as_deref().unwrap_or("anonymous"),
        organization_id = ?tenant.organization_id(),
        "Executing GraphQL request"
    );

    Json(state.schema.execute(request.data(tenant)).await)
}

/// Serves the GraphiQL explorer pointed at the configured endpoint
pub async fn graphiql(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint(&state.config.api.graphql_path)
            .finish(),
    )
}
