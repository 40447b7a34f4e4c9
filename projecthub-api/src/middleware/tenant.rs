/// Tenant resolution middleware
///
/// Resolves the organization a request acts for and inserts a
/// [`TenantContext`] into the request extensions, the same way the GraphQL
/// handler later reads it back.
///
/// # Resolution rules
///
/// - Paths under `/admin/` or `/static/` pass through untouched.
/// - The slug comes from the `X-Organization-Slug` header, falling back to the
///   `org_slug` query parameter. Blank values count as absent.
/// - Only paths at or below the GraphQL endpoint are tenant-scoped. Elsewhere,
///   and whenever no slug is given, the context is `Unscoped`.
/// - An unknown slug on a scoped path short-circuits with
///   `404 {"error": "Organization not found", "code": "ORGANIZATION_NOT_FOUND"}`.
///
/// # Example
///
/// ```text
/// POST /graphql?org_slug=acme
/// X-Organization-Slug: globex        <- wins over the query parameter
/// ```

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use projecthub_shared::access::TenantContext;
use serde::Deserialize;
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Header carrying the organization slug
pub const ORGANIZATION_HEADER: &str = "x-organization-slug";

/// Query parameter consulted when the header is absent
pub const ORGANIZATION_QUERY_PARAM: &str = "org_slug";

/// Path prefixes that never take part in tenant resolution
pub const BYPASS_PREFIXES: [&str; 2] = ["/admin/", "/static/"];

#[derive(Debug, Deserialize)]
struct TenantQuery {
    org_slug: Option<String>,
}

/// Organization slug supplied with the request, header first
///
/// Whitespace-only values count as absent. Anything else is returned as
/// sent, so a padded slug matches no organization.
pub fn organization_slug(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(ORGANIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|slug| !slug.trim().is_empty());

    if let Some(slug) = from_header {
        return Some(slug.to_string());
    }

    Query::<TenantQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(query)| query.org_slug)
        .filter(|slug| !slug.trim().is_empty())
}

/// True for paths that skip resolution entirely
pub fn is_bypassed(path: &str) -> bool {
    BYPASS_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// True for the GraphQL endpoint and anything below it
pub fn is_tenant_scoped(path: &str, graphql_path: &str) -> bool {
    match path.strip_prefix(graphql_path) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Axum middleware resolving the request's tenant
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();
    if is_bypassed(path) {
        return Ok(next.run(req).await);
    }

    let tenant = match organization_slug(&req) {
        Some(slug) if is_tenant_scoped(path, &state.config.api.graphql_path) => {
            let organization = state
                .query
                .organization_by_slug(&slug)
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?
                .ok_or_else(|| ApiError::OrganizationNotFound(slug.clone()))?;

            debug!(organization_id = organization.id, slug = %slug, "Tenant resolved");
            TenantContext::scoped(organization)
        }
        _ => TenantContext::Unscoped,
    };

    req.extensions_mut().insert(tenant);
    Ok(next.run(req).await)
}
