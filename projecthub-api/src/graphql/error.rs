/// GraphQL error mapping
///
/// Service failures become GraphQL errors whose `extensions.code` is the
/// service error code. Store failures are logged and masked.

use async_graphql::{ErrorExtensions, ID};
use projecthub_shared::services::ServiceError;
use tracing::error;

/// Converts a service error into a GraphQL error with `extensions.code`
pub fn service_error(err: ServiceError) -> async_graphql::Error {
    let code = err.code();
    let message = if err.is_internal() {
        error!(error = %err, "GraphQL resolver failed");
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    async_graphql::Error::new(message).extend_with(|_, extensions| extensions.set("code", code))
}

/// Parses a GraphQL ID into a primary key
///
/// IDs that are not integers reference no entity.
pub fn parse_id(id: &ID) -> Option<i64> {
    id.parse::<i64>().ok()
}

/// Parses a GraphQL ID for a mutation, where a bad ID means `NOT_FOUND`
pub fn require_id(id: &ID, entity: &'static str) -> async_graphql::Result<i64> {
    parse_id(id).ok_or_else(|| service_error(ServiceError::NotFound(entity)))
}
