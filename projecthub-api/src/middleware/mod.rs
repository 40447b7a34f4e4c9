/// Middleware modules for the API server
///
/// - `tenant`: resolves the organization slug into a `TenantContext`

pub mod tenant;
