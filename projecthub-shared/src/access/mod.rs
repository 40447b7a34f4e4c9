/// Tenant scoping and ownership checks
///
/// - `context`: the per-request [`TenantContext`]
/// - `authorization`: ownership checks along comment → task → project → organization
///
/// Reads and writes treat a mismatch differently: reads hide the entity
/// (see [`authorization::is_visible`]), writes fail loudly
/// (see [`authorization::require_ownership`]).

pub mod authorization;
pub mod context;

pub use authorization::{is_visible, require_ownership, AccessDenied};
pub use context::TenantContext;
