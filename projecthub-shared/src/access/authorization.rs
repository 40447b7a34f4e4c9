/// Ownership checks
///
/// Every project, task and comment belongs to exactly one organization through
/// its ownership chain. These helpers compare the chain's organization with the
/// request's [`TenantContext`].
///
/// - Read paths call [`is_visible`] and turn a mismatch into an absent result,
///   so a caller cannot probe for IDs owned by other tenants.
/// - Write paths call [`require_ownership`] and fail with [`AccessDenied`]
///   before anything is written.
///
/// # Example
///
/// ```
/// use projecthub_shared::access::{require_ownership, TenantContext};
///
/// // Unscoped requests may touch anything
/// assert!(require_ownership(&TenantContext::Unscoped, 7).is_ok());
/// ```

use super::context::TenantContext;

/// The target entity belongs to a different organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Access denied")]
pub struct AccessDenied {
    /// Organization that owns the entity
    pub owner_organization_id: i64,

    /// Organization the request is scoped to
    pub tenant_organization_id: i64,
}

/// Whether a read may return an entity owned by `owner_organization_id`
pub fn is_visible(ctx: &TenantContext, owner_organization_id: i64) -> bool {
    ctx.owns(owner_organization_id)
}

/// Fails unless a write may touch an entity owned by `owner_organization_id`
pub fn require_ownership(
    ctx: &TenantContext,
    owner_organization_id: i64,
) -> Result<(), AccessDenied> {
    match ctx.organization_id() {
        Some(tenant_id) if tenant_id != owner_organization_id => Err(AccessDenied {
            owner_organization_id,
            tenant_organization_id: tenant_id,
        }),
        _ => Ok(()),
    }
}
