/// Per-request tenant context
///
/// The tenant resolver middleware builds one `TenantContext` per request and
/// hands it to every query and mutation as an explicit argument. It is never
/// mutated after resolution.
///
/// # Example
///
/// ```
/// use projecthub_shared::access::TenantContext;
///
/// let ctx = TenantContext::Unscoped;
/// assert!(!ctx.is_scoped());
/// assert!(ctx.owns(42));
/// ```

use serde::{Deserialize, Serialize};

use crate::models::Organization;

/// The organization a request acts on behalf of, if any
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "organization", rename_all = "lowercase")]
pub enum TenantContext {
    /// No organization identifier was supplied, or the route is not tenant-scoped
    #[default]
    Unscoped,

    /// The request is scoped to this organization
    Organization(Organization),
}

impl TenantContext {
    /// Context scoped to `organization`
    pub fn scoped(organization: Organization) -> Self {
        TenantContext::Organization(organization)
    }

    /// The resolved organization
    pub fn organization(&self) -> Option<&Organization> {
        match self {
            TenantContext::Unscoped => None,
            TenantContext::Organization(org) => Some(org),
        }
    }

    /// ID of the resolved organization
    pub fn organization_id(&self) -> Option<i64> {
        self.organization().map(|org| org.id)
    }

    /// True when an organization was resolved
    pub fn is_scoped(&self) -> bool {
        matches!(self, TenantContext::Organization(_))
    }

    /// Whether an entity owned by `organization_id` is inside this tenant
    ///
    /// An unscoped context owns everything.
    pub fn owns(&self, organization_id: i64) -> bool {
        self.organization_id()
            .map_or(true, |tenant_id| tenant_id == organization_id)
    }
}
