/// Organization model
///
/// Organizations are the tenancy boundary of ProjectHub. Every project belongs
/// to exactly one organization, and deleting an organization cascades to its
/// projects, their tasks and those tasks' comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     slug VARCHAR(100) NOT NULL,
///     contact_email VARCHAR(254) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT organizations_name_key UNIQUE (name),
///     CONSTRAINT organizations_slug_key UNIQUE (slug)
/// );
/// ```
///
/// # Example
///
/// ```
/// use projecthub_shared::models::organization::CreateOrganization;
///
/// let data = CreateOrganization::new("Acme Corp", "ops@acme.test");
/// assert_eq!(data.resolved_slug(), "acme-corp");
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Unique constraint on `organizations.name`
pub const NAME_UNIQUE_CONSTRAINT: &str = "organizations_name_key";

/// Unique constraint on `organizations.slug`
pub const SLUG_UNIQUE_CONSTRAINT: &str = "organizations_slug_key";

/// Longest slug the `organizations.slug` column holds
pub const SLUG_MAX_LEN: usize = 100;

/// Organization (tenant) owning a set of projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Organization {
    /// Primary key
    pub id: i64,

    /// Display name, unique across organizations
    pub name: String,

    /// URL-safe identifier used for tenant resolution
    pub slug: String,

    /// Contact address for the organization
    pub contact_email: String,

    /// When the organization was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganization {
    /// Organization name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Explicit slug; derived from `name` when absent or blank
    #[validate(length(max = 100, message = "Slug must be at most 100 characters"))]
    pub slug: Option<String>,

    /// Contact email
    #[validate(email(message = "Contact email must be a valid email address"))]
    pub contact_email: String,
}

impl CreateOrganization {
    /// Creates input with a slug derived from the name
    pub fn new(name: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            contact_email: contact_email.into(),
        }
    }

    /// Returns the slug that will be stored for this organization
    ///
    /// An explicit non-blank slug wins over the name. Either source goes
    /// through [`derive_slug`], so the stored slug is always URL-safe.
    pub fn resolved_slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => derive_slug(slug),
            _ => derive_slug(&self.name),
        }
    }
}

/// Derives a URL-safe slug from an organization name
///
/// Lowercases, transliterates to ASCII and joins words with `-`.
pub fn derive_slug(name: &str) -> String {
    slug::slugify(name)
}
