/// Error type shared by the query and mutation services
///
/// | Variant                | Code                    | Raised when                                         |
/// |------------------------|-------------------------|-----------------------------------------------------|
/// | `NotFound`             | `NOT_FOUND`             | a mutation references a missing entity              |
/// | `AccessDenied`         | `ACCESS_DENIED`         | a mutation targets another tenant's entity          |
/// | `Validation`           | `VALIDATION`            | bad input, unknown status, uniqueness conflict      |
/// | `OrganizationRequired` | `ORGANIZATION_REQUIRED` | a project is created with no organization to own it |
/// | `Store`                | `INTERNAL_ERROR`        | the store failed                                    |

use validator::ValidationErrors;

use crate::access::AccessDenied;
use crate::models::{organization, project};
use crate::store::StoreError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Domain error returned by the services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Entity exists but belongs to another organization
    #[error("Access denied")]
    AccessDenied(#[from] AccessDenied),

    /// Input rejected
    #[error("{0}")]
    Validation(String),

    /// No tenant and no explicit organization for a new project
    #[error("Organization is required")]
    OrganizationRequired,

    /// Store failure
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl ServiceError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::AccessDenied(_) => "ACCESS_DENIED",
            ServiceError::Validation(_) => "VALIDATION",
            ServiceError::OrganizationRequired => "ORGANIZATION_REQUIRED",
            ServiceError::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// True for failures the caller did not cause
    pub fn is_internal(&self) -> bool {
        matches!(self, ServiceError::Store(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                ServiceError::Validation(unique_violation_message(&constraint).to_string())
            }
            StoreError::ForeignKeyViolation(constraint) => {
                ServiceError::NotFound(missing_parent(&constraint))
            }
            err @ StoreError::Database(_) => ServiceError::Store(err),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid ({})", field, e.code),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages.join("; "))
    }
}

fn unique_violation_message(constraint: &str) -> &'static str {
    match constraint {
        organization::NAME_UNIQUE_CONSTRAINT => "Organization with this name already exists",
        organization::SLUG_UNIQUE_CONSTRAINT => "Organization with this slug already exists",
        project::NAME_UNIQUE_CONSTRAINT => {
            "Project with this name already exists in the organization"
        }
        _ => "Duplicate value",
    }
}

fn missing_parent(constraint: &str) -> &'static str {
    if constraint.starts_with("projects_") {
        "Organization"
    } else if constraint.starts_with("tasks_") {
        "Project"
    } else if constraint.starts_with("task_comments_") {
        "Task"
    } else {
        "Referenced entity"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_codes() {
        assert_eq!(ServiceError::NotFound("Project").code(), "NOT_FOUND");
        assert_eq!(ServiceError::Validation("x".into()).code(), "VALIDATION");
        assert_eq!(ServiceError::OrganizationRequired.code(), "ORGANIZATION_REQUIRED");
        let denied = AccessDenied {
            owner_organization_id: 2,
            tenant_organization_id: 1,
        };
        assert_eq!(ServiceError::from(denied).code(), "ACCESS_DENIED");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ServiceError::NotFound("Project").to_string(), "Project not found");
        assert_eq!(
            ServiceError::OrganizationRequired.to_string(),
            "Organization is required"
        );
    }

    #[test]
    fn test_unique_violation_becomes_validation() {
        let err = ServiceError::from(StoreError::UniqueViolation(
            project::NAME_UNIQUE_CONSTRAINT.to_string(),
        ));
        assert_eq!(err.code(), "VALIDATION");
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_foreign_key_violation_becomes_not_found() {
        let err = ServiceError::from(StoreError::ForeignKeyViolation(
            "tasks_project_id_fkey".to_string(),
        ));
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let data = crate::models::CreateOrganization::new("", "nope");
        let err = ServiceError::from(data.validate().unwrap_err());
        let message = err.to_string();
        assert!(message.contains("name: Name must be 1-100 characters"));
        assert!(message.contains("contact_email"));
    }

    #[test]
    fn test_store_error_is_internal() {
        let err = ServiceError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert!(err.is_internal());
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
