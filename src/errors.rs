use sea_orm::error::{DbErr, SqlErr};
use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced by the persistence services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Referential integrity violation: {0}")]
    ReferentialIntegrity(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let detail = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                parts.push(format!("{}: {}", field, detail));
            }
        }
        // Field iteration order is not stable; sort for deterministic messages.
        parts.sort();
        ServiceError::Validation(parts.join("; "))
    }
}

/// True when the error is a unique-constraint violation involving `column`.
///
/// Both SQLite ("UNIQUE constraint failed: products.slug") and Postgres
/// ("products_slug_key") name the column in the violation message.
pub fn is_unique_violation(err: &DbErr, column: &str) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains(column)
    )
}

/// True when the error is a foreign-key constraint violation.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
    }

    #[test]
    fn validation_errors_carry_field_names() {
        let probe = Probe {
            name: String::new(),
        };
        let err: ServiceError = probe.validate().unwrap_err().into();
        match err {
            ServiceError::Validation(msg) => {
                assert!(msg.contains("name"));
                assert!(msg.contains("must not be empty"));
            }
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn plain_db_errors_are_not_unique_violations() {
        let err = DbErr::Custom("boom".to_string());
        assert!(!is_unique_violation(&err, "slug"));
        assert!(!is_foreign_key_violation(&err));
    }
}
