use std::fmt;

use storefront_core::{HttpError, ValidationErrorResponse};
use storefront_data::DataError;

/// Failures surfaced by the catalog, admin and order services.
#[derive(Debug)]
pub enum CatalogError {
    /// Malformed, missing or out-of-range input. Raised before any write.
    Validation(ValidationErrorResponse),
    NotFound(String),
    /// The operation would break a referential or uniqueness constraint.
    Conflict(String),
    /// The persistence layer failed. `context` names the operation
    /// ("fetch products"); the source is logged, never shown.
    Persistence {
        context: &'static str,
        source: DataError,
    },
}

impl CatalogError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        CatalogError::Validation(ValidationErrorResponse::single(field, message))
    }

    /// Wrap a gateway error. Not-found and conflict keep their meaning;
    /// everything else becomes an opaque persistence failure.
    pub fn from_data(context: &'static str, err: DataError) -> Self {
        match err {
            DataError::NotFound(msg) => CatalogError::NotFound(msg),
            DataError::Conflict(msg) => CatalogError::Conflict(msg),
            other => CatalogError::Persistence {
                context,
                source: other,
            },
        }
    }

    /// Message safe to show a client.
    pub fn public_message(&self) -> String {
        match self {
            CatalogError::Validation(resp) => resp.summary(),
            CatalogError::NotFound(msg) | CatalogError::Conflict(msg) => msg.clone(),
            CatalogError::Persistence { context, .. } => format!("Failed to {context}"),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(resp) => write!(f, "validation failed: {}", resp.summary()),
            CatalogError::NotFound(msg) => write!(f, "not found: {msg}"),
            CatalogError::Conflict(msg) => write!(f, "conflict: {msg}"),
            CatalogError::Persistence { context, source } => {
                write!(f, "failed to {context}: {source}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationErrorResponse> for CatalogError {
    fn from(resp: ValidationErrorResponse) -> Self {
        CatalogError::Validation(resp)
    }
}

impl From<CatalogError> for HttpError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(resp) => HttpError::Validation(resp),
            CatalogError::NotFound(msg) => HttpError::NotFound(msg),
            CatalogError::Conflict(msg) => HttpError::BadRequest(msg),
            CatalogError::Persistence { context, source } => {
                tracing::error!(error = %source, context, "persistence failure");
                HttpError::Internal(format!("Failed to {context}"))
            }
        }
    }
}

/// Extension for tagging gateway results with the operation they belong to.
pub(crate) trait DataResultExt<T> {
    fn context(self, context: &'static str) -> Result<T, CatalogError>;
}

impl<T> DataResultExt<T> for Result<T, DataError> {
    fn context(self, context: &'static str) -> Result<T, CatalogError> {
        self.map_err(|e| CatalogError::from_data(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_errors_hide_details() {
        let err = CatalogError::from_data(
            "fetch products",
            DataError::Other("disk I/O error at page 7".into()),
        );
        assert_eq!(err.public_message(), "Failed to fetch products");
        match HttpError::from(err) {
            HttpError::Internal(msg) => assert_eq!(msg, "Failed to fetch products"),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn conflict_maps_to_bad_request() {
        let err = CatalogError::from_data("create product", DataError::Conflict("dup".into()));
        assert!(matches!(HttpError::from(err), HttpError::BadRequest(_)));
    }
}
