//! Typed error handling for the order and invoice pipeline
//!
//! Every fallible operation in the crate returns [`TavolaError`], so the HTTP
//! boundary can render a failure without guessing at its class.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed input or failed schema constraints (400)
//! - [`TavolaError::NotFound`]: the requested record does not exist (404)
//! - [`TavolaError::Aggregation`]: an invoice's order produced no aggregate row
//! - [`TavolaError::Dependency`]: a joined lookup failed at the store level
//! - [`TavolaError::Timeout`]: a store call exceeded its deadline
//! - [`StorageError`]: generic persistence failures (query, insert, update)
//!
//! Missing joined records (food, order, table) are never errors: the
//! aggregator degrades them to empty fields.
//!
//! # Example
//!
//! ```rust,ignore
//! match projector.project("inv-1").await {
//!     Ok(view) => println!("due: {}", view.payment_due),
//!     Err(TavolaError::NotFound { id, .. }) => println!("no invoice {}", id),
//!     Err(e) => eprintln!("{} ({})", e, e.status_code()),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, TavolaError>;

/// The main error type
#[derive(Debug, Error)]
pub enum TavolaError {
    /// Malformed input or failed schema constraints
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced record is absent
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The order behind an invoice produced no aggregate row
    #[error("order '{order_id}' has no order items to aggregate")]
    Aggregation { order_id: String },

    /// A joined lookup failed at the store level (distinct from "absent")
    #[error("dependency lookup for order '{order_id}' failed: {source}")]
    Dependency {
        order_id: String,
        #[source]
        source: Box<TavolaError>,
    },

    /// Store call exceeded its deadline
    #[error("{operation} on '{collection}' exceeded the {}s deadline", .after.as_secs())]
    Timeout {
        operation: &'static str,
        collection: String,
        after: Duration,
    },

    /// Persistence failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TavolaError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TavolaError::Validation(_) => StatusCode::BAD_REQUEST,
            TavolaError::NotFound { .. } => StatusCode::NOT_FOUND,
            TavolaError::Aggregation { .. }
            | TavolaError::Dependency { .. }
            | TavolaError::Timeout { .. }
            | TavolaError::Storage(_)
            | TavolaError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TavolaError::Validation(e) => e.error_code(),
            TavolaError::NotFound { .. } => "NOT_FOUND",
            TavolaError::Aggregation { .. } => "AGGREGATION_ERROR",
            TavolaError::Dependency { .. } => "DEPENDENCY_ERROR",
            TavolaError::Timeout { .. } => "TIMEOUT",
            TavolaError::Storage(e) => e.error_code(),
            TavolaError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether a caller may safely retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, TavolaError::Timeout { .. })
    }

    /// Build a not-found error for an entity kind
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        TavolaError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            TavolaError::NotFound { entity, id } => Some(serde_json::json!({
                "entity": entity,
                "id": id,
            })),
            TavolaError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            TavolaError::Validation(ValidationError::UnknownReference { entity, id }) => {
                Some(serde_json::json!({ "entity": entity, "id": id }))
            }
            TavolaError::Timeout { after, .. } => Some(serde_json::json!({
                "deadline_secs": after.as_secs(),
                "retryable": true,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for TavolaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field-level failure
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldErrorDetail {
    pub field: String,
    pub message: String,
}

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One field failed a constraint
    #[error("Validation failed for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Several fields failed constraints
    #[error("Validation failed: {}", .0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect::<Vec<_>>().join(", "))]
    FieldErrors(Vec<FieldErrorDetail>),

    /// Request body could not be decoded
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// A referenced record does not exist
    #[error("{entity} '{id}' does not exist")]
    UnknownReference { entity: &'static str, id: String },
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldError { .. } | ValidationError::FieldErrors(_) => {
                "VALIDATION_ERROR"
            }
            ValidationError::InvalidBody { .. } => "INVALID_BODY",
            ValidationError::UnknownReference { .. } => "UNKNOWN_REFERENCE",
        }
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_field_errors(&errors, "", &mut details);
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(details)
    }
}

fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<FieldErrorDetail>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                for failure in failures {
                    let message = failure
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| failure.code.to_string());
                    out.push(FieldErrorDetail {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl From<validator::ValidationErrors> for TavolaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TavolaError::Validation(errors.into())
    }
}

impl From<JsonRejection> for TavolaError {
    fn from(rejection: JsonRejection) -> Self {
        TavolaError::Validation(ValidationError::InvalidBody {
            message: rejection.body_text(),
        })
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the record store
#[derive(Debug, Error)]
pub enum StorageError {
    /// Could not reach the backend
    #[error("Connection to {backend} failed: {message}")]
    Connection { backend: String, message: String },

    /// Find or aggregate failed
    #[error("Query on '{collection}' failed: {message}")]
    Query { collection: String, message: String },

    /// Insert failed
    #[error("Insert into '{collection}' failed: {message}")]
    Insert { collection: String, message: String },

    /// Update failed
    #[error("Update of '{collection}' failed: {message}")]
    Update { collection: String, message: String },

    /// Record could not be encoded or decoded
    #[error("Failed to serialize/deserialize {collection} record: {message}")]
    Serialization { collection: String, message: String },
}

impl StorageError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Connection { .. } => "STORE_CONNECTION_ERROR",
            StorageError::Query { .. } => "QUERY_ERROR",
            StorageError::Insert { .. } => "INSERT_ERROR",
            StorageError::Update { .. } => "UPDATE_ERROR",
            StorageError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }
}
