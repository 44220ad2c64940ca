//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures (per field)          │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  Server errors (in app)                                                │
//! │  └── ApiError         - What the client sees (status + JSON body)      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure carries enough context (entity, id, field, quantities) for
//! the client to show a structured reason, never a bare failure code.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised before any state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Not enough remaining stock to accept a sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sale entry: Widget × 71
    ///      │
    ///      ▼
    /// remaining = delivered − sold = 70
    ///      │
    ///      ▼
    /// InsufficientStock { product_name: "Widget", available: 70, requested: 71 }
    ///      │
    ///      ▼
    /// Whole sale rejected, no counters touched
    /// ```
    #[error("Insufficient stock for {product_name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// A due or cash amount is inconsistent with the sale it belongs to.
    #[error("Invalid {field}: {reason}")]
    InvalidAmount { field: String, reason: String },

    /// A purchase order was delivered a second time.
    #[error("Purchase order {order_id} has already been delivered")]
    AlreadyDelivered { order_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidAmount error for the given field.
    pub fn invalid_amount(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::InvalidAmount {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for malformed or out-of-range input. Each variant names the
/// offending field so the client can highlight it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid month).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
