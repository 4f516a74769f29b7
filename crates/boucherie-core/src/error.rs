//! # Error Types
//!
//! Domain-specific error types for boucherie-core.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  CoreError      - business-rule violations                      │
//! │  ├── *NotFound      referenced entity does not exist            │
//! │  ├── InvalidRequest overpayment, malformed date, bad amount     │
//! │  └── InvalidState   operation not allowed in current lifecycle  │
//! │                                                                 │
//! │  ValidationError - structural input failures (wrapped)          │
//! │                                                                 │
//! │  DbError (boucherie-db) - storage failures, propagated as-is    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The core never retries or suppresses an error; multi-step operations
//! roll back cleanly and surface the failure to the caller.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and lifecycle failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced client does not exist (and is not the walk-in sentinel).
    #[error("client not found: {0}")]
    ClientNotFound(String),

    /// Referenced product does not exist; carries the missing id.
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// Referenced credit does not exist.
    #[error("credit not found: {0}")]
    CreditNotFound(String),

    /// Referenced order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// Referenced sale does not exist.
    #[error("sale not found: {0}")]
    SaleNotFound(String),

    /// Paid amount exceeds the computed sale total. Excess cash must be
    /// entered as an equal total, never as an over-payment.
    #[error("paid amount {paid_cents} exceeds sale total {total_cents}")]
    PaidExceedsTotal { paid_cents: i64, total_cents: i64 },

    /// Payment would take a credit's remaining amount below zero.
    #[error("payment {requested_cents} exceeds remaining amount {remaining_cents}")]
    PaymentExceedsRemaining {
        requested_cents: i64,
        remaining_cents: i64,
    },

    /// No payments are accepted on a settled credit.
    #[error("credit {0} is already fully paid")]
    CreditAlreadySettled(String),

    /// Structural validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Whether this error is a missing-entity reference.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ClientNotFound(_)
                | CoreError::ProductNotFound(_)
                | CoreError::CreditNotFound(_)
                | CoreError::OrderNotFound(_)
                | CoreError::SaleNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. a date that is not YYYY-MM-DD).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
