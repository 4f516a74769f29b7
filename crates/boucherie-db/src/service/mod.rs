//! # Workflow Services
//!
//! One service per aggregate. Services own the transaction boundaries:
//! reads run straight on the pool, and the two multi-entity workflows
//! (sale recording, payment application) each run inside a single
//! transaction committed only after every step succeeded.

pub mod client;
pub mod credit;
pub mod dashboard;
pub mod order;
pub mod product;
pub mod sale;

use thiserror::Error;

use crate::error::DbError;
use boucherie_core::CoreError;

/// Errors surfaced by the workflow services: either a business-rule
/// violation from the core or a storage failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl ServiceError {
    /// Whether this error means a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            ServiceError::Core(e) => e.is_not_found(),
            ServiceError::Storage(e) => matches!(e, DbError::NotFound { .. }),
        }
    }
}

impl From<boucherie_core::ValidationError> for ServiceError {
    fn from(err: boucherie_core::ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

// Raw sqlx failures (commits, ad-hoc aggregate queries) surface as
// storage errors, through the same mapping the repositories use.
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Storage(DbError::from(err))
    }
}

/// Convenience type alias for Results with ServiceError.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================
