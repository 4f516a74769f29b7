//! # boucherie-core: Pure Business Logic for the Boucherie Ledger
//!
//! This crate is the heart of the ledger: the business rules that turn a
//! sale into a financial record split between cash and credit, track a
//! credit's lifecycle through partial payments, and keep a client's
//! aggregate outstanding-credit balance consistent with the per-credit
//! ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 ★ boucherie-core (THIS CRATE) ★                 │
//! │                                                                 │
//! │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │
//! │   │   types   │  │   money   │  │   error   │  │ validation│  │
//! │   │  Client   │  │   Money   │  │ CoreError │  │   rules   │  │
//! │   │  Credit   │  │  Weight   │  │           │  │  checks   │  │
//! │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │
//! │                                                                 │
//! │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │
//! └─────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼─────────────────────────────────┐
//! │                 boucherie-db (Database Layer)                   │
//! │         SQLite queries, migrations, workflow services           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no side effects
//! 2. **Integer Money**: all amounts are cents (i64), all weights grams (i64)
//! 3. **Explicit Errors**: typed errors via `thiserror`, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Weight};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier of the distinguished walk-in client.
///
/// Sales may reference this client without it ever having been registered;
/// it is seeded at initialization and re-provisioned on first use if absent.
/// Every other unknown client reference is an error.
pub const WALKIN_CLIENT_ID: &str = "anonymous";

/// Display name of the walk-in client.
pub const WALKIN_CLIENT_NAME: &str = "Client de passage";
