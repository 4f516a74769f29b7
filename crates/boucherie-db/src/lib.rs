//! # boucherie-db: Persistence and Workflows for the Boucherie Ledger
//!
//! SQLite storage (via sqlx) plus the workflow services that enforce the
//! ledger's multi-entity consistency rules.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    boucherie-db (THIS CRATE)                    │
//! │                                                                 │
//! │   ┌──────────────┐   ┌───────────────┐   ┌──────────────┐     │
//! │   │   Services   │──►│  Repositories │──►│   Database   │     │
//! │   │ sale, credit │   │ per entity,   │   │  (pool.rs)   │     │
//! │   │ order, ...   │   │ tx-aware      │   │  SqlitePool  │     │
//! │   └──────────────┘   └───────────────┘   └──────────────┘     │
//! │          │                                      │              │
//! │          │ one transaction per unit of work     ▼              │
//! │          └───────────────────────────►  SQLite (WAL mode)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transaction Boundaries
//!
//! The two multi-entity workflows are all-or-nothing:
//! - sale + conditional credit + client balance increment
//! - payment + remaining-amount reduction + client balance decrement
//!
//! Each runs inside a single [`sqlx::Transaction`] committed at the end;
//! any failure rolls the whole unit back.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AppConfig;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::client::ClientRepository;
pub use repository::credit::CreditRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;

pub use service::{ServiceError, ServiceResult};
pub use service::client::ClientService;
pub use service::credit::CreditService;
pub use service::dashboard::{DashboardService, DashboardStats, Debtor};
pub use service::order::OrderService;
pub use service::product::ProductService;
pub use service::sale::SaleService;
