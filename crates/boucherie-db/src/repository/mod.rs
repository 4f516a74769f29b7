//! # Repositories
//!
//! One repository per entity. Read paths run on the pool; the write paths
//! that participate in multi-entity workflows take an explicit
//! `&mut SqliteConnection` so the service layer can run them inside a
//! single transaction.

pub mod client;
pub mod credit;
pub mod order;
pub mod product;
pub mod sale;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4, string form).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
