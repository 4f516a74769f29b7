//! # Client Repository
//!
//! Database operations for clients, including the atomic balance
//! adjustment that keeps `total_credit_cents` in step with the credit
//! ledger.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use boucherie_core::Client;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Lists every client, newest first.
    pub async fn find_all(&self) -> DbResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, email, avatar, total_credit_cents, created_at
            FROM clients
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    /// Gets a client by ID.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, phone, email, avatar, total_credit_cents, created_at
            FROM clients
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Inserts a new client.
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, name = %client.name, "inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (id, name, phone, email, avatar, total_credit_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.avatar)
        .bind(client.total_credit_cents)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a client unless one with the same ID already exists.
    ///
    /// Used to provision the walk-in sentinel; `INSERT OR IGNORE` makes it
    /// race-safe against a concurrent first walk-in sale.
    pub async fn insert_if_absent(&self, client: &Client) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO clients (id, name, phone, email, avatar, total_credit_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.avatar)
        .bind(client.total_credit_cents)
        .bind(client.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a client's contact fields. The balance is never written
    /// here; only [`ClientRepository::adjust_balance`] touches it.
    pub async fn update(&self, client: &Client) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = ?2, phone = ?3, email = ?4, avatar = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.phone)
        .bind(&client.email)
        .bind(&client.avatar)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("client", &client.id));
        }

        Ok(())
    }

    /// Atomically adds `delta_cents` (positive or negative) to a client's
    /// aggregate outstanding credit.
    ///
    /// This is a single SQL increment, never a read-modify-write, so
    /// concurrent adjustments on the same client both take effect. Always
    /// called inside the transaction that mutates the paired credit row.
    pub async fn adjust_balance(
        conn: &mut SqliteConnection,
        client_id: &str,
        delta_cents: i64,
    ) -> DbResult<()> {
        debug!(client_id = %client_id, delta = %delta_cents, "adjusting client balance");

        let result = sqlx::query(
            r#"
            UPDATE clients
            SET total_credit_cents = total_credit_cents + ?2
            WHERE id = ?1
            "#,
        )
        .bind(client_id)
        .bind(delta_cents)
        .execute(conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("client", client_id));
        }

        Ok(())
    }
}
