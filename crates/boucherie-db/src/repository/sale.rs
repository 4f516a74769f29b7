//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! Sales are an append-only financial record: there is no update or
//! delete path. A sale and its items are always inserted through a
//! caller-supplied connection so the sale workflow can keep them inside
//! its transaction.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use boucherie_core::{Sale, SaleItem};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Lists sales, newest first, optionally filtered by client and/or
    /// calendar date. Items are loaded for each sale.
    pub async fn find_all(
        &self,
        client_id: Option<&str>,
        date: Option<NaiveDate>,
    ) -> DbResult<Vec<Sale>> {
        let mut sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, client_name, total_cents, paid_cents, credit_cents, date
            FROM sales
            WHERE (?1 IS NULL OR client_id = ?1)
              AND (?2 IS NULL OR date(date) = ?2)
            ORDER BY date DESC
            "#,
        )
        .bind(client_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        for sale in &mut sales {
            sale.items = self.find_items(&sale.id).await?;
        }

        Ok(sales)
    }

    /// Gets a sale by ID, with its items.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, client_id, client_name, total_cents, paid_cents, credit_cents, date
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match sale {
            Some(mut sale) => {
                sale.items = self.find_items(&sale.id).await?;
                Ok(Some(sale))
            }
            None => Ok(None),
        }
    }

    /// Gets the items belonging to a sale, in insertion order.
    pub async fn find_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, product_name, quantity_grams, subtotal_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a sale and all of its items on the given connection.
    ///
    /// Runs inside the sale workflow's transaction together with the
    /// conditional credit insert and the balance adjustment.
    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, total = %sale.total_cents, items = sale.items.len(), "inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, client_id, client_name, total_cents, paid_cents, credit_cents, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.client_id)
        .bind(&sale.client_name)
        .bind(sale.total_cents)
        .bind(sale.paid_cents)
        .bind(sale.credit_cents)
        .bind(sale.date)
        .execute(&mut *conn)
        .await?;

        for item in &sale.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (id, sale_id, product_id, product_name, quantity_grams, subtotal_cents)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity_grams)
            .bind(item.subtotal_cents)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
