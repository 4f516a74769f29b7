//! # Order Repository
//!
//! Database operations for pre-orders and their line items.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use boucherie_core::{Order, OrderItem, OrderStatus};

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists orders by pickup date (soonest first), optionally filtered by
    /// status. Items are loaded for each order.
    pub async fn find_all(&self, status: Option<OrderStatus>) -> DbResult<Vec<Order>> {
        let mut orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, client_id, client_name, client_phone, pickup_date, notes,
                   status, created_at
            FROM orders
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY pickup_date, created_at
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        for order in &mut orders {
            order.items = self.find_items(&order.id).await?;
        }

        Ok(orders)
    }

    /// Gets an order by ID, with its items.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, client_id, client_name, client_phone, pickup_date, notes,
                   status, created_at
            FROM orders
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match order {
            Some(mut order) => {
                order.items = self.find_items(&order.id).await?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Gets the items belonging to an order, in insertion order.
    pub async fn find_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, product_name, quantity_grams
            FROM order_items
            WHERE order_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts an order and all of its items on the given connection.
    pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, pickup = %order.pickup_date, items = order.items.len(), "inserting order");

        sqlx::query(
            r#"
            INSERT INTO orders (id, client_id, client_name, client_phone, pickup_date,
                                notes, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&order.id)
        .bind(&order.client_id)
        .bind(&order.client_name)
        .bind(&order.client_phone)
        .bind(order.pickup_date)
        .bind(&order.notes)
        .bind(order.status)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, product_name, quantity_grams)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&item.id)
            .bind(&item.order_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity_grams)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Updates an order's status, pickup date and notes.
    pub async fn update(&self, order: &Order) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET status = ?2, pickup_date = ?3, notes = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&order.id)
        .bind(order.status)
        .bind(order.pickup_date)
        .bind(&order.notes)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("order", &order.id));
        }

        Ok(())
    }

    /// Deletes an order by ID. Items go with it via ON DELETE CASCADE.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("order", id));
        }

        Ok(())
    }
}
