//! # Product Repository
//!
//! Database operations for the meat catalog.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use boucherie_core::{MeatCategory, Product};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products, optionally filtered by category, sorted by name.
    pub async fn find_all(&self, category: Option<MeatCategory>) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_per_kg_cents, image, in_stock
            FROM products
            WHERE (?1 IS NULL OR category = ?1)
            ORDER BY name
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, price_per_kg_cents, image, in_stock
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price_per_kg_cents, image, in_stock)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.price_per_kg_cents)
        .bind(&product.image)
        .bind(product.in_stock)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a product unless one with the same ID already exists.
    /// Used by the idempotent seed.
    pub async fn insert_if_absent(&self, product: &Product) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO products (id, name, category, price_per_kg_cents, image, in_stock)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.price_per_kg_cents)
        .bind(&product.image)
        .bind(product.in_stock)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a product's editable display fields and stock flag.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?2, category = ?3, price_per_kg_cents = ?4, image = ?5, in_stock = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.category)
        .bind(product.price_per_kg_cents)
        .bind(&product.image)
        .bind(product.in_stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", &product.id));
        }

        Ok(())
    }

    /// Deletes a product by ID.
    ///
    /// Historical sale and order items keep their name snapshots, so the
    /// financial record is unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("product", id));
        }

        Ok(())
    }
}
