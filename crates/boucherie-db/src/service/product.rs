//! # Product Service
//!
//! Catalog management for the meat products sold by the kilogram.

use tracing::info;

use crate::pool::Database;
use crate::repository::generate_id;
use crate::service::{ServiceError, ServiceResult};
use boucherie_core::{
    validation, CoreError, CreateProductRequest, MeatCategory, Product, UpdateProductRequest,
};

/// Service for catalog management.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    /// Creates a new ProductService.
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    /// Lists products, optionally filtered by category.
    pub async fn list(&self, category: Option<MeatCategory>) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().find_all(category).await?)
    }

    /// Gets a product by ID.
    pub async fn get(&self, id: &str) -> ServiceResult<Product> {
        self.db
            .products()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Core(CoreError::ProductNotFound(id.to_string())))
    }

    /// Adds a product to the catalog. New products default to in stock.
    pub async fn create(&self, req: CreateProductRequest) -> ServiceResult<Product> {
        validation::validate_name(&req.name)?;
        validation::validate_price_cents(req.price_per_kg_cents)?;

        let product = Product {
            id: generate_id(),
            name: req.name.trim().to_string(),
            category: req.category,
            price_per_kg_cents: req.price_per_kg_cents,
            image: req.image.unwrap_or_default(),
            in_stock: true,
        };

        self.db.products().insert(&product).await?;
        info!(id = %product.id, name = %product.name, "product added to catalog");

        Ok(product)
    }

    /// Updates a product. Absent fields keep their current value.
    ///
    /// A price change only affects future sales; historical line items keep
    /// the subtotal computed at sale time.
    pub async fn update(&self, id: &str, req: UpdateProductRequest) -> ServiceResult<Product> {
        let mut product = self.get(id).await?;

        if let Some(name) = req.name {
            validation::validate_name(&name)?;
            product.name = name.trim().to_string();
        }
        if let Some(category) = req.category {
            product.category = category;
        }
        if let Some(price) = req.price_per_kg_cents {
            validation::validate_price_cents(price)?;
            product.price_per_kg_cents = price;
        }
        if let Some(image) = req.image {
            product.image = image;
        }
        if let Some(in_stock) = req.in_stock {
            product.in_stock = in_stock;
        }

        self.db.products().update(&product).await?;

        Ok(product)
    }

    /// Removes a product from the catalog. Sale and order history keeps its
    /// name snapshots.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.db.products().delete(id).await?;
        info!(id = %id, "product removed from catalog");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
