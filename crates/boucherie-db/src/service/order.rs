//! # Order Service
//!
//! Pre-order management. Orders carry no money; they reserve products for
//! a pickup date and are priced only when rung up as a sale.

use chrono::Utc;
use tracing::info;

use crate::pool::Database;
use crate::repository::generate_id;
use crate::repository::order::OrderRepository;
use crate::service::{ServiceError, ServiceResult};
use boucherie_core::{
    validation, CoreError, CreateOrderRequest, Order, OrderItem, OrderStatus,
    UpdateOrderRequest, ValidationError,
};

/// Service for pre-order management.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    /// Creates a new OrderService.
    pub fn new(db: Database) -> Self {
        OrderService { db }
    }

    /// Lists orders, optionally filtered by status.
    pub async fn list(&self, status: Option<OrderStatus>) -> ServiceResult<Vec<Order>> {
        Ok(self.db.orders().find_all(status).await?)
    }

    /// Gets an order by ID, with its items.
    pub async fn get(&self, id: &str) -> ServiceResult<Order> {
        self.db
            .orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Core(CoreError::OrderNotFound(id.to_string())))
    }

    /// Creates a pre-order.
    ///
    /// The client must already be registered (no walk-in auto-provisioning
    /// here) and every product must exist. New orders start `pending`.
    pub async fn create(&self, req: CreateOrderRequest) -> ServiceResult<Order> {
        let client = self
            .db
            .clients()
            .find_by_id(&req.client_id)
            .await?
            .ok_or_else(|| CoreError::ClientNotFound(req.client_id.clone()))?;

        if req.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        let pickup_date = validation::parse_calendar_date(&req.pickup_date)?;

        let order_id = generate_id();
        let mut items = Vec::with_capacity(req.items.len());

        for line in &req.items {
            validation::validate_quantity_grams(line.quantity_grams)?;

            let product = self
                .db
                .products()
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            items.push(OrderItem {
                id: generate_id(),
                order_id: order_id.clone(),
                product_id: product.id,
                product_name: product.name,
                quantity_grams: line.quantity_grams,
            });
        }

        let order = Order {
            id: order_id,
            client_id: client.id,
            client_name: client.name,
            client_phone: client.phone,
            items,
            pickup_date,
            notes: req.notes.unwrap_or_default(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        let mut tx = self.db.begin().await?;
        OrderRepository::insert(&mut tx, &order).await?;
        tx.commit().await?;

        info!(
            id = %order.id,
            client = %order.client_id,
            pickup = %order.pickup_date,
            "order created"
        );

        Ok(order)
    }

    /// Updates an order's status, pickup date and/or notes. Absent fields
    /// keep their current value; status transitions are unconstrained.
    pub async fn update(&self, id: &str, req: UpdateOrderRequest) -> ServiceResult<Order> {
        let mut order = self.get(id).await?;

        if let Some(status) = req.status {
            order.status = status;
        }
        if let Some(pickup_date) = req.pickup_date {
            order.pickup_date = validation::parse_calendar_date(&pickup_date)?;
        }
        if let Some(notes) = req.notes {
            order.notes = notes;
        }

        self.db.orders().update(&order).await?;

        Ok(order)
    }

    /// Deletes an order and its items. Unconditional; nothing else in the
    /// ledger references orders.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        self.db.orders().delete(id).await?;
        info!(id = %id, "order deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
