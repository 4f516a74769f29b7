//! # Sale Service
//!
//! The sale workflow: resolve client and products, freeze item subtotals,
//! split the total into paid and credit, and persist the whole unit of
//! work in one transaction.
//!
//! ## Workflow
//! ```text
//! record(client_id, items, paid)
//!   │ resolve client (walk-in auto-provisioned)
//!   │ resolve products, freeze subtotals, sum total
//!   │ credit = total − paid        (rejects paid > total)
//!   ▼
//! BEGIN ── insert sale + items
//!       ── credit > 0 ? insert credit, balance += credit
//! COMMIT
//! ```
//! Any failure before COMMIT rolls the whole sale back; there is no state
//! where a sale exists without its credit or a credit without its balance
//! adjustment.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::pool::Database;
use crate::repository::client::ClientRepository;
use crate::repository::credit::CreditRepository;
use crate::repository::generate_id;
use crate::repository::sale::SaleRepository;
use crate::service::{ServiceError, ServiceResult};
use boucherie_core::{
    validation, Client, CoreError, CreateSaleRequest, Credit, CreditStatus, Money, Sale,
    SaleItem, ValidationError, WALKIN_CLIENT_ID,
};

/// Service for the sale workflow.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Lists sales, optionally filtered by client and/or calendar date.
    pub async fn list(
        &self,
        client_id: Option<&str>,
        date: Option<NaiveDate>,
    ) -> ServiceResult<Vec<Sale>> {
        Ok(self.db.sales().find_all(client_id, date).await?)
    }

    /// Gets a sale by ID, with its items.
    pub async fn get(&self, id: &str) -> ServiceResult<Sale> {
        self.db
            .sales()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Core(CoreError::SaleNotFound(id.to_string())))
    }

    /// Records a sale.
    ///
    /// The deferred portion (`total − paid`) becomes an open credit on the
    /// client's ledger, and the client's aggregate balance grows by the
    /// same amount. Sale, items, credit and balance land atomically.
    pub async fn record(&self, req: CreateSaleRequest) -> ServiceResult<Sale> {
        let client = self.resolve_client(&req.client_id).await?;

        if req.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }

        // Resolve products and freeze subtotals at today's prices.
        let mut items = Vec::with_capacity(req.items.len());
        let mut total = Money::zero();
        let sale_id = generate_id();

        for line in &req.items {
            validation::validate_quantity_grams(line.quantity_grams)?;

            let product = self
                .db
                .products()
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            let subtotal = product.subtotal_for(boucherie_core::Weight::from_grams(
                line.quantity_grams,
            ));
            total += subtotal;

            items.push(SaleItem {
                id: generate_id(),
                sale_id: sale_id.clone(),
                product_id: product.id,
                product_name: product.name,
                quantity_grams: line.quantity_grams,
                subtotal_cents: subtotal.cents(),
            });
        }

        let credit_amount = Sale::split_paid(total, Money::from_cents(req.paid_cents))?;
        let now = Utc::now();

        let sale = Sale {
            id: sale_id,
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            items,
            total_cents: total.cents(),
            paid_cents: req.paid_cents,
            credit_cents: credit_amount.cents(),
            date: now,
        };

        // One unit of work: sale + items, then the conditional credit and
        // its balance mirror. Rolls back on drop if anything fails.
        let mut tx = self.db.begin().await?;

        SaleRepository::insert(&mut tx, &sale).await?;

        if credit_amount.is_positive() {
            let credit = Credit {
                id: generate_id(),
                client_id: client.id.clone(),
                client_name: client.name.clone(),
                sale_id: sale.id.clone(),
                amount_cents: credit_amount.cents(),
                remaining_cents: credit_amount.cents(),
                status: CreditStatus::Open,
                created_at: now,
                due_date: None,
                payments: vec![],
            };
            CreditRepository::insert(&mut tx, &credit).await?;
            ClientRepository::adjust_balance(&mut tx, &client.id, credit_amount.cents())
                .await?;
        }

        tx.commit().await?;

        info!(
            id = %sale.id,
            client = %sale.client_id,
            total = %sale.total_cents,
            credit = %sale.credit_cents,
            "sale recorded"
        );

        Ok(sale)
    }

    /// Resolves the sale's client. The walk-in sentinel is provisioned on
    /// first use; every other unknown id is an error.
    async fn resolve_client(&self, client_id: &str) -> ServiceResult<Client> {
        if client_id == WALKIN_CLIENT_ID {
            let walk_in = Client::walk_in(Utc::now());
            self.db.clients().insert_if_absent(&walk_in).await?;
            // Re-read so an existing row (with an accrued balance) wins.
            return Ok(self
                .db
                .clients()
                .find_by_id(WALKIN_CLIENT_ID)
                .await?
                .unwrap_or(walk_in));
        }

        self.db
            .clients()
            .find_by_id(client_id)
            .await?
            .ok_or_else(|| {
                ServiceError::Core(CoreError::ClientNotFound(client_id.to_string()))
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
