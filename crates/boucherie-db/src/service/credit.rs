//! # Credit Service
//!
//! The credit lifecycle: partial payments against an outstanding balance,
//! settlement when the balance reaches zero, and the explicit overdue
//! sweep.
//!
//! ## Payment Workflow
//! ```text
//! add_payment(credit_id, amount, method)
//!   │ read credit, validate (settled? positive? ≤ remaining?)
//!   ▼
//! BEGIN ── guarded reduction  (WHERE remaining ≥ amount, flips paid at 0)
//!       ── append payment row
//!       ── client balance −= amount
//! COMMIT
//! ```
//! The guarded reduction runs first so the transaction takes its write
//! lock immediately, and so a concurrent payment that drained the balance
//! between the read and the write is refused instead of double-counted.

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::pool::Database;
use crate::repository::client::ClientRepository;
use crate::repository::credit::CreditRepository;
use crate::repository::generate_id;
use crate::service::{ServiceError, ServiceResult};
use boucherie_core::{
    validation, CoreError, CreatePaymentRequest, Credit, CreditStatus, Money, Payment,
};

/// Service for the credit lifecycle.
#[derive(Debug, Clone)]
pub struct CreditService {
    db: Database,
}

impl CreditService {
    /// Creates a new CreditService.
    pub fn new(db: Database) -> Self {
        CreditService { db }
    }

    /// Lists credits, optionally filtered by status.
    pub async fn list(&self, status: Option<CreditStatus>) -> ServiceResult<Vec<Credit>> {
        Ok(self.db.credits().find_all(status).await?)
    }

    /// Lists a client's credits.
    pub async fn list_by_client(&self, client_id: &str) -> ServiceResult<Vec<Credit>> {
        Ok(self.db.credits().find_by_client(client_id).await?)
    }

    /// Gets a credit by ID, with its payment history.
    pub async fn get(&self, id: &str) -> ServiceResult<Credit> {
        self.db
            .credits()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Core(CoreError::CreditNotFound(id.to_string())))
    }

    /// Applies a payment to a credit and returns the refreshed credit.
    ///
    /// The payment row, the remaining-amount reduction and the client
    /// balance decrement land atomically; a validation failure mutates
    /// nothing.
    pub async fn add_payment(
        &self,
        credit_id: &str,
        req: CreatePaymentRequest,
    ) -> ServiceResult<Credit> {
        // Structural check first; a non-positive amount never reaches the
        // database.
        validation::validate_payment_amount(req.amount_cents)?;

        let credit = self.get(credit_id).await?;
        let amount = Money::from_cents(req.amount_cents);
        credit.validate_payment(amount)?;

        let payment = Payment {
            id: generate_id(),
            credit_id: credit.id.clone(),
            amount_cents: req.amount_cents,
            date: Utc::now(),
            method: req.method,
        };

        let mut tx = self.db.begin().await?;

        // Guarded write goes first: it re-checks the balance under the
        // write lock, so a payment that lost a race is refused here.
        let applied =
            CreditRepository::reduce_remaining(&mut tx, &credit.id, req.amount_cents).await?;
        if !applied {
            // Another payment drained the credit between our read and
            // this write. Report against the current state.
            drop(tx);
            let current = self.get(credit_id).await?;
            if current.status == CreditStatus::Paid {
                return Err(CoreError::CreditAlreadySettled(current.id).into());
            }
            return Err(CoreError::PaymentExceedsRemaining {
                requested_cents: req.amount_cents,
                remaining_cents: current.remaining_cents,
            }
            .into());
        }

        CreditRepository::add_payment(&mut tx, &payment).await?;
        ClientRepository::adjust_balance(&mut tx, &credit.client_id, -req.amount_cents)
            .await?;

        tx.commit().await?;

        info!(
            credit_id = %credit.id,
            amount = %req.amount_cents,
            "payment applied"
        );

        self.get(credit_id).await
    }

    /// Sweeps open credits whose due date has passed into `overdue`.
    /// Returns the number of credits reclassified.
    pub async fn mark_overdue(&self, today: NaiveDate) -> ServiceResult<u64> {
        let count = self.db.credits().mark_overdue(today).await?;
        if count > 0 {
            info!(count, "credits marked overdue");
        }
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use crate::service::client::ClientService;
    use crate::service::product::ProductService;
    use crate::service::sale::SaleService;
    use boucherie_core::{
        CreateClientRequest, CreateProductRequest, CreateSaleItemRequest, CreateSaleRequest,
        MeatCategory, PaymentMethod,
    };

    struct Fixture {
        db: Database,
        credits: CreditService,
        client_id: String,
        credit_id: String,
    }

    /// A client with one sale of 20.00 paid 5.00, leaving a 15.00 credit.
    async fn fixture_with(db: Database) -> Fixture {
        let client = ClientService::new(db.clone())
            .create(CreateClientRequest {
                name: "Mme Dupont".to_string(),
                phone: String::new(),
                email: None,
            })
            .await
            .unwrap();

        let product = ProductService::new(db.clone())
            .create(CreateProductRequest {
                name: "Entrecôte".to_string(),
                category: MeatCategory::Boeuf,
                price_per_kg_cents: 1000,
                image: None,
            })
            .await
            .unwrap();

        SaleService::new(db.clone())
            .record(CreateSaleRequest {
                client_id: client.id.clone(),
                items: vec![CreateSaleItemRequest {
                    product_id: product.id,
                    quantity_grams: 2000,
                }],
                paid_cents: 500,
            })
            .await
            .unwrap();

        let credits = CreditService::new(db.clone());
        let credit_id = credits.list_by_client(&client.id).await.unwrap()[0].id.clone();

        Fixture {
            credits,
            client_id: client.id,
            credit_id,
            db,
        }
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        fixture_with(db).await
    }

    fn pay(amount_cents: i64) -> CreatePaymentRequest {
        CreatePaymentRequest {
            amount_cents,
            method: PaymentMethod::Cash,
        }
    }

    async fn client_balance(fx: &Fixture) -> i64 {
        fx.db
            .clients()
            .find_by_id(&fx.client_id)
            .await
            .unwrap()
            .unwrap()
            .total_credit_cents
    }

    #[tokio::test]
    async fn test_partial_payment() {
        let fx = fixture().await;

        let credit = fx.credits.add_payment(&fx.credit_id, pay(500)).await.unwrap();
        assert_eq!(credit.remaining_cents, 1000);
        assert_eq!(credit.status, CreditStatus::Open);
        assert_eq!(credit.payments.len(), 1);
        assert_eq!(credit.payments[0].amount_cents, 500);

        assert_eq!(client_balance(&fx).await, 1000);
    }

    #[tokio::test]
    async fn test_full_payment_settles_credit() {
        let fx = fixture().await;

        let credit = fx.credits.add_payment(&fx.credit_id, pay(1500)).await.unwrap();
        assert_eq!(credit.remaining_cents, 0);
        assert_eq!(credit.status, CreditStatus::Paid);

        // Balance back to its pre-sale level.
        assert_eq!(client_balance(&fx).await, 0);

        // A settled credit refuses further payments.
        let err = fx.credits.add_payment(&fx.credit_id, pay(100)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::CreditAlreadySettled(_))
        ));
    }

    #[tokio::test]
    async fn test_overpayment_mutates_nothing() {
        let fx = fixture().await;

        let err = fx.credits.add_payment(&fx.credit_id, pay(2000)).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::PaymentExceedsRemaining {
                requested_cents: 2000,
                remaining_cents: 1500
            })
        ));

        let credit = fx.credits.get(&fx.credit_id).await.unwrap();
        assert_eq!(credit.remaining_cents, 1500);
        assert_eq!(credit.status, CreditStatus::Open);
        assert!(credit.payments.is_empty());
        assert_eq!(client_balance(&fx).await, 1500);
    }

    #[tokio::test]
    async fn test_non_positive_payment_rejected() {
        let fx = fixture().await;

        for amount in [0, -500] {
            let err = fx.credits.add_payment(&fx.credit_id, pay(amount)).await.unwrap_err();
            assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
        }

        // The structural check runs before any read: a bad amount is
        // reported as such even when the credit does not exist.
        let err = fx.credits.add_payment("ghost", pay(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_payment_invariant_holds_across_history() {
        let fx = fixture().await;

        fx.credits.add_payment(&fx.credit_id, pay(400)).await.unwrap();
        fx.credits.add_payment(&fx.credit_id, pay(600)).await.unwrap();
        let credit = fx.credits.add_payment(&fx.credit_id, pay(500)).await.unwrap();

        // remaining + Σ payments == original amount
        let paid_sum: i64 = credit.payments.iter().map(|p| p.amount_cents).sum();
        assert_eq!(credit.remaining_cents + paid_sum, credit.amount_cents);
        assert_eq!(credit.status, CreditStatus::Paid);
    }

    #[tokio::test]
    async fn test_unknown_credit() {
        let fx = fixture().await;
        let err = fx.credits.add_payment("ghost", pay(100)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mark_overdue_sweep() {
        let fx = fixture().await;
        let today = Utc::now().date_naive();

        // No due date: never swept.
        assert_eq!(fx.credits.mark_overdue(today).await.unwrap(), 0);

        // Backdate the due date, then sweep.
        sqlx::query("UPDATE credits SET due_date = ?1 WHERE id = ?2")
            .bind(today.pred_opt().unwrap())
            .bind(&fx.credit_id)
            .execute(fx.db.pool())
            .await
            .unwrap();

        assert_eq!(fx.credits.mark_overdue(today).await.unwrap(), 1);
        let credit = fx.credits.get(&fx.credit_id).await.unwrap();
        assert_eq!(credit.status, CreditStatus::Overdue);

        // Sweep is idempotent, and an overdue credit still takes payments.
        assert_eq!(fx.credits.mark_overdue(today).await.unwrap(), 0);
        let credit = fx.credits.add_payment(&fx.credit_id, pay(1500)).await.unwrap();
        assert_eq!(credit.status, CreditStatus::Paid);
    }

    #[tokio::test]
    async fn test_list_filtered_by_status() {
        let fx = fixture().await;

        let open = fx.credits.list(Some(CreditStatus::Open)).await.unwrap();
        assert_eq!(open.len(), 1);

        let paid = fx.credits.list(Some(CreditStatus::Paid)).await.unwrap();
        assert!(paid.is_empty());

        fx.credits.add_payment(&fx.credit_id, pay(1500)).await.unwrap();

        let paid = fx.credits.list(Some(CreditStatus::Paid)).await.unwrap();
        assert_eq!(paid.len(), 1);
    }

    /// Two concurrent 5.00 payments against a remaining 10.00 must land
    /// exactly once each: remaining 0, status paid, never negative or
    /// double-counted. Needs a file-backed pool; an in-memory database is
    /// pinned to one connection and would serialize trivially.
    #[tokio::test]
    async fn test_concurrent_payments_settle_exactly() {
        let path = std::env::temp_dir().join(format!(
            "boucherie-concurrency-{}.db",
            uuid::Uuid::new_v4()
        ));
        let db = Database::new(DbConfig::new(&path).max_connections(5))
            .await
            .unwrap();
        let fx = fixture_with(db).await;

        // Bring the credit down to a remaining 10.00.
        fx.credits.add_payment(&fx.credit_id, pay(500)).await.unwrap();

        let (a, b) = tokio::join!(
            fx.credits.add_payment(&fx.credit_id, pay(500)),
            fx.credits.add_payment(&fx.credit_id, pay(500)),
        );
        assert!(a.is_ok(), "first concurrent payment failed: {a:?}");
        assert!(b.is_ok(), "second concurrent payment failed: {b:?}");

        let credit = fx.credits.get(&fx.credit_id).await.unwrap();
        assert_eq!(credit.remaining_cents, 0);
        assert_eq!(credit.status, CreditStatus::Paid);
        assert_eq!(credit.payments.len(), 3);
        assert_eq!(client_balance(&fx).await, 0);

        fx.db.close().await;
        let _ = std::fs::remove_file(&path);
    }
}
