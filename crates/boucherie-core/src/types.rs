//! # Domain Types
//!
//! Core domain types for the butcher shop ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Client ◄──── Sale ──── SaleItem ───► Product                   │
//! │    ▲           │                                                │
//! │    │           ▼                                                │
//! │    └──────── Credit ──── Payment                                │
//! │    ▲                                                            │
//! │    └──────── Order ──── OrderItem ──► Product                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sales, credits and orders denormalize the client/product names they
//! reference. A renamed product never rewrites financial history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Weight};

// =============================================================================
// Meat Category
// =============================================================================

/// Closed set of meat categories sold by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MeatCategory {
    Boeuf,
    Agneau,
    Poulet,
    Veau,
    Charcuterie,
}

// =============================================================================
// Credit Status
// =============================================================================

/// Lifecycle state of a credit.
///
/// ```text
/// open ──(partial payment)──► open
/// open ──(full payment)─────► paid
/// open ──(due-date sweep)───► overdue ──(full payment)──► paid
/// ```
///
/// `paid` is terminal. The overdue transition is driven by an explicit
/// due-date sweep, never as a side effect of payment application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CreditStatus {
    /// Credit has an outstanding balance.
    Open,
    /// Outstanding balance past its due date.
    Overdue,
    /// Fully settled; remaining amount is exactly zero.
    Paid,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of a pre-order.
///
/// Status is a free-form field update: the five states exist for display
/// and filtering, no forward-only transition graph is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Ready,
    Delivered,
    Cancelled,
}

// =============================================================================
// Client
// =============================================================================

/// A butcher shop customer.
///
/// `total_credit_cents` is a derived aggregate: it must always equal the
/// sum of `remaining_cents` over the client's non-paid credits. It is
/// adjusted incrementally by the sale and payment workflows, never
/// recomputed in the hot path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub avatar: String,
    /// Aggregate outstanding credit, in cents.
    pub total_credit_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Returns the outstanding balance as Money.
    #[inline]
    pub fn total_credit(&self) -> Money {
        Money::from_cents(self.total_credit_cents)
    }

    /// Builds the distinguished walk-in client with a zero balance.
    pub fn walk_in(created_at: DateTime<Utc>) -> Self {
        Client {
            id: crate::WALKIN_CLIENT_ID.to_string(),
            name: crate::WALKIN_CLIENT_NAME.to_string(),
            phone: String::new(),
            email: String::new(),
            avatar: String::new(),
            total_credit_cents: 0,
            created_at,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A meat product sold by the kilogram.
///
/// Stock is a boolean flag only; there is no quantity tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: MeatCategory,
    /// Price per kilogram, in cents. Always positive.
    pub price_per_kg_cents: i64,
    pub image: String,
    pub in_stock: bool,
}

impl Product {
    /// Returns the per-kilogram price as Money.
    #[inline]
    pub fn price_per_kg(&self) -> Money {
        Money::from_cents(self.price_per_kg_cents)
    }

    /// Subtotal for a given weight, with price frozen at call time.
    #[inline]
    pub fn subtotal_for(&self, quantity: Weight) -> Money {
        self.price_per_kg().multiply_weight(quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An append-only financial record of a completed sale.
///
/// Invariant: `total_cents == paid_cents + credit_cents`, both non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    /// Client name at sale time (frozen).
    pub client_name: String,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
    pub total_cents: i64,
    /// Portion settled in cash at the counter.
    pub paid_cents: i64,
    /// Portion deferred onto the client's store credit.
    pub credit_cents: i64,
    pub date: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    #[inline]
    pub fn credit(&self) -> Money {
        Money::from_cents(self.credit_cents)
    }

    /// Splits a sale total into its paid and credit portions.
    ///
    /// Returns the credit portion, or an error when the paid amount is
    /// negative or exceeds the total.
    pub fn split_paid(total: Money, paid: Money) -> CoreResult<Money> {
        if paid.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "paid amount".to_string(),
                min: 0,
                max: total.cents(),
            }
            .into());
        }
        if paid > total {
            return Err(CoreError::PaidExceedsTotal {
                paid_cents: paid.cents(),
                total_cents: total.cents(),
            });
        }
        Ok(total - paid)
    }
}

/// A line item in a sale. The product name and the computed subtotal are
/// frozen at sale time; prices are never re-derived later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub product_name: String,
    /// Quantity in grams.
    pub quantity_grams: i64,
    /// `quantity × price_per_kg` captured at sale time.
    pub subtotal_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn quantity(&self) -> Weight {
        Weight::from_grams(self.quantity_grams)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Credit
// =============================================================================

/// Money owed by a client for a sale.
///
/// Invariants: `0 ≤ remaining_cents ≤ amount_cents`;
/// `status == Paid ⟺ remaining_cents == 0`; the sum of payment amounts
/// plus `remaining_cents` equals `amount_cents` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    pub id: String,
    pub client_id: String,
    /// Client name at origination (frozen).
    pub client_name: String,
    /// Originating sale.
    pub sale_id: String,
    /// Original credit granted. Immutable.
    pub amount_cents: i64,
    /// Outstanding balance. Monotonically non-increasing.
    pub remaining_cents: i64,
    pub status: CreditStatus,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    /// Payment history, most recent first.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub payments: Vec<Payment>,
}

impl Credit {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn remaining(&self) -> Money {
        Money::from_cents(self.remaining_cents)
    }

    /// Checks that a payment may be applied to this credit.
    ///
    /// Rules, in order: a settled credit accepts no further payments;
    /// the amount must be strictly positive; the amount must not exceed
    /// the remaining balance.
    pub fn validate_payment(&self, amount: Money) -> CoreResult<()> {
        if self.status == CreditStatus::Paid {
            return Err(CoreError::CreditAlreadySettled(self.id.clone()));
        }
        if !amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "payment amount".to_string(),
            }
            .into());
        }
        if amount > self.remaining() {
            return Err(CoreError::PaymentExceedsRemaining {
                requested_cents: amount.cents(),
                remaining_cents: self.remaining_cents,
            });
        }
        Ok(())
    }

    /// Whether this credit should be classified overdue as of `today`.
    ///
    /// Pure read-time classifier; the persisted status only changes when
    /// the explicit sweep runs.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == CreditStatus::Open
            && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}

/// A single payment against a credit. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub credit_id: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer pre-order (reservation). Carries no monetary fields; orders
/// are not priced until rung up as a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub client_id: String,
    /// Client name at creation (frozen).
    pub client_name: String,
    /// Client phone at creation (frozen).
    pub client_phone: String,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<OrderItem>,
    /// Calendar date, no time of day.
    pub pickup_date: NaiveDate,
    pub notes: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A product line in an order. Unlike a sale item it carries no price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    /// Quantity in grams.
    pub quantity_grams: i64,
}

impl OrderItem {
    #[inline]
    pub fn quantity(&self) -> Weight {
        Weight::from_grams(self.quantity_grams)
    }
}

// =============================================================================
// Request Payloads
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub category: MeatCategory,
    pub price_per_kg_cents: i64,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<MeatCategory>,
    pub price_per_kg_cents: Option<i64>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleItemRequest {
    pub product_id: String,
    pub quantity_grams: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub client_id: String,
    pub items: Vec<CreateSaleItemRequest>,
    pub paid_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount_cents: i64,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub product_id: String,
    pub quantity_grams: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub client_id: String,
    pub items: Vec<CreateOrderItemRequest>,
    /// Calendar date, `YYYY-MM-DD`.
    pub pickup_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub pickup_date: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(remaining: i64, status: CreditStatus) -> Credit {
        Credit {
            id: "c-1".to_string(),
            client_id: "cl-1".to_string(),
            client_name: "Mme Dupont".to_string(),
            sale_id: "s-1".to_string(),
            amount_cents: 2000,
            remaining_cents: remaining,
            status,
            created_at: Utc::now(),
            due_date: None,
            payments: vec![],
        }
    }

    #[test]
    fn test_split_paid_partial() {
        let credit =
            Sale::split_paid(Money::from_cents(2000), Money::from_cents(500)).unwrap();
        assert_eq!(credit.cents(), 1500);
    }

    #[test]
    fn test_split_paid_full() {
        let credit =
            Sale::split_paid(Money::from_cents(2000), Money::from_cents(2000)).unwrap();
        assert!(credit.is_zero());
    }

    #[test]
    fn test_split_paid_rejects_overpayment() {
        let err =
            Sale::split_paid(Money::from_cents(2000), Money::from_cents(2500)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PaidExceedsTotal {
                paid_cents: 2500,
                total_cents: 2000
            }
        ));
    }

    #[test]
    fn test_split_paid_rejects_negative() {
        let err =
            Sale::split_paid(Money::from_cents(2000), Money::from_cents(-1)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_validate_payment_ok() {
        let c = credit(1500, CreditStatus::Open);
        assert!(c.validate_payment(Money::from_cents(1500)).is_ok());
        assert!(c.validate_payment(Money::from_cents(1)).is_ok());
    }

    #[test]
    fn test_validate_payment_settled_credit() {
        let c = credit(0, CreditStatus::Paid);
        let err = c.validate_payment(Money::from_cents(100)).unwrap_err();
        assert!(matches!(err, CoreError::CreditAlreadySettled(_)));
    }

    #[test]
    fn test_validate_payment_overpayment() {
        let c = credit(1500, CreditStatus::Open);
        let err = c.validate_payment(Money::from_cents(2000)).unwrap_err();
        assert!(matches!(err, CoreError::PaymentExceedsRemaining { .. }));
    }

    #[test]
    fn test_validate_payment_non_positive() {
        let c = credit(1500, CreditStatus::Open);
        assert!(c.validate_payment(Money::zero()).is_err());
        assert!(c.validate_payment(Money::from_cents(-50)).is_err());
    }

    #[test]
    fn test_overdue_payment_still_allowed() {
        let c = credit(1500, CreditStatus::Overdue);
        assert!(c.validate_payment(Money::from_cents(1500)).is_ok());
    }

    #[test]
    fn test_is_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();

        let mut c = credit(1500, CreditStatus::Open);
        assert!(!c.is_overdue(today)); // no due date

        c.due_date = NaiveDate::from_ymd_opt(2026, 3, 10);
        assert!(c.is_overdue(today));

        c.due_date = NaiveDate::from_ymd_opt(2026, 3, 15);
        assert!(!c.is_overdue(today)); // due today is not overdue yet

        c.status = CreditStatus::Paid;
        c.due_date = NaiveDate::from_ymd_opt(2026, 3, 10);
        assert!(!c.is_overdue(today)); // settled credits never go overdue
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&CreditStatus::Overdue).unwrap(),
            "\"overdue\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transfer\""
        );
        assert_eq!(
            serde_json::to_string(&MeatCategory::Boeuf).unwrap(),
            "\"boeuf\""
        );
    }

    #[test]
    fn test_walk_in_client() {
        let c = Client::walk_in(Utc::now());
        assert_eq!(c.id, crate::WALKIN_CLIENT_ID);
        assert_eq!(c.name, crate::WALKIN_CLIENT_NAME);
        assert_eq!(c.total_credit_cents, 0);
    }

    #[test]
    fn test_product_subtotal_for() {
        let p = Product {
            id: "p-1".to_string(),
            name: "Entrecôte".to_string(),
            category: MeatCategory::Boeuf,
            price_per_kg_cents: 2890,
            image: String::new(),
            in_stock: true,
        };
        // 28.90 €/kg × 0.450 kg = 13.005 € → 13.01 €
        assert_eq!(p.subtotal_for(Weight::from_grams(450)).cents(), 1301);
    }
}
