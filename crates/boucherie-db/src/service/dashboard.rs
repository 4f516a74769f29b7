//! # Dashboard Service
//!
//! Read-only aggregate snapshot over the ledger. Each figure is one
//! query; the snapshot makes no consistency claim beyond per-query
//! snapshot reads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pool::Database;
use crate::service::ServiceResult;

/// Aggregate ledger figures for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Sum of sale totals dated today, in cents.
    pub today_revenue_cents: i64,
    /// Cash portion of today's revenue, in cents.
    pub today_cash_cents: i64,
    /// Credit portion of today's revenue, in cents.
    pub today_credit_cents: i64,
    /// Number of sales recorded today.
    pub today_sales: i64,
    /// Number of registered clients (walk-in included).
    pub total_clients: i64,
    /// Sum of remaining amounts over non-settled credits, in cents.
    pub pending_credit_cents: i64,
    /// Number of credits currently classified overdue.
    pub overdue_count: i64,
    /// Up to five clients with the largest outstanding balances.
    pub top_debtors: Vec<Debtor>,
}

/// One entry in the top-debtors list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Debtor {
    pub id: String,
    pub name: String,
    pub total_credit_cents: i64,
}

/// Service computing the dashboard snapshot.
#[derive(Debug, Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    /// Creates a new DashboardService.
    pub fn new(db: Database) -> Self {
        DashboardService { db }
    }

    /// Computes the snapshot with `today` as the reference day.
    pub async fn stats(&self, today: NaiveDate) -> ServiceResult<DashboardStats> {
        let pool = self.db.pool();

        let (today_revenue_cents, today_cash_cents, today_credit_cents, today_sales) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT COALESCE(SUM(total_cents), 0),
                       COALESCE(SUM(paid_cents), 0),
                       COALESCE(SUM(credit_cents), 0),
                       COUNT(*)
                FROM sales
                WHERE date(date) = ?1
                "#,
            )
            .bind(today)
            .fetch_one(pool)
            .await?;

        let (total_clients,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM clients")
                .fetch_one(pool)
                .await?;

        let (pending_credit_cents,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COALESCE(SUM(remaining_cents), 0) FROM credits WHERE status != 'paid'",
        )
        .fetch_one(pool)
        .await?;

        let (overdue_count,) = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM credits WHERE status = 'overdue'",
        )
        .fetch_one(pool)
        .await?;

        let top_debtors = sqlx::query_as::<_, Debtor>(
            r#"
            SELECT id, name, total_credit_cents
            FROM clients
            WHERE total_credit_cents > 0
            ORDER BY total_credit_cents DESC
            LIMIT 5
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(DashboardStats {
            today_revenue_cents,
            today_cash_cents,
            today_credit_cents,
            today_sales,
            total_clients,
            pending_credit_cents,
            overdue_count,
            top_debtors,
        })
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
    use crate::service::credit::CreditService;
    use crate::service::product::ProductService;
    use crate::service::sale::SaleService;
    use boucherie_core::{
        CreateClientRequest, CreatePaymentRequest, CreateProductRequest,
        CreateSaleItemRequest, CreateSaleRequest, MeatCategory, PaymentMethod,
    };
    use chrono::Utc;

    #[tokio::test]
    async fn test_empty_ledger_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stats = DashboardService::new(db)
            .stats(Utc::now().date_naive())
            .await
            .unwrap();

        assert_eq!(stats.today_revenue_cents, 0);
        assert_eq!(stats.today_sales, 0);
        assert_eq!(stats.total_clients, 0);
        assert_eq!(stats.pending_credit_cents, 0);
        assert_eq!(stats.overdue_count, 0);
        assert!(stats.top_debtors.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_after_sales_and_payment() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let today = Utc::now().date_naive();

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

        // total 20.00, paid 5.00 → credit 15.00
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

        let svc = DashboardService::new(db.clone());
        let stats = svc.stats(today).await.unwrap();

        assert_eq!(stats.today_revenue_cents, 2000);
        assert_eq!(stats.today_cash_cents, 500);
        assert_eq!(stats.today_credit_cents, 1500);
        assert_eq!(stats.today_sales, 1);
        assert_eq!(stats.total_clients, 1);
        assert_eq!(stats.pending_credit_cents, 1500);
        assert_eq!(stats.top_debtors.len(), 1);
        assert_eq!(stats.top_debtors[0].total_credit_cents, 1500);

        // Pay down part of the credit; pending shrinks, today's figures
        // (a sales aggregate) stay put.
        let credits = CreditService::new(db.clone());
        let credit_id = credits.list_by_client(&client.id).await.unwrap()[0].id.clone();
        credits
            .add_payment(
                &credit_id,
                CreatePaymentRequest {
                    amount_cents: 1000,
                    method: PaymentMethod::Cash,
                },
            )
            .await
            .unwrap();

        let stats = svc.stats(today).await.unwrap();
        assert_eq!(stats.today_revenue_cents, 2000);
        assert_eq!(stats.pending_credit_cents, 500);
        assert_eq!(stats.top_debtors[0].total_credit_cents, 500);
    }
}
