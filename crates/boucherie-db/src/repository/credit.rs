//! # Credit Repository
//!
//! Database operations for credits and their payment history.
//!
//! The remaining-amount reduction is a guarded UPDATE: the WHERE clause
//! re-checks the balance so a concurrent payment can never push a credit
//! negative, regardless of what the caller read beforehand.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use boucherie_core::{Credit, CreditStatus, Payment};

/// Repository for credit database operations.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    pool: SqlitePool,
}

impl CreditRepository {
    /// Creates a new CreditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CreditRepository { pool }
    }

    /// Lists credits, newest first, optionally filtered by status.
    /// Payment history is loaded for each credit.
    pub async fn find_all(&self, status: Option<CreditStatus>) -> DbResult<Vec<Credit>> {
        let mut credits = sqlx::query_as::<_, Credit>(
            r#"
            SELECT id, client_id, client_name, sale_id, amount_cents, remaining_cents,
                   status, created_at, due_date
            FROM credits
            WHERE (?1 IS NULL OR status = ?1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        for credit in &mut credits {
            credit.payments = self.find_payments(&credit.id).await?;
        }

        Ok(credits)
    }

    /// Gets a credit by ID, with its payment history.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Credit>> {
        let credit = sqlx::query_as::<_, Credit>(
            r#"
            SELECT id, client_id, client_name, sale_id, amount_cents, remaining_cents,
                   status, created_at, due_date
            FROM credits
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match credit {
            Some(mut credit) => {
                credit.payments = self.find_payments(&credit.id).await?;
                Ok(Some(credit))
            }
            None => Ok(None),
        }
    }

    /// Lists a client's credits, newest first, with payment history.
    pub async fn find_by_client(&self, client_id: &str) -> DbResult<Vec<Credit>> {
        let mut credits = sqlx::query_as::<_, Credit>(
            r#"
            SELECT id, client_id, client_name, sale_id, amount_cents, remaining_cents,
                   status, created_at, due_date
            FROM credits
            WHERE client_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        for credit in &mut credits {
            credit.payments = self.find_payments(&credit.id).await?;
        }

        Ok(credits)
    }

    /// Gets the payments belonging to a credit, most recent first.
    pub async fn find_payments(&self, credit_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, credit_id, amount_cents, date, method
            FROM payments
            WHERE credit_id = ?1
            ORDER BY date DESC
            "#,
        )
        .bind(credit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Inserts a new credit on the given connection.
    ///
    /// Runs inside the sale workflow's transaction.
    pub async fn insert(conn: &mut SqliteConnection, credit: &Credit) -> DbResult<()> {
        debug!(id = %credit.id, sale_id = %credit.sale_id, amount = %credit.amount_cents, "inserting credit");

        sqlx::query(
            r#"
            INSERT INTO credits (id, client_id, client_name, sale_id, amount_cents,
                                 remaining_cents, status, created_at, due_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&credit.id)
        .bind(&credit.client_id)
        .bind(&credit.client_name)
        .bind(&credit.sale_id)
        .bind(credit.amount_cents)
        .bind(credit.remaining_cents)
        .bind(credit.status)
        .bind(credit.created_at)
        .bind(credit.due_date)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Appends a payment record on the given connection.
    ///
    /// Runs inside the payment workflow's transaction.
    pub async fn add_payment(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
        debug!(credit_id = %payment.credit_id, amount = %payment.amount_cents, "recording payment");

        sqlx::query(
            r#"
            INSERT INTO payments (id, credit_id, amount_cents, date, method)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.credit_id)
        .bind(payment.amount_cents)
        .bind(payment.date)
        .bind(payment.method)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Reduces a credit's remaining amount by `amount_cents`, flipping the
    /// status to `paid` exactly when the balance reaches zero.
    ///
    /// The WHERE clause is the authoritative bounds check: it refuses a
    /// settled credit or a reduction past zero even if a concurrent payment
    /// landed between the caller's read and this write. Returns whether the
    /// reduction was applied.
    pub async fn reduce_remaining(
        conn: &mut SqliteConnection,
        credit_id: &str,
        amount_cents: i64,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE credits
            SET status = CASE WHEN remaining_cents - ?2 <= 0 THEN 'paid' ELSE status END,
                remaining_cents = MAX(remaining_cents - ?2, 0)
            WHERE id = ?1
              AND status != 'paid'
              AND remaining_cents >= ?2
            "#,
        )
        .bind(credit_id)
        .bind(amount_cents)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips every open credit whose due date has passed to `overdue`.
    /// Returns the number of credits reclassified.
    ///
    /// This is the explicit sweep backing the overdue classification; it
    /// is never triggered as a side effect of payment application.
    pub async fn mark_overdue(&self, today: NaiveDate) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE credits
            SET status = 'overdue'
            WHERE status = 'open'
              AND due_date IS NOT NULL
              AND due_date < ?1
            "#,
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
