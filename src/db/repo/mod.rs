//! Repository layer for database operations.
//!
//! This module provides the `Repository` struct for all database operations.
//! Methods are organized across submodules:
//! - `mod.rs` - Fixture inserts and health checks
//! - `reads.rs` - Row decoding and the `ReadSnapshot` sales reader

mod reads;

pub use reads::ReadSnapshot;

use crate::domain::{Customer, Invoice, InvoiceItem, Item, Merchant, TimeMs, Transaction};
use sqlx::sqlite::SqlitePool;
use tokio::sync::Mutex;

/// Repository for database operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Check that the database answers a trivial query.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Open a read transaction whose reads all observe one point in time.
    ///
    /// # Errors
    /// Returns an error if no connection can be acquired.
    pub async fn snapshot(&self) -> Result<ReadSnapshot, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(ReadSnapshot::new(Mutex::new(tx)))
    }

    // =========================================================================
    // Record creation (fixtures and seeding)
    // =========================================================================

    /// Insert a merchant.
    ///
    /// # Errors
    /// Returns an error if the insert fails (e.g. duplicate id).
    pub async fn insert_merchant(&self, merchant: &Merchant) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO merchants (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(merchant.id.as_i64())
        .bind(merchant.name.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a customer.
    pub async fn insert_customer(&self, customer: &Customer) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO customers (id, first_name, last_name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer.id.as_i64())
        .bind(customer.first_name.as_str())
        .bind(customer.last_name.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert an item. The owning merchant must already exist.
    pub async fn insert_item(&self, item: &Item) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, unit_price, merchant_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.as_i64())
        .bind(item.name.as_str())
        .bind(item.description.as_str())
        .bind(item.unit_price.minor())
        .bind(item.merchant_id.as_i64())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert an invoice. Its customer and merchant must already exist.
    pub async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, merchant_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice.id.as_i64())
        .bind(invoice.customer_id.as_i64())
        .bind(invoice.merchant_id.as_i64())
        .bind(invoice.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert an invoice line. Its invoice and item must already exist.
    pub async fn insert_invoice_item(&self, line: &InvoiceItem) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO invoice_items (id, invoice_id, item_id, quantity, unit_price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(line.id.as_i64())
        .bind(line.invoice_id.as_i64())
        .bind(line.item_id.as_i64())
        .bind(line.quantity)
        .bind(line.unit_price.minor())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a payment attempt. Its invoice must already exist.
    pub async fn insert_transaction(&self, transaction: &Transaction) -> Result<(), sqlx::Error> {
        let now = TimeMs::now().as_i64();
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, invoice_id, credit_card_number, credit_card_expiration_date,
                result, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.as_i64())
        .bind(transaction.invoice_id.as_i64())
        .bind(transaction.credit_card_number.as_str())
        .bind(transaction.credit_card_expiration_date.as_deref())
        .bind(transaction.result.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
