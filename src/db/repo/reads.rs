//! Snapshot reads: the SQLite implementation of `SalesReader`.

use crate::datasource::{SalesReader, StoreError};
use crate::domain::{
    CustomerId, Invoice, InvoiceId, InvoiceItem, InvoiceItemId, Item, ItemId, Merchant,
    MerchantId, Money, RecordOrder, Transaction, TransactionId, TransactionResult,
};
use async_trait::async_trait;
use sqlx::sqlite::{Sqlite, SqliteRow};
use sqlx::{Executor, Row};
use std::str::FromStr;
use tokio::sync::Mutex;

/// A read transaction over the sales tables.
///
/// All reads through one snapshot see the same committed state, so a
/// transaction inserted mid-ranking is either wholly visible or absent.
/// Dropping the snapshot rolls the (read-only) transaction back.
pub struct ReadSnapshot {
    tx: Mutex<sqlx::Transaction<'static, Sqlite>>,
}

impl ReadSnapshot {
    pub(super) fn new(tx: Mutex<sqlx::Transaction<'static, Sqlite>>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl SalesReader for ReadSnapshot {
    async fn get_merchant(&self, id: MerchantId) -> Result<Option<Merchant>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_merchant(&mut **tx, id).await
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_item(&mut **tx, id).await
    }

    async fn list_all_merchants(&self, order: RecordOrder) -> Result<Vec<Merchant>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_merchants(&mut **tx, order).await
    }

    async fn list_invoices_by_merchant(
        &self,
        merchant_id: MerchantId,
        order: RecordOrder,
    ) -> Result<Vec<Invoice>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_invoices_by_merchant(&mut **tx, merchant_id, order).await
    }

    async fn list_invoice_items_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<InvoiceItem>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_invoice_items_by_invoice(&mut **tx, invoice_id, order).await
    }

    async fn list_transactions_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut tx = self.tx.lock().await;
        fetch_transactions_by_invoice(&mut **tx, invoice_id, order).await
    }
}

// =============================================================================
// Queries
// =============================================================================

async fn fetch_merchant<'e, E>(ex: E, id: MerchantId) -> Result<Option<Merchant>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT id, name FROM merchants WHERE id = ?")
        .bind(id.as_i64())
        .fetch_optional(ex)
        .await?;
    row.as_ref().map(decode_merchant).transpose()
}

async fn fetch_merchants<'e, E>(ex: E, order: RecordOrder) -> Result<Vec<Merchant>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT id, name FROM merchants {}", order.sql());
    let rows = sqlx::query(&sql).fetch_all(ex).await?;
    rows.iter().map(decode_merchant).collect()
}

async fn fetch_item<'e, E>(ex: E, id: ItemId) -> Result<Option<Item>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        r#"
        SELECT id, name, description, unit_price, merchant_id
        FROM items
        WHERE id = ?
        "#,
    )
    .bind(id.as_i64())
    .fetch_optional(ex)
    .await?;
    row.as_ref().map(decode_item).transpose()
}

async fn fetch_invoices_by_merchant<'e, E>(
    ex: E,
    merchant_id: MerchantId,
    order: RecordOrder,
) -> Result<Vec<Invoice>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        r#"
        SELECT id, customer_id, merchant_id, status
        FROM invoices
        WHERE merchant_id = ?
        {}
        "#,
        order.sql()
    );
    let rows = sqlx::query(&sql)
        .bind(merchant_id.as_i64())
        .fetch_all(ex)
        .await?;
    rows.iter().map(decode_invoice).collect()
}

async fn fetch_invoice_items_by_invoice<'e, E>(
    ex: E,
    invoice_id: InvoiceId,
    order: RecordOrder,
) -> Result<Vec<InvoiceItem>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        r#"
        SELECT id, invoice_id, item_id, quantity, unit_price
        FROM invoice_items
        WHERE invoice_id = ?
        {}
        "#,
        order.sql()
    );
    let rows = sqlx::query(&sql)
        .bind(invoice_id.as_i64())
        .fetch_all(ex)
        .await?;
    rows.iter().map(decode_invoice_item).collect()
}

async fn fetch_transactions_by_invoice<'e, E>(
    ex: E,
    invoice_id: InvoiceId,
    order: RecordOrder,
) -> Result<Vec<Transaction>, StoreError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        r#"
        SELECT id, invoice_id, credit_card_number, credit_card_expiration_date, result
        FROM transactions
        WHERE invoice_id = ?
        {}
        "#,
        order.sql()
    );
    let rows = sqlx::query(&sql)
        .bind(invoice_id.as_i64())
        .fetch_all(ex)
        .await?;
    rows.iter().map(decode_transaction).collect()
}

// =============================================================================
// Row decoding
// =============================================================================

fn column<'r, T>(
    row: &'r SqliteRow,
    table: &'static str,
    id: i64,
    name: &str,
) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name).map_err(|e| StoreError::Corrupt {
        table,
        id,
        reason: format!("column {}: {}", name, e),
    })
}

fn decode_merchant(row: &SqliteRow) -> Result<Merchant, StoreError> {
    let id: i64 = row.try_get("id")?;
    Ok(Merchant {
        id: MerchantId::new(id),
        name: column(row, "merchants", id, "name")?,
    })
}

fn decode_item(row: &SqliteRow) -> Result<Item, StoreError> {
    let id: i64 = row.try_get("id")?;
    Ok(Item {
        id: ItemId::new(id),
        name: column(row, "items", id, "name")?,
        description: column(row, "items", id, "description")?,
        unit_price: Money::from_minor(column(row, "items", id, "unit_price")?),
        merchant_id: MerchantId::new(column(row, "items", id, "merchant_id")?),
    })
}

fn decode_invoice(row: &SqliteRow) -> Result<Invoice, StoreError> {
    let id: i64 = row.try_get("id")?;
    Ok(Invoice {
        id: InvoiceId::new(id),
        customer_id: CustomerId::new(column(row, "invoices", id, "customer_id")?),
        merchant_id: MerchantId::new(column(row, "invoices", id, "merchant_id")?),
        status: column(row, "invoices", id, "status")?,
    })
}

fn decode_invoice_item(row: &SqliteRow) -> Result<InvoiceItem, StoreError> {
    let id: i64 = row.try_get("id")?;
    Ok(InvoiceItem {
        id: InvoiceItemId::new(id),
        invoice_id: InvoiceId::new(column(row, "invoice_items", id, "invoice_id")?),
        item_id: ItemId::new(column(row, "invoice_items", id, "item_id")?),
        quantity: column(row, "invoice_items", id, "quantity")?,
        unit_price: Money::from_minor(column(row, "invoice_items", id, "unit_price")?),
    })
}

fn decode_transaction(row: &SqliteRow) -> Result<Transaction, StoreError> {
    let id: i64 = row.try_get("id")?;
    let result: String = column(row, "transactions", id, "result")?;
    let result = TransactionResult::from_str(&result).map_err(|e| StoreError::Corrupt {
        table: "transactions",
        id,
        reason: e.to_string(),
    })?;

    Ok(Transaction {
        id: TransactionId::new(id),
        invoice_id: InvoiceId::new(column(row, "transactions", id, "invoice_id")?),
        credit_card_number: column(row, "transactions", id, "credit_card_number")?,
        credit_card_expiration_date: column(
            row,
            "transactions",
            id,
            "credit_card_expiration_date",
        )?,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_db, Repository};
    use crate::domain::Customer;
    use tempfile::TempDir;

    async fn seeded_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let repo = Repository::new(init_db(&db_path).await.expect("init_db failed"));

        let merchant = Merchant::new(MerchantId::new(1), "Schroeder-Jerde");
        repo.insert_merchant(&merchant).await.unwrap();
        repo.insert_customer(&Customer::new(CustomerId::new(1), "Joey", "Ondricka"))
            .await
            .unwrap();
        repo.insert_item(&Item::new(
            ItemId::new(10),
            "Item Qui Esse",
            "Nihil autem sit odio inventore deleniti.",
            Money::from_minor(75107),
            merchant.id,
        ))
        .await
        .unwrap();
        repo.insert_invoice(&Invoice::new(
            InvoiceId::new(100),
            CustomerId::new(1),
            merchant.id,
            "shipped",
        ))
        .await
        .unwrap();
        for (id, qty) in [(1000, 5), (1001, 9)] {
            repo.insert_invoice_item(&InvoiceItem::new(
                InvoiceItemId::new(id),
                InvoiceId::new(100),
                ItemId::new(10),
                qty,
                Money::from_minor(13635),
            ))
            .await
            .unwrap();
        }
        repo.insert_transaction(
            &Transaction::new(
                TransactionId::new(1),
                InvoiceId::new(100),
                TransactionResult::Success,
            )
            .with_card("4654405418249632", None),
        )
        .await
        .unwrap();

        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_snapshot_reads_records() {
        let (repo, _temp) = seeded_repo().await;
        let snapshot = repo.snapshot().await.unwrap();

        let merchant = snapshot
            .get_merchant(MerchantId::new(1))
            .await
            .unwrap()
            .expect("merchant exists");
        assert_eq!(merchant.name, "Schroeder-Jerde");
        assert!(snapshot
            .get_merchant(MerchantId::new(2))
            .await
            .unwrap()
            .is_none());

        let item = snapshot.get_item(ItemId::new(10)).await.unwrap().unwrap();
        assert_eq!(item.unit_price.minor(), 75107);

        let invoices = snapshot
            .list_invoices_by_merchant(MerchantId::new(1), RecordOrder::IdAsc)
            .await
            .unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].status, "shipped");

        let lines = snapshot
            .list_invoice_items_by_invoice(InvoiceId::new(100), RecordOrder::IdDesc)
            .await
            .unwrap();
        assert_eq!(
            lines.iter().map(|l| l.id.as_i64()).collect::<Vec<_>>(),
            vec![1001, 1000]
        );

        let transactions = snapshot
            .list_transactions_by_invoice(InvoiceId::new(100), RecordOrder::IdAsc)
            .await
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert!(transactions[0].result.is_success());
        assert_eq!(transactions[0].credit_card_number, "4654405418249632");
        assert_eq!(transactions[0].credit_card_expiration_date, None);
    }

    #[tokio::test]
    async fn test_unknown_result_is_corrupt() {
        let (repo, _temp) = seeded_repo().await;
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, invoice_id, credit_card_number, credit_card_expiration_date,
                result, created_at, updated_at
            ) VALUES (2, 100, '4580251236515201', NULL, 'pending', 0, 0)
            "#,
        )
        .execute(repo.pool())
        .await
        .unwrap();

        let snapshot = repo.snapshot().await.unwrap();
        let err = snapshot
            .list_transactions_by_invoice(InvoiceId::new(100), RecordOrder::IdAsc)
            .await
            .unwrap_err();
        match err {
            StoreError::Corrupt { table, id, .. } => {
                assert_eq!(table, "transactions");
                assert_eq!(id, 2);
            }
            other => panic!("Expected Corrupt error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_writes() {
        let (repo, _temp) = seeded_repo().await;
        let snapshot = repo.snapshot().await.unwrap();

        // First read pins the snapshot.
        let before = snapshot
            .list_transactions_by_invoice(InvoiceId::new(100), RecordOrder::IdAsc)
            .await
            .unwrap();
        assert_eq!(before.len(), 1);

        repo.insert_transaction(&Transaction::new(
            TransactionId::new(2),
            InvoiceId::new(100),
            TransactionResult::Failed,
        ))
        .await
        .unwrap();

        let during = snapshot
            .list_transactions_by_invoice(InvoiceId::new(100), RecordOrder::IdAsc)
            .await
            .unwrap();
        assert_eq!(during.len(), 1);
        drop(snapshot);

        let fresh = repo.snapshot().await.unwrap();
        let after = fresh
            .list_transactions_by_invoice(InvoiceId::new(100), RecordOrder::IdAsc)
            .await
            .unwrap();
        assert_eq!(after.len(), 2);
    }
}
