//! Read-only data access for merchant revenue computations.

use crate::domain::{
    Invoice, InvoiceId, InvoiceItem, Item, ItemId, Merchant, MerchantId, RecordOrder, Transaction,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Keyed lookups and filtered scans over the sales schema.
///
/// Each list call takes the ordering the caller needs; implementations must
/// honour it rather than apply a default of their own.
#[async_trait]
pub trait SalesReader: Send + Sync {
    /// Fetch a merchant by id.
    async fn get_merchant(&self, id: MerchantId) -> Result<Option<Merchant>, StoreError>;

    /// Fetch an item by id.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// List every merchant.
    async fn list_all_merchants(&self, order: RecordOrder) -> Result<Vec<Merchant>, StoreError>;

    /// List the invoices billed by a merchant.
    async fn list_invoices_by_merchant(
        &self,
        merchant_id: MerchantId,
        order: RecordOrder,
    ) -> Result<Vec<Invoice>, StoreError>;

    /// List the line items of an invoice.
    async fn list_invoice_items_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<InvoiceItem>, StoreError>;

    /// List the payment attempts against an invoice.
    async fn list_transactions_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// Error type for data access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not serve the read (connection, I/O, locking).
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A stored row could not be decoded into a domain record.
    #[error("corrupt {table} row {id}: {reason}")]
    Corrupt {
        table: &'static str,
        id: i64,
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
