//! In-memory sales store for tests and offline callers.

use super::{SalesReader, StoreError};
use crate::domain::{
    Invoice, InvoiceId, InvoiceItem, Item, ItemId, Merchant, MerchantId, RecordOrder, Transaction,
};
use async_trait::async_trait;

/// Sales store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    merchants: Vec<Merchant>,
    items: Vec<Item>,
    invoices: Vec<Invoice>,
    invoice_items: Vec<InvoiceItem>,
    transactions: Vec<Transaction>,
    failure: Option<StoreError>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_merchant(mut self, merchant: Merchant) -> Self {
        self.merchants.push(merchant);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_invoice(mut self, invoice: Invoice) -> Self {
        self.invoices.push(invoice);
        self
    }

    pub fn with_invoice_item(mut self, invoice_item: InvoiceItem) -> Self {
        self.invoice_items.push(invoice_item);
        self
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }

    /// Make every read fail with `err`.
    pub fn with_failure(mut self, err: StoreError) -> Self {
        self.failure = Some(err);
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SalesReader for MemoryStore {
    async fn get_merchant(&self, id: MerchantId) -> Result<Option<Merchant>, StoreError> {
        self.check()?;
        Ok(self.merchants.iter().find(|m| m.id == id).cloned())
    }

    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        self.check()?;
        Ok(self.items.iter().find(|i| i.id == id).cloned())
    }

    async fn list_all_merchants(&self, order: RecordOrder) -> Result<Vec<Merchant>, StoreError> {
        self.check()?;
        let mut merchants = self.merchants.clone();
        order.sort_by_id(&mut merchants, |m| m.id);
        Ok(merchants)
    }

    async fn list_invoices_by_merchant(
        &self,
        merchant_id: MerchantId,
        order: RecordOrder,
    ) -> Result<Vec<Invoice>, StoreError> {
        self.check()?;
        let mut invoices: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|inv| inv.merchant_id == merchant_id)
            .cloned()
            .collect();
        order.sort_by_id(&mut invoices, |inv| inv.id);
        Ok(invoices)
    }

    async fn list_invoice_items_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<InvoiceItem>, StoreError> {
        self.check()?;
        let mut lines: Vec<InvoiceItem> = self
            .invoice_items
            .iter()
            .filter(|line| line.invoice_id == invoice_id)
            .cloned()
            .collect();
        order.sort_by_id(&mut lines, |line| line.id);
        Ok(lines)
    }

    async fn list_transactions_by_invoice(
        &self,
        invoice_id: InvoiceId,
        order: RecordOrder,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.check()?;
        let mut transactions: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.invoice_id == invoice_id)
            .cloned()
            .collect();
        order.sort_by_id(&mut transactions, |t| t.id);
        Ok(transactions)
    }
}
