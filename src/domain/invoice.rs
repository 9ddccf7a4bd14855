//! Invoices and their line items.

use crate::domain::{CustomerId, InvoiceId, InvoiceItemId, ItemId, MerchantId, Money};
use serde::{Deserialize, Serialize};

/// An order placed by one customer with one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub merchant_id: MerchantId,
    /// Free-form fulfilment status (e.g. "shipped").
    pub status: String,
}

impl Invoice {
    pub fn new(
        id: InvoiceId,
        customer_id: CustomerId,
        merchant_id: MerchantId,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            customer_id,
            merchant_id,
            status: status.into(),
        }
    }
}

/// One purchased item on an invoice, priced at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: InvoiceItemId,
    pub invoice_id: InvoiceId,
    pub item_id: ItemId,
    pub quantity: i64,
    pub unit_price: Money,
}

impl InvoiceItem {
    pub fn new(
        id: InvoiceItemId,
        invoice_id: InvoiceId,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        Self {
            id,
            invoice_id,
            item_id,
            quantity,
            unit_price,
        }
    }

    /// `quantity * unit_price`, or None on overflow.
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_qty(self.quantity)
    }
}
