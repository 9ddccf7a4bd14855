//! Indexed, validated view of sales records and the revenue aggregation over it.

use super::{MerchantRevenue, RankLimit, RankingError};
use crate::domain::{
    Invoice, InvoiceId, InvoiceItem, InvoiceItemId, Item, ItemId, Merchant, MerchantId, Money,
    RevenueRankKey, Transaction, TransactionId,
};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sales records indexed by foreign key (id -> dependents).
///
/// Construction enforces the referential and value invariants; once built,
/// every revenue query is total apart from arithmetic overflow.
#[derive(Debug, Default)]
pub struct RevenueLedger {
    merchants: BTreeMap<MerchantId, Merchant>,
    /// Item id -> owning merchant.
    items: HashMap<ItemId, MerchantId>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    lines_by_invoice: HashMap<InvoiceId, Vec<InvoiceItem>>,
    transactions_by_invoice: HashMap<InvoiceId, Vec<Transaction>>,
}

impl RevenueLedger {
    /// Index and validate a set of records.
    ///
    /// # Errors
    /// Returns `DataIntegrityViolation` naming the first offending record.
    pub fn build(
        merchants: Vec<Merchant>,
        items: Vec<Item>,
        invoices: Vec<Invoice>,
        invoice_items: Vec<InvoiceItem>,
        transactions: Vec<Transaction>,
    ) -> Result<Self, RankingError> {
        let mut ledger = RevenueLedger::default();

        for merchant in merchants {
            match ledger.merchants.entry(merchant.id) {
                Entry::Occupied(_) => {
                    return Err(RankingError::integrity(
                        format!("merchant {}", merchant.id),
                        "duplicate merchant id",
                    ))
                }
                Entry::Vacant(slot) => {
                    slot.insert(merchant);
                }
            }
        }

        for item in items {
            let record = || format!("item {}", item.id);
            if item.unit_price.is_negative() {
                return Err(RankingError::integrity(
                    record(),
                    format!("unit price must be >= 0, got {}", item.unit_price.minor()),
                ));
            }
            if ledger.items.insert(item.id, item.merchant_id).is_some() {
                return Err(RankingError::integrity(record(), "duplicate item id"));
            }
        }

        for invoice in invoices {
            if !ledger.merchants.contains_key(&invoice.merchant_id) {
                return Err(RankingError::integrity(
                    format!("invoice {}", invoice.id),
                    format!("references missing merchant {}", invoice.merchant_id),
                ));
            }
            match ledger.invoices.entry(invoice.id) {
                Entry::Occupied(_) => {
                    return Err(RankingError::integrity(
                        format!("invoice {}", invoice.id),
                        "duplicate invoice id",
                    ))
                }
                Entry::Vacant(slot) => {
                    slot.insert(invoice);
                }
            }
        }

        let mut line_ids: HashSet<InvoiceItemId> = HashSet::new();
        for line in invoice_items {
            ledger.check_line(&line)?;
            if !line_ids.insert(line.id) {
                return Err(RankingError::integrity(
                    format!("invoice_item {}", line.id),
                    "duplicate invoice_item id",
                ));
            }
            ledger
                .lines_by_invoice
                .entry(line.invoice_id)
                .or_default()
                .push(line);
        }

        let mut transaction_ids: HashSet<TransactionId> = HashSet::new();
        for transaction in transactions {
            if !ledger.invoices.contains_key(&transaction.invoice_id) {
                return Err(RankingError::integrity(
                    format!("transaction {}", transaction.id),
                    format!("references missing invoice {}", transaction.invoice_id),
                ));
            }
            if !transaction_ids.insert(transaction.id) {
                return Err(RankingError::integrity(
                    format!("transaction {}", transaction.id),
                    "duplicate transaction id",
                ));
            }
            ledger
                .transactions_by_invoice
                .entry(transaction.invoice_id)
                .or_default()
                .push(transaction);
        }

        Ok(ledger)
    }

    fn check_line(&self, line: &InvoiceItem) -> Result<(), RankingError> {
        let record = || format!("invoice_item {}", line.id);
        let Some(invoice) = self.invoices.get(&line.invoice_id) else {
            return Err(RankingError::integrity(
                record(),
                format!("references missing invoice {}", line.invoice_id),
            ));
        };
        let Some(owner) = self.items.get(&line.item_id) else {
            return Err(RankingError::integrity(
                record(),
                format!("references missing item {}", line.item_id),
            ));
        };
        if *owner != invoice.merchant_id {
            return Err(RankingError::integrity(
                record(),
                format!(
                    "item {} belongs to merchant {}, invoice {} to merchant {}",
                    line.item_id, owner, invoice.id, invoice.merchant_id
                ),
            ));
        }
        if line.quantity < 1 {
            return Err(RankingError::integrity(
                record(),
                format!("quantity must be >= 1, got {}", line.quantity),
            ));
        }
        if line.unit_price.is_negative() {
            return Err(RankingError::integrity(
                record(),
                format!("unit price must be >= 0, got {}", line.unit_price.minor()),
            ));
        }
        Ok(())
    }

    pub fn merchant_count(&self) -> usize {
        self.merchants.len()
    }

    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    /// True iff at least one transaction against the invoice succeeded.
    pub fn is_eligible(&self, invoice_id: InvoiceId) -> bool {
        self.transactions_by_invoice
            .get(&invoice_id)
            .is_some_and(|txs| txs.iter().any(|t| t.result.is_success()))
    }

    /// Revenue an invoice contributes: its line totals if eligible, else zero.
    ///
    /// # Errors
    /// Returns `DataIntegrityViolation` if the total overflows.
    pub fn invoice_revenue(&self, invoice_id: InvoiceId) -> Result<Money, RankingError> {
        if !self.is_eligible(invoice_id) {
            return Ok(Money::zero());
        }

        let mut total = Money::zero();
        for line in self.lines_by_invoice.get(&invoice_id).into_iter().flatten() {
            total = line
                .line_total()
                .and_then(|line_total| total.checked_add(line_total))
                .ok_or_else(|| {
                    RankingError::integrity(
                        format!("invoice {}", invoice_id),
                        "revenue overflows i64 minor units",
                    )
                })?;
        }
        Ok(total)
    }

    /// Revenue for every merchant, including those with zero.
    ///
    /// # Errors
    /// Returns `DataIntegrityViolation` if any total overflows.
    pub fn revenue_by_merchant(&self) -> Result<BTreeMap<MerchantId, Money>, RankingError> {
        let mut totals: BTreeMap<MerchantId, Money> = self
            .merchants
            .keys()
            .map(|id| (*id, Money::zero()))
            .collect();

        for invoice in self.invoices.values() {
            let revenue = self.invoice_revenue(invoice.id)?;
            if revenue.is_zero() {
                continue;
            }
            let total = totals.entry(invoice.merchant_id).or_default();
            *total = total.checked_add(revenue).ok_or_else(|| {
                RankingError::integrity(
                    format!("merchant {}", invoice.merchant_id),
                    "revenue overflows i64 minor units",
                )
            })?;
        }

        Ok(totals)
    }

    /// Top merchants by revenue, descending, ties by ascending merchant id.
    ///
    /// Merchants with zero revenue are never ranked.
    pub fn top_merchants(&self, limit: RankLimit) -> Result<Vec<MerchantRevenue>, RankingError> {
        let mut ranked: Vec<(Money, MerchantId)> = self
            .revenue_by_merchant()?
            .into_iter()
            .filter(|(_, revenue)| !revenue.is_zero())
            .map(|(id, revenue)| (revenue, id))
            .collect();

        ranked.sort_by_key(|(revenue, id)| RevenueRankKey::new(*revenue, *id));
        ranked.truncate(limit.get());

        Ok(ranked
            .into_iter()
            .filter_map(|(revenue, id)| {
                self.merchants.get(&id).map(|merchant| MerchantRevenue {
                    merchant: merchant.clone(),
                    revenue,
                })
            })
            .collect())
    }

    /// Revenue for a single merchant, or None if the merchant is unknown.
    pub fn merchant_revenue(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Option<MerchantRevenue>, RankingError> {
        let Some(merchant) = self.merchants.get(&merchant_id) else {
            return Ok(None);
        };

        let mut revenue = Money::zero();
        for invoice in self
            .invoices
            .values()
            .filter(|invoice| invoice.merchant_id == merchant_id)
        {
            revenue = revenue
                .checked_add(self.invoice_revenue(invoice.id)?)
                .ok_or_else(|| {
                    RankingError::integrity(
                        format!("merchant {}", merchant_id),
                        "revenue overflows i64 minor units",
                    )
                })?;
        }

        Ok(Some(MerchantRevenue {
            merchant: merchant.clone(),
            revenue,
        }))
    }
}
