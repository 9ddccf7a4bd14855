//! Loads sales records through a `SalesReader` and ranks merchants by revenue.

use super::{MerchantRevenue, RankLimit, RankingError, RevenueLedger};
use crate::datasource::SalesReader;
use crate::domain::{Item, ItemId, Merchant, MerchantId, RecordOrder};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Revenue queries over a single reader.
///
/// For consistent results the reader should be a snapshot (see
/// `Repository::snapshot`): every record one ranking sees then comes from the
/// same point in time.
pub struct RevenueRanker<'a> {
    reader: &'a dyn SalesReader,
}

impl<'a> RevenueRanker<'a> {
    pub fn new(reader: &'a dyn SalesReader) -> Self {
        Self { reader }
    }

    /// Top `limit` merchants by revenue from successfully paid invoices.
    ///
    /// # Errors
    /// `DataIntegrityViolation` if any loaded record breaks an invariant,
    /// `DataUnavailable` if the reader fails. No partial ranking is returned.
    pub async fn top_merchants_by_revenue(
        &self,
        limit: RankLimit,
    ) -> Result<Vec<MerchantRevenue>, RankingError> {
        let result = self.rank(limit).await;

        match &result {
            Ok(ranked) => info!(
                limit = limit.get(),
                ranked = ranked.len(),
                "Ranked merchants by revenue"
            ),
            Err(e) => log_failure(e),
        }
        result
    }

    /// Revenue for one merchant, or None if no such merchant exists.
    pub async fn merchant_revenue(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Option<MerchantRevenue>, RankingError> {
        let result = self.revenue_for(merchant_id).await;

        if let Err(e) = &result {
            log_failure(e);
        }
        result
    }

    async fn rank(&self, limit: RankLimit) -> Result<Vec<MerchantRevenue>, RankingError> {
        let merchants = self.reader.list_all_merchants(RecordOrder::IdAsc).await?;
        let ledger = self.load_ledger(merchants).await?;
        ledger.top_merchants(limit)
    }

    async fn revenue_for(
        &self,
        merchant_id: MerchantId,
    ) -> Result<Option<MerchantRevenue>, RankingError> {
        let Some(merchant) = self.reader.get_merchant(merchant_id).await? else {
            return Ok(None);
        };
        let ledger = self.load_ledger(vec![merchant]).await?;
        ledger.merchant_revenue(merchant_id)
    }

    /// Fetch everything reachable from `merchants` and index it.
    async fn load_ledger(&self, merchants: Vec<Merchant>) -> Result<RevenueLedger, RankingError> {
        let mut invoices = Vec::new();
        let mut invoice_items = Vec::new();
        let mut transactions = Vec::new();
        let mut items: HashMap<ItemId, Item> = HashMap::new();

        for merchant in &merchants {
            let merchant_invoices = self
                .reader
                .list_invoices_by_merchant(merchant.id, RecordOrder::IdAsc)
                .await?;

            for invoice in &merchant_invoices {
                let lines = self
                    .reader
                    .list_invoice_items_by_invoice(invoice.id, RecordOrder::IdAsc)
                    .await?;
                for line in &lines {
                    if items.contains_key(&line.item_id) {
                        continue;
                    }
                    // A missing item is left out here and reported by the ledger.
                    if let Some(item) = self.reader.get_item(line.item_id).await? {
                        items.insert(item.id, item);
                    }
                }
                invoice_items.extend(lines);
                transactions.extend(
                    self.reader
                        .list_transactions_by_invoice(invoice.id, RecordOrder::IdAsc)
                        .await?,
                );
            }
            invoices.extend(merchant_invoices);
        }

        let line_count = invoice_items.len();
        let transaction_count = transactions.len();
        let ledger = RevenueLedger::build(
            merchants,
            items.into_values().collect(),
            invoices,
            invoice_items,
            transactions,
        )?;

        debug!(
            merchants = ledger.merchant_count(),
            invoices = ledger.invoice_count(),
            invoice_items = line_count,
            transactions = transaction_count,
            "Loaded sales records for revenue"
        );
        Ok(ledger)
    }
}

fn log_failure(err: &RankingError) {
    match err {
        RankingError::DataIntegrityViolation { record, reason } => {
            warn!(record = %record, reason = %reason, "Revenue computation aborted")
        }
        RankingError::DataUnavailable(msg) => {
            error!(error = %msg, "Sales data unavailable for revenue computation")
        }
        RankingError::InvalidArgument(_) => {}
    }
}
