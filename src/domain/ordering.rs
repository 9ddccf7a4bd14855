//! Explicit orderings for record lists and revenue rankings.

use crate::domain::{MerchantId, Money};
use std::cmp::Reverse;

/// Order in which a reader returns a list of records.
///
/// Every list call names one; there is no implicit default scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrder {
    #[default]
    IdAsc,
    IdDesc,
}

impl RecordOrder {
    /// SQL `ORDER BY` fragment for this ordering.
    pub fn sql(&self) -> &'static str {
        match self {
            RecordOrder::IdAsc => "ORDER BY id ASC",
            RecordOrder::IdDesc => "ORDER BY id DESC",
        }
    }

    /// Sort records in place by the id returned from `key`.
    pub fn sort_by_id<T, K: Ord>(&self, records: &mut [T], key: impl Fn(&T) -> K) {
        match self {
            RecordOrder::IdAsc => records.sort_by(|a, b| key(a).cmp(&key(b))),
            RecordOrder::IdDesc => records.sort_by(|a, b| key(b).cmp(&key(a))),
        }
    }
}

/// Ranking key for merchants.
///
/// Ordering: revenue descending -> merchant id ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RevenueRankKey {
    revenue: Reverse<Money>,
    merchant_id: MerchantId,
}

impl RevenueRankKey {
    pub fn new(revenue: Money, merchant_id: MerchantId) -> Self {
        RevenueRankKey {
            revenue: Reverse(revenue),
            merchant_id,
        }
    }
}
