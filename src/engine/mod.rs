//! Pure computation engine for merchant revenue rankings.

use crate::datasource::StoreError;
use crate::domain::{Merchant, Money};
use thiserror::Error;

pub mod ledger;
pub mod ranker;

pub use ledger::RevenueLedger;
pub use ranker::RevenueRanker;

/// Limit used when the caller does not ask for one.
pub const DEFAULT_RANK_LIMIT: usize = 5;

/// A merchant paired with its revenue from successfully paid invoices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantRevenue {
    pub merchant: Merchant,
    pub revenue: Money,
}

/// Validated, positive number of ranking entries to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankLimit(usize);

impl RankLimit {
    /// Validate a caller-supplied limit.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `limit <= 0`.
    pub fn new(limit: i64) -> Result<Self, RankingError> {
        if limit <= 0 {
            return Err(RankingError::InvalidArgument(format!(
                "limit must be a positive integer, got {}",
                limit
            )));
        }
        usize::try_from(limit)
            .map(RankLimit)
            .map_err(|_| RankingError::InvalidArgument(format!("limit {} is too large", limit)))
    }

    /// Parse an optional textual limit, falling back to `default` when absent.
    ///
    /// # Errors
    /// Returns `InvalidArgument` for non-integer or non-positive input.
    pub fn parse(raw: Option<&str>, default: RankLimit) -> Result<Self, RankingError> {
        let Some(raw) = raw else {
            return Ok(default);
        };
        let limit = raw.trim().parse::<i64>().map_err(|_| {
            RankingError::InvalidArgument(format!("limit must be an integer, got {:?}", raw))
        })?;
        Self::new(limit)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for RankLimit {
    fn default() -> Self {
        RankLimit(DEFAULT_RANK_LIMIT)
    }
}

/// Errors raised while computing revenue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// A record breaks a data-model invariant; no ranking is produced.
    #[error("Data integrity violation at {record}: {reason}")]
    DataIntegrityViolation { record: String, reason: String },
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

impl RankingError {
    pub(crate) fn integrity(record: impl Into<String>, reason: impl Into<String>) -> Self {
        RankingError::DataIntegrityViolation {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for RankingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RankingError::DataUnavailable(msg),
            StoreError::Corrupt { table, id, reason } => {
                RankingError::integrity(format!("{} {}", table, id), reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_limit_rejects_non_positive() {
        assert!(matches!(
            RankLimit::new(0),
            Err(RankingError::InvalidArgument(_))
        ));
        assert!(matches!(
            RankLimit::new(-3),
            Err(RankingError::InvalidArgument(_))
        ));
        assert_eq!(RankLimit::new(2).unwrap().get(), 2);
    }

    #[test]
    fn test_rank_limit_parse() {
        let default = RankLimit::default();
        assert_eq!(RankLimit::parse(None, default).unwrap().get(), 5);
        assert_eq!(RankLimit::parse(Some(" 3 "), default).unwrap().get(), 3);
        assert!(matches!(
            RankLimit::parse(Some("2.5"), default),
            Err(RankingError::InvalidArgument(_))
        ));
        assert!(matches!(
            RankLimit::parse(Some("abc"), default),
            Err(RankingError::InvalidArgument(_))
        ));
        assert!(matches!(
            RankLimit::parse(Some("0"), default),
            Err(RankingError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_store_error_mapping() {
        let err: RankingError = StoreError::Unavailable("locked".to_string()).into();
        assert_eq!(err, RankingError::DataUnavailable("locked".to_string()));

        let err: RankingError = StoreError::Corrupt {
            table: "transactions",
            id: 7,
            reason: "bad result".to_string(),
        }
        .into();
        assert_eq!(
            err,
            RankingError::DataIntegrityViolation {
                record: "transactions 7".to_string(),
                reason: "bad result".to_string(),
            }
        );
    }
}
