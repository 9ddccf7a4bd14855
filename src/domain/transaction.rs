//! Payment attempts against invoices.

use crate::domain::{InvoiceId, TransactionId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionResult {
    Success,
    Failed,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransactionResult::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionResult::Success => "success",
            TransactionResult::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction result: {0}")]
pub struct TransactionResultParseError(pub String);

impl FromStr for TransactionResult {
    type Err = TransactionResultParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(TransactionResult::Success),
            "failed" => Ok(TransactionResult::Failed),
            other => Err(TransactionResultParseError(other.to_string())),
        }
    }
}

/// A single payment attempt. An invoice may have any number of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub invoice_id: InvoiceId,
    pub credit_card_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_card_expiration_date: Option<String>,
    pub result: TransactionResult,
}

impl Transaction {
    pub fn new(id: TransactionId, invoice_id: InvoiceId, result: TransactionResult) -> Self {
        Self {
            id,
            invoice_id,
            credit_card_number: String::new(),
            credit_card_expiration_date: None,
            result,
        }
    }

    pub fn with_card(mut self, number: impl Into<String>, expiration: Option<String>) -> Self {
        self.credit_card_number = number.into();
        self.credit_card_expiration_date = expiration;
        self
    }
}
