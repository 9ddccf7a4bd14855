//! Catalog items.

use crate::domain::{ItemId, MerchantId, Money};
use serde::{Deserialize, Serialize};

/// An item offered by exactly one merchant.
///
/// `unit_price` is the current catalog price; revenue uses the price recorded
/// on each invoice line instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: Money,
    pub merchant_id: MerchantId,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        description: impl Into<String>,
        unit_price: Money,
        merchant_id: MerchantId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            unit_price,
            merchant_id,
        }
    }
}
