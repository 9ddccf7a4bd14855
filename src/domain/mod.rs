//! Domain types for the merchant revenue service.
//!
//! This module provides:
//! - Exact money handling via the Money wrapper (integer minor units)
//! - Typed record identities: MerchantId, InvoiceId, ...
//! - Merchant, Customer, Item, Invoice, InvoiceItem and Transaction records
//! - Explicit record and ranking orderings

pub mod invoice;
pub mod item;
pub mod merchant;
pub mod money;
pub mod ordering;
pub mod primitives;
pub mod transaction;

pub use invoice::{Invoice, InvoiceItem};
pub use item::Item;
pub use merchant::{Customer, Merchant};
pub use money::Money;
pub use ordering::{RecordOrder, RevenueRankKey};
pub use primitives::{
    CustomerId, InvoiceId, InvoiceItemId, ItemId, MerchantId, TimeMs, TransactionId,
};
pub use transaction::{Transaction, TransactionResult, TransactionResultParseError};
