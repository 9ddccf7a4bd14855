pub mod api;
pub mod config;
pub mod datasource;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;

pub use config::Config;
pub use datasource::{MemoryStore, SalesReader, StoreError};
pub use db::{init_db, ReadSnapshot, Repository};
pub use domain::{
    Customer, CustomerId, Invoice, InvoiceId, InvoiceItem, InvoiceItemId, Item, ItemId, Merchant,
    MerchantId, Money, RecordOrder, Transaction, TransactionId, TransactionResult,
};
pub use engine::{MerchantRevenue, RankLimit, RankingError, RevenueLedger, RevenueRanker};
pub use error::AppError;
