#![doc(test(attr(deny(warnings))))]

//! Spend Ledger keeps personal transactions and category budgets consistent,
//! persists them through a pluggable key-value adapter, and projects
//! month-end spend per category.

pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::config::{BudgetPolicy, Config};
pub use crate::core::{
    ForecastEngine, ForecastEntry, LedgerActions, LedgerSnapshot, LedgerStore,
};
pub use crate::errors::{LedgerError, LedgerResult, StorageError};
pub use crate::ledger::{Budget, Money, NewTransaction, Transaction, TransactionId};

/// Initializes global tracing from `RUST_LOG`.
pub fn init() {
    utils::init_tracing(None);
}

/// Like [`init`], honouring the configured log filter.
pub fn init_with_config(config: &Config) {
    utils::init_tracing(config.log_filter.as_deref());
}
