//! Ledger domain models and persistence-friendly types.

pub mod budget;
pub mod category;
pub mod money;
pub mod transaction;

pub use budget::Budget;
pub use category::CategoryRegistry;
pub use money::Money;
pub use transaction::{NewTransaction, Transaction, TransactionId};
