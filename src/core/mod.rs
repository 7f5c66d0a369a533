//! Ledger consistency engine, forecasting, and the surface exposed to callers.

pub mod actions;
pub mod clock;
pub mod forecast;
pub mod ledger_store;
pub mod utils;

pub use actions::LedgerActions;
pub use clock::{Clock, FixedClock, SystemClock};
pub use forecast::{ForecastEngine, ForecastEntry};
pub use ledger_store::{LedgerSnapshot, LedgerStore};
