use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::errors::{LedgerError, LedgerResult};

/// A spending ceiling for one category.
///
/// `spent` is maintained by the ledger store; `remaining` is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub category: String,
    pub limit: Money,
    #[serde(default)]
    pub spent: Money,
}

impl Budget {
    pub fn new(category: impl Into<String>, limit: Money) -> Self {
        Self {
            category: category.into(),
            limit,
            spent: Money::ZERO,
        }
    }

    /// Saturates rather than overflowing on out-of-range loaded values.
    pub fn remaining(&self) -> Money {
        self.limit.saturating_sub(self.spent)
    }

    pub fn is_over_limit(&self) -> bool {
        self.spent > self.limit
    }

    /// Fraction of the limit already spent, `None` for a zero limit or an
    /// unrepresentable ratio.
    pub fn utilization(&self) -> Option<Decimal> {
        self.spent.amount().checked_div(self.limit.amount())
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.category.trim().is_empty() {
            return Err(LedgerError::validation("budget category is required"));
        }
        if !self.limit.is_positive() {
            return Err(LedgerError::validation(format!(
                "budget limit must be greater than zero, got {}",
                self.limit
            )));
        }
        Ok(())
    }
}
