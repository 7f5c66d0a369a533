use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;
use crate::errors::{LedgerError, LedgerResult};

/// Opaque transaction identifier.
///
/// New identifiers are UUID v4 strings; stored records may carry any string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub category: String,
    pub amount: Money,
}

impl Transaction {
    pub fn validate(&self) -> LedgerResult<()> {
        validate_fields(&self.description, &self.category, self.amount)
    }
}

/// Caller-supplied fields for a transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub description: String,
    pub category: String,
    pub amount: Money,
}

impl NewTransaction {
    pub fn new(description: impl Into<String>, category: impl Into<String>, amount: Money) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
            amount,
        }
    }

    /// Builds a draft from raw form text, parsing the amount.
    pub fn from_input(description: &str, category: &str, amount: &str) -> LedgerResult<Self> {
        let draft = Self::new(description, category, Money::parse(amount)?);
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        validate_fields(&self.description, &self.category, self.amount)
    }

    pub(crate) fn into_transaction(self) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            description: self.description,
            category: self.category,
            amount: self.amount,
        }
    }
}

fn validate_fields(description: &str, category: &str, amount: Money) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::validation("description is required"));
    }
    if category.trim().is_empty() {
        return Err(LedgerError::validation("category is required"));
    }
    if amount.is_negative() {
        return Err(LedgerError::validation(format!(
            "amount must not be negative, got {}",
            amount
        )));
    }
    if amount > Money::max_transaction() {
        return Err(LedgerError::validation(format!(
            "amount must not exceed {}, got {}",
            Money::max_transaction(),
            amount
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_parses_amount_text() {
        let draft = NewTransaction::from_input("Coffee", "Food", "4.50").unwrap();
        assert_eq!(draft.amount, Money::from_minor(450));
    }

    #[test]
    fn rejects_missing_fields() {
        for (description, category, amount) in [("", "Food", "1"), ("Tea", " ", "1"), ("Tea", "Food", "")] {
            let err = NewTransaction::from_input(description, category, amount)
                .expect_err("draft must be rejected");
            assert!(matches!(err, LedgerError::Validation(_)), "unexpected error: {err:?}");
        }
    }

    #[test]
    fn rejects_negative_amounts() {
        let draft = NewTransaction::new("Refund", "Food", Money::from_major(-5));
        assert!(matches!(draft.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn rejects_amounts_above_the_ceiling() {
        let at_ceiling = NewTransaction::new("House", "Home", Money::max_transaction());
        assert!(at_ceiling.validate().is_ok());

        let err = NewTransaction::from_input("Yacht", "Fun", "79228162514264337593543950335")
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref msg) if msg.contains("exceed")));
    }

    #[test]
    fn loads_records_with_text_amounts_and_short_ids() {
        let json = r#"{"id":"1","description":"Coffee","category":"Food","amount":"200"}"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(txn.id.as_str(), "1");
        assert_eq!(txn.amount, Money::from_major(200));
    }
}
