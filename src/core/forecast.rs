//! Month-end spend projection per category.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Money, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub category: String,
    pub prediction: Money,
}

pub struct ForecastEngine;

impl ForecastEngine {
    /// Projects spend for the rest of `today`'s month as
    /// `average transaction amount * days remaining`, per category.
    ///
    /// Entries follow the order in which each category first appears. On the
    /// last day of the month every prediction is zero. Totals and predictions
    /// saturate at the representable bounds.
    pub fn compute(transactions: &[Transaction], today: NaiveDate) -> Vec<ForecastEntry> {
        let days_remaining = Decimal::from(days_remaining_in_month(today));

        let mut totals: Vec<(&str, Decimal, u32)> = Vec::new();
        for txn in transactions {
            match totals
                .iter_mut()
                .find(|(category, _, _)| *category == txn.category)
            {
                Some((_, sum, count)) => {
                    *sum = sum.saturating_add(txn.amount.amount());
                    *count += 1;
                }
                None => totals.push((txn.category.as_str(), txn.amount.amount(), 1)),
            }
        }

        totals
            .into_iter()
            .map(|(category, sum, count)| {
                let average = sum / Decimal::from(count);
                ForecastEntry {
                    category: category.to_string(),
                    prediction: Money::new(average.saturating_mul(days_remaining)).round_cents(),
                }
            })
            .collect()
    }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(date.day(), |last| last.day())
}

pub fn days_remaining_in_month(date: NaiveDate) -> u32 {
    days_in_month(date) - date.day()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionId;

    fn txn(category: &str, amount: Money) -> Transaction {
        Transaction {
            id: TransactionId::generate(),
            description: format!("{category} spend"),
            category: category.to_string(),
            amount,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 12, 31)), 31);
        assert_eq!(days_in_month(date(2024, 4, 30)), 30);
    }

    #[test]
    fn averages_per_category_in_first_seen_order() {
        let transactions = vec![
            txn("Transport", Money::from_major(50)),
            txn("Food", Money::from_major(100)),
            txn("Food", Money::from_major(300)),
        ];
        let forecast = ForecastEngine::compute(&transactions, date(2024, 6, 10));
        assert_eq!(
            forecast,
            vec![
                ForecastEntry {
                    category: "Transport".into(),
                    prediction: Money::from_major(1000),
                },
                ForecastEntry {
                    category: "Food".into(),
                    prediction: Money::from_major(4000),
                },
            ]
        );
    }

    #[test]
    fn predictions_round_to_cents() {
        let transactions = vec![
            txn("Food", Money::from_major(100)),
            txn("Food", Money::from_major(100)),
            txn("Food", Money::from_major(101)),
        ];
        // 301 / 3 * 2 = 200.666...
        let forecast = ForecastEngine::compute(&transactions, date(2024, 6, 28));
        assert_eq!(forecast[0].prediction, Money::from_minor(20067));
    }

    #[test]
    fn last_day_of_month_predicts_zero() {
        let transactions = vec![txn("Food", Money::from_major(80))];
        let forecast = ForecastEngine::compute(&transactions, date(2024, 1, 31));
        assert_eq!(forecast[0].prediction, Money::ZERO);
    }

    #[test]
    fn empty_history_has_no_entries() {
        assert!(ForecastEngine::compute(&[], date(2024, 1, 1)).is_empty());
    }
}
