mod common;

use proptest::prelude::*;
use spend_ledger::{Budget, LedgerStore, Money, NewTransaction};

const CATEGORIES: [&str; 4] = ["Food", "Transport", "Fun", "Unbudgeted"];

#[derive(Debug, Clone)]
enum Op {
    Add { category: usize, cents: i64 },
    Update { pick: usize, category: usize, cents: i64 },
    Delete { pick: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CATEGORIES.len(), 0i64..100_000).prop_map(|(category, cents)| Op::Add { category, cents }),
        (any::<usize>(), 0..CATEGORIES.len(), 0i64..100_000)
            .prop_map(|(pick, category, cents)| Op::Update { pick, category, cents }),
        any::<usize>().prop_map(|pick| Op::Delete { pick }),
    ]
}

async fn assert_spent_matches_history(store: &LedgerStore) {
    let transactions = store.transactions().await;
    for budget in store.budgets().await {
        let expected: Money = transactions
            .iter()
            .filter(|txn| txn.category == budget.category)
            .map(|txn| txn.amount)
            .sum();
        assert_eq!(budget.spent, expected, "budget `{}` drifted", budget.category);
    }
}

async fn run(ops: Vec<Op>) {
    let (store, _) = common::memory_store().await;
    for category in &CATEGORIES[..3] {
        store
            .add_budget(Budget::new(*category, Money::from_major(1_000)))
            .await
            .unwrap();
    }

    for op in ops {
        match op {
            Op::Add { category, cents } => {
                store
                    .add_transaction(NewTransaction::new(
                        "generated",
                        CATEGORIES[category],
                        Money::from_minor(cents),
                    ))
                    .await
                    .unwrap();
            }
            Op::Update { pick, category, cents } => {
                let transactions = store.transactions().await;
                if transactions.is_empty() {
                    continue;
                }
                let mut txn = transactions[pick % transactions.len()].clone();
                txn.category = CATEGORIES[category].to_string();
                txn.amount = Money::from_minor(cents);
                store.update_transaction(txn).await.unwrap();
            }
            Op::Delete { pick } => {
                let transactions = store.transactions().await;
                if transactions.is_empty() {
                    continue;
                }
                let id = transactions[pick % transactions.len()].id.clone();
                store.delete_transaction(&id).await.unwrap();
            }
        }
        assert_spent_matches_history(&store).await;
    }
    assert!(store.consistency_warnings().await.iter().all(|w| w.contains("no budget")));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn spent_always_equals_category_history(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(ops));
    }
}
