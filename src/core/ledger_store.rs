//! Authoritative in-memory ledger state and its mutation API.
//!
//! Every mutation runs under a single write gate: the next state is computed
//! on a copy, persisted through the [`PersistenceAdapter`], and only published
//! once all writes succeeded. A failed write therefore leaves the in-memory
//! state exactly as it was before the call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

use crate::{
    config::{BudgetPolicy, Config},
    core::{
        clock::{Clock, SystemClock},
        forecast::{ForecastEngine, ForecastEntry},
    },
    errors::{LedgerError, LedgerResult, StorageError},
    ledger::{Budget, CategoryRegistry, Money, NewTransaction, Transaction, TransactionId},
    storage::{
        encode_collection, load_collection, PersistenceAdapter, BUDGETS_KEY, CATEGORIES_KEY,
        TRANSACTIONS_KEY,
    },
};

/// Point-in-time copy of the whole ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub budgets: Vec<Budget>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct LedgerState {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    categories: CategoryRegistry,
}

impl LedgerState {
    fn budget_mut(&mut self, category: &str) -> Option<&mut Budget> {
        self.budgets
            .iter_mut()
            .find(|budget| budget.category == category)
    }

    /// Applies `delta` to the category's budget; no budget is a no-op.
    fn adjust_spent(&mut self, category: &str, delta: Money) -> LedgerResult<()> {
        if let Some(budget) = self.budget_mut(category) {
            budget.spent = budget.spent.checked_add(delta).ok_or_else(|| {
                LedgerError::validation(format!("spent for `{}` would overflow", category))
            })?;
        }
        Ok(())
    }

    /// `None` when the category's history does not fit in a `Money`.
    fn spent_from_history(&self, category: &str) -> Option<Money> {
        self.transactions
            .iter()
            .filter(|txn| txn.category == category)
            .try_fold(Money::ZERO, |total, txn| total.checked_add(txn.amount))
    }

    fn add_transaction(&mut self, draft: NewTransaction) -> LedgerResult<Transaction> {
        draft.validate()?;
        let txn = draft.into_transaction();
        self.adjust_spent(&txn.category, txn.amount)?;
        self.categories.register(&txn.category);
        self.transactions.push(txn.clone());
        Ok(txn)
    }

    fn update_transaction(&mut self, updated: Transaction) -> LedgerResult<Transaction> {
        updated.validate()?;
        let index = self
            .transactions
            .iter()
            .position(|txn| txn.id == updated.id)
            .ok_or_else(|| LedgerError::not_found(format!("transaction {}", updated.id)))?;
        let prior = self.transactions[index].clone();

        if prior.category == updated.category {
            let delta = updated.amount.checked_sub(prior.amount).ok_or_else(|| {
                LedgerError::validation(format!("amount change for {} would overflow", updated.id))
            })?;
            self.adjust_spent(&prior.category, delta)?;
        } else {
            self.adjust_spent(&prior.category, -prior.amount)?;
            self.adjust_spent(&updated.category, updated.amount)?;
            self.categories.register(&updated.category);
        }
        self.transactions[index] = updated.clone();
        Ok(updated)
    }

    fn delete_transaction(&mut self, id: &TransactionId) -> LedgerResult<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|txn| &txn.id == id)
            .ok_or_else(|| LedgerError::not_found(format!("transaction {}", id)))?;
        let removed = self.transactions.remove(index);
        self.adjust_spent(&removed.category, -removed.amount)?;
        Ok(removed)
    }

    fn add_budget(&mut self, budget: Budget, policy: BudgetPolicy) -> LedgerResult<Budget> {
        budget.validate()?;
        if self.budget_mut(&budget.category).is_some() {
            return Err(LedgerError::validation(format!(
                "a budget for `{}` already exists",
                budget.category
            )));
        }
        let spent = if policy.backfill_spent_on_create {
            self.spent_from_history(&budget.category).ok_or_else(|| {
                LedgerError::validation(format!(
                    "transactions in `{}` sum beyond the supported range",
                    budget.category
                ))
            })?
        } else {
            Money::ZERO
        };
        let stored = Budget { spent, ..budget };
        self.categories.register(&stored.category);
        self.budgets.push(stored.clone());
        Ok(stored)
    }

    fn update_budget(&mut self, updated: Budget) -> LedgerResult<Budget> {
        updated.validate()?;
        let existing = self
            .budget_mut(&updated.category)
            .ok_or_else(|| LedgerError::not_found(format!("budget `{}`", updated.category)))?;
        let stored = Budget {
            spent: existing.spent,
            ..updated
        };
        *existing = stored.clone();
        Ok(stored)
    }

    fn delete_budget(&mut self, category: &str) -> LedgerResult<Budget> {
        let index = self
            .budgets
            .iter()
            .position(|budget| budget.category == category)
            .ok_or_else(|| LedgerError::not_found(format!("budget `{}`", category)))?;
        Ok(self.budgets.remove(index))
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for budget in &self.budgets {
            match self.spent_from_history(&budget.category) {
                Some(expected) if expected != budget.spent => warnings.push(format!(
                    "budget `{}` records spent {} but its transactions sum to {}",
                    budget.category, budget.spent, expected
                )),
                Some(_) => {}
                None => warnings.push(format!(
                    "transactions in `{}` sum beyond the supported range",
                    budget.category
                )),
            }
        }
        for txn in &self.transactions {
            if !self
                .budgets
                .iter()
                .any(|budget| budget.category == txn.category)
            {
                warnings.push(format!(
                    "transaction {} references category `{}` with no budget",
                    txn.id, txn.category
                ));
            }
        }
        warnings
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            budgets: self.budgets.clone(),
            transactions: self.transactions.clone(),
            categories: self.categories.list(),
        }
    }
}

/// Serialized form of a state, one blob per persisted key.
struct EncodedState {
    transactions: String,
    budgets: String,
    categories: String,
}

impl EncodedState {
    fn encode(state: &LedgerState) -> Result<Self, StorageError> {
        Ok(Self {
            transactions: encode_collection(&state.transactions)?,
            budgets: encode_collection(&state.budgets)?,
            categories: encode_collection(&state.categories)?,
        })
    }
}

/// Single source of truth for transactions and budgets.
pub struct LedgerStore {
    state: RwLock<LedgerState>,
    write_gate: Mutex<()>,
    adapter: Arc<dyn PersistenceAdapter>,
    clock: Arc<dyn Clock>,
    policy: BudgetPolicy,
}

impl LedgerStore {
    /// Loads the persisted collections and builds the store.
    ///
    /// Missing keys load as empty collections. Budgets whose stored `spent`
    /// disagrees with the history are reported, not repaired.
    pub async fn open(adapter: Arc<dyn PersistenceAdapter>, config: &Config) -> LedgerResult<Self> {
        Self::open_with_clock(adapter, config, Arc::new(SystemClock)).await
    }

    pub async fn open_with_clock(
        adapter: Arc<dyn PersistenceAdapter>,
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> LedgerResult<Self> {
        let transactions: Vec<Transaction> =
            load_collection(adapter.as_ref(), TRANSACTIONS_KEY).await?;
        let budgets: Vec<Budget> = load_collection(adapter.as_ref(), BUDGETS_KEY).await?;
        let mut categories: CategoryRegistry =
            load_collection(adapter.as_ref(), CATEGORIES_KEY).await?;

        categories.extend(config.seed_categories.iter().map(String::as_str));
        categories.extend(budgets.iter().map(|budget| budget.category.as_str()));
        categories.extend(transactions.iter().map(|txn| txn.category.as_str()));

        let state = LedgerState {
            transactions,
            budgets,
            categories,
        };
        for warning in state.warnings() {
            warn!("{}", warning);
        }
        info!(
            transactions = state.transactions.len(),
            budgets = state.budgets.len(),
            categories = state.categories.len(),
            "ledger store opened"
        );

        Ok(Self {
            state: RwLock::new(state),
            write_gate: Mutex::new(()),
            adapter,
            clock,
            policy: config.budget_policy,
        })
    }

    pub async fn add_transaction(&self, draft: NewTransaction) -> LedgerResult<Transaction> {
        let txn = self
            .commit("add_transaction", |state| state.add_transaction(draft))
            .await?;
        info!(id = %txn.id, category = %txn.category, amount = %txn.amount, "transaction added");
        Ok(txn)
    }

    pub async fn update_transaction(&self, updated: Transaction) -> LedgerResult<Transaction> {
        let txn = self
            .commit("update_transaction", |state| state.update_transaction(updated))
            .await?;
        info!(id = %txn.id, category = %txn.category, amount = %txn.amount, "transaction updated");
        Ok(txn)
    }

    pub async fn delete_transaction(&self, id: &TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .commit("delete_transaction", |state| state.delete_transaction(id))
            .await?;
        info!(id = %txn.id, category = %txn.category, "transaction deleted");
        Ok(txn)
    }

    pub async fn add_budget(&self, budget: Budget) -> LedgerResult<Budget> {
        let policy = self.policy;
        let budget = self
            .commit("add_budget", |state| state.add_budget(budget, policy))
            .await?;
        info!(category = %budget.category, limit = %budget.limit, spent = %budget.spent, "budget added");
        Ok(budget)
    }

    pub async fn update_budget(&self, updated: Budget) -> LedgerResult<Budget> {
        let budget = self
            .commit("update_budget", |state| state.update_budget(updated))
            .await?;
        info!(category = %budget.category, limit = %budget.limit, "budget updated");
        Ok(budget)
    }

    /// Removes the budget. Transactions in that category are kept as they are.
    pub async fn delete_budget(&self, category: &str) -> LedgerResult<Budget> {
        let budget = self
            .commit("delete_budget", |state| state.delete_budget(category))
            .await?;
        info!(category = %budget.category, "budget deleted");
        Ok(budget)
    }

    pub async fn budgets(&self) -> Vec<Budget> {
        self.state.read().await.budgets.clone()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.read().await.transactions.clone()
    }

    pub async fn categories(&self) -> Vec<String> {
        self.state.read().await.categories.list()
    }

    pub async fn budget(&self, category: &str) -> Option<Budget> {
        self.state
            .read()
            .await
            .budgets
            .iter()
            .find(|budget| budget.category == category)
            .cloned()
    }

    pub async fn transaction(&self, id: &TransactionId) -> Option<Transaction> {
        self.state
            .read()
            .await
            .transactions
            .iter()
            .find(|txn| &txn.id == id)
            .cloned()
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn forecast(&self) -> Vec<ForecastEntry> {
        let today = self.clock.today();
        let state = self.state.read().await;
        ForecastEngine::compute(&state.transactions, today)
    }

    /// Budgets out of step with their history, and transactions with no budget.
    pub async fn consistency_warnings(&self) -> Vec<String> {
        self.state.read().await.warnings()
    }

    async fn commit<T, F>(&self, operation: &'static str, mutate: F) -> LedgerResult<T>
    where
        F: FnOnce(&mut LedgerState) -> LedgerResult<T>,
    {
        let _gate = self.write_gate.lock().await;
        let current = self.state.read().await.clone();
        let mut next = current.clone();
        let outcome = mutate(&mut next)?;

        if let Err(err) = self.persist(&current, &next).await {
            warn!(operation, error = %err, "persist failed; in-memory ledger left unchanged");
            return Err(err.into());
        }
        *self.state.write().await = next;
        Ok(outcome)
    }

    /// Writes transactions, budgets and (when changed) categories as one unit.
    ///
    /// On a failed write, keys already written are restored to their previous blobs.
    async fn persist(&self, current: &LedgerState, next: &LedgerState) -> Result<(), StorageError> {
        let before = EncodedState::encode(current)?;
        let after = EncodedState::encode(next)?;

        let mut writes: Vec<(&'static str, &str, &str)> = vec![
            (
                TRANSACTIONS_KEY,
                after.transactions.as_str(),
                before.transactions.as_str(),
            ),
            (BUDGETS_KEY, after.budgets.as_str(), before.budgets.as_str()),
        ];
        if after.categories != before.categories {
            writes.push((
                CATEGORIES_KEY,
                after.categories.as_str(),
                before.categories.as_str(),
            ));
        }

        for (done, (key, blob, _)) in writes.iter().enumerate() {
            if let Err(err) = self.adapter.set(key, blob).await {
                for (written_key, _, previous) in writes[..done].iter().rev() {
                    if let Err(restore_err) = self.adapter.set(written_key, previous).await {
                        error!(
                            key = *written_key,
                            error = %restore_err,
                            "failed to restore collection after aborted write"
                        );
                    }
                }
                return Err(err);
            }
        }
        Ok(())
    }
}
