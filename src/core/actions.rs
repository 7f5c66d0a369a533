//! The surface handed to presentation code.

use async_trait::async_trait;

use crate::{
    core::{
        forecast::ForecastEntry,
        ledger_store::{LedgerSnapshot, LedgerStore},
    },
    errors::LedgerResult,
    ledger::{Budget, NewTransaction, Transaction, TransactionId},
};

/// Mutation and read operations a UI may call, injected as `Arc<dyn LedgerActions>`.
#[async_trait]
pub trait LedgerActions: Send + Sync {
    async fn add_transaction(&self, draft: NewTransaction) -> LedgerResult<Transaction>;
    async fn update_transaction(&self, updated: Transaction) -> LedgerResult<Transaction>;
    async fn delete_transaction(&self, id: &TransactionId) -> LedgerResult<Transaction>;
    async fn add_budget(&self, budget: Budget) -> LedgerResult<Budget>;
    async fn update_budget(&self, updated: Budget) -> LedgerResult<Budget>;
    async fn delete_budget(&self, category: &str) -> LedgerResult<Budget>;
    async fn snapshot(&self) -> LedgerSnapshot;
    async fn forecast(&self) -> Vec<ForecastEntry>;
}

#[async_trait]
impl LedgerActions for LedgerStore {
    async fn add_transaction(&self, draft: NewTransaction) -> LedgerResult<Transaction> {
        LedgerStore::add_transaction(self, draft).await
    }

    async fn update_transaction(&self, updated: Transaction) -> LedgerResult<Transaction> {
        LedgerStore::update_transaction(self, updated).await
    }

    async fn delete_transaction(&self, id: &TransactionId) -> LedgerResult<Transaction> {
        LedgerStore::delete_transaction(self, id).await
    }

    async fn add_budget(&self, budget: Budget) -> LedgerResult<Budget> {
        LedgerStore::add_budget(self, budget).await
    }

    async fn update_budget(&self, updated: Budget) -> LedgerResult<Budget> {
        LedgerStore::update_budget(self, updated).await
    }

    async fn delete_budget(&self, category: &str) -> LedgerResult<Budget> {
        LedgerStore::delete_budget(self, category).await
    }

    async fn snapshot(&self) -> LedgerSnapshot {
        LedgerStore::snapshot(self).await
    }

    async fn forecast(&self) -> Vec<ForecastEntry> {
        LedgerStore::forecast(self).await
    }
}
