#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use spend_ledger::{
    config::{Config, ConfigManager},
    core::FixedClock,
    errors::StorageError,
    storage::{JsonFileStore, MemoryStore, PersistenceAdapter},
    LedgerStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// Returns a fresh directory that outlives the test.
pub fn temp_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub async fn open_store(adapter: Arc<dyn PersistenceAdapter>, config: &Config) -> LedgerStore {
    LedgerStore::open_with_clock(adapter, config, Arc::new(FixedClock::new(today())))
        .await
        .expect("open ledger store")
}

/// In-memory store with no seed categories.
pub async fn memory_store() -> (LedgerStore, Arc<MemoryStore>) {
    let memory = Arc::new(MemoryStore::new());
    let config = Config {
        seed_categories: Vec::new(),
        ..Config::default()
    };
    let store = open_store(memory.clone(), &config).await;
    (store, memory)
}

/// File-backed environment rooted in a unique temp directory.
pub fn json_env() -> (JsonFileStore, ConfigManager) {
    let base = temp_base_dir();
    let storage = JsonFileStore::new(base.join("data")).expect("create json store");
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (storage, config_manager)
}

/// Adapter that fails writes to selected keys while delegating everything else.
pub struct FlakyStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    pub async fn blob(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.unwrap()
    }
}

#[async_trait]
impl PersistenceAdapter for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: &str) -> Result<(), StorageError> {
        let refuse = self.failing.lock().unwrap().contains(key);
        if refuse {
            return Err(StorageError::Backend(format!("write to `{}` refused", key)));
        }
        self.inner.set(key, blob).await
    }
}
