pub mod json_backend;
pub mod memory;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const CATEGORIES_KEY: &str = "categories";

/// Durable key-value blob store holding one serialized collection per key.
///
/// `set` overwrites the whole collection; there are no partial writes.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Returns `None` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, blob: &str) -> Result<()>;
}

/// Reads and decodes a JSON collection, treating a missing key as empty.
pub async fn load_collection<T>(adapter: &dyn PersistenceAdapter, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match adapter.get(key).await? {
        Some(blob) if !blob.trim().is_empty() => Ok(serde_json::from_str(&blob)?),
        _ => Ok(T::default()),
    }
}

pub fn encode_collection<T: Serialize + ?Sized>(collection: &T) -> Result<String> {
    Ok(serde_json::to_string(collection)?)
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
