mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;

use crate::error::Result;

/// Key-value store holding one JSON document per key.
///
/// Every mutation replaces the whole document under its key, so no partially
/// written state is ever observable through the same store handle.
pub trait DocumentStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}

/// Decode a document, falling back to a default on missing or malformed data.
///
/// Malformed documents are a data problem, not a caller problem: they are
/// logged and treated as absent.
pub fn parse_or_default<T: DeserializeOwned + Default>(raw: Option<String>, key: &str) -> T {
    parse_opt(raw, key).unwrap_or_default()
}

/// Decode a document, yielding `None` on missing or malformed data.
pub fn parse_opt<T: DeserializeOwned>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, %err, "discarding malformed document");
            None
        }
    }
}

/// Serialize and store a document under `key`.
pub fn put_json<T: serde::Serialize>(store: &dyn DocumentStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.put(key, &raw)
}
