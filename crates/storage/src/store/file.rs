use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;

use super::DocumentStore;

/// File-backed document store: a single JSON object mapping key to document.
///
/// The whole map is rewritten on every mutation, the same way browser local
/// storage persists. Suitable for the small per-event data sets this system
/// manages; not a database.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    documents: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at `path`, loading any existing content. A missing or
    /// malformed file starts the store empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let documents = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "store file malformed, starting empty");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            path,
            documents: Mutex::new(documents),
        }
    }

    fn flush(&self, documents: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(documents)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        documents.insert(key.to_string(), value.to_string());
        self.flush(&documents)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        documents.remove(key);
        self.flush(&documents)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.documents
            .lock()
            .unwrap()
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        {
            let store = FileStore::open(&path);
            store.put("pms_rounds_e1", "[]").unwrap();
        }
        let store = FileStore::open(&path);
        assert_eq!(store.get("pms_rounds_e1").as_deref(), Some("[]"));
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();
        let store = FileStore::open(&path);
        assert_eq!(store.get("anything"), None);
    }
}
