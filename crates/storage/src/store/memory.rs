use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::Result;

use super::DocumentStore;

/// In-memory document store. Backs tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.documents.lock().unwrap().remove(key);
        Ok(())
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
    fn put_get_roundtrip() {
        let store = MemoryStore::new();
        store.put("a", "1").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b"), None);
    }

    #[test]
    fn prefix_scan_only_matches_prefix() {
        let store = MemoryStore::new();
        store.put("pms_votes_e1_r1", "{}").unwrap();
        store.put("pms_votes_e1_r2", "{}").unwrap();
        store.put("pms_rounds_e1", "[]").unwrap();
        let keys = store.keys_with_prefix("pms_votes_e1_");
        assert_eq!(keys, vec!["pms_votes_e1_r1", "pms_votes_e1_r2"]);
    }

    #[test]
    fn remove_deletes_key() {
        let store = MemoryStore::new();
        store.put("a", "1").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }
}
