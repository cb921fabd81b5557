use std::collections::BTreeMap;

use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::Contestant;
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for the contestant roster of one event
pub struct ContestantRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ContestantRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, event_id: &str) -> Vec<Contestant> {
        let key = keys::contestants(event_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn find(&self, event_id: &str, contestant_id: &str) -> Result<Contestant> {
        self.list(event_id)
            .into_iter()
            .find(|c| c.id == contestant_id)
            .ok_or(StorageError::NotFound)
    }

    pub fn save(&self, event_id: &str, contestants: &[Contestant]) -> Result<()> {
        put_json(self.store, &keys::contestants(event_id), &contestants)
    }

    pub fn add(&self, event_id: &str, first_name: &str, last_name: &str) -> Result<Contestant> {
        let contestant = Contestant {
            id: super::new_id(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            active: true,
        };
        let mut contestants = self.list(event_id);
        contestants.push(contestant.clone());
        self.save(event_id, &contestants)?;
        Ok(contestant)
    }

    /// Contestant id -> display name, for joining into result rows.
    pub fn display_names(&self, event_id: &str) -> BTreeMap<String, String> {
        self.list(event_id)
            .into_iter()
            .map(|c| {
                let name = c.display_name();
                (c.id, name)
            })
            .collect()
    }
}
