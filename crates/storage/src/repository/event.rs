use chrono::Utc;

use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::Event;
use crate::store::{DocumentStore, parse_opt, parse_or_default, put_json};

/// Repository for events. One event is active at a time; creating or
/// activating an event replaces the active pointer while the full list stays
/// as history.
pub struct EventRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> EventRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Event> {
        let key = keys::events();
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn active(&self) -> Option<Event> {
        let key = keys::active_event();
        parse_opt(self.store.get(&key), &key)
    }

    /// Create an event and make it the active one.
    pub fn create(&self, name: &str) -> Result<Event> {
        let event = Event {
            id: super::new_id(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        };
        let mut events = self.list();
        events.push(event.clone());
        put_json(self.store, &keys::events(), &events)?;
        put_json(self.store, &keys::active_event(), &event)?;
        Ok(event)
    }

    pub fn set_active(&self, event_id: &str) -> Result<Event> {
        let event = self
            .list()
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or(StorageError::NotFound)?;
        put_json(self.store, &keys::active_event(), &event)?;
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn creating_a_second_event_replaces_the_active_one() {
        let store = MemoryStore::new();
        let repo = EventRepository::new(&store);
        let first = repo.create("Miss Universe 2026").unwrap();
        let second = repo.create("Mr Galaxy 2026").unwrap();
        assert_eq!(repo.active().unwrap().id, second.id);
        assert_eq!(repo.list().len(), 2);

        repo.set_active(&first.id).unwrap();
        assert_eq!(repo.active().unwrap().id, first.id);
    }
}
