use crate::error::Result;
use crate::keys;
use crate::models::Judge;
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for the judge panel of one event
pub struct JudgeRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> JudgeRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, event_id: &str) -> Vec<Judge> {
        let key = keys::judges(event_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn save(&self, event_id: &str, judges: &[Judge]) -> Result<()> {
        put_json(self.store, &keys::judges(event_id), &judges)
    }

    pub fn add(&self, event_id: &str, name: &str) -> Result<Judge> {
        let judge = Judge {
            id: super::new_id(),
            name: name.trim().to_string(),
            active: true,
        };
        let mut judges = self.list(event_id);
        judges.push(judge.clone());
        self.save(event_id, &judges)?;
        Ok(judge)
    }
}
