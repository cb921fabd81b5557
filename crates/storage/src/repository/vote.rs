use std::collections::BTreeMap;

use crate::error::Result;
use crate::keys;
use crate::models::VoteSource;
use crate::store::{DocumentStore, parse_opt, put_json};

/// Repository for audience vote tallies
pub struct VoteRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VoteRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Raw vote data for a scope. A segment-scoped lookup falls back to the
    /// round-level document when no segment tally exists.
    pub fn source(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: Option<&str>,
    ) -> Option<VoteSource> {
        let key = keys::votes(event_id, round_id, segment_id);
        if let Some(source) = parse_opt(self.store.get(&key), &key) {
            return Some(source);
        }
        if segment_id.is_some() {
            let fallback = keys::votes(event_id, round_id, None);
            return parse_opt(self.store.get(&fallback), &fallback);
        }
        None
    }

    /// Store a pre-aggregated tally for a scope.
    pub fn save_tally(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: Option<&str>,
        tally: &BTreeMap<String, i64>,
    ) -> Result<()> {
        put_json(self.store, &keys::votes(event_id, round_id, segment_id), tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn segment_lookup_falls_back_to_round_tally() {
        let store = MemoryStore::new();
        let repo = VoteRepository::new(&store);
        let tally = BTreeMap::from([("C1".to_string(), 4i64)]);
        repo.save_tally("e1", "r1", None, &tally).unwrap();

        assert!(repo.source("e1", "r1", Some("s1")).is_some());
        assert!(repo.source("e1", "r2", Some("s1")).is_none());
    }

    #[test]
    fn segment_tally_takes_precedence() {
        let store = MemoryStore::new();
        let repo = VoteRepository::new(&store);
        repo.save_tally("e1", "r1", None, &BTreeMap::from([("C1".to_string(), 1i64)]))
            .unwrap();
        repo.save_tally(
            "e1",
            "r1",
            Some("s1"),
            &BTreeMap::from([("C2".to_string(), 9i64)]),
        )
        .unwrap();
        match repo.source("e1", "r1", Some("s1")).unwrap() {
            VoteSource::Counts(map) => assert!(map.contains_key("C2")),
            VoteSource::Entries(_) => panic!("expected counts"),
        }
    }
}
