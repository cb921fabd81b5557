use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::Result;
use crate::keys;
use crate::models::{FinalWinner, RoundScore, ScoreEntry, ScoreSource};
use crate::store::{DocumentStore, parse_opt, parse_or_default, put_json};

/// Repository for judge score data and round totals
pub struct ScoreRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Raw score data for a segment, in whichever tolerated shape it was
    /// stored. `None` means no data (or an undecodable document).
    pub fn segment_source(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
    ) -> Option<ScoreSource> {
        let key = keys::segment_scores(event_id, round_id, segment_id);
        parse_opt(self.store.get(&key), &key)
    }

    /// Canonicalized segment entries; empty when there is no data.
    pub fn segment_entries(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
    ) -> Vec<ScoreEntry> {
        self.segment_source(event_id, round_id, segment_id)
            .map(|source| source.canonical_entries())
            .unwrap_or_default()
    }

    /// Upsert one contestant's canonical segment entry. Legacy-shaped
    /// documents are canonicalized on first write.
    pub fn record_segment_score(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
        entry: ScoreEntry,
    ) -> Result<()> {
        let mut entries = self.segment_entries(event_id, round_id, segment_id);
        match entries
            .iter_mut()
            .find(|e| e.contestant_id == entry.contestant_id)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        put_json(
            self.store,
            &keys::segment_scores(event_id, round_id, segment_id),
            &entries,
        )
    }

    /// Per-contestant totals for a round, as shown on leaderboards.
    pub fn round_totals(&self, event_id: &str, round_id: &str) -> Vec<RoundScore> {
        let key = keys::round_scores(event_id, round_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn record_round_total(&self, event_id: &str, round_id: &str, score: RoundScore) -> Result<()> {
        let mut totals = self.round_totals(event_id, round_id);
        match totals
            .iter_mut()
            .find(|t| t.contestant_id == score.contestant_id)
        {
            Some(existing) => *existing = score,
            None => totals.push(score),
        }
        put_json(self.store, &keys::round_scores(event_id, round_id), &totals)
    }

    pub fn final_winner(&self, event_id: &str) -> Option<FinalWinner> {
        let key = keys::final_winner(event_id);
        parse_opt(self.store.get(&key), &key)
    }

    pub fn set_final_winner(&self, event_id: &str, winner: &FinalWinner) -> Result<()> {
        put_json(self.store, &keys::final_winner(event_id), winner)
    }

    /// Keys of per-judge score logs, when the judge console wrote any.
    pub fn judge_log_keys(&self, event_id: &str) -> Vec<String> {
        self.store
            .keys_with_prefix(&keys::judge_segment_scores_prefix(event_id))
    }

    /// Best-effort count of entries in one judge log document.
    pub fn judge_log_entry_count(&self, key: &str) -> usize {
        let map: BTreeMap<String, Value> = parse_or_default(self.store.get(key), key);
        map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn record_and_reread_canonical_entry() {
        let store = MemoryStore::new();
        let repo = ScoreRepository::new(&store);
        let entry = ScoreEntry {
            contestant_id: "C1".to_string(),
            scores: [("Poise".to_string(), "40".parse().ok())].into(),
            updated_at: Some(chrono::Utc::now()),
        };
        repo.record_segment_score("e1", "r1", "s1", entry).unwrap();
        let entries = repo.segment_entries("e1", "r1", "s1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total(), "40".parse().unwrap());
    }

    #[test]
    fn rerecording_replaces_the_contestant_entry() {
        let store = MemoryStore::new();
        let repo = ScoreRepository::new(&store);
        for value in ["30", "45"] {
            let entry = ScoreEntry {
                contestant_id: "C1".to_string(),
                scores: [("Poise".to_string(), value.parse().ok())].into(),
                updated_at: None,
            };
            repo.record_segment_score("e1", "r1", "s1", entry).unwrap();
        }
        let entries = repo.segment_entries("e1", "r1", "s1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total(), "45".parse().unwrap());
    }

    #[test]
    fn legacy_shape_reads_as_source_but_not_detail() {
        let store = MemoryStore::new();
        store
            .put(&keys::segment_scores("e1", "r1", "s1"), r#"{"C1":95,"C2":88}"#)
            .unwrap();
        let repo = ScoreRepository::new(&store);
        assert!(repo.segment_source("e1", "r1", "s1").is_some());
        let entries = repo.segment_entries("e1", "r1", "s1");
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.scores.is_empty()));
    }

    #[test]
    fn round_totals_upsert() {
        let store = MemoryStore::new();
        let repo = ScoreRepository::new(&store);
        repo.record_round_total("e1", "r1", RoundScore::new("C1", "85.5".parse().unwrap()))
            .unwrap();
        repo.record_round_total("e1", "r1", RoundScore::new("C1", "90.0".parse().unwrap()))
            .unwrap();
        let totals = repo.round_totals("e1", "r1");
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total(), "90.0".parse().unwrap());
    }
}
