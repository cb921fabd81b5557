//! Round ranking and advancement classification.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use storage::models::{AdvancementRule, Round};
use storage::repository::{ContestantRepository, ScoreRepository};
use storage::store::DocumentStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub contestant_id: String,
    pub score: Decimal,
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Advancement {
    Advanced,
    Eliminated,
}

/// Rank contestants by descending score. Exact ties keep ascending
/// contestant-id order, so ranking is deterministic and idempotent.
pub fn rank_round(scores: &BTreeMap<String, Decimal>) -> Vec<RankedEntry> {
    let mut entries: Vec<(&String, Decimal)> = scores.iter().map(|(id, s)| (id, *s)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, (contestant_id, score))| RankedEntry {
            contestant_id: contestant_id.clone(),
            score,
            rank: idx as u32 + 1,
        })
        .collect()
}

/// How many contestants advance past a round.
pub fn top_n_of(round: &Round) -> u32 {
    match round.advancement_rule {
        AdvancementRule::TopN => round.top_n.max(1),
        AdvancementRule::Final => 1,
    }
}

pub fn advancement_status(rank: u32, round: &Round) -> Advancement {
    if rank <= top_n_of(round) {
        Advancement::Advanced
    } else {
        Advancement::Eliminated
    }
}

/// One row of the per-round results table.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResultRow {
    pub rank: u32,
    pub contestant_id: String,
    pub name: String,
    pub score: Decimal,
    pub status: Advancement,
}

/// Ranked results for one round, joined with contestant names.
pub fn round_results(store: &dyn DocumentStore, event_id: &str, round: &Round) -> Vec<RoundResultRow> {
    let totals: BTreeMap<String, Decimal> = ScoreRepository::new(store)
        .round_totals(event_id, &round.id)
        .into_iter()
        .map(|s| {
            let total = s.total();
            (s.contestant_id, total)
        })
        .collect();
    let names = ContestantRepository::new(store).display_names(event_id);

    rank_round(&totals)
        .into_iter()
        .map(|entry| RoundResultRow {
            status: advancement_status(entry.rank, round),
            name: names
                .get(&entry.contestant_id)
                .cloned()
                .unwrap_or_else(|| "Unknown".to_string()),
            rank: entry.rank,
            contestant_id: entry.contestant_id,
            score: entry.score,
        })
        .collect()
}
