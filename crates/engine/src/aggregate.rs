//! Score and vote aggregation.
//!
//! Both aggregators are total over their inputs: malformed or partial data
//! contributes zero rather than failing. An empty result map means "no data",
//! and callers reject dependent operations instead of proceeding with it.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use storage::models::{RawScoreValues, ScoreSource, VoteSource, numeric};

/// Sum judge scores into per-contestant totals.
///
/// Entry precedence per contestant: an explicit `total`, else the sum of
/// per-criterion values (list or map form), else the sum of the canonical
/// `scores` map. Repeated entries for a contestant accumulate.
pub fn judge_totals(source: &ScoreSource) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    match source {
        ScoreSource::Entries(entries) => {
            for entry in entries {
                let Some(cid) = entry.contestant_id.as_ref() else {
                    continue;
                };
                let total = entry
                    .total
                    .as_ref()
                    .and_then(numeric)
                    .or_else(|| entry.criteria_scores.as_ref().map(sum_values))
                    .or_else(|| {
                        entry
                            .scores
                            .as_ref()
                            .map(|map| map.values().filter_map(numeric).sum())
                    })
                    .unwrap_or(Decimal::ZERO);
                *totals.entry(cid.clone()).or_insert(Decimal::ZERO) += total;
            }
        }
        ScoreSource::Totals(map) => {
            for (cid, value) in map {
                if let Some(total) = numeric(value) {
                    *totals.entry(cid.clone()).or_insert(Decimal::ZERO) += total;
                }
            }
        }
    }
    totals
}

fn sum_values(values: &RawScoreValues) -> Decimal {
    match values {
        RawScoreValues::List(list) => list.iter().filter_map(numeric).sum(),
        RawScoreValues::Map(map) => map.values().filter_map(numeric).sum(),
    }
}

/// Tally audience votes per contestant. An entry without a numeric `count`
/// is a single vote; pre-aggregated maps pass through.
pub fn vote_counts(source: &VoteSource) -> BTreeMap<String, i64> {
    let mut counts = BTreeMap::new();
    match source {
        VoteSource::Entries(entries) => {
            for entry in entries {
                let Some(cid) = entry.contestant_id.as_ref() else {
                    continue;
                };
                let count = entry
                    .count
                    .as_ref()
                    .and_then(numeric)
                    .and_then(|d| d.trunc().to_i64())
                    .unwrap_or(1);
                *counts.entry(cid.clone()).or_insert(0) += count;
            }
        }
        VoteSource::Counts(map) => {
            for (cid, value) in map {
                if let Some(count) = numeric(value).and_then(|d| d.trunc().to_i64()) {
                    *counts.entry(cid.clone()).or_insert(0) += count;
                }
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn score_source(raw: &str) -> ScoreSource {
        serde_json::from_str(raw).unwrap()
    }

    fn vote_source(raw: &str) -> VoteSource {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn sums_entries_with_totals() {
        let totals = judge_totals(&score_source(
            r#"[{"contestant_id":"C1","total":270},{"contestant_id":"C2","total":250.5}]"#,
        ));
        assert_eq!(totals["C1"], dec("270"));
        assert_eq!(totals["C2"], dec("250.5"));
    }

    #[test]
    fn sums_criteria_score_lists_and_maps() {
        let totals = judge_totals(&score_source(
            r#"[{"cid":"C1","criteria_scores":[90,90,90]},
                {"contestantId":"C2","criteria_scores":{"Poise":40,"Talent":50,"bad":"x"}}]"#,
        ));
        assert_eq!(totals["C1"], dec("270"));
        assert_eq!(totals["C2"], dec("90"));
    }

    #[test]
    fn sums_flat_total_map_skipping_non_numeric() {
        let totals = judge_totals(&score_source(r#"{"C1":270,"C2":"250","C3":null,"C4":[1]}"#));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["C1"], dec("270"));
        assert_eq!(totals["C2"], dec("250"));
    }

    #[test]
    fn entry_with_no_numeric_fields_contributes_zero() {
        let totals = judge_totals(&score_source(r#"[{"contestant_id":"C1","total":"n/a"}]"#));
        assert_eq!(totals["C1"], Decimal::ZERO);
    }

    #[test]
    fn missing_contestant_ids_are_skipped() {
        let totals = judge_totals(&score_source(r#"[{"total":100}]"#));
        assert!(totals.is_empty());
    }

    #[test]
    fn repeated_entries_accumulate() {
        let totals = judge_totals(&score_source(
            r#"[{"contestant_id":"C1","total":40},{"contestant_id":"C1","total":50}]"#,
        ));
        assert_eq!(totals["C1"], dec("90"));
    }

    #[test]
    fn votes_default_to_one_per_entry() {
        let counts = vote_counts(&vote_source(
            r#"[{"contestant_id":"C1"},{"contestant_id":"C1"},{"contestant_id":"C2","count":3}]"#,
        ));
        assert_eq!(counts["C1"], 2);
        assert_eq!(counts["C2"], 3);
    }

    #[test]
    fn pre_aggregated_vote_map_passes_through() {
        let counts = vote_counts(&vote_source(r#"{"C1":5,"C2":2,"C3":"oops"}"#));
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["C1"], 5);
    }
}
