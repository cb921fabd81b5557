use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical per-segment score entry written by this system.
///
/// A `None` criterion value means the judge has not scored that criterion yet;
/// the audit report distinguishes it from an absent entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(alias = "contestantId")]
    pub contestant_id: String,
    /// Criterion name -> awarded value.
    #[serde(default)]
    pub scores: BTreeMap<String, Option<Decimal>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScoreEntry {
    /// Sum of the scored criteria; unscored criteria contribute zero.
    pub fn total(&self) -> Decimal {
        self.scores.values().filter_map(|v| *v).sum()
    }
}

/// Raw score data as found in the store.
///
/// Score documents historically came in several shapes: a list of entries
/// carrying a `total` or per-criterion values, or a flat contestant -> number
/// map. The sum type is decoded once here; everything downstream works on it
/// or on the canonical entries it yields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScoreSource {
    Entries(Vec<RawScoreEntry>),
    Totals(BTreeMap<String, Value>),
}

/// One tolerated entry shape. Every field is optional; unknown fields are
/// ignored. Entries without a contestant id are skipped by consumers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScoreEntry {
    #[serde(default, alias = "contestantId", alias = "cid")]
    pub contestant_id: Option<String>,
    #[serde(default)]
    pub total: Option<Value>,
    #[serde(default, alias = "criteriaScores")]
    pub criteria_scores: Option<RawScoreValues>,
    #[serde(default)]
    pub scores: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-criterion values: either a bare list or a criterion-name map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScoreValues {
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl ScoreSource {
    /// Canonicalize into [`ScoreEntry`] records.
    ///
    /// Entries that carry only a total or a positional list keep an empty
    /// criterion map: their presence is known but the per-criterion detail is
    /// not. The flat total map yields one empty-map entry per contestant.
    pub fn canonical_entries(&self) -> Vec<ScoreEntry> {
        match self {
            ScoreSource::Entries(entries) => entries
                .iter()
                .filter_map(|entry| {
                    let contestant_id = entry.contestant_id.clone()?;
                    let scores = entry
                        .scores
                        .as_ref()
                        .map(|map| canonical_values(map))
                        .or_else(|| match &entry.criteria_scores {
                            Some(RawScoreValues::Map(map)) => Some(canonical_values(map)),
                            _ => None,
                        })
                        .unwrap_or_default();
                    Some(ScoreEntry {
                        contestant_id,
                        scores,
                        updated_at: entry.updated_at,
                    })
                })
                .collect(),
            ScoreSource::Totals(map) => map
                .keys()
                .map(|contestant_id| ScoreEntry {
                    contestant_id: contestant_id.clone(),
                    scores: BTreeMap::new(),
                    updated_at: None,
                })
                .collect(),
        }
    }
}

fn canonical_values(map: &BTreeMap<String, Value>) -> BTreeMap<String, Option<Decimal>> {
    map.iter()
        .map(|(name, value)| (name.clone(), numeric(value)))
        .collect()
}

/// Extract a numeric value from loosely typed score data.
///
/// Accepts JSON numbers and decimal strings (the serde form of `Decimal`);
/// anything else is non-numeric and yields `None`.
pub fn numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Per-round total for one contestant, as shown on leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundScore {
    #[serde(alias = "contestantId")]
    pub contestant_id: String,
    #[serde(default, alias = "totalScore")]
    pub total_score: Option<Value>,
}

impl RoundScore {
    pub fn new(contestant_id: impl Into<String>, total: Decimal) -> Self {
        Self {
            contestant_id: contestant_id.into(),
            total_score: serde_json::to_value(total).ok(),
        }
    }

    /// The recorded total; a present entry with a non-numeric value counts as
    /// zero, which is distinct from no entry at all.
    pub fn total(&self) -> Decimal {
        self.total_score
            .as_ref()
            .and_then(numeric)
            .unwrap_or(Decimal::ZERO)
    }
}
