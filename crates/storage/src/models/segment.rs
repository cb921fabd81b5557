use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::round::StageWeights;

/// A scored component of a round, weighted by percent of the round total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub round_id: String,
    pub event_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Share of the round, 1..=100. Active segments of a round sum to at most
    /// 100; the round locks only when they sum to exactly 100.
    pub percent: u32,
    pub scoring_method: ScoringMethod,
    pub weights: StageWeights,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMethod {
    Judge,
    #[serde(rename = "Judge+Audience")]
    JudgeAudience,
}

impl ScoringMethod {
    pub fn weights(self) -> StageWeights {
        match self {
            ScoringMethod::Judge => StageWeights::judge_only(),
            ScoringMethod::JudgeAudience => StageWeights::with_audience(),
        }
    }
}
