use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A competition round. Locked rounds are immutable except for deactivation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: String,
    pub event_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Position in the running order; positive and unique within the event.
    pub order: u32,
    pub advancement_rule: AdvancementRule,
    /// Number of contestants that advance; meaningful only under `TopN`.
    pub top_n: u32,
    pub audience_voting: bool,
    pub weights: StageWeights,
    #[serde(default)]
    pub status: RoundStatus,
    /// Pipeline stage for overall-status classification. Older data has no
    /// stage field; `Stage::from_round_name` is the fallback for it.
    #[serde(default)]
    pub stage: Option<Stage>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvancementRule {
    TopN,
    Final,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStatus {
    #[default]
    Draft,
    Locked,
}

/// The fixed three-stage pipeline contestants progress through. Ordered by
/// position in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Preliminary,
    Semifinal,
    Final,
}

impl Stage {
    /// Legacy stage detection by substring match on the round name.
    ///
    /// Kept for data created before rounds carried an explicit stage. Round
    /// names that avoid "prelim"/"semi"/"final" defeat it, which is why new
    /// rounds record the stage directly.
    pub fn from_round_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("prelim") {
            Some(Stage::Preliminary)
        } else if name.contains("semi") {
            Some(Stage::Semifinal)
        } else if name.contains("final") {
            Some(Stage::Final)
        } else {
            None
        }
    }
}

/// Relative weight of judge scores vs audience votes for a round or segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWeights {
    pub judge: Decimal,
    pub audience: Decimal,
}

impl StageWeights {
    pub fn judge_only() -> Self {
        Self {
            judge: Decimal::ONE,
            audience: Decimal::ZERO,
        }
    }

    pub fn with_audience() -> Self {
        Self {
            judge: Decimal::new(8, 1),
            audience: Decimal::new(2, 1),
        }
    }
}

impl Round {
    pub fn is_locked(&self) -> bool {
        self.status == RoundStatus::Locked
    }

    /// Stage classification: the explicit field when present, otherwise the
    /// legacy name heuristic.
    pub fn stage(&self) -> Option<Stage> {
        self.stage.or_else(|| Stage::from_round_name(&self.name))
    }
}
