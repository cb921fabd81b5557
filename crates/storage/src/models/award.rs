use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An award resolved from judge scores, audience votes, or manual selection.
///
/// Lifecycle: Draft ⇄ Ready -> Awarded. The Ready toggle is blocked once
/// Awarded, and Awarded is reached only through a successful winner
/// computation; an awarded award is no longer editable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    pub id: String,
    pub event_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: AwardType,
    pub scope: AwardScope,
    #[serde(default)]
    pub rules: AwardRules,
    #[serde(default)]
    pub status: AwardStatus,
    #[serde(default = "default_true")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwardType {
    Automatic,
    Audience,
    Manual,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AwardStatus {
    #[default]
    Draft,
    Ready,
    Awarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeLevel {
    Event,
    Round,
    Segment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardScope {
    pub level: ScopeLevel,
    #[serde(default)]
    pub round_id: Option<String>,
    #[serde(default)]
    pub segment_id: Option<String>,
}

/// Type-specific rules. Unused fields stay at their defaults for the other
/// award types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwardRules {
    #[serde(default)]
    pub tie_allow_multiple: bool,
    /// Pre-selected contestant ids; Manual awards only.
    #[serde(default)]
    pub winners: Vec<String>,
    #[serde(default)]
    pub justification: String,
}

impl Award {
    pub fn is_awarded(&self) -> bool {
        self.status == AwardStatus::Awarded
    }
}
