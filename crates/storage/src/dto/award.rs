use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Award, AwardRules, AwardStatus, AwardType, ScopeLevel};

/// Request payload for creating or editing an award
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveAwardRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "type")]
    pub kind: AwardType,

    pub scope_level: ScopeLevel,

    #[serde(default)]
    pub round_id: Option<String>,

    #[serde(default)]
    pub segment_id: Option<String>,

    #[serde(default)]
    pub rules: AwardRules,
}

impl SaveAwardRequest {
    /// Scope validation beyond single fields: non-event scopes need a round.
    /// A Segment-scoped award may still be saved as Draft without a segment;
    /// readiness enforces the rest.
    pub fn validate_scope(&self) -> Result<(), &'static str> {
        if self.scope_level != ScopeLevel::Event && self.round_id.is_none() {
            return Err("Select a round for a round- or segment-scoped award");
        }
        Ok(())
    }
}

/// Filters for the award table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub kind: Option<AwardType>,
    #[serde(default)]
    pub scope: Option<ScopeLevel>,
    /// Matches the displayed status label, including "Deactivated".
    #[serde(default)]
    pub status: Option<String>,
}

impl AwardFilter {
    pub fn matches(&self, award: &Award) -> bool {
        if let Some(ref search) = self.search
            && !search.is_empty()
            && !award.name.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }
        if let Some(kind) = self.kind
            && award.kind != kind
        {
            return false;
        }
        if let Some(scope) = self.scope
            && award.scope.level != scope
        {
            return false;
        }
        if let Some(ref status) = self.status
            && !status.is_empty()
            && status_label(award) != *status
        {
            return false;
        }
        true
    }
}

/// The status shown in tables: lifecycle status, or "Deactivated" when the
/// award has been switched off.
pub fn status_label(award: &Award) -> String {
    if !award.active {
        return "Deactivated".to_string();
    }
    match award.status {
        AwardStatus::Draft => "Draft",
        AwardStatus::Ready => "Ready",
        AwardStatus::Awarded => "Awarded",
    }
    .to_string()
}
