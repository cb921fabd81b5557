use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{AdvancementRule, Stage, StageWeights};

/// Request payload for creating a round
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoundRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, message = "Order must be a positive number"))]
    pub order: u32,

    pub advancement_rule: AdvancementRule,

    /// Ignored unless the rule is TopN; a Final round always advances one.
    #[serde(default)]
    pub top_n: Option<u32>,

    #[serde(default)]
    pub audience_voting: bool,

    #[serde(default)]
    pub stage: Option<Stage>,
}

impl CreateRoundRequest {
    /// Cross-field validation the derive cannot express.
    pub fn validate_rule(&self) -> Result<(), &'static str> {
        if self.advancement_rule == AdvancementRule::TopN
            && self.top_n.is_none_or(|n| n < 1)
        {
            return Err("Top N must be at least 1 for a TopN round");
        }
        Ok(())
    }

    pub fn effective_top_n(&self) -> u32 {
        match self.advancement_rule {
            AdvancementRule::TopN => self.top_n.unwrap_or(1),
            AdvancementRule::Final => 1,
        }
    }

    pub fn weights(&self) -> StageWeights {
        if self.audience_voting {
            StageWeights::with_audience()
        } else {
            StageWeights::judge_only()
        }
    }
}
