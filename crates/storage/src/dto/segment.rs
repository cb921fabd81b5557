use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::ScoringMethod;

/// Request payload for creating or editing a segment
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveSegmentRequest {
    /// Present when editing an existing segment.
    #[serde(default)]
    pub segment_id: Option<String>,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 1, max = 100, message = "Percent must be between 1 and 100"))]
    pub percent: u32,

    pub scoring_method: ScoringMethod,
}

/// One criterion row in a batch criteria save
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CriterionInput {
    #[validate(length(min = 1, max = 255, message = "Criterion name is required"))]
    pub name: String,

    #[validate(range(min = 1, max = 100, message = "Points must be between 1 and 100"))]
    pub points: u32,

    #[serde(default)]
    pub description: String,
}
