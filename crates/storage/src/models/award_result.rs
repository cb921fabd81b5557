use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The outcome of computing an award. One per award, replaced only by a
/// recompute; never written with an empty winner list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardResult {
    pub award_id: String,
    pub winners: Vec<AwardWinner>,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardWinner {
    pub contestant_id: String,
    /// Winning total or vote count; `None` for manual selections.
    pub value: Option<Decimal>,
    pub basis: WinnerBasis,
}

/// The data source that decided a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinnerBasis {
    Judge,
    Audience,
    Manual,
}

/// The recorded overall event winner, consulted by the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalWinner {
    pub id: String,
    pub name: String,
}
