//! Contestant progression through the stage pipeline, the leaderboard, and
//! the event overview.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use storage::models::{AdvancementRule, Contestant, Round, Stage};
use storage::repository::{
    ContestantRepository, CriteriaRepository, JudgeRepository, RoundRepository, ScoreRepository,
};
use storage::store::DocumentStore;

use crate::ranking;

/// Where a contestant stands in the event as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    Winner,
    Finalist,
    Eliminated,
    Ongoing,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OverallStatus::Winner => "Winner",
            OverallStatus::Finalist => "Finalist",
            OverallStatus::Eliminated => "Eliminated",
            OverallStatus::Ongoing => "Ongoing",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub contestant_id: String,
    pub name: String,
    pub preliminary: Option<Decimal>,
    pub semifinal: Option<Decimal>,
    pub final_score: Option<Decimal>,
    pub status: OverallStatus,
}

/// One round line of the event overview.
#[derive(Debug, Clone, Serialize)]
pub struct RoundProgressRow {
    pub round_id: String,
    pub name: String,
    /// "Top N" or "Final (1)".
    pub advancement_label: String,
    pub audience_label: &'static str,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub contestant_count: usize,
    pub judge_count: usize,
    pub locked_round_count: usize,
    pub final_winner: Option<String>,
    pub rounds: Vec<RoundProgressRow>,
}

/// Per-criterion detail of one contestant's segment scoring.
#[derive(Debug, Clone, Serialize)]
pub struct CriterionScoreRow {
    pub criterion: String,
    pub value: Option<Decimal>,
    pub max_points: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub rows: Vec<CriterionScoreRow>,
    /// None when the segment has no criteria to score against.
    pub total: Option<Decimal>,
}

/// Active rounds bucketed by pipeline stage, in running order within each
/// stage. Rounds that classify to no stage are left out.
pub fn classify_rounds(rounds: &[Round]) -> BTreeMap<Stage, Vec<&Round>> {
    let mut stages: BTreeMap<Stage, Vec<&Round>> = BTreeMap::new();
    for round in rounds.iter().filter(|r| r.active) {
        if let Some(stage) = round.stage() {
            stages.entry(stage).or_default().push(round);
        }
    }
    stages
}

pub struct ProgressionService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProgressionService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Walk the stage pipeline for one contestant. The first locked stage
    /// with no recorded score for them means they were cut there; surviving
    /// a locked, scored Final makes them a Finalist, or the Winner when the
    /// recorded final winner is them. Anything else is still in play.
    pub fn overall_status(&self, event_id: &str, contestant_id: &str) -> OverallStatus {
        let rounds = RoundRepository::new(self.store).list(event_id);
        let stages = classify_rounds(&rounds);
        let scores = ScoreRepository::new(self.store);

        if let Some(winner) = scores.final_winner(event_id)
            && winner.id == contestant_id
        {
            return OverallStatus::Winner;
        }

        for stage in [Stage::Preliminary, Stage::Semifinal, Stage::Final] {
            let Some(stage_rounds) = stages.get(&stage) else {
                continue;
            };
            for round in stage_rounds {
                if !round.is_locked() {
                    return OverallStatus::Ongoing;
                }
                let totals = scores.round_totals(event_id, &round.id);
                if totals.is_empty() {
                    return OverallStatus::Ongoing;
                }
                let scored = totals.iter().any(|t| t.contestant_id == contestant_id);
                if !scored {
                    return OverallStatus::Eliminated;
                }
                if stage == Stage::Final {
                    return OverallStatus::Finalist;
                }
            }
        }
        OverallStatus::Ongoing
    }

    /// The leaderboard: one row per active contestant with their score at
    /// each stage and their overall status, best placed first.
    pub fn leaderboard(&self, event_id: &str) -> Vec<LeaderboardRow> {
        let contestants = ContestantRepository::new(self.store).list(event_id);
        let rounds = RoundRepository::new(self.store).list(event_id);
        let stages = classify_rounds(&rounds);
        let scores = ScoreRepository::new(self.store);

        let stage_totals = |stage: Stage| -> BTreeMap<String, Decimal> {
            let mut totals = BTreeMap::new();
            for round in stages.get(&stage).map(Vec::as_slice).unwrap_or_default() {
                for score in scores.round_totals(event_id, &round.id) {
                    let total = score.total();
                    totals.insert(score.contestant_id, total);
                }
            }
            totals
        };
        let prelim = stage_totals(Stage::Preliminary);
        let semi = stage_totals(Stage::Semifinal);
        let finals = stage_totals(Stage::Final);

        let mut rows: Vec<LeaderboardRow> = contestants
            .iter()
            .filter(|c| c.active)
            .map(|contestant: &Contestant| LeaderboardRow {
                status: self.overall_status(event_id, &contestant.id),
                name: contestant.display_name(),
                preliminary: prelim.get(&contestant.id).copied(),
                semifinal: semi.get(&contestant.id).copied(),
                final_score: finals.get(&contestant.id).copied(),
                contestant_id: contestant.id.clone(),
            })
            .collect();
        rows.sort_by(|a, b| {
            b.final_score
                .cmp(&a.final_score)
                .then_with(|| b.semifinal.cmp(&a.semifinal))
                .then_with(|| b.preliminary.cmp(&a.preliminary))
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    /// Headline numbers plus a per-round progression table.
    pub fn overview(&self, event_id: &str) -> Overview {
        let rounds = RoundRepository::new(self.store).list(event_id);
        let contestants = ContestantRepository::new(self.store).list(event_id);
        let judges = JudgeRepository::new(self.store).list(event_id);
        let final_winner = ScoreRepository::new(self.store)
            .final_winner(event_id)
            .map(|w| w.name);

        Overview {
            contestant_count: contestants.iter().filter(|c| c.active).count(),
            judge_count: judges.iter().filter(|j| j.active).count(),
            locked_round_count: rounds.iter().filter(|r| r.active && r.is_locked()).count(),
            final_winner,
            rounds: rounds
                .iter()
                .filter(|r| r.active)
                .map(|round| RoundProgressRow {
                    round_id: round.id.clone(),
                    name: round.name.clone(),
                    advancement_label: match round.advancement_rule {
                        AdvancementRule::TopN => format!("Top {}", ranking::top_n_of(round)),
                        AdvancementRule::Final => "Final (1)".to_string(),
                    },
                    audience_label: if round.audience_voting { "Yes" } else { "No" },
                    status_label: if round.is_locked() { "Locked" } else { "Draft" },
                })
                .collect(),
        }
    }

    /// Per-criterion scores for one contestant in one segment.
    pub fn score_breakdown(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
        contestant_id: &str,
    ) -> ScoreBreakdown {
        let criteria = CriteriaRepository::new(self.store).list(event_id, round_id, segment_id);
        let entry = ScoreRepository::new(self.store)
            .segment_entries(event_id, round_id, segment_id)
            .into_iter()
            .find(|e| e.contestant_id == contestant_id);

        if criteria.is_empty() {
            return ScoreBreakdown {
                rows: Vec::new(),
                total: None,
            };
        }
        let rows = criteria
            .iter()
            .map(|criterion| CriterionScoreRow {
                value: entry
                    .as_ref()
                    .and_then(|e| e.scores.get(&criterion.name).copied().flatten()),
                criterion: criterion.name.clone(),
                max_points: criterion.points,
            })
            .collect();
        ScoreBreakdown {
            rows,
            total: Some(entry.map(|e| e.total()).unwrap_or(Decimal::ZERO)),
        }
    }
}
