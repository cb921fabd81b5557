//! Award lifecycle: readiness, computation, and the award tables.

use rust_decimal::Decimal;
use storage::dto::award::{AwardFilter, SaveAwardRequest, status_label};
use storage::models::{Award, AwardResult, AwardStatus, AwardType, ScopeLevel, WinnerBasis};
use storage::repository::{
    AwardRepository, ContestantRepository, RoundRepository, ScoreRepository, SegmentRepository,
    VoteRepository,
};
use storage::store::DocumentStore;

use crate::aggregate;
use crate::error::{EngineError, Result};
use crate::winners::resolve_award;

/// Service driving awards from Draft to Awarded.
pub struct AwardService<'a> {
    store: &'a dyn DocumentStore,
}

/// One row of the award management table.
#[derive(Debug, Clone)]
pub struct AwardRow {
    pub award: Award,
    pub status_label: String,
    pub scope_label: String,
    /// Draft/Ready may still be toggled and edited; Awarded may not.
    pub can_edit: bool,
    pub can_toggle_ready: bool,
    /// Ready and active awards can be given.
    pub can_give: bool,
}

/// One winner line of the awarded-winners table.
#[derive(Debug, Clone)]
pub struct WinnerRow {
    pub award_id: String,
    pub award_name: String,
    pub contestant_id: String,
    pub contestant_name: String,
    pub value: Option<Decimal>,
    pub basis: WinnerBasis,
}

impl<'a> AwardService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn create_award(&self, event_id: &str, req: &SaveAwardRequest) -> Result<Award> {
        Ok(AwardRepository::new(self.store).create(event_id, req)?)
    }

    pub fn update_award(
        &self,
        event_id: &str,
        award_id: &str,
        req: &SaveAwardRequest,
    ) -> Result<Award> {
        Ok(AwardRepository::new(self.store).update(event_id, award_id, req)?)
    }

    /// Flip Draft to Ready or back. Readiness is where type-specific scope
    /// requirements are enforced, so a Ready award is always computable in
    /// principle.
    pub fn toggle_ready(&self, event_id: &str, award_id: &str) -> Result<Award> {
        let repo = AwardRepository::new(self.store);
        let award = repo.find(event_id, award_id)?;
        match award.status {
            AwardStatus::Awarded => Err(EngineError::precondition(
                "This award has already been given",
            )),
            AwardStatus::Ready => Ok(repo.set_status(event_id, award_id, AwardStatus::Draft)?),
            AwardStatus::Draft => {
                self.check_readiness(event_id, &award)?;
                Ok(repo.set_status(event_id, award_id, AwardStatus::Ready)?)
            }
        }
    }

    /// Deactivation is allowed in any lifecycle state; it only hides the
    /// award from tables and blocks giving it.
    pub fn toggle_active(&self, event_id: &str, award_id: &str) -> Result<Award> {
        let repo = AwardRepository::new(self.store);
        let award = repo.find(event_id, award_id)?;
        Ok(repo.set_active(event_id, award_id, !award.active)?)
    }

    /// Give a Ready award: load the data its type needs, resolve winners,
    /// persist the result, and transition to Awarded. Any rejection leaves
    /// the award and its results untouched.
    pub fn compute_award(&self, event_id: &str, award_id: &str) -> Result<AwardResult> {
        let repo = AwardRepository::new(self.store);
        let award = repo.find(event_id, award_id)?;
        match award.status {
            AwardStatus::Draft => {
                return Err(EngineError::precondition(
                    "Mark the award as ready before giving it",
                ));
            }
            AwardStatus::Awarded => {
                return Err(EngineError::precondition(
                    "This award has already been given",
                ));
            }
            AwardStatus::Ready => {}
        }
        if !award.active {
            return Err(EngineError::precondition(
                "Reactivate this award before giving it",
            ));
        }
        self.check_readiness(event_id, &award)?;

        let (judge_totals, vote_counts) = match award.kind {
            AwardType::Automatic => {
                let round_id = scope_round(&award)?;
                let segment_id = scope_segment(&award)?;
                let totals = ScoreRepository::new(self.store)
                    .segment_source(event_id, round_id, segment_id)
                    .map(|source| aggregate::judge_totals(&source))
                    .unwrap_or_default();
                (totals, Default::default())
            }
            AwardType::Audience => {
                let round_id = scope_round(&award)?;
                let counts = VoteRepository::new(self.store)
                    .source(event_id, round_id, award.scope.segment_id.as_deref())
                    .map(|source| aggregate::vote_counts(&source))
                    .unwrap_or_default();
                (Default::default(), counts)
            }
            AwardType::Manual => Default::default(),
        };

        let result = resolve_award(&award, &judge_totals, &vote_counts)?;
        repo.put_result(event_id, result.clone())?;
        repo.set_status(event_id, award_id, AwardStatus::Awarded)?;
        tracing::info!(award = %award.name, winners = result.winners.len(), "award given");
        Ok(result)
    }

    /// The award management table, filtered.
    pub fn award_rows(&self, event_id: &str, filter: &AwardFilter) -> Vec<AwardRow> {
        AwardRepository::new(self.store)
            .list(event_id)
            .into_iter()
            .filter(|award| filter.matches(award))
            .map(|award| {
                let frozen = award.is_awarded();
                AwardRow {
                    status_label: status_label(&award),
                    scope_label: self.scope_label(event_id, &award),
                    can_edit: !frozen,
                    can_toggle_ready: !frozen,
                    can_give: award.status == AwardStatus::Ready && award.active,
                    award,
                }
            })
            .collect()
    }

    /// Winner rows for every given award, joined with contestant names.
    pub fn award_winners(&self, event_id: &str) -> Vec<WinnerRow> {
        let repo = AwardRepository::new(self.store);
        let results = repo.results(event_id);
        let names = ContestantRepository::new(self.store).display_names(event_id);
        let mut rows = Vec::new();
        for award in repo.list(event_id) {
            let Some(result) = results.get(&award.id) else {
                continue;
            };
            for winner in &result.winners {
                rows.push(WinnerRow {
                    award_id: award.id.clone(),
                    award_name: award.name.clone(),
                    contestant_name: names
                        .get(&winner.contestant_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    contestant_id: winner.contestant_id.clone(),
                    value: winner.value,
                    basis: winner.basis,
                });
            }
        }
        rows
    }

    fn check_readiness(&self, event_id: &str, award: &Award) -> Result<()> {
        match award.kind {
            AwardType::Automatic => {
                if award.scope.level != ScopeLevel::Segment || award.scope.segment_id.is_none() {
                    return Err(EngineError::precondition(
                        "Automatic awards must target a specific segment",
                    ));
                }
            }
            AwardType::Audience => {
                if award.scope.level == ScopeLevel::Event {
                    return Err(EngineError::precondition(
                        "Audience awards must target a round or segment",
                    ));
                }
                let round_id = scope_round(award)?;
                let round = RoundRepository::new(self.store).find(event_id, round_id)?;
                if !round.audience_voting {
                    return Err(EngineError::precondition(
                        "Audience voting is not enabled for the selected round",
                    ));
                }
            }
            AwardType::Manual => {}
        }
        Ok(())
    }

    fn scope_label(&self, event_id: &str, award: &Award) -> String {
        match award.scope.level {
            ScopeLevel::Event => "Event".to_string(),
            ScopeLevel::Round => match award.scope.round_id.as_deref() {
                Some(round_id) => RoundRepository::new(self.store)
                    .find(event_id, round_id)
                    .map(|r| format!("Round: {}", r.name))
                    .unwrap_or_else(|_| "Round".to_string()),
                None => "Round".to_string(),
            },
            ScopeLevel::Segment => {
                match (award.scope.round_id.as_deref(), award.scope.segment_id.as_deref()) {
                    (Some(round_id), Some(segment_id)) => {
                        SegmentRepository::new(self.store)
                            .find(event_id, round_id, segment_id)
                            .map(|s| format!("Segment: {}", s.name))
                            .unwrap_or_else(|_| "Segment".to_string())
                    }
                    _ => "Segment".to_string(),
                }
            }
        }
    }
}

fn scope_round(award: &Award) -> Result<&str> {
    award
        .scope
        .round_id
        .as_deref()
        .ok_or_else(|| EngineError::precondition("Select a round for this award"))
}

fn scope_segment(award: &Award) -> Result<&str> {
    award
        .scope
        .segment_id
        .as_deref()
        .ok_or_else(|| EngineError::precondition("Select a segment for this award"))
}
