//! Competition setup: segment and criteria edits, and the round lock.

use storage::dto::segment::{CriterionInput, SaveSegmentRequest};
use storage::models::{Criterion, Round, RoundStatus, Segment};
use storage::repository::{CriteriaRepository, RoundRepository, SegmentRepository};
use storage::store::DocumentStore;

use crate::error::{EngineError, Result};

/// Service guarding structural edits behind the round lifecycle.
pub struct CompetitionService<'a> {
    store: &'a dyn DocumentStore,
}

/// What still blocks locking a round. Shown next to the lock button.
#[derive(Debug, Clone)]
pub struct LockReadiness {
    pub percent_total: u32,
    pub segments: Vec<SegmentReadiness>,
}

#[derive(Debug, Clone)]
pub struct SegmentReadiness {
    pub segment_id: String,
    pub name: String,
    pub points_total: u32,
}

impl LockReadiness {
    pub fn percent_ok(&self) -> bool {
        self.percent_total == 100
    }

    pub fn ready(&self) -> bool {
        self.percent_ok() && self.segments.iter().all(|s| s.points_total == 100)
    }
}

impl<'a> CompetitionService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Create or edit a segment under a Draft, active round.
    pub fn save_segment(
        &self,
        event_id: &str,
        round_id: &str,
        req: &SaveSegmentRequest,
    ) -> Result<Segment> {
        self.editable_round(event_id, round_id)?;
        Ok(SegmentRepository::new(self.store).upsert(event_id, round_id, req)?)
    }

    /// Replace a segment's criteria under a Draft, active round.
    pub fn replace_criteria(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
        inputs: &[CriterionInput],
    ) -> Result<Vec<Criterion>> {
        self.editable_round(event_id, round_id)?;
        SegmentRepository::new(self.store).find(event_id, round_id, segment_id)?;
        Ok(CriteriaRepository::new(self.store).replace(event_id, round_id, segment_id, inputs)?)
    }

    /// The lock precondition report: active-segment percent total and each
    /// active segment's criteria points total.
    pub fn lock_readiness(&self, event_id: &str, round_id: &str) -> LockReadiness {
        let segments = SegmentRepository::new(self.store).list(event_id, round_id);
        let criteria = CriteriaRepository::new(self.store);
        LockReadiness {
            percent_total: segments.iter().filter(|s| s.active).map(|s| s.percent).sum(),
            segments: segments
                .into_iter()
                .filter(|s| s.active)
                .map(|s| SegmentReadiness {
                    points_total: criteria.points_total(event_id, round_id, &s.id),
                    segment_id: s.id,
                    name: s.name,
                })
                .collect(),
        }
    }

    /// Lock a round, making its structure immutable. Requires active-segment
    /// percents summing to exactly 100 and every active segment's criteria
    /// totalling exactly 100.
    pub fn lock_round(&self, event_id: &str, round_id: &str) -> Result<Round> {
        self.editable_round(event_id, round_id)?;
        let readiness = self.lock_readiness(event_id, round_id);
        if !readiness.percent_ok() {
            return Err(EngineError::precondition(format!(
                "Segment percentages must total 100% before locking (currently {}%)",
                readiness.percent_total
            )));
        }
        if let Some(short) = readiness.segments.iter().find(|s| s.points_total != 100) {
            return Err(EngineError::precondition(format!(
                "Criteria for \"{}\" must total 100 points before locking (currently {})",
                short.name, short.points_total
            )));
        }
        let locked =
            RoundRepository::new(self.store).set_status(event_id, round_id, RoundStatus::Locked)?;
        tracing::info!(round = %locked.name, "round locked");
        Ok(locked)
    }

    fn editable_round(&self, event_id: &str, round_id: &str) -> Result<Round> {
        let round = RoundRepository::new(self.store).find(event_id, round_id)?;
        if round.is_locked() {
            return Err(EngineError::precondition(
                "This round is locked and can no longer be edited",
            ));
        }
        if !round.active {
            return Err(EngineError::precondition(
                "This round has been deactivated",
            ));
        }
        Ok(round)
    }
}
