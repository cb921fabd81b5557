use chrono::Utc;
use validator::Validate;

use crate::dto::segment::SaveSegmentRequest;
use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::Segment;
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for the segments of one round
pub struct SegmentRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> SegmentRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, event_id: &str, round_id: &str) -> Vec<Segment> {
        let key = keys::segments(event_id, round_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn find(&self, event_id: &str, round_id: &str, segment_id: &str) -> Result<Segment> {
        self.list(event_id, round_id)
            .into_iter()
            .find(|s| s.id == segment_id)
            .ok_or(StorageError::NotFound)
    }

    pub fn save(&self, event_id: &str, round_id: &str, segments: &[Segment]) -> Result<()> {
        put_json(self.store, &keys::segments(event_id, round_id), &segments)
    }

    /// Create or update a segment, keeping active segments' percents within
    /// the round budget of 100.
    pub fn upsert(
        &self,
        event_id: &str,
        round_id: &str,
        req: &SaveSegmentRequest,
    ) -> Result<Segment> {
        req.validate()?;
        let mut segments = self.list(event_id, round_id);

        let committed: u32 = segments
            .iter()
            .filter(|s| s.active && Some(&s.id) != req.segment_id.as_ref())
            .map(|s| s.percent)
            .sum();
        if committed + req.percent > 100 {
            return Err(StorageError::ConstraintViolation(
                "Total segment percentage cannot exceed 100%".to_string(),
            ));
        }

        let now = Utc::now();
        let segment = match &req.segment_id {
            Some(id) => {
                let existing = segments
                    .iter_mut()
                    .find(|s| s.id == *id)
                    .ok_or(StorageError::NotFound)?;
                existing.name = req.name.trim().to_string();
                existing.description = req.description.trim().to_string();
                existing.percent = req.percent;
                existing.scoring_method = req.scoring_method;
                existing.weights = req.scoring_method.weights();
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let segment = Segment {
                    id: super::new_id(),
                    round_id: round_id.to_string(),
                    event_id: event_id.to_string(),
                    name: req.name.trim().to_string(),
                    description: req.description.trim().to_string(),
                    percent: req.percent,
                    scoring_method: req.scoring_method,
                    weights: req.scoring_method.weights(),
                    active: true,
                    created_at: now,
                    updated_at: now,
                };
                segments.push(segment.clone());
                segment
            }
        };
        self.save(event_id, round_id, &segments)?;
        Ok(segment)
    }

    pub fn set_active(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
        active: bool,
    ) -> Result<Segment> {
        let mut segments = self.list(event_id, round_id);
        let segment = segments
            .iter_mut()
            .find(|s| s.id == segment_id)
            .ok_or(StorageError::NotFound)?;
        segment.active = active;
        segment.updated_at = Utc::now();
        let updated = segment.clone();
        self.save(event_id, round_id, &segments)?;
        Ok(updated)
    }

    /// Percent total over active segments.
    pub fn active_percent_total(&self, event_id: &str, round_id: &str) -> u32 {
        self.list(event_id, round_id)
            .iter()
            .filter(|s| s.active)
            .map(|s| s.percent)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringMethod;
    use crate::store::MemoryStore;

    fn request(name: &str, percent: u32) -> SaveSegmentRequest {
        SaveSegmentRequest {
            segment_id: None,
            name: name.to_string(),
            description: String::new(),
            percent,
            scoring_method: ScoringMethod::Judge,
        }
    }

    #[test]
    fn percent_budget_enforced_across_saves() {
        let store = MemoryStore::new();
        let repo = SegmentRepository::new(&store);
        repo.upsert("e1", "r1", &request("Gown", 60)).unwrap();
        repo.upsert("e1", "r1", &request("Talent", 40)).unwrap();
        let err = repo.upsert("e1", "r1", &request("Interview", 1)).unwrap_err();
        assert!(err.is_constraint_violation());
        assert_eq!(repo.active_percent_total("e1", "r1"), 100);
    }

    #[test]
    fn editing_a_segment_excludes_its_own_percent() {
        let store = MemoryStore::new();
        let repo = SegmentRepository::new(&store);
        let seg = repo.upsert("e1", "r1", &request("Gown", 60)).unwrap();
        let mut edit = request("Gown", 100);
        edit.segment_id = Some(seg.id.clone());
        assert!(repo.upsert("e1", "r1", &edit).is_ok());
    }

    #[test]
    fn deactivated_segment_frees_its_percent() {
        let store = MemoryStore::new();
        let repo = SegmentRepository::new(&store);
        let seg = repo.upsert("e1", "r1", &request("Gown", 60)).unwrap();
        repo.set_active("e1", "r1", &seg.id, false).unwrap();
        assert!(repo.upsert("e1", "r1", &request("Talent", 80)).is_ok());
    }
}
