use validator::Validate;

use crate::dto::segment::CriterionInput;
use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::Criterion;
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for the criteria of one segment
pub struct CriteriaRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CriteriaRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, event_id: &str, round_id: &str, segment_id: &str) -> Vec<Criterion> {
        let key = keys::criteria(event_id, round_id, segment_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn points_total(&self, event_id: &str, round_id: &str, segment_id: &str) -> u32 {
        self.list(event_id, round_id, segment_id)
            .iter()
            .map(|c| c.points)
            .sum()
    }

    /// Replace a segment's criteria as a batch. The batch is rejected unless
    /// the points total exactly 100.
    pub fn replace(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: &str,
        inputs: &[CriterionInput],
    ) -> Result<Vec<Criterion>> {
        for input in inputs {
            input.validate()?;
        }
        let total: u32 = inputs.iter().map(|c| c.points).sum();
        if total != 100 {
            let msg = if total > 100 {
                format!("Criteria points exceed 100 (got {total})")
            } else {
                format!("Criteria points must total 100 (got {total})")
            };
            return Err(StorageError::ConstraintViolation(msg));
        }

        let criteria: Vec<Criterion> = inputs
            .iter()
            .map(|input| Criterion {
                name: input.name.trim().to_string(),
                points: input.points,
                description: input.description.trim().to_string(),
            })
            .collect();
        put_json(
            self.store,
            &keys::criteria(event_id, round_id, segment_id),
            &criteria,
        )?;
        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn input(name: &str, points: u32) -> CriterionInput {
        CriterionInput {
            name: name.to_string(),
            points,
            description: String::new(),
        }
    }

    #[test]
    fn batch_totaling_100_is_saved() {
        let store = MemoryStore::new();
        let repo = CriteriaRepository::new(&store);
        let saved = repo
            .replace("e1", "r1", "s1", &[input("Poise", 40), input("Fit", 60)])
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(repo.points_total("e1", "r1", "s1"), 100);
    }

    #[test]
    fn batch_off_by_one_is_rejected() {
        let store = MemoryStore::new();
        let repo = CriteriaRepository::new(&store);
        assert!(
            repo.replace("e1", "r1", "s1", &[input("Poise", 40), input("Fit", 59)])
                .is_err()
        );
        assert!(
            repo.replace("e1", "r1", "s1", &[input("Poise", 40), input("Fit", 61)])
                .is_err()
        );
        assert!(repo.list("e1", "r1", "s1").is_empty());
    }
}
