use chrono::Utc;
use validator::Validate;

use crate::dto::round::CreateRoundRequest;
use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::{Round, RoundStatus};
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for rounds of one event
pub struct RoundRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> RoundRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// List all rounds, sorted by running order
    pub fn list(&self, event_id: &str) -> Vec<Round> {
        let key = keys::rounds(event_id);
        let mut rounds: Vec<Round> = parse_or_default(self.store.get(&key), &key);
        rounds.sort_by_key(|r| r.order);
        rounds
    }

    pub fn find(&self, event_id: &str, round_id: &str) -> Result<Round> {
        self.list(event_id)
            .into_iter()
            .find(|r| r.id == round_id)
            .ok_or(StorageError::NotFound)
    }

    pub fn save(&self, event_id: &str, rounds: &[Round]) -> Result<()> {
        put_json(self.store, &keys::rounds(event_id), &rounds)
    }

    /// Create a new round. The running order must be unique within the event.
    pub fn create(&self, event_id: &str, req: &CreateRoundRequest) -> Result<Round> {
        req.validate()?;
        req.validate_rule()
            .map_err(|msg| StorageError::ConstraintViolation(msg.to_string()))?;

        let mut rounds = self.list(event_id);
        if rounds.iter().any(|r| r.order == req.order) {
            return Err(StorageError::ConstraintViolation(format!(
                "A round with order {} already exists",
                req.order
            )));
        }

        let now = Utc::now();
        let round = Round {
            id: super::new_id(),
            event_id: event_id.to_string(),
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            order: req.order,
            advancement_rule: req.advancement_rule,
            top_n: req.effective_top_n(),
            audience_voting: req.audience_voting,
            weights: req.weights(),
            status: RoundStatus::Draft,
            stage: req.stage,
            active: true,
            created_at: now,
            updated_at: now,
        };
        rounds.push(round.clone());
        self.save(event_id, &rounds)?;
        Ok(round)
    }

    /// Update a Draft round. Locked rounds are immutable except deactivation.
    pub fn update(&self, event_id: &str, round_id: &str, req: &CreateRoundRequest) -> Result<Round> {
        req.validate()?;
        req.validate_rule()
            .map_err(|msg| StorageError::ConstraintViolation(msg.to_string()))?;

        let mut rounds = self.list(event_id);
        if rounds
            .iter()
            .any(|r| r.id != round_id && r.order == req.order)
        {
            return Err(StorageError::ConstraintViolation(format!(
                "A round with order {} already exists",
                req.order
            )));
        }
        let round = rounds
            .iter_mut()
            .find(|r| r.id == round_id)
            .ok_or(StorageError::NotFound)?;
        if round.is_locked() {
            return Err(StorageError::ConstraintViolation(
                "This round is locked and can no longer be edited".to_string(),
            ));
        }

        round.name = req.name.trim().to_string();
        round.description = req.description.trim().to_string();
        round.order = req.order;
        round.advancement_rule = req.advancement_rule;
        round.top_n = req.effective_top_n();
        round.audience_voting = req.audience_voting;
        round.weights = req.weights();
        round.stage = req.stage;
        round.updated_at = Utc::now();
        let updated = round.clone();
        self.save(event_id, &rounds)?;
        Ok(updated)
    }

    pub fn set_status(&self, event_id: &str, round_id: &str, status: RoundStatus) -> Result<Round> {
        self.modify(event_id, round_id, |round| {
            round.status = status;
        })
    }

    /// Deactivation is the one mutation allowed on a Locked round.
    pub fn set_active(&self, event_id: &str, round_id: &str, active: bool) -> Result<Round> {
        self.modify(event_id, round_id, |round| {
            round.active = active;
        })
    }

    fn modify(&self, event_id: &str, round_id: &str, f: impl FnOnce(&mut Round)) -> Result<Round> {
        let mut rounds = self.list(event_id);
        let round = rounds
            .iter_mut()
            .find(|r| r.id == round_id)
            .ok_or(StorageError::NotFound)?;
        f(round);
        round.updated_at = Utc::now();
        let updated = round.clone();
        self.save(event_id, &rounds)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdvancementRule;
    use crate::store::MemoryStore;

    fn request(name: &str, order: u32) -> CreateRoundRequest {
        CreateRoundRequest {
            name: name.to_string(),
            description: String::new(),
            order,
            advancement_rule: AdvancementRule::TopN,
            top_n: Some(3),
            audience_voting: false,
            stage: None,
        }
    }

    #[test]
    fn create_and_list_sorted_by_order() {
        let store = MemoryStore::new();
        let repo = RoundRepository::new(&store);
        repo.create("e1", &request("Finals", 3)).unwrap();
        repo.create("e1", &request("Prelims", 1)).unwrap();
        let rounds = repo.list("e1");
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0].name, "Prelims");
        assert_eq!(rounds[1].name, "Finals");
    }

    #[test]
    fn duplicate_order_rejected() {
        let store = MemoryStore::new();
        let repo = RoundRepository::new(&store);
        repo.create("e1", &request("Prelims", 1)).unwrap();
        let err = repo.create("e1", &request("Semis", 1)).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn locked_round_rejects_update_but_allows_deactivation() {
        let store = MemoryStore::new();
        let repo = RoundRepository::new(&store);
        let round = repo.create("e1", &request("Prelims", 1)).unwrap();
        repo.set_status("e1", &round.id, RoundStatus::Locked).unwrap();

        let err = repo.update("e1", &round.id, &request("Renamed", 1)).unwrap_err();
        assert!(err.is_constraint_violation());

        let updated = repo.set_active("e1", &round.id, false).unwrap();
        assert!(!updated.active);
    }

    #[test]
    fn malformed_round_document_reads_as_empty() {
        let store = MemoryStore::new();
        store.put(&keys::rounds("e1"), "{{{not json").unwrap();
        let repo = RoundRepository::new(&store);
        assert!(repo.list("e1").is_empty());
    }
}
