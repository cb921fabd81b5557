use std::collections::BTreeMap;

use chrono::Utc;
use validator::Validate;

use crate::dto::award::SaveAwardRequest;
use crate::error::{Result, StorageError};
use crate::keys;
use crate::models::{Award, AwardResult, AwardScope, AwardStatus, ScopeLevel};
use crate::store::{DocumentStore, parse_or_default, put_json};

/// Repository for awards and their computed results
pub struct AwardRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> AwardRepository<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn list(&self, event_id: &str) -> Vec<Award> {
        let key = keys::awards(event_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn find(&self, event_id: &str, award_id: &str) -> Result<Award> {
        self.list(event_id)
            .into_iter()
            .find(|a| a.id == award_id)
            .ok_or(StorageError::NotFound)
    }

    pub fn save(&self, event_id: &str, awards: &[Award]) -> Result<()> {
        put_json(self.store, &keys::awards(event_id), &awards)
    }

    pub fn create(&self, event_id: &str, req: &SaveAwardRequest) -> Result<Award> {
        req.validate()?;
        req.validate_scope()
            .map_err(|msg| StorageError::ConstraintViolation(msg.to_string()))?;

        let now = Utc::now();
        let award = Award {
            id: super::new_id(),
            event_id: event_id.to_string(),
            name: req.name.trim().to_string(),
            description: req.description.trim().to_string(),
            kind: req.kind,
            scope: scope_of(req),
            rules: req.rules.clone(),
            status: AwardStatus::Draft,
            active: true,
            created_at: now,
            updated_at: now,
        };
        let mut awards = self.list(event_id);
        awards.push(award.clone());
        self.save(event_id, &awards)?;
        Ok(award)
    }

    /// Edit an award. Awarded awards are frozen.
    pub fn update(&self, event_id: &str, award_id: &str, req: &SaveAwardRequest) -> Result<Award> {
        req.validate()?;
        req.validate_scope()
            .map_err(|msg| StorageError::ConstraintViolation(msg.to_string()))?;

        let mut awards = self.list(event_id);
        let award = awards
            .iter_mut()
            .find(|a| a.id == award_id)
            .ok_or(StorageError::NotFound)?;
        if award.is_awarded() {
            return Err(StorageError::ConstraintViolation(
                "This award has been given and can no longer be edited".to_string(),
            ));
        }
        award.name = req.name.trim().to_string();
        award.description = req.description.trim().to_string();
        award.kind = req.kind;
        award.scope = scope_of(req);
        award.rules = req.rules.clone();
        award.updated_at = Utc::now();
        let updated = award.clone();
        self.save(event_id, &awards)?;
        Ok(updated)
    }

    pub fn set_status(&self, event_id: &str, award_id: &str, status: AwardStatus) -> Result<Award> {
        self.modify(event_id, award_id, |award| {
            award.status = status;
        })
    }

    pub fn set_active(&self, event_id: &str, award_id: &str, active: bool) -> Result<Award> {
        self.modify(event_id, award_id, |award| {
            award.active = active;
        })
    }

    /// The results map, award id -> computed result.
    pub fn results(&self, event_id: &str) -> BTreeMap<String, AwardResult> {
        let key = keys::award_results(event_id);
        parse_or_default(self.store.get(&key), &key)
    }

    pub fn result_for(&self, event_id: &str, award_id: &str) -> Option<AwardResult> {
        self.results(event_id).remove(award_id)
    }

    pub fn put_result(&self, event_id: &str, result: AwardResult) -> Result<()> {
        let mut results = self.results(event_id);
        results.insert(result.award_id.clone(), result);
        put_json(self.store, &keys::award_results(event_id), &results)
    }

    fn modify(&self, event_id: &str, award_id: &str, f: impl FnOnce(&mut Award)) -> Result<Award> {
        let mut awards = self.list(event_id);
        let award = awards
            .iter_mut()
            .find(|a| a.id == award_id)
            .ok_or(StorageError::NotFound)?;
        f(award);
        award.updated_at = Utc::now();
        let updated = award.clone();
        self.save(event_id, &awards)?;
        Ok(updated)
    }
}

fn scope_of(req: &SaveAwardRequest) -> AwardScope {
    AwardScope {
        level: req.scope_level,
        round_id: if req.scope_level == ScopeLevel::Event {
            None
        } else {
            req.round_id.clone()
        },
        segment_id: if req.scope_level == ScopeLevel::Segment {
            req.segment_id.clone()
        } else {
            None
        },
    }
}
