//! Audience vote recording.

use storage::repository::{RoundRepository, VoteRepository};
use storage::store::DocumentStore;

use crate::aggregate;
use crate::error::{EngineError, Result};

pub struct VotingService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> VotingService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Add one audience vote for a contestant. Whatever shape the stored
    /// tally is in, it is aggregated, incremented, and written back in the
    /// canonical pre-aggregated form.
    pub fn record_vote(
        &self,
        event_id: &str,
        round_id: &str,
        segment_id: Option<&str>,
        contestant_id: &str,
    ) -> Result<i64> {
        let round = RoundRepository::new(self.store).find(event_id, round_id)?;
        if !round.audience_voting {
            return Err(EngineError::precondition(
                "Audience voting is not enabled for this round",
            ));
        }

        let repo = VoteRepository::new(self.store);
        let mut tally = repo
            .source(event_id, round_id, segment_id)
            .map(|source| aggregate::vote_counts(&source))
            .unwrap_or_default();
        let count = tally.entry(contestant_id.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        repo.save_tally(event_id, round_id, segment_id, &tally)?;
        Ok(count)
    }
}
