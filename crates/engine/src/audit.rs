//! Scoring audit: the completion report and data-consistency findings.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storage::repository::{
    ContestantRepository, CriteriaRepository, JudgeRepository, RoundRepository, ScoreRepository,
    SegmentRepository,
};
use storage::store::DocumentStore;

/// Headline completeness numbers for the audit page.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionReport {
    pub judge_count: usize,
    /// Criterion values recorded across every segment of every round.
    pub total_scores_submitted: usize,
    /// True once at least one round is locked and no score is missing from
    /// any locked round.
    pub scoring_completed: bool,
    pub last_scoring_at: Option<DateTime<Utc>>,
}

/// A single audit finding. `Display` renders the line shown on the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Anomaly {
    CriteriaTotalMismatch {
        round: String,
        segment: String,
        total: u32,
    },
    MissingScoreEntry {
        round: String,
        segment: String,
        contestant: String,
    },
    MissingCriterionScore {
        segment: String,
        contestant: String,
        criterion: String,
    },
    EmptyJudgeScoreLog {
        key: String,
    },
    JudgeLogsUnavailable,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::CriteriaTotalMismatch { round, segment, total } => write!(
                f,
                "Criteria for \"{segment}\" in \"{round}\" total {total} instead of 100"
            ),
            Anomaly::MissingScoreEntry { round, segment, contestant } => {
                write!(f, "No score entry for {contestant} in \"{segment}\" of \"{round}\"")
            }
            Anomaly::MissingCriterionScore { segment, contestant, criterion } => {
                write!(f, "Missing \"{criterion}\" score for {contestant} in \"{segment}\"")
            }
            Anomaly::EmptyJudgeScoreLog { key } => {
                write!(f, "Judge score log {key} is empty")
            }
            Anomaly::JudgeLogsUnavailable => {
                write!(f, "Per-judge score logs are not available")
            }
        }
    }
}

pub struct AuditService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> AuditService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn completion_report(&self, event_id: &str) -> CompletionReport {
        let judges = JudgeRepository::new(self.store).list(event_id);
        let rounds = RoundRepository::new(self.store).list(event_id);
        let segments = SegmentRepository::new(self.store);
        let scores = ScoreRepository::new(self.store);

        let mut total_scores_submitted = 0;
        let mut last_scoring_at: Option<DateTime<Utc>> = None;
        for round in rounds.iter().filter(|r| r.active) {
            for segment in segments.list(event_id, &round.id) {
                for entry in scores.segment_entries(event_id, &round.id, &segment.id) {
                    total_scores_submitted +=
                        entry.scores.values().filter(|v| v.is_some()).count();
                    if let Some(at) = entry.updated_at {
                        last_scoring_at = Some(last_scoring_at.map_or(at, |prev| prev.max(at)));
                    }
                }
            }
        }

        let any_locked = rounds.iter().any(|r| r.active && r.is_locked());
        let missing = self
            .find_anomalies(event_id)
            .iter()
            .any(|a| matches!(a, Anomaly::MissingScoreEntry { .. } | Anomaly::MissingCriterionScore { .. }));

        CompletionReport {
            judge_count: judges.iter().filter(|j| j.active).count(),
            total_scores_submitted,
            scoring_completed: any_locked && !missing,
            last_scoring_at,
        }
    }

    /// Scan locked rounds for inconsistent or incomplete scoring data.
    /// Draft rounds are still being set up and are not audited.
    pub fn find_anomalies(&self, event_id: &str) -> Vec<Anomaly> {
        let rounds = RoundRepository::new(self.store).list(event_id);
        let contestants = ContestantRepository::new(self.store).list(event_id);
        let names = ContestantRepository::new(self.store).display_names(event_id);
        let segments = SegmentRepository::new(self.store);
        let criteria_repo = CriteriaRepository::new(self.store);
        let scores = ScoreRepository::new(self.store);

        let display = |id: &str| names.get(id).cloned().unwrap_or_else(|| id.to_string());
        let mut anomalies = Vec::new();

        for round in rounds.iter().filter(|r| r.active && r.is_locked()) {
            for segment in segments.list(event_id, &round.id) {
                if !segment.active {
                    continue;
                }
                let criteria = criteria_repo.list(event_id, &round.id, &segment.id);
                let total: u32 = criteria.iter().map(|c| c.points).sum();
                if !criteria.is_empty() && total != 100 {
                    anomalies.push(Anomaly::CriteriaTotalMismatch {
                        round: round.name.clone(),
                        segment: segment.name.clone(),
                        total,
                    });
                }

                let entries = scores.segment_entries(event_id, &round.id, &segment.id);
                for contestant in contestants.iter().filter(|c| c.active) {
                    match entries.iter().find(|e| e.contestant_id == contestant.id) {
                        None => anomalies.push(Anomaly::MissingScoreEntry {
                            round: round.name.clone(),
                            segment: segment.name.clone(),
                            contestant: display(&contestant.id),
                        }),
                        Some(entry) => {
                            for criterion in &criteria {
                                let recorded = entry
                                    .scores
                                    .get(&criterion.name)
                                    .is_some_and(|v| v.is_some());
                                if !recorded {
                                    anomalies.push(Anomaly::MissingCriterionScore {
                                        segment: segment.name.clone(),
                                        contestant: display(&contestant.id),
                                        criterion: criterion.name.clone(),
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }

        let log_keys = scores.judge_log_keys(event_id);
        if log_keys.is_empty() {
            anomalies.push(Anomaly::JudgeLogsUnavailable);
        } else {
            for key in log_keys {
                if scores.judge_log_entry_count(&key) == 0 {
                    anomalies.push(Anomaly::EmptyJudgeScoreLog { key });
                }
            }
        }
        anomalies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::round::CreateRoundRequest;
    use storage::keys;
    use storage::models::{AdvancementRule, Contestant, RoundStatus};
    use storage::store::MemoryStore;

    fn seed_locked_round(store: &MemoryStore) -> String {
        let repo = RoundRepository::new(store);
        let round = repo
            .create(
                "e1",
                &CreateRoundRequest {
                    name: "Preliminary Round".to_string(),
                    description: String::new(),
                    order: 1,
                    advancement_rule: AdvancementRule::TopN,
                    top_n: Some(5),
                    audience_voting: false,
                    stage: None,
                },
            )
            .unwrap();
        repo.set_status("e1", &round.id, RoundStatus::Locked).unwrap();
        round.id
    }

    fn seed_contestant(store: &MemoryStore, id: &str, first: &str) {
        let repo = ContestantRepository::new(store);
        let mut all = repo.list("e1");
        all.push(Contestant {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: "Cruz".to_string(),
            active: true,
        });
        repo.save("e1", &all).unwrap();
    }

    #[test]
    fn off_total_criteria_are_flagged() {
        let store = MemoryStore::new();
        let round_id = seed_locked_round(&store);
        store
            .put(
                &keys::segments("e1", &round_id),
                &format!(
                    r#"[{{"id":"s1","round_id":"{round_id}","event_id":"e1","name":"Gown",
                        "percent":100,"scoring_method":"Judge",
                        "weights":{{"judge":"1","audience":"0"}},
                        "created_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"}}]"#
                ),
            )
            .unwrap();
        store
            .put(
                &keys::criteria("e1", &round_id, "s1"),
                r#"[{"name":"Poise","points":99,"description":""}]"#,
            )
            .unwrap();

        let anomalies = AuditService::new(&store).find_anomalies("e1");
        assert!(anomalies.iter().any(|a| matches!(
            a,
            Anomaly::CriteriaTotalMismatch { total: 99, .. }
        )));
    }

    #[test]
    fn unscored_contestant_is_flagged() {
        let store = MemoryStore::new();
        let round_id = seed_locked_round(&store);
        seed_contestant(&store, "C1", "Maria");
        store
            .put(
                &keys::segments("e1", &round_id),
                &format!(
                    r#"[{{"id":"s1","round_id":"{round_id}","event_id":"e1","name":"Gown",
                        "percent":100,"scoring_method":"Judge",
                        "weights":{{"judge":"1","audience":"0"}},
                        "created_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"}}]"#
                ),
            )
            .unwrap();

        let anomalies = AuditService::new(&store).find_anomalies("e1");
        let finding = anomalies
            .iter()
            .find(|a| matches!(a, Anomaly::MissingScoreEntry { .. }))
            .unwrap();
        assert_eq!(
            finding.to_string(),
            "No score entry for Maria Cruz in \"Gown\" of \"Preliminary Round\""
        );
    }

    #[test]
    fn absent_judge_logs_surface_one_finding() {
        let store = MemoryStore::new();
        let anomalies = AuditService::new(&store).find_anomalies("e1");
        assert_eq!(anomalies, vec![Anomaly::JudgeLogsUnavailable]);
    }

    #[test]
    fn empty_judge_log_is_flagged() {
        let store = MemoryStore::new();
        let key = format!("{}j1", keys::judge_segment_scores_prefix("e1"));
        store.put(&key, "{}").unwrap();
        let anomalies = AuditService::new(&store).find_anomalies("e1");
        assert!(anomalies.iter().any(|a| matches!(a, Anomaly::EmptyJudgeScoreLog { .. })));
    }

    #[test]
    fn completion_report_counts_recorded_values() {
        let store = MemoryStore::new();
        let round_id = seed_locked_round(&store);
        seed_contestant(&store, "C1", "Maria");
        store
            .put(
                &keys::segments("e1", &round_id),
                &format!(
                    r#"[{{"id":"s1","round_id":"{round_id}","event_id":"e1","name":"Gown",
                        "percent":100,"scoring_method":"Judge",
                        "weights":{{"judge":"1","audience":"0"}},
                        "created_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"}}]"#
                ),
            )
            .unwrap();
        store
            .put(
                &keys::segment_scores("e1", &round_id, "s1"),
                r#"[{"contestant_id":"C1","scores":{"Poise":"40","Fit":"55"},
                     "updated_at":"2026-02-01T12:00:00Z"}]"#,
            )
            .unwrap();

        let report = AuditService::new(&store).completion_report("e1");
        assert_eq!(report.total_scores_submitted, 2);
        assert!(report.scoring_completed);
        assert!(report.last_scoring_at.is_some());
    }
}
