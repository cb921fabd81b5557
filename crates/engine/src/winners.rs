//! Winner selection and award resolution.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use storage::models::{Award, AwardResult, AwardType, AwardWinner, WinnerBasis};

use crate::error::{EngineError, Result};

/// Pick the winners from a score map.
///
/// With `allow_multiple` every contestant at the maximum wins; otherwise the
/// tie is broken toward the lowest contestant id, which the map's ordering
/// already yields. Empty input selects nobody.
pub fn select_winners<V: Ord + Copy>(
    scores: &BTreeMap<String, V>,
    allow_multiple: bool,
) -> Vec<(String, V)> {
    let Some(max) = scores.values().max().copied() else {
        return Vec::new();
    };
    let mut winners: Vec<(String, V)> = scores
        .iter()
        .filter(|(_, v)| **v == max)
        .map(|(id, v)| (id.clone(), *v))
        .collect();
    if !allow_multiple {
        winners.truncate(1);
    }
    winners
}

/// Resolve an award into its winner list from already-loaded data.
///
/// The caller loads whichever input the award type needs; the other two may
/// be empty. Rejects with a precondition error rather than producing a
/// zero-winner result.
pub fn resolve_award(
    award: &Award,
    judge_totals: &BTreeMap<String, Decimal>,
    vote_counts: &BTreeMap<String, i64>,
) -> Result<AwardResult> {
    let winners: Vec<AwardWinner> = match award.kind {
        AwardType::Automatic => {
            if judge_totals.is_empty() {
                return Err(EngineError::precondition(
                    "No judge scores have been recorded for this segment yet",
                ));
            }
            select_winners(judge_totals, award.rules.tie_allow_multiple)
                .into_iter()
                .map(|(contestant_id, total)| AwardWinner {
                    contestant_id,
                    value: Some(total),
                    basis: WinnerBasis::Judge,
                })
                .collect()
        }
        AwardType::Audience => {
            if vote_counts.is_empty() {
                return Err(EngineError::precondition(
                    "No audience votes have been recorded yet",
                ));
            }
            select_winners(vote_counts, award.rules.tie_allow_multiple)
                .into_iter()
                .map(|(contestant_id, count)| AwardWinner {
                    contestant_id,
                    value: Some(Decimal::from(count)),
                    basis: WinnerBasis::Audience,
                })
                .collect()
        }
        AwardType::Manual => award
            .rules
            .winners
            .iter()
            .map(|contestant_id| AwardWinner {
                contestant_id: contestant_id.clone(),
                value: None,
                basis: WinnerBasis::Manual,
            })
            .collect(),
    };

    if winners.is_empty() {
        return Err(EngineError::precondition(
            "Select at least one winner before giving this award",
        ));
    }
    Ok(AwardResult {
        award_id: award.id.clone(),
        winners,
        computed_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storage::models::{AwardRules, AwardScope, AwardStatus, ScopeLevel};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn award(kind: AwardType, rules: AwardRules) -> Award {
        Award {
            id: "a1".to_string(),
            event_id: "e1".to_string(),
            name: "Best in Talent".to_string(),
            description: String::new(),
            kind,
            scope: AwardScope {
                level: ScopeLevel::Segment,
                round_id: Some("r1".to_string()),
                segment_id: Some("s1".to_string()),
            },
            rules,
            status: AwardStatus::Ready,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tie_with_multiple_allowed_selects_all_maxima() {
        let scores = BTreeMap::from([
            ("C1".to_string(), dec("270")),
            ("C2".to_string(), dec("270")),
            ("C3".to_string(), dec("260")),
        ]);
        let winners = select_winners(&scores, true);
        assert_eq!(winners.len(), 2);
        assert_eq!(winners[0].0, "C1");
        assert_eq!(winners[1].0, "C2");
    }

    #[test]
    fn tie_without_multiple_takes_lowest_id() {
        let scores = BTreeMap::from([
            ("C2".to_string(), dec("270")),
            ("C1".to_string(), dec("270")),
        ]);
        let winners = select_winners(&scores, false);
        assert_eq!(winners, vec![("C1".to_string(), dec("270"))]);
    }

    #[test]
    fn empty_scores_select_nobody() {
        let scores: BTreeMap<String, Decimal> = BTreeMap::new();
        assert!(select_winners(&scores, true).is_empty());
    }

    #[test]
    fn automatic_award_resolves_on_judge_basis() {
        let judge = BTreeMap::from([("C1".to_string(), dec("270"))]);
        let result =
            resolve_award(&award(AwardType::Automatic, AwardRules::default()), &judge, &BTreeMap::new())
                .unwrap();
        assert_eq!(result.winners.len(), 1);
        assert_eq!(result.winners[0].basis, WinnerBasis::Judge);
        assert_eq!(result.winners[0].value, Some(dec("270")));
    }

    #[test]
    fn automatic_award_without_scores_is_rejected() {
        let err = resolve_award(
            &award(AwardType::Automatic, AwardRules::default()),
            &BTreeMap::new(),
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn audience_award_counts_votes() {
        let votes = BTreeMap::from([("C1".to_string(), 3i64), ("C2".to_string(), 9i64)]);
        let result = resolve_award(
            &award(AwardType::Audience, AwardRules::default()),
            &BTreeMap::new(),
            &votes,
        )
        .unwrap();
        assert_eq!(result.winners[0].contestant_id, "C2");
        assert_eq!(result.winners[0].value, Some(Decimal::from(9)));
        assert_eq!(result.winners[0].basis, WinnerBasis::Audience);
    }

    #[test]
    fn manual_award_uses_the_selection_without_values() {
        let rules = AwardRules {
            winners: vec!["C3".to_string()],
            justification: "Unanimous panel pick".to_string(),
            ..Default::default()
        };
        let result = resolve_award(
            &award(AwardType::Manual, rules),
            &BTreeMap::new(),
            &BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(result.winners[0].contestant_id, "C3");
        assert_eq!(result.winners[0].value, None);
        assert_eq!(result.winners[0].basis, WinnerBasis::Manual);
    }

    #[test]
    fn manual_award_with_empty_selection_is_rejected() {
        let err = resolve_award(
            &award(AwardType::Manual, AwardRules::default()),
            &BTreeMap::new(),
            &BTreeMap::new(),
        )
        .unwrap_err();
        assert!(err.is_precondition());
    }
}
