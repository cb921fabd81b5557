mod award;
mod award_result;
mod contestant;
mod criterion;
mod event;
mod judge;
mod round;
mod score;
mod segment;
mod vote;

pub use award::{Award, AwardRules, AwardScope, AwardStatus, AwardType, ScopeLevel};
pub use award_result::{AwardResult, AwardWinner, FinalWinner, WinnerBasis};
pub use contestant::Contestant;
pub use criterion::Criterion;
pub use event::Event;
pub use judge::Judge;
pub use round::{AdvancementRule, Round, RoundStatus, Stage, StageWeights};
pub use score::{RawScoreEntry, RawScoreValues, RoundScore, ScoreEntry, ScoreSource, numeric};
pub use segment::{ScoringMethod, Segment};
pub use vote::{RawVoteEntry, VoteSource};
