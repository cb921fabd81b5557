mod award;
mod contestant;
mod criteria;
mod event;
mod judge;
mod round;
mod score;
mod segment;
mod vote;

pub use award::AwardRepository;
pub use contestant::ContestantRepository;
pub use criteria::CriteriaRepository;
pub use event::EventRepository;
pub use judge::JudgeRepository;
pub use round::RoundRepository;
pub use score::ScoreRepository;
pub use segment::SegmentRepository;
pub use vote::VoteRepository;

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
