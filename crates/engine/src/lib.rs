//! Results engine for pageant events: aggregation, ranking, awards,
//! progression, auditing, and export, all on top of the document store.

pub mod aggregate;
pub mod audit;
pub mod awards;
pub mod competition;
pub mod error;
pub mod export;
pub mod progression;
pub mod ranking;
pub mod voting;
pub mod winners;

pub use error::{EngineError, Result};
