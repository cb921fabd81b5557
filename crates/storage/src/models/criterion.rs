use serde::{Deserialize, Serialize};

/// A scoring dimension within a segment. A segment's criteria points always
/// total exactly 100; the batch save enforces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub points: u32,
    #[serde(default)]
    pub description: String,
}
