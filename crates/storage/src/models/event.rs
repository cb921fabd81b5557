use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pageant event. One event is active at a time; the rest form the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
