//! Key naming for the document store.
//!
//! Every collection lives under one key, namespaced by event id and, where
//! applicable, round and segment ids. The exact scheme is private to the
//! storage layer; repositories are the only callers.

pub const PREFIX: &str = "pms_";

pub fn events() -> String {
    format!("{PREFIX}events")
}

pub fn active_event() -> String {
    format!("{PREFIX}active_event")
}

pub fn rounds(event_id: &str) -> String {
    format!("{PREFIX}rounds_{event_id}")
}

pub fn segments(event_id: &str, round_id: &str) -> String {
    format!("{PREFIX}segments_{event_id}_{round_id}")
}

pub fn criteria(event_id: &str, round_id: &str, segment_id: &str) -> String {
    format!("{PREFIX}criteria_{event_id}_{round_id}_{segment_id}")
}

pub fn segment_scores(event_id: &str, round_id: &str, segment_id: &str) -> String {
    format!("{PREFIX}segment_scores_{event_id}_{round_id}_{segment_id}")
}

pub fn round_scores(event_id: &str, round_id: &str) -> String {
    format!("{PREFIX}round_scores_{event_id}_{round_id}")
}

pub fn votes(event_id: &str, round_id: &str, segment_id: Option<&str>) -> String {
    match segment_id {
        Some(sid) => format!("{PREFIX}votes_{event_id}_{round_id}_{sid}"),
        None => format!("{PREFIX}votes_{event_id}_{round_id}"),
    }
}

pub fn awards(event_id: &str) -> String {
    format!("{PREFIX}awards_{event_id}")
}

pub fn award_results(event_id: &str) -> String {
    format!("{PREFIX}award_results_{event_id}")
}

pub fn contestants(event_id: &str) -> String {
    format!("{PREFIX}contestants_{event_id}")
}

pub fn judges(event_id: &str) -> String {
    format!("{PREFIX}judges_{event_id}")
}

pub fn final_winner(event_id: &str) -> String {
    format!("{PREFIX}final_winner_{event_id}")
}

/// Per-judge score logs are written by the judge console when present; the
/// audit report scans them best-effort by prefix.
pub fn judge_segment_scores_prefix(event_id: &str) -> String {
    format!("{PREFIX}judge_segment_scores_{event_id}_")
}
