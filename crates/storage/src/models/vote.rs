use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Raw audience vote data: either individual vote entries (an entry without a
/// `count` is one vote) or a pre-aggregated contestant -> count map.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VoteSource {
    Entries(Vec<RawVoteEntry>),
    Counts(BTreeMap<String, Value>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVoteEntry {
    #[serde(default, alias = "contestantId", alias = "cid")]
    pub contestant_id: Option<String>,
    #[serde(default)]
    pub count: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entry_list_and_count_map() {
        let entries: VoteSource =
            serde_json::from_str(r#"[{"contestant_id":"C1"},{"cid":"C2","count":3}]"#).unwrap();
        assert!(matches!(entries, VoteSource::Entries(e) if e.len() == 2));

        let counts: VoteSource = serde_json::from_str(r#"{"C1":5,"C2":2}"#).unwrap();
        assert!(matches!(counts, VoteSource::Counts(m) if m.len() == 2));
    }
}
