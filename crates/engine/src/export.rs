//! Leaderboard export. Rendering beyond CSV belongs to the UI.

use rust_decimal::Decimal;
use storage::store::DocumentStore;

use crate::progression::ProgressionService;

/// A fully stringified table, ready for CSV or any tabular renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The leaderboard as an export table. Missing stage scores render as "-",
/// present ones with two decimal places.
pub fn leaderboard_export(store: &dyn DocumentStore, event_id: &str) -> ExportTable {
    let rows = ProgressionService::new(store)
        .leaderboard(event_id)
        .into_iter()
        .map(|row| {
            vec![
                row.name,
                cell(row.preliminary),
                cell(row.semifinal),
                cell(row.final_score),
                row.status.to_string(),
            ]
        })
        .collect();
    ExportTable {
        headers: ["Contestant", "Prelim", "Semis", "Final", "Status"]
            .map(String::from)
            .to_vec(),
        rows,
    }
}

fn cell(score: Option<Decimal>) -> String {
    match score {
        Some(score) => format!("{:.2}", score.round_dp(2)),
        None => "-".to_string(),
    }
}

/// Render a table as CSV with every field quoted.
pub fn to_csv(table: &ExportTable) -> String {
    let mut out = String::new();
    out.push_str(&csv_line(&table.headers));
    for row in &table.rows {
        out.push('\n');
        out.push_str(&csv_line(row));
    }
    out
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::round::CreateRoundRequest;
    use storage::models::{AdvancementRule, Contestant, RoundScore, RoundStatus};
    use storage::repository::{ContestantRepository, RoundRepository, ScoreRepository};
    use storage::store::MemoryStore;

    #[test]
    fn quotes_every_field_and_escapes_embedded_quotes() {
        let table = ExportTable {
            headers: vec!["Contestant".to_string(), "Status".to_string()],
            rows: vec![vec!["Maria \"Sunshine\" Cruz".to_string(), "Winner".to_string()]],
        };
        assert_eq!(
            to_csv(&table),
            "\"Contestant\",\"Status\"\n\"Maria \"\"Sunshine\"\" Cruz\",\"Winner\""
        );
    }

    #[test]
    fn missing_scores_render_as_dash_and_present_ones_to_two_places() {
        let store = MemoryStore::new();
        ContestantRepository::new(&store)
            .save(
                "e1",
                &[Contestant {
                    id: "C1".to_string(),
                    first_name: "Maria".to_string(),
                    last_name: "Cruz".to_string(),
                    active: true,
                }],
            )
            .unwrap();
        let repo = RoundRepository::new(&store);
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
        ScoreRepository::new(&store)
            .record_round_total("e1", &round.id, RoundScore::new("C1", "85.5".parse().unwrap()))
            .unwrap();

        let table = leaderboard_export(&store, "e1");
        assert_eq!(table.headers[0], "Contestant");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], "85.50");
        assert_eq!(table.rows[0][2], "-");
        assert_eq!(table.rows[0][3], "-");
    }
}
