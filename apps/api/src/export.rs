//! Session export: the ranked candidate list as CSV, or the full role +
//! candidates as a JSON attachment.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: String,
}

/// GET /api/v1/export?format=csv|json
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    match query.format.as_str() {
        "csv" => {
            let store = state.store.read().await;
            let body = build_csv(store.candidates());
            Ok(attachment("text/csv", "candidates.csv", body))
        }
        "json" => {
            let store = state.store.read().await;
            let body = serde_json::to_string_pretty(&json!({
                "role": store.role(),
                "candidates": store.candidates(),
            }))
            .map_err(|e| AppError::Internal(e.into()))?;
            Ok(attachment("application/json", "screening.json", body))
        }
        other => Err(AppError::Validation(format!(
            "Unsupported export format '{other}' (expected 'csv' or 'json')"
        ))),
    }
}

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

fn build_csv(candidates: &[Candidate]) -> String {
    let mut csv = String::from("filename,overall_score,reviewed,notes\n");
    for candidate in candidates {
        let reviewed = if candidate.reviewed { "yes" } else { "no" };
        csv.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&candidate.filename),
            candidate.ranking.overall_score,
            reviewed,
            csv_field(&candidate.interview_notes),
        ));
    }
    csv
}

/// RFC 4180 quoting: fields containing commas, quotes, or line breaks are
/// wrapped in quotes, with embedded quotes doubled.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Ranking;
    use std::collections::BTreeMap;

    fn candidate(filename: &str, score: f64, notes: &str) -> Candidate {
        let ranking = Ranking {
            overall_score: score,
            main_category_scores: BTreeMap::new(),
            sub_category_scores: BTreeMap::new(),
            summary: String::new(),
            red_flags: vec![],
            interview_questions: (0..10).map(|i| format!("Q{i}?")).collect(),
            ai_feedback: String::new(),
        };
        let mut candidate = Candidate::new(filename.to_string(), "text", ranking);
        candidate.interview_notes = notes.to_string();
        candidate
    }

    /// Minimal RFC 4180 field reader for round-trip assertions.
    fn parse_quoted_field(field: &str) -> String {
        let inner = field
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .expect("field should be quoted");
        inner.replace("\"\"", "\"")
    }

    #[test]
    fn test_csv_header_and_plain_row() {
        let csv = build_csv(&[candidate("cv.pdf", 82.0, "solid")]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("filename,overall_score,reviewed,notes"));
        assert_eq!(lines.next(), Some("cv.pdf,82,no,solid"));
    }

    #[test]
    fn test_csv_doubles_embedded_quotes_and_round_trips() {
        let notes = r#"said "definitely interested", wants remote"#;
        let csv = build_csv(&[candidate("cv.pdf", 70.0, notes)]);
        let row = csv.lines().nth(1).unwrap();

        // Quote is doubled on the wire...
        assert!(row.contains(r#"""definitely interested"""#));

        // ...and the field round-trips through an RFC 4180 reader.
        let field_start = row.find('"').unwrap();
        assert_eq!(parse_quoted_field(&row[field_start..]), notes);
    }

    #[test]
    fn test_csv_quotes_filenames_with_commas() {
        let csv = build_csv(&[candidate("doe, jane.pdf", 55.0, "")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"doe, jane.pdf\","));
    }

    #[test]
    fn test_reviewed_flag_renders_yes_no() {
        let mut reviewed = candidate("a.pdf", 60.0, "");
        reviewed.reviewed = true;
        let csv = build_csv(&[reviewed, candidate("b.pdf", 50.0, "")]);
        assert!(csv.contains("a.pdf,60,yes,"));
        assert!(csv.contains("b.pdf,50,no,"));
    }

    #[test]
    fn test_csv_field_leaves_plain_values_alone() {
        assert_eq!(csv_field("plain.pdf"), "plain.pdf");
        assert_eq!(csv_field("with \"quote\""), "\"with \"\"quote\"\"\"");
    }
}
