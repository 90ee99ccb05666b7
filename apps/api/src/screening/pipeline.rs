//! The batch ranking pipeline: extract → prompt → model → validate → store,
//! run strictly sequentially over the uploaded files.
//!
//! The batch is best-effort across files and all-or-nothing within one file:
//! any failure on a single file (extraction too short, gateway error, bad
//! JSON) logs a warning and moves on; it never aborts the batch.

use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::llm_client::ChatMessage;
use crate::models::candidate::{Candidate, Ranking};
use crate::models::role::Role;
use crate::screening::prompts::{ranking_system, RANKING_PROMPT_TEMPLATE};
use crate::state::AppState;

/// Extracted text shorter than this is treated as "not a CV" and skipped.
pub const MIN_EXTRACT_LEN: usize = 50;

const RANKING_TEMPERATURE: f32 = 0.5;

/// One file from the multipart upload, held fully in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Runs one batch. Preconditions (role saved, files present, no batch already
/// running) are checked before any state is touched; after that the store is
/// reset and the files are ranked one at a time in input order.
pub async fn run_batch(state: &AppState, files: Vec<UploadedFile>) -> Result<(), AppError> {
    if files.is_empty() {
        return Err(AppError::Validation(
            "At least one file must be uploaded".to_string(),
        ));
    }

    let role = {
        let mut store = state.store.write().await;
        let role = store
            .role()
            .cloned()
            .ok_or_else(|| AppError::Validation("No role has been saved yet".to_string()))?;
        if !store.begin_batch(files.len()) {
            return Err(AppError::Conflict(
                "A batch is already being processed".to_string(),
            ));
        }
        role
    };

    info!("Starting batch of {} file(s)", files.len());

    // The batch runs in its own task: a client disconnect cancels the handler
    // future, and a half-finished batch must not leave the store stuck in
    // `processing`. A panicked task marks the batch failed instead.
    let task_state = state.clone();
    let result = tokio::spawn(async move { process_files(task_state, role, files).await }).await;

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            state.store.write().await.fail_batch();
            Err(AppError::Internal(anyhow::anyhow!(
                "batch processing task failed: {e}"
            )))
        }
    }
}

async fn process_files(state: AppState, role: Role, files: Vec<UploadedFile>) {
    for (index, file) in files.iter().enumerate() {
        state
            .store
            .write()
            .await
            .set_current_file(index + 1, &file.filename);

        match rank_one(&state, &role, file).await {
            Ok(candidate) => {
                info!(
                    "Ranked '{}': overall score {:.0}",
                    file.filename, candidate.ranking.overall_score
                );
                state.store.write().await.push_candidate(candidate);
            }
            Err(reason) => {
                warn!("Skipping '{}': {reason}", file.filename);
            }
        }
    }

    state.store.write().await.finish_batch();
}

/// Ranks a single file. The `Err` is a skip reason, not a batch failure.
async fn rank_one(state: &AppState, role: &Role, file: &UploadedFile) -> Result<Candidate, String> {
    let text = extract_text(&file.bytes, &file.content_type, &file.filename);
    let char_count = text.chars().count();
    if char_count < MIN_EXTRACT_LEN {
        return Err(format!(
            "extracted text too short ({char_count} chars, need {MIN_EXTRACT_LEN})"
        ));
    }

    let prompt = build_ranking_prompt(role, &text);
    let messages = [
        ChatMessage::system(ranking_system()),
        ChatMessage::user(prompt),
    ];

    let ranking: Ranking = state
        .llm
        .call_json(&messages, RANKING_TEMPERATURE)
        .await
        .map_err(|e| format!("ranking call failed: {e}"))?;
    let ranking = ranking
        .validate()
        .map_err(|e| format!("malformed ranking: {e}"))?;

    Ok(Candidate::new(file.filename.clone(), &text, ranking))
}

fn build_ranking_prompt(role: &Role, cv_text: &str) -> String {
    let categories_json =
        serde_json::to_string_pretty(&role.categories).unwrap_or_else(|_| "{}".to_string());

    RANKING_PROMPT_TEMPLATE
        .replace("{title}", &role.title)
        .replace("{description}", &role.description)
        .replace("{required_skills}", &role.required_skills)
        .replace("{categories_json}", &categories_json)
        .replace("{cv_text}", cv_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::{CategorySet, MainCategory};

    fn role_with_rubric() -> Role {
        let mut role = Role::new(
            "Senior Rust Engineer".into(),
            "Own the storage engine.".into(),
            "Rust, distributed systems".into(),
        );
        role.categories = CategorySet {
            main_categories: vec![MainCategory {
                name: "Technical Skills".into(),
                description: "Depth in the required stack".into(),
                weight: 100,
            }],
            sub_categories: vec![],
            evaluation_guidance: String::new(),
        };
        role
    }

    #[test]
    fn test_ranking_prompt_embeds_role_and_cv() {
        let role = role_with_rubric();
        let prompt = build_ranking_prompt(&role, "Ten years of Rust experience.");

        assert!(prompt.contains("Senior Rust Engineer"));
        assert!(prompt.contains("Own the storage engine."));
        assert!(prompt.contains("Technical Skills"));
        assert!(prompt.contains("Ten years of Rust experience."));
        assert!(!prompt.contains("{cv_text}"));
        assert!(!prompt.contains("{categories_json}"));
    }

    fn test_state() -> AppState {
        // Unroutable gateway; a model call would fail loudly, proving the
        // skip happens before it.
        AppState {
            llm: crate::llm_client::LlmClient::new(
                "http://127.0.0.1:9/v1/chat/completions".into(),
                "test".into(),
            ),
            store: std::sync::Arc::new(tokio::sync::RwLock::new(crate::store::Store::default())),
            config: crate::config::Config {
                llm_api_url: "http://127.0.0.1:9/v1/chat/completions".into(),
                llm_api_key: "test".into(),
                port: 0,
                rust_log: "info".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_short_extraction_is_skipped_before_any_model_call() {
        let file = UploadedFile {
            filename: "thin.txt".into(),
            content_type: "text/plain".into(),
            bytes: Bytes::from_static(b"too short to be a CV"),
        };

        let err = rank_one(&test_state(), &role_with_rubric(), &file)
            .await
            .unwrap_err();
        assert!(err.contains("too short"), "unexpected reason: {err}");
    }

    /// The 50-char skip gate counts characters, not bytes: 30 two-byte chars
    /// are 60 bytes but must still be skipped.
    #[tokio::test]
    async fn test_skip_gate_counts_chars_not_bytes() {
        let text = "é".repeat(30);
        assert!(text.len() >= MIN_EXTRACT_LEN); // bytes alone would pass
        let file = UploadedFile {
            filename: "accented.txt".into(),
            content_type: "text/plain".into(),
            bytes: Bytes::from(text.into_bytes()),
        };

        let err = rank_one(&test_state(), &role_with_rubric(), &file)
            .await
            .unwrap_err();
        assert!(err.contains("30 chars"), "unexpected reason: {err}");
    }
}
