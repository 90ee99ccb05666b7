//! Score recalibration from post-interview notes. The original ranking is
//! never touched; the result lives beside it on the candidate and is
//! overwritten by any later notes submission.

use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::models::candidate::{Ranking, Recalibration};
use crate::screening::prompts::{recalibration_system, RECALIBRATION_PROMPT_TEMPLATE};
use crate::state::AppState;

const RECALIBRATION_TEMPERATURE: f32 = 0.5;

/// Stores the notes on the candidate, asks the model to recalibrate the
/// original ranking against them, and stores the (clamped) result.
pub async fn recalibrate(
    state: &AppState,
    candidate_id: Uuid,
    notes: &str,
) -> Result<Recalibration, AppError> {
    // Notes are stored before the model call so they survive a gateway
    // failure; the ranking and role title are snapshotted under the same lock.
    let (ranking, role_title) = {
        let mut store = state.store.write().await;
        let ranking = store
            .candidate(candidate_id)
            .map(|c| c.ranking.clone())
            .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
        store.set_notes(candidate_id, notes);
        let role_title = store.role().map(|r| r.title.clone()).unwrap_or_default();
        (ranking, role_title)
    };

    let prompt = build_recalibration_prompt(&role_title, &ranking, notes);
    let messages = [
        ChatMessage::system(recalibration_system()),
        ChatMessage::user(prompt),
    ];

    let recalibration: Recalibration = state
        .llm
        .call_json(&messages, RECALIBRATION_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Recalibration failed: {e}")))?;
    let recalibration = recalibration.clamped();

    state
        .store
        .write()
        .await
        .set_recalibration(candidate_id, recalibration.clone());

    Ok(recalibration)
}

fn build_recalibration_prompt(role_title: &str, ranking: &Ranking, notes: &str) -> String {
    let ranking_json =
        serde_json::to_string_pretty(ranking).unwrap_or_else(|_| "{}".to_string());

    RECALIBRATION_PROMPT_TEMPLATE
        .replace("{title}", role_title)
        .replace("{ranking_json}", &ranking_json)
        .replace("{notes}", notes)
}
