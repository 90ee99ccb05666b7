//! Axum route handlers for the screening API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, Recalibration};
use crate::models::progress::Progress;
use crate::models::role::{CategorySet, MainCategory, Role, SubCategory};
use crate::screening::categories::suggest_categories;
use crate::screening::pipeline::{run_batch, UploadedFile};
use crate::screening::recalibrate::recalibrate;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRoleRequest {
    pub title: String,
    pub description: String,
    pub required_skills: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRoleRequest {
    pub main_categories: Vec<MainCategory>,
    pub sub_categories: Vec<SubCategory>,
    #[serde(default)]
    pub evaluation_guidance: String,
}

/// The per-candidate line returned by batch processing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: Uuid,
    pub filename: String,
    pub overall_score: f64,
    pub reviewed: bool,
}

impl From<&Candidate> for CandidateSummary {
    fn from(c: &Candidate) -> Self {
        Self {
            id: c.id,
            filename: c.filename.clone(),
            overall_score: c.ranking.overall_score,
            reviewed: c.reviewed,
        }
    }
}

/// The per-candidate line in the full listing, including category scores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListItem {
    pub id: Uuid,
    pub filename: String,
    pub overall_score: f64,
    pub main_category_scores: BTreeMap<String, f64>,
    pub sub_category_scores: BTreeMap<String, f64>,
    pub reviewed: bool,
}

impl From<&Candidate> for CandidateListItem {
    fn from(c: &Candidate) -> Self {
        Self {
            id: c.id,
            filename: c.filename.clone(),
            overall_score: c.ranking.overall_score,
            main_category_scores: c.ranking.main_category_scores.clone(),
            sub_category_scores: c.ranking.sub_category_scores.clone(),
            reviewed: c.reviewed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/roles
///
/// Saves the role (replacing any previous one) and asks the model to suggest
/// an evaluation category set for it.
pub async fn handle_save_role(
    State(state): State<AppState>,
    Json(request): Json<SaveRoleRequest>,
) -> Result<Json<Role>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let categories = suggest_categories(
        &state.llm,
        &request.title,
        &request.description,
        &request.required_skills,
    )
    .await?;

    let mut role = Role::new(request.title, request.description, request.required_skills);
    role.categories = categories;

    state.store.write().await.replace_role(role.clone());
    Ok(Json(role))
}

/// POST /api/v1/roles/confirm
///
/// Replaces the active role's category set with the caller-edited one.
pub async fn handle_confirm_role(
    State(state): State<AppState>,
    Json(request): Json<ConfirmRoleRequest>,
) -> Result<Json<Role>, AppError> {
    let categories = CategorySet {
        main_categories: request.main_categories,
        sub_categories: request.sub_categories,
        evaluation_guidance: request.evaluation_guidance,
    };

    // Weights summing to 100 is prompt convention, not a hard invariant:
    // accept caller-edited sets, but leave a trace when they drift.
    let weight_total = categories.weight_total();
    if weight_total != 100 {
        tracing::warn!("Confirmed category weights sum to {weight_total}, not 100");
    }

    let role = state
        .store
        .write()
        .await
        .set_categories(categories)
        .ok_or_else(|| AppError::Validation("No role has been saved yet".to_string()))?;

    Ok(Json(role))
}

/// GET /api/v1/roles/current
pub async fn handle_get_role(State(state): State<AppState>) -> Result<Json<Role>, AppError> {
    let role = state
        .store
        .read()
        .await
        .role()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No role has been saved yet".to_string()))?;
    Ok(Json(role))
}

/// POST /api/v1/candidates/process
///
/// Multipart CV upload. Runs the ranking pipeline over every file part and
/// returns the surviving candidates sorted by score descending.
pub async fn handle_process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue; // not a file part
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload '{filename}': {e}")))?;

        files.push(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    run_batch(&state, files).await?;

    let store = state.store.read().await;
    let summaries = store.candidates().iter().map(CandidateSummary::from).collect();
    Ok(Json(summaries))
}

/// GET /api/v1/candidates/progress
pub async fn handle_progress(State(state): State<AppState>) -> Json<Progress> {
    Json(state.store.read().await.progress().clone())
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Json<Vec<CandidateListItem>> {
    let store = state.store.read().await;
    Json(store.candidates().iter().map(CandidateListItem::from).collect())
}

/// GET /api/v1/candidates/:id
///
/// Full detail: ranking, excerpt, review state, notes, recalibration.
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = state
        .store
        .read()
        .await
        .candidate(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    Ok(Json(candidate))
}

/// POST /api/v1/candidates/:id/review
pub async fn handle_mark_reviewed(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.write().await.mark_reviewed(id) {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/candidates/:id/notes
///
/// Stores interview notes and recalibrates the candidate's score from them.
pub async fn handle_submit_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NotesRequest>,
) -> Result<Json<Recalibration>, AppError> {
    let recalibration = recalibrate(&state, id, &request.notes).await?;
    Ok(Json(recalibration))
}
