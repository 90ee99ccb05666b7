use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of interview questions the ranking prompt demands. A response with
/// any other count is treated as malformed model output.
pub const INTERVIEW_QUESTION_COUNT: usize = 10;

/// Characters of extracted text retained on the candidate for reference.
/// The full text is discarded after ranking.
pub const EXCERPT_LEN: usize = 500;

/// The structured scoring output produced for one candidate against a role's
/// categories. Set exactly once during batch processing and never mutated;
/// later recalibration is stored separately on the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub overall_score: f64,
    pub main_category_scores: BTreeMap<String, f64>,
    pub sub_category_scores: BTreeMap<String, f64>,
    pub summary: String,
    #[serde(default)]
    pub red_flags: Vec<String>,
    pub interview_questions: Vec<String>,
    #[serde(default)]
    pub ai_feedback: String,
}

impl Ranking {
    /// Structural validation beyond what serde enforces. Model output is
    /// never trusted raw: scores are clamped to 0-100 and the question list
    /// must have exactly [`INTERVIEW_QUESTION_COUNT`] entries.
    pub fn validate(mut self) -> Result<Self, String> {
        if self.interview_questions.len() != INTERVIEW_QUESTION_COUNT {
            return Err(format!(
                "expected {} interview questions, got {}",
                INTERVIEW_QUESTION_COUNT,
                self.interview_questions.len()
            ));
        }
        self.overall_score = clamp_score(self.overall_score);
        for score in self.main_category_scores.values_mut() {
            *score = clamp_score(*score);
        }
        for score in self.sub_category_scores.values_mut() {
            *score = clamp_score(*score);
        }
        Ok(self)
    }
}

/// A secondary score adjustment derived from post-interview notes.
/// At most one per candidate; resubmitting notes overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recalibration {
    pub recalibrated_score: f64,
    /// Nominally -20..=20 relative to the original overall score.
    pub score_adjustment: f64,
    pub adjustment_reason: String,
    pub updated_assessment: String,
}

impl Recalibration {
    pub fn clamped(mut self) -> Self {
        self.recalibrated_score = clamp_score(self.recalibrated_score);
        self.score_adjustment = self.score_adjustment.clamp(-20.0, 20.0);
        self
    }
}

/// One uploaded CV plus its derived ranking and review state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub filename: String,
    /// First [`EXCERPT_LEN`] chars of extracted text, for reference only.
    pub text_excerpt: String,
    pub ranking: Ranking,
    pub reviewed: bool,
    pub interview_notes: String,
    pub recalibration: Option<Recalibration>,
}

impl Candidate {
    pub fn new(filename: String, extracted_text: &str, ranking: Ranking) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            text_excerpt: extracted_text.chars().take(EXCERPT_LEN).collect(),
            ranking,
            reviewed: false,
            interview_notes: String::new(),
            recalibration: None,
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}
