// All LLM prompt constants for the screening module.
// Shared fragments live in llm_client::prompts.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

const CATEGORY_SUGGEST_ROLE: &str =
    "You are an expert technical recruiter designing evaluation rubrics. \
    Given a job role, propose weighted evaluation categories for scoring candidate CVs.";

/// System prompt for category suggestion — role framing plus the shared
/// JSON-only output contract.
pub fn category_suggest_system() -> String {
    format!("{CATEGORY_SUGGEST_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Category suggestion prompt template.
/// Replace: {title}, {description}, {required_skills}
pub const CATEGORY_SUGGEST_PROMPT_TEMPLATE: &str = r#"Design an evaluation rubric for screening CVs against the following job role.

ROLE TITLE:
{title}

ROLE DESCRIPTION:
{description}

REQUIRED SKILLS:
{required_skills}

Return a JSON object with this EXACT schema (no extra fields):
{
  "mainCategories": [
    {"name": "Technical Skills", "description": "Depth in the required stack", "weight": 40}
  ],
  "subCategories": [
    {"name": "Rust", "mainCategory": "Technical Skills", "description": "Systems-level Rust experience"}
  ],
  "evaluationGuidance": "Free-text guidance for applying this rubric consistently."
}

Rules:
1. Propose 3 to 5 main categories. Their weights are integers and MUST sum to 100.
2. Propose 2 to 4 sub-categories per main category. Each "mainCategory" value
   must exactly match the "name" of one main category.
3. Categories must be specific to this role, not generic boilerplate.
4. Return ONLY the JSON object — nothing else, no code fences."#;

const RANKING_ROLE: &str =
    "You are an expert technical recruiter scoring a candidate CV against a fixed rubric. \
    Score honestly and consistently; never inflate scores for thin evidence.";

/// System prompt for candidate ranking.
pub fn ranking_system() -> String {
    format!("{RANKING_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Candidate ranking prompt template.
/// Replace: {title}, {description}, {required_skills}, {categories_json}, {cv_text}
pub const RANKING_PROMPT_TEMPLATE: &str = r#"Score the following candidate CV against the role and rubric below.

ROLE TITLE:
{title}

ROLE DESCRIPTION:
{description}

REQUIRED SKILLS:
{required_skills}

EVALUATION RUBRIC (score against exactly these categories):
{categories_json}

CANDIDATE CV TEXT:
{cv_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "overallScore": 82,
  "mainCategoryScores": {"Technical Skills": 85},
  "subCategoryScores": {"Rust": 90},
  "summary": "Two to four sentences summarizing fit for this role.",
  "redFlags": ["Unexplained two-year employment gap"],
  "interviewQuestions": ["Question 1?", "..."],
  "aiFeedback": "One or two sentences on how confident this assessment is and why."
}

Rules:
1. All scores are numbers from 0 to 100.
2. "mainCategoryScores" must contain one entry per main category in the rubric,
   keyed by its exact name. Same for "subCategoryScores" and sub-categories.
3. "overallScore" must reflect the main-category scores combined by their weights.
4. "interviewQuestions" must contain EXACTLY 10 questions, each probing a gap
   or claim in this specific CV.
5. "redFlags" may be empty. Only list concrete concerns grounded in the CV text.
6. Return ONLY the JSON object — nothing else, no code fences."#;

const RECALIBRATION_ROLE: &str =
    "You are an expert technical recruiter updating a CV-based assessment with \
    evidence from a live interview. Interview evidence outweighs CV claims where they conflict.";

/// System prompt for score recalibration.
pub fn recalibration_system() -> String {
    format!("{RECALIBRATION_ROLE} {JSON_ONLY_SYSTEM}")
}

/// Recalibration prompt template.
/// Replace: {title}, {ranking_json}, {notes}
pub const RECALIBRATION_PROMPT_TEMPLATE: &str = r#"Recalibrate a candidate's score for the role "{title}" using interview notes.

ORIGINAL CV ASSESSMENT:
{ranking_json}

INTERVIEW NOTES:
{notes}

Return a JSON object with this EXACT schema (no extra fields):
{
  "recalibratedScore": 78,
  "scoreAdjustment": -4,
  "adjustmentReason": "One or two sentences on what in the notes drove the adjustment.",
  "updatedAssessment": "Two to four sentences giving the revised overall assessment."
}

Rules:
1. "recalibratedScore" is a number from 0 to 100.
2. "scoreAdjustment" is recalibratedScore minus the original overallScore and
   must stay within -20 to +20. Leave the score unchanged if the notes contain
   no scoring-relevant evidence.
3. Return ONLY the JSON object — nothing else, no code fences."#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Placeholder tokens must survive in the templates so `.replace` has
    /// something to substitute.
    #[test]
    fn test_templates_contain_their_placeholders() {
        for placeholder in ["{title}", "{description}", "{required_skills}"] {
            assert!(CATEGORY_SUGGEST_PROMPT_TEMPLATE.contains(placeholder));
            assert!(RANKING_PROMPT_TEMPLATE.contains(placeholder));
        }
        assert!(RANKING_PROMPT_TEMPLATE.contains("{categories_json}"));
        assert!(RANKING_PROMPT_TEMPLATE.contains("{cv_text}"));
        assert!(RECALIBRATION_PROMPT_TEMPLATE.contains("{ranking_json}"));
        assert!(RECALIBRATION_PROMPT_TEMPLATE.contains("{notes}"));
    }

    /// Every system prompt carries the shared output contract exactly once,
    /// so the JSON-only wording cannot drift between calls.
    #[test]
    fn test_system_prompts_share_the_json_only_contract() {
        for system in [
            category_suggest_system(),
            ranking_system(),
            recalibration_system(),
        ] {
            assert_eq!(system.matches(JSON_ONLY_SYSTEM).count(), 1);
        }
    }
}
