//! Category suggestion — asks the model to propose an evaluation rubric for
//! a freshly saved role.

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::models::role::CategorySet;
use crate::screening::prompts::{category_suggest_system, CATEGORY_SUGGEST_PROMPT_TEMPLATE};

/// Category suggestion runs warmer than scoring: rubric design benefits from
/// some variety, scoring does not.
const SUGGEST_TEMPERATURE: f32 = 0.7;

pub async fn suggest_categories(
    llm: &LlmClient,
    title: &str,
    description: &str,
    required_skills: &str,
) -> Result<CategorySet, AppError> {
    let prompt = CATEGORY_SUGGEST_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{description}", description)
        .replace("{required_skills}", required_skills);

    let messages = [
        ChatMessage::system(category_suggest_system()),
        ChatMessage::user(prompt),
    ];

    llm.call_json::<CategorySet>(&messages, SUGGEST_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Category suggestion failed: {e}")))
}
