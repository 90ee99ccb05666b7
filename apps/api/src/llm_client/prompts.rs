// Cross-cutting prompt fragments. Each screening call defines its own
// templates in screening/prompts.rs; this file holds what they share.

/// System prompt fragment that enforces JSON-only output. Appended to every
/// per-call system prompt so the output contract is stated exactly once.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
