// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.

/// Appended to system instructions for structured-output calls.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Instruction that keeps the model inside a fixed set of categories.
pub const FIXED_CATEGORIES_INSTRUCTION: &str =
    "Do not add categories other than the ones provided.";
