// Prompt text for interview feedback generation.

use crate::llm_client::prompts::{FIXED_CATEGORIES_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::feedback::Category;

/// System instruction for feedback generation.
pub fn feedback_system() -> String {
    format!(
        "You are a professional interviewer analyzing a mock interview. \
        Your task is to evaluate the candidate based on structured categories. {JSON_ONLY_SYSTEM}"
    )
}

/// Feedback prompt template. Replace `{transcript}` and `{categories}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an AI interviewer analyzing a mock interview. Your task is to evaluate the candidate based on structured categories. Be thorough and detailed in your analysis. Don't be lenient with the candidate. If there are mistakes or areas for improvement, point them out.
Transcript:
{transcript}

Please score the candidate from 0 to 100 in the following areas. {fixed_categories}
{categories}

Also give a totalScore from 0 to 100, a list of strengths, a list of areasForImprovement and a finalAssessment."#;

/// Builds the user prompt around an already formatted transcript.
pub fn build_feedback_prompt(formatted_transcript: &str) -> String {
    let categories: String = Category::ALL
        .iter()
        .map(|c| format!("- **{}**: {}\n", c.name(), c.description()))
        .collect();

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{fixed_categories}", FIXED_CATEGORIES_INSTRUCTION)
        .replace("{categories}", categories.trim_end())
        .replace("{transcript}", formatted_transcript)
}
