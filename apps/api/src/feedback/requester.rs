use tracing::info;

use crate::feedback::prompts::{build_feedback_prompt, feedback_system};
use crate::feedback::schema::{feedback_response_schema, validate_assessment};
use crate::llm_client::{generate_object, GenerativeModel, LlmError, StructuredRequest};
use crate::models::feedback::FeedbackAssessment;

/// Asks the model to assess a formatted transcript against the fixed categories.
pub async fn request_feedback(
    model: &dyn GenerativeModel,
    formatted_transcript: &str,
) -> Result<FeedbackAssessment, LlmError> {
    let request = StructuredRequest {
        system: feedback_system(),
        prompt: build_feedback_prompt(formatted_transcript),
        schema: feedback_response_schema(),
    };

    let assessment: FeedbackAssessment = generate_object(model, &request).await?;

    let assessment = validate_assessment(assessment)?;
    info!("Feedback assessment received: total_score={}", assessment.total_score);
    Ok(assessment)
}
