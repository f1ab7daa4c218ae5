//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::error;

use crate::errors::AppError;
use crate::feedback::pipeline::{create_feedback, CreateFeedbackParams, CreateFeedbackResponse};
use crate::feedback::readers::{get_feedback_by_interview_id, GetFeedbackByInterviewIdParams};
use crate::models::feedback::Feedback;
use crate::state::AppState;

/// POST /api/v1/feedback
///
/// Always answers 200; failures are reported as `{"success": false}` and logged.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    Json(params): Json<CreateFeedbackParams>,
) -> Json<CreateFeedbackResponse> {
    let result = create_feedback(state.store.as_ref(), state.model.as_ref(), params).await;
    if let Err(e) = &result {
        error!("Error saving feedback: {e}");
    }
    Json(CreateFeedbackResponse::from(result))
}

/// GET /api/v1/feedback?interviewId=&userId=
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    Query(params): Query<GetFeedbackByInterviewIdParams>,
) -> Result<Json<Feedback>, AppError> {
    let feedback = get_feedback_by_interview_id(state.store.as_ref(), &params)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No feedback for interview {} and user {}",
                params.interview_id, params.user_id
            ))
        })?;
    Ok(Json(feedback))
}
