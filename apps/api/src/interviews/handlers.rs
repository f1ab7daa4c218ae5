use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::AppError;
use crate::interviews::readers::{
    get_interview_by_id, get_interviews_by_user_id, get_latest_interviews,
    GetLatestInterviewsParams,
};
use crate::models::interview::Interview;
use crate::state::AppState;

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Interview>, AppError> {
    let interview = get_interview_by_id(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))?;
    Ok(Json(interview))
}

/// GET /api/v1/interviews/latest?userId=&limit=
pub async fn handle_latest_interviews(
    State(state): State<AppState>,
    Query(params): Query<GetLatestInterviewsParams>,
) -> Result<Json<Vec<Interview>>, AppError> {
    Ok(Json(
        get_latest_interviews(state.store.as_ref(), &params).await?,
    ))
}

/// GET /api/v1/users/:user_id/interviews
pub async fn handle_user_interviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Interview>>, AppError> {
    Ok(Json(
        get_interviews_by_user_id(state.store.as_ref(), &user_id).await?,
    ))
}
