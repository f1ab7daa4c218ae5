use serde::Deserialize;

use crate::models::feedback::Feedback;
use crate::store::{Collection, DocumentStore, Query, StoreError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFeedbackByInterviewIdParams {
    pub interview_id: String,
    pub user_id: String,
}

/// The feedback a user received for an interview, if any.
/// When several documents match, which one is returned is up to the store.
pub async fn get_feedback_by_interview_id(
    store: &dyn DocumentStore,
    params: &GetFeedbackByInterviewIdParams,
) -> Result<Option<Feedback>, StoreError> {
    let query = Query::new()
        .where_eq("interviewId", params.interview_id.as_str())
        .where_eq("userId", params.user_id.as_str())
        .limit(1);

    store
        .query(Collection::Feedback, &query)
        .await?
        .into_iter()
        .next()
        .map(|doc| doc.into_typed())
        .transpose()
}
