//! Interview reads.
//!
//! Filtering beyond a single equality and all ordering happen in memory, so the
//! store never needs composite indexes. This loads whole result sets and is
//! only reasonable while they stay small; `get_latest_interviews` reads every
//! finalized interview on each call.

use std::cmp::Reverse;

use serde::Deserialize;

use crate::models::interview::Interview;
use crate::store::{Collection, DocumentStore, Query, StoreError};

pub const DEFAULT_LATEST_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetLatestInterviewsParams {
    pub user_id: String,
    #[serde(default = "default_latest_limit")]
    pub limit: usize,
}

fn default_latest_limit() -> usize {
    DEFAULT_LATEST_LIMIT
}

pub async fn get_interview_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Interview>, StoreError> {
    Ok(store
        .get(Collection::Interviews, id)
        .await?
        .map(Interview::from))
}

/// Finalized interviews from other users, newest first, at most `limit`.
pub async fn get_latest_interviews(
    store: &dyn DocumentStore,
    params: &GetLatestInterviewsParams,
) -> Result<Vec<Interview>, StoreError> {
    let docs = store
        .query(Collection::Interviews, &Query::new().where_eq("finalized", true))
        .await?;

    let mut interviews = docs
        .into_iter()
        .map(Interview::from)
        .filter(|i| i.user_id() != Some(params.user_id.as_str()))
        .collect::<Vec<_>>();

    sort_newest_first(&mut interviews);
    interviews.truncate(params.limit);
    Ok(interviews)
}

/// All of a user's interviews, newest first.
pub async fn get_interviews_by_user_id(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<Interview>, StoreError> {
    let docs = store
        .query(Collection::Interviews, &Query::new().where_eq("userId", user_id))
        .await?;

    let mut interviews: Vec<Interview> = docs.into_iter().map(Interview::from).collect();
    sort_newest_first(&mut interviews);
    Ok(interviews)
}

/// Descending by normalized `createdAt`; missing timestamps sort last.
/// Unstable: interviews with equal timestamps come out in no particular order.
fn sort_newest_first(interviews: &mut [Interview]) {
    interviews.sort_unstable_by_key(|i| Reverse(i.created_at_millis()));
}
