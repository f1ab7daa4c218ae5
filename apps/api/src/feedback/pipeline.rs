//! Feedback pipeline: format transcript → request assessment → store one document.
//!
//! The model call happens before any write, so a model failure leaves the
//! `feedback` collection untouched. A write failure after a successful model
//! call is not compensated.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::feedback::requester::request_feedback;
use crate::feedback::transcript::format_transcript;
use crate::llm_client::{GenerativeModel, LlmError};
use crate::models::feedback::{Feedback, FeedbackAssessment};
use crate::models::interview::TranscriptEntry;
use crate::store::{Collection, DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback generation failed: {0}")]
    Model(#[from] LlmError),

    #[error("feedback storage failed: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackParams {
    pub interview_id: String,
    pub user_id: String,
    pub transcript: Vec<TranscriptEntry>,
    /// Overwrite this document instead of creating a new one.
    #[serde(default)]
    pub feedback_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedFeedback {
    pub feedback_id: String,
    pub feedback: Feedback,
}

/// What callers outside the service see: a success flag and, on success, the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_id: Option<String>,
}

impl From<Result<CreatedFeedback, FeedbackError>> for CreateFeedbackResponse {
    fn from(result: Result<CreatedFeedback, FeedbackError>) -> Self {
        match result {
            Ok(created) => CreateFeedbackResponse {
                success: true,
                feedback_id: Some(created.feedback_id),
            },
            Err(_) => CreateFeedbackResponse {
                success: false,
                feedback_id: None,
            },
        }
    }
}

/// Generates feedback for a transcript and writes it to the `feedback` collection.
pub async fn create_feedback(
    store: &dyn DocumentStore,
    model: &dyn GenerativeModel,
    params: CreateFeedbackParams,
) -> Result<CreatedFeedback, FeedbackError> {
    let CreateFeedbackParams {
        interview_id,
        user_id,
        transcript,
        feedback_id,
    } = params;

    let formatted = format_transcript(&transcript);
    let assessment = request_feedback(model, &formatted).await?;

    let feedback = assemble_feedback(interview_id, user_id, assessment);
    let data = serde_json::to_value(&feedback).map_err(StoreError::from)?;

    let feedback_id = match feedback_id {
        Some(id) => {
            store.set(Collection::Feedback, &id, data).await?;
            id
        }
        None => store.create(Collection::Feedback, data).await?,
    };

    info!(
        "Saved feedback {feedback_id} for interview {} (user {})",
        feedback.interview_id, feedback.user_id
    );

    Ok(CreatedFeedback {
        feedback_id,
        feedback,
    })
}

fn assemble_feedback(
    interview_id: String,
    user_id: String,
    assessment: FeedbackAssessment,
) -> Feedback {
    let FeedbackAssessment {
        total_score,
        category_scores,
        strengths,
        areas_for_improvement,
        final_assessment,
    } = assessment;

    Feedback {
        id: None,
        interview_id,
        user_id,
        total_score,
        category_scores,
        strengths,
        areas_for_improvement,
        final_assessment,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockGenerativeModel;
    use crate::models::timestamp::StoredTimestamp;
    use crate::store::{MemoryDocumentStore, MockDocumentStore, Query};
    use crate::test_support::{assessment_json, model_replying, store_unavailable};
    use mockall::Sequence;
    use serde_json::Value;

    fn params(feedback_id: Option<&str>) -> CreateFeedbackParams {
        CreateFeedbackParams {
            interview_id: "interview-1".to_string(),
            user_id: "user-1".to_string(),
            transcript: vec![
                TranscriptEntry {
                    role: "assistant".to_string(),
                    content: "Tell me about yourself".to_string(),
                },
                TranscriptEntry {
                    role: "user".to_string(),
                    content: "I am an engineer".to_string(),
                },
            ],
            feedback_id: feedback_id.map(str::to_string),
        }
    }

    async fn stored_feedback(store: &MemoryDocumentStore) -> Vec<Value> {
        store
            .query(Collection::Feedback, &Query::new())
            .await
            .unwrap()
            .into_iter()
            .map(|doc| Value::Object(doc.data))
            .collect()
    }

    #[tokio::test]
    async fn test_create_without_id_writes_new_documents() {
        let store = MemoryDocumentStore::new();
        let model = model_replying(75.0);

        let first = create_feedback(&store, &model, params(None)).await.unwrap();
        let second = create_feedback(&store, &model, params(None)).await.unwrap();

        assert_ne!(first.feedback_id, second.feedback_id);
        assert_eq!(stored_feedback(&store).await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_with_id_overwrites() {
        let store = MemoryDocumentStore::new();
        let mut model = MockGenerativeModel::new();
        let mut seq = Sequence::new();
        model
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(assessment_json(40.0)));
        model
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(assessment_json(90.0)));

        let first = create_feedback(&store, &model, params(Some("fb-1")))
            .await
            .unwrap();
        let second = create_feedback(&store, &model, params(Some("fb-1")))
            .await
            .unwrap();

        assert_eq!(first.feedback_id, "fb-1");
        assert_eq!(second.feedback_id, "fb-1");

        let docs = stored_feedback(&store).await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0], serde_json::to_value(&second.feedback).unwrap());
        assert_eq!(docs[0]["totalScore"], 90.0);
    }

    #[tokio::test]
    async fn test_supplied_id_is_a_single_set_call() {
        let mut store = MockDocumentStore::new();
        store.expect_create().never();
        store
            .expect_set()
            .times(1)
            .withf(|collection, id, data| {
                *collection == Collection::Feedback
                    && id == "fb-7"
                    && data["interviewId"] == "interview-1"
                    && data["totalScore"] == 55.0
            })
            .returning(|_, _, _| Ok(()));

        let created = create_feedback(&store, &model_replying(55.0), params(Some("fb-7")))
            .await
            .unwrap();
        assert_eq!(created.feedback_id, "fb-7");
    }

    #[tokio::test]
    async fn test_missing_id_is_a_single_create_call() {
        let mut store = MockDocumentStore::new();
        store.expect_set().never();
        store
            .expect_create()
            .times(1)
            .withf(|collection, data| {
                *collection == Collection::Feedback && data["userId"] == "user-1"
            })
            .returning(|_, _| Ok("generated-id".to_string()));

        let created = create_feedback(&store, &model_replying(55.0), params(None))
            .await
            .unwrap();
        assert_eq!(created.feedback_id, "generated-id");
    }

    #[tokio::test]
    async fn test_stored_document_carries_ids_and_timestamp() {
        let store = MemoryDocumentStore::new();

        let created = create_feedback(&store, &model_replying(66.0), params(None))
            .await
            .unwrap();
        let doc = store
            .get(Collection::Feedback, &created.feedback_id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(doc.data["interviewId"], "interview-1");
        assert_eq!(doc.data["userId"], "user-1");
        assert!(doc.data.get("id").is_none());
        let created_at = doc.data["createdAt"].as_str().unwrap().to_string();
        assert!(created_at.ends_with('Z'));
        assert!(StoredTimestamp::Iso(created_at).to_millis() > 0);
    }

    #[tokio::test]
    async fn test_model_failure_writes_nothing() {
        let mut store = MockDocumentStore::new();
        store.expect_set().never();
        store.expect_create().never();

        let mut model = MockGenerativeModel::new();
        model.expect_generate().times(1).returning(|_| {
            Err(LlmError::Api {
                status: 500,
                message: "backend unavailable".to_string(),
            })
        });

        let result = create_feedback(&store, &model, params(Some("fb-1"))).await;
        assert!(matches!(result, Err(FeedbackError::Model(_))));

        let response = CreateFeedbackResponse::from(result);
        assert_eq!(
            response,
            CreateFeedbackResponse {
                success: false,
                feedback_id: None
            }
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_distinguishable() {
        let mut store = MockDocumentStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|_, _| Err(store_unavailable()));

        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .times(1)
            .returning(|_| Ok(assessment_json(50.0)));

        let result = create_feedback(&store, &model, params(None)).await;
        assert!(matches!(result, Err(FeedbackError::Storage(_))));
        assert!(!CreateFeedbackResponse::from(result).success);
    }

    #[tokio::test]
    async fn test_prompt_contains_formatted_transcript() {
        let store = MemoryDocumentStore::new();
        let mut model = MockGenerativeModel::new();
        model
            .expect_generate()
            .times(1)
            .withf(|request| {
                request
                    .prompt
                    .contains("- assistant: Tell me about yourself\n- user: I am an engineer\n")
            })
            .returning(|_| Ok(assessment_json(50.0)));

        create_feedback(&store, &model, params(None)).await.unwrap();
    }

    #[test]
    fn test_response_from_success() {
        let feedback = Feedback {
            id: None,
            interview_id: "i".to_string(),
            user_id: "u".to_string(),
            total_score: 10.0,
            category_scores: vec![],
            strengths: vec![],
            areas_for_improvement: vec![],
            final_assessment: String::new(),
            created_at: String::new(),
        };
        let response = CreateFeedbackResponse::from(Ok(CreatedFeedback {
            feedback_id: "fb-3".to_string(),
            feedback,
        }));
        assert!(response.success);
        assert_eq!(response.feedback_id.as_deref(), Some("fb-3"));
    }

    #[test]
    fn test_response_serializes_success_shape() {
        let response = CreateFeedbackResponse {
            success: true,
            feedback_id: Some("fb-9".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"success": true, "feedbackId": "fb-9"})
        );

        let failed = CreateFeedbackResponse {
            success: false,
            feedback_id: None,
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"success": false})
        );
    }
}
