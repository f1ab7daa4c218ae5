//! Fixtures shared by unit tests.

use serde_json::{json, Value};

use crate::llm_client::MockGenerativeModel;
use crate::models::feedback::Category;
use crate::store::StoreError;

/// A well-formed model reply with every category scored at `total_score`.
pub fn assessment_json(total_score: f64) -> Value {
    let category_scores: Vec<Value> = Category::ALL
        .iter()
        .map(|c| json!({ "name": c.name(), "score": total_score, "comment": "ok" }))
        .collect();
    json!({
        "totalScore": total_score,
        "categoryScores": category_scores,
        "strengths": ["Structured answers"],
        "areasForImprovement": ["More concrete examples"],
        "finalAssessment": "Solid performance with room to grow."
    })
}

/// Model that answers any number of calls with `assessment_json(total_score)`.
pub fn model_replying(total_score: f64) -> MockGenerativeModel {
    let mut model = MockGenerativeModel::new();
    model
        .expect_generate()
        .returning(move |_| Ok(assessment_json(total_score)));
    model
}

/// The error a store returns when its database cannot be reached.
pub fn store_unavailable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}
