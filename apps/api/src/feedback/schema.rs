//! Output schema for feedback generation and the checks applied to replies.
//!
//! The schema is sent as `responseSchema`; replies are validated again here
//! because the model is not guaranteed to honor it.

use serde_json::{json, Value};

use crate::llm_client::LlmError;
use crate::models::feedback::{Category, CategoryScore, FeedbackAssessment};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// `responseSchema` for `FeedbackAssessment`.
pub fn feedback_response_schema() -> Value {
    let category_names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
    let count = Category::ALL.len();

    json!({
        "type": "OBJECT",
        "properties": {
            "totalScore": { "type": "NUMBER" },
            "categoryScores": {
                "type": "ARRAY",
                "minItems": count,
                "maxItems": count,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "enum": category_names },
                        "score": { "type": "NUMBER" },
                        "comment": { "type": "STRING" }
                    },
                    "required": ["name", "score", "comment"],
                    "propertyOrdering": ["name", "score", "comment"]
                }
            },
            "strengths": { "type": "ARRAY", "items": { "type": "STRING" } },
            "areasForImprovement": { "type": "ARRAY", "items": { "type": "STRING" } },
            "finalAssessment": { "type": "STRING" }
        },
        "required": [
            "totalScore",
            "categoryScores",
            "strengths",
            "areasForImprovement",
            "finalAssessment"
        ],
        "propertyOrdering": [
            "totalScore",
            "categoryScores",
            "strengths",
            "areasForImprovement",
            "finalAssessment"
        ]
    })
}

/// Checks scores and categories, returning the assessment with category
/// scores in canonical order.
pub fn validate_assessment(mut assessment: FeedbackAssessment) -> Result<FeedbackAssessment, LlmError> {
    check_score("totalScore", assessment.total_score)?;

    let mut ordered: Vec<CategoryScore> = Vec::with_capacity(Category::ALL.len());
    for category in Category::ALL {
        let mut matching = assessment
            .category_scores
            .iter()
            .filter(|s| s.name == category);
        let score = matching
            .next()
            .ok_or_else(|| LlmError::Schema(format!("missing category '{category}'")))?;
        if matching.next().is_some() {
            return Err(LlmError::Schema(format!("duplicate category '{category}'")));
        }
        check_score(category.name(), score.score)?;
        ordered.push(score.clone());
    }

    assessment.category_scores = ordered;
    Ok(assessment)
}

fn check_score(field: &str, score: f64) -> Result<(), LlmError> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(LlmError::Schema(format!(
            "{field} score {score} outside {MIN_SCORE}-{MAX_SCORE}"
        )))
    }
}
