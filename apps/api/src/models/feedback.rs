use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed evaluation categories. The model may not add others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Communication Skills")]
    CommunicationSkills,
    #[serde(rename = "Technical Knowledge")]
    TechnicalKnowledge,
    #[serde(rename = "Problem-Solving")]
    ProblemSolving,
    #[serde(rename = "Cultural & Role Fit")]
    CulturalAndRoleFit,
    #[serde(rename = "Confidence & Clarity")]
    ConfidenceAndClarity,
}

impl Category {
    /// Canonical order, as presented to the model.
    pub const ALL: [Category; 5] = [
        Category::CommunicationSkills,
        Category::TechnicalKnowledge,
        Category::ProblemSolving,
        Category::CulturalAndRoleFit,
        Category::ConfidenceAndClarity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::CommunicationSkills => "Communication Skills",
            Category::TechnicalKnowledge => "Technical Knowledge",
            Category::ProblemSolving => "Problem-Solving",
            Category::CulturalAndRoleFit => "Cultural & Role Fit",
            Category::ConfidenceAndClarity => "Confidence & Clarity",
        }
    }

    /// What the category measures; embedded in the scoring instructions.
    pub fn description(&self) -> &'static str {
        match self {
            Category::CommunicationSkills => "Clarity, articulation, structured responses.",
            Category::TechnicalKnowledge => "Understanding of key concepts for the role.",
            Category::ProblemSolving => "Ability to analyze problems and propose solutions.",
            Category::CulturalAndRoleFit => "Alignment with company values and job role.",
            Category::ConfidenceAndClarity => {
                "Confidence in responses, engagement, and clarity."
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: Category,
    /// 0 – 100
    pub score: f64,
    pub comment: String,
}

/// The model's structured assessment, before it is tied to an interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAssessment {
    /// 0 – 100
    pub total_score: f64,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
}

/// Feedback document as stored in the `feedback` collection.
/// `id` is only populated on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub interview_id: String,
    pub user_id: String,
    pub total_score: f64,
    pub category_scores: Vec<CategoryScore>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub final_assessment: String,
    /// ISO-8601, UTC
    pub created_at: String,
}
