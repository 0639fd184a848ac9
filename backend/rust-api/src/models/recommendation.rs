use serde::{Deserialize, Serialize};

use crate::models::course::CourseSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationType {
    NextStep,
    Similar,
    Trending,
    Personalized,
}

impl RecommendationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::NextStep => "next-step",
            RecommendationType::Similar => "similar",
            RecommendationType::Trending => "trending",
            RecommendationType::Personalized => "personalized",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub course: CourseSummary,
    /// 0-100, capped sum of the rubric signals.
    pub relevance_score: u8,
    pub reason: String,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrerequisiteCheck {
    pub meets: bool,
    pub missing: Vec<CourseSummary>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}
