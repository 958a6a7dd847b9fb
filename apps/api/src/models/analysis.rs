use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::item::IndexedItem;

/// Score attached to an analysis that did not report one.
pub const NEUTRAL_RELEVANCE_SCORE: i64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum LearningLevel {
    Beginner,
    Intermediate,
    Advanced,
    #[default]
    Unknown,
}

impl LearningLevel {
    fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "beginner" => LearningLevel::Beginner,
            "intermediate" => LearningLevel::Intermediate,
            "advanced" => LearningLevel::Advanced,
            _ => LearningLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LearningLevel::Beginner => "Beginner",
            LearningLevel::Intermediate => "Intermediate",
            LearningLevel::Advanced => "Advanced",
            LearningLevel::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    #[serde(rename = "Strongly Recommend")]
    StronglyRecommend,
    Recommend,
    #[default]
    Consider,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl Recommendation {
    /// Accepts the model's spelling variations ("Strongly Recommend", "strongly_recommend",
    /// "Recommended"). Anything unrecognised reads as `Consider`.
    fn parse_lenient(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "stronglyrecommend" | "stronglyrecommended" => Recommendation::StronglyRecommend,
            "recommend" | "recommended" => Recommendation::Recommend,
            "notrecommended" | "notrecommend" => Recommendation::NotRecommended,
            _ => Recommendation::Consider,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StronglyRecommend => "Strongly Recommend",
            Recommendation::Recommend => "Recommend",
            Recommendation::Consider => "Consider",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

/// The model's judgment of one candidate for one user profile.
///
/// Built leniently from whatever object the model returned: known fields are
/// coerced where possible, a missing `relevance_score` stays `None`, and any
/// extra keys are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct RelevanceAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<i64>,
    pub skill_gaps_covered: Vec<String>,
    pub learning_level: LearningLevel,
    pub career_impact: String,
    pub recommendation: Recommendation,
    pub reasoning: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelevanceAnalysis {
    /// The safe record substituted whenever analysis cannot produce a usable object.
    pub fn defaulted(reasoning: impl Into<String>) -> Self {
        Self {
            relevance_score: Some(1),
            skill_gaps_covered: Vec::new(),
            learning_level: LearningLevel::Unknown,
            career_impact: "Moderate".to_string(),
            recommendation: Recommendation::Consider,
            reasoning: reasoning.into(),
            extra: Map::new(),
        }
    }

    pub fn from_object(mut object: Map<String, Value>) -> Self {
        let relevance_score = object.remove("relevance_score").and_then(|v| score_from(&v));
        let skill_gaps_covered = object
            .remove("skill_gaps_covered")
            .map(|v| strings_from(&v))
            .unwrap_or_default();
        let learning_level = object
            .remove("learning_level")
            .and_then(|v| v.as_str().map(LearningLevel::parse_lenient))
            .unwrap_or_default();
        let career_impact = object
            .remove("career_impact")
            .map(|v| text_from(&v))
            .unwrap_or_default();
        let recommendation = object
            .remove("recommendation")
            .and_then(|v| v.as_str().map(Recommendation::parse_lenient))
            .unwrap_or_default();
        let reasoning = object
            .remove("reasoning")
            .map(|v| text_from(&v))
            .unwrap_or_default();

        Self {
            relevance_score,
            skill_gaps_covered,
            learning_level,
            career_impact,
            recommendation,
            reasoning,
            extra: object,
        }
    }

    /// Score used for ranking: the reported score, or the neutral midpoint if absent.
    pub fn effective_score(&self) -> i64 {
        self.relevance_score.unwrap_or(NEUTRAL_RELEVANCE_SCORE)
    }
}

impl From<Map<String, Value>> for RelevanceAnalysis {
    fn from(object: Map<String, Value>) -> Self {
        Self::from_object(object)
    }
}

fn score_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            // "8/10" is a common model answer
            let head = s.split('/').next().unwrap_or(s).trim();
            head.parse::<i64>()
                .ok()
                .or_else(|| head.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

fn strings_from(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(text_from)
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn text_from(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A candidate after analysis, carrying the score it was ranked by.
#[derive(Debug, Clone, Serialize)]
pub struct RankedItem {
    #[serde(flatten)]
    pub item: IndexedItem,
    pub relevance_score: i64,
    pub analysis: RelevanceAnalysis,
}
