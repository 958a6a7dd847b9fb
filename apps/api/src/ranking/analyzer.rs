use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fallback::recover;
use crate::llm_client::prompts::fill;
use crate::llm_client::{JsonReply, LlmClient, Structured};
use crate::models::analysis::RelevanceAnalysis;
use crate::models::item::{meta_text, IndexedItem};
use crate::ranking::prompts::{ANALYSIS_MAX_TOKENS, ANALYSIS_PROMPT, ANALYSIS_SYSTEM};
use crate::ranking::AnalysisError;

pub const ANALYSIS_UNAVAILABLE: &str = "Analysis failed or was unavailable.";
pub const ANALYSIS_INVALID_FORMAT: &str = "Analysis returned an invalid format.";

// ─────────────────────────────────────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Judges one candidate against a user profile. Never fails: anything that
/// goes wrong yields a default-shaped record with score 1.
#[async_trait]
pub trait RelevanceJudge: Send + Sync {
    async fn analyze(&self, item: &IndexedItem, user_skills: &[String], target_role: &str) -> RelevanceAnalysis;
}

// ─────────────────────────────────────────────────────────────────────────────
// LLM implementation
// ─────────────────────────────────────────────────────────────────────────────

pub struct LlmRelevanceAnalyzer {
    llm: LlmClient,
}

impl LlmRelevanceAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn try_analyze(
        &self,
        item: &IndexedItem,
        user_skills: &[String],
        target_role: &str,
    ) -> Result<RelevanceAnalysis, AnalysisError> {
        let title = meta_text(&item.metadata, "title");
        if title.trim().is_empty() && item.text.trim().is_empty() {
            return Err(AnalysisError::InvalidItem(
                "item has neither a title nor text".to_string(),
            ));
        }

        let description = match meta_text(&item.metadata, "description") {
            d if d.trim().is_empty() => item.text.as_str().into(),
            d => d,
        };
        let skills = user_skills.join(", ");
        let prompt = fill(
            ANALYSIS_PROMPT,
            &[
                ("skills", skills.as_str()),
                ("role", target_role),
                ("title", &*title),
                ("institution", &*meta_text(&item.metadata, "institution")),
                ("rating", &*meta_text(&item.metadata, "rating")),
                ("description", &*description),
            ],
        );

        let reply = self
            .llm
            .complete_as_json(ANALYSIS_SYSTEM, &prompt, ANALYSIS_MAX_TOKENS)
            .await;
        let analysis = normalize(reply);
        debug!(
            "Analyzed '{}': score {:?}, {}",
            title,
            analysis.relevance_score,
            analysis.recommendation.label()
        );
        Ok(analysis)
    }
}

#[async_trait]
impl RelevanceJudge for LlmRelevanceAnalyzer {
    async fn analyze(&self, item: &IndexedItem, user_skills: &[String], target_role: &str) -> RelevanceAnalysis {
        recover(self.try_analyze(item, user_skills, target_role), |reason| {
            RelevanceAnalysis::defaulted(format!("Analysis error: {reason}"))
        })
        .await
    }
}

/// Turns a structured reply into an analysis:
/// error record → default; non-empty array → its first element;
/// anything that is still not an object → default; otherwise the object as-is.
pub fn normalize(reply: JsonReply) -> RelevanceAnalysis {
    let structured = match reply {
        Ok(structured) => structured,
        Err(record) => {
            warn!("LLM analysis failed: {}", record.raw_response);
            return RelevanceAnalysis::defaulted(ANALYSIS_UNAVAILABLE);
        }
    };

    let candidate = match structured {
        Structured::Object(map) => Some(Value::Object(map)),
        Structured::Array(items) => items.into_iter().next(),
    };

    match candidate {
        Some(Value::Object(map)) => RelevanceAnalysis::from_object(map),
        other => {
            warn!("Analysis did not produce an object: {:?}", other);
            RelevanceAnalysis::defaulted(ANALYSIS_INVALID_FORMAT)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::llm_client::transport::scripted::ScriptedTransport;
    use crate::llm_client::{ErrorRecord, RetryPolicy};
    use crate::models::analysis::{LearningLevel, Recommendation};
    use crate::models::item::{ContentType, Metadata, Scalar};

    fn course(title: &str) -> IndexedItem {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), Scalar::from(title));
        metadata.insert("institution".into(), Scalar::from("Stanford"));
        metadata.insert("rating".into(), Scalar::Float(4.8));
        IndexedItem {
            text: format!("{title} Stanford"),
            metadata,
            content_type: ContentType::Course,
        }
    }

    fn array(value: Value) -> JsonReply {
        match value {
            Value::Array(items) => Ok(Structured::Array(items)),
            _ => panic!("fixture must be an array"),
        }
    }

    #[test]
    fn test_error_record_becomes_default() {
        let analysis = normalize(Err(ErrorRecord::call_failed("❌ down")));
        assert_eq!(analysis.relevance_score, Some(1));
        assert_eq!(analysis.learning_level, LearningLevel::Unknown);
        assert_eq!(analysis.career_impact, "Moderate");
        assert_eq!(analysis.recommendation, Recommendation::Consider);
        assert_eq!(analysis.reasoning, ANALYSIS_UNAVAILABLE);
    }

    #[test]
    fn test_array_reply_uses_first_element() {
        let analysis = normalize(array(json!([
            {"relevance_score": 9, "recommendation": "Strongly Recommend"},
            {"relevance_score": 2}
        ])));
        assert_eq!(analysis.relevance_score, Some(9));
        assert_eq!(analysis.recommendation, Recommendation::StronglyRecommend);
    }

    #[test]
    fn test_non_object_first_element_is_invalid_format() {
        let analysis = normalize(array(json!(["nine"])));
        assert_eq!(analysis.reasoning, ANALYSIS_INVALID_FORMAT);
        assert_eq!(analysis.relevance_score, Some(1));

        let empty = normalize(array(json!([])));
        assert_eq!(empty.reasoning, ANALYSIS_INVALID_FORMAT);
    }

    #[test]
    fn test_object_is_kept_verbatim_including_extra_fields() {
        let reply = match json!({"relevance_score": 7, "reasoning": "fits", "confidence": "high"}) {
            Value::Object(map) => Ok(Structured::Object(map)),
            _ => unreachable!(),
        };
        let analysis = normalize(reply);
        assert_eq!(analysis.relevance_score, Some(7));
        assert_eq!(analysis.reasoning, "fits");
        assert_eq!(analysis.extra["confidence"], "high");
    }

    #[tokio::test]
    async fn test_analyze_prompts_with_profile_and_parses_reply() {
        let transport = Arc::new(ScriptedTransport::replying(
            "[{\"relevance_score\": 8, \"learning_level\": \"Advanced\"}]",
        ));
        let analyzer = LlmRelevanceAnalyzer::new(LlmClient::new(transport.clone(), "m", RetryPolicy::immediate(1)));

        let analysis = analyzer
            .analyze(&course("Machine Learning"), &["Python".to_string(), "SQL".to_string()], "Data Scientist")
            .await;
        assert_eq!(analysis.relevance_score, Some(8));
        assert_eq!(analysis.learning_level, LearningLevel::Advanced);

        let prompt = &transport.prompts()[0];
        assert!(prompt.contains("**User Skills:** Python, SQL"));
        assert!(prompt.contains("**Target Role:** Data Scientist"));
        assert!(prompt.contains("- Title: Machine Learning"));
        assert!(prompt.contains("- Rating: 4.8"));
        assert!(prompt.contains("- Description: Machine Learning Stanford"));
    }

    #[tokio::test]
    async fn test_invalid_item_defaults_without_calling_llm() {
        let transport = Arc::new(ScriptedTransport::replying("{}"));
        let analyzer = LlmRelevanceAnalyzer::new(LlmClient::new(transport.clone(), "m", RetryPolicy::immediate(1)));
        let blank = IndexedItem {
            text: "  ".into(),
            metadata: Metadata::new(),
            content_type: ContentType::Course,
        };

        let analysis = analyzer.analyze(&blank, &[], "Engineer").await;
        assert_eq!(analysis.relevance_score, Some(1));
        assert!(analysis.reasoning.starts_with("Analysis error: Invalid item"));
        assert_eq!(transport.calls(), 0);
    }
}
