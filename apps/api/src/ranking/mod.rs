//! LLM-backed re-ranking: each retrieved candidate is judged against the user's
//! profile, then sorted, thresholded and truncated.

use thiserror::Error;

pub mod analyzer;
pub mod format;
pub mod prompts;
pub mod ranker;

pub use analyzer::{LlmRelevanceAnalyzer, RelevanceJudge};
pub use ranker::Ranker;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid item: {0}")]
    InvalidItem(String),
}
