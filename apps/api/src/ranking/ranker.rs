use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::fallback::recover;
use crate::models::analysis::{RankedItem, RelevanceAnalysis, NEUTRAL_RELEVANCE_SCORE};
use crate::models::item::IndexedItem;
use crate::ranking::{AnalysisError, RelevanceJudge};

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Analyzes candidates on a bounded pool and keeps the best-scoring ones.
#[derive(Clone)]
pub struct Ranker {
    judge: Arc<dyn RelevanceJudge>,
    concurrency: usize,
}

impl Ranker {
    pub fn new(judge: Arc<dyn RelevanceJudge>, concurrency: usize) -> Self {
        Self {
            judge,
            concurrency: concurrency.max(1),
        }
    }

    /// Items scoring below the neutral midpoint are dropped; the rest come back
    /// highest score first, ties in input order, at most `max_results` of them.
    pub async fn rank(
        &self,
        items: Vec<IndexedItem>,
        user_skills: &[String],
        target_role: &str,
        max_results: usize,
    ) -> Vec<RankedItem> {
        if items.is_empty() {
            return Vec::new();
        }
        let candidates = items.len();

        let judge = &self.judge;
        let mut analyzed: Vec<(usize, IndexedItem, RelevanceAnalysis)> = stream::iter(items.into_iter().enumerate())
            .map(|(position, item)| async move {
                let analysis = recover(
                    async { Ok::<_, AnalysisError>(judge.analyze(&item, user_skills, target_role).await) },
                    |reason| RelevanceAnalysis::defaulted(format!("Analysis error: {reason}")),
                )
                .await;
                (position, item, analysis)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; restore input order so the stable sort
        // below breaks ties by it.
        analyzed.sort_by_key(|(position, _, _)| *position);

        let mut ranked: Vec<RankedItem> = analyzed
            .into_iter()
            .map(|(_, item, analysis)| RankedItem {
                relevance_score: analysis.effective_score(),
                item,
                analysis,
            })
            .collect();
        ranked.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        ranked.retain(|r| r.relevance_score >= NEUTRAL_RELEVANCE_SCORE);
        ranked.truncate(max_results);

        info!(
            "Ranked {} candidates for '{}': {} kept",
            candidates,
            target_role,
            ranked.len()
        );
        ranked
    }
}
