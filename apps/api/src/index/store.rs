//! `IndexStore` — the single owner of every content type's index/corpus pair.
//!
//! Content types are materialized lazily: the first caller to touch a type
//! loads it from disk (or creates it empty) inside a per-type `OnceCell`, so
//! concurrent first accesses never construct it twice. After that, each type
//! is guarded by its own `RwLock`: mutations take the write half for the whole
//! append-and-persist step, searches take the read half and therefore see the
//! state either before or after a write, never in between.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{info, warn};

use crate::index::flat::FlatL2Index;
use crate::index::persistence::{load_pair, save_pair};
use crate::index::{Embedder, IndexError};
use crate::models::item::{ContentType, CorpusEntry, Metadata, SearchResult};

/// Predicate over item metadata used to filter search hits.
pub type MetadataFilter<'a> = &'a (dyn Fn(&Metadata) -> bool + Send + Sync);

/// Acknowledgement of a successful `add`.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub content_type: ContentType,
    /// Position of the new item in the content type's sequence.
    pub position: usize,
    /// Number of items in the content type after the add.
    pub total: usize,
}

struct StoreState {
    index: FlatL2Index,
    corpus: Vec<CorpusEntry>,
}

impl StoreState {
    fn check_aligned(&self, content_type: &ContentType) -> Result<(), IndexError> {
        if self.index.len() != self.corpus.len() {
            return Err(IndexError::Inconsistent {
                content_type: content_type.to_string(),
                index_len: self.index.len(),
                corpus_len: self.corpus.len(),
            });
        }
        Ok(())
    }
}

struct ContentTypeStore {
    content_type: ContentType,
    state: RwLock<StoreState>,
}

pub struct IndexStore {
    base_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    stores: Mutex<HashMap<ContentType, Arc<OnceCell<Arc<ContentTypeStore>>>>>,
}

impl IndexStore {
    /// Creates a store rooted at `base_dir`, creating the directory if needed.
    /// Nothing is loaded until a content type is first used.
    pub fn new(base_dir: impl Into<PathBuf>, embedder: Arc<dyn Embedder>) -> Result<Self, IndexError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        info!(
            "Index store at {} (embedder: {}, dimension: {})",
            base_dir.display(),
            embedder.name(),
            embedder.dimension()
        );
        Ok(Self {
            base_dir,
            embedder,
            stores: Mutex::new(HashMap::new()),
        })
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    async fn store_for(&self, content_type: &ContentType) -> Result<Arc<ContentTypeStore>, IndexError> {
        let cell = {
            let mut stores = self.stores.lock().await;
            stores.entry(content_type.clone()).or_default().clone()
        };

        let store = cell
            .get_or_try_init(|| async {
                let (index, corpus) = load_pair(&self.base_dir, content_type, self.dimension())?;
                info!("Materialized '{}' store with {} items", content_type, corpus.len());
                Ok::<_, IndexError>(Arc::new(ContentTypeStore {
                    content_type: content_type.clone(),
                    state: RwLock::new(StoreState { index, corpus }),
                }))
            })
            .await?;
        Ok(store.clone())
    }

    /// Embeds `text` and appends it to `content_type`, persisting before returning.
    pub async fn add(
        &self,
        text: &str,
        metadata: Metadata,
        content_type: &ContentType,
    ) -> Result<Ack, IndexError> {
        if text.trim().is_empty() {
            return Err(IndexError::EmptyInput);
        }

        let store = self.store_for(content_type).await?;
        let embedding = self.embedder.embed(text).await?;

        let mut state = store.state.write().await;
        let entry = CorpusEntry {
            text: text.to_string(),
            metadata,
        };
        let total = self.append_locked(&store, &mut state, &[embedding], vec![entry])?;

        Ok(Ack {
            content_type: content_type.clone(),
            position: total - 1,
            total,
        })
    }

    /// Appends pre-computed vectors with their corpus entries as one unit.
    /// Used by the legacy importer, which already has vectors.
    pub async fn append_embedded(
        &self,
        content_type: &ContentType,
        vectors: &[Vec<f32>],
        entries: Vec<CorpusEntry>,
    ) -> Result<usize, IndexError> {
        let store = self.store_for(content_type).await?;
        let mut state = store.state.write().await;
        self.append_locked(&store, &mut state, vectors, entries)
    }

    /// Appends under an already-held write lock and persists. On any failure
    /// the in-memory pair is rolled back so memory and disk stay in step.
    fn append_locked(
        &self,
        store: &ContentTypeStore,
        state: &mut StoreState,
        vectors: &[Vec<f32>],
        entries: Vec<CorpusEntry>,
    ) -> Result<usize, IndexError> {
        if vectors.len() != entries.len() {
            return Err(IndexError::Inconsistent {
                content_type: store.content_type.to_string(),
                index_len: vectors.len(),
                corpus_len: entries.len(),
            });
        }
        state.check_aligned(&store.content_type)?;
        let before = state.corpus.len();

        for vector in vectors {
            if let Err(e) = state.index.add(vector) {
                state.index.truncate(before);
                return Err(e);
            }
        }
        state.corpus.extend(entries);

        if let Err(e) = save_pair(&self.base_dir, &store.content_type, &state.index, &state.corpus) {
            warn!(
                "Persisting '{}' failed, rolling back {} item(s): {e}",
                store.content_type,
                state.corpus.len() - before
            );
            state.index.truncate(before);
            state.corpus.truncate(before);
            return Err(e);
        }

        Ok(state.corpus.len())
    }

    /// The `top_k` nearest items to `query_text`. An empty content type yields `[]`.
    ///
    /// `filter` is applied after retrieval, so fewer than `top_k` results may come back.
    pub async fn search(
        &self,
        query_text: &str,
        content_type: &ContentType,
        top_k: usize,
        filter: Option<MetadataFilter<'_>>,
    ) -> Result<Vec<SearchResult>, IndexError> {
        let store = self.store_for(content_type).await?;
        if store.state.read().await.corpus.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(query_text).await?;
        let state = store.state.read().await;
        let neighbors = state.index.search(&query, top_k)?;

        let results = neighbors
            .into_iter()
            .filter_map(|n| state.corpus.get(n.position).map(|entry| (entry, n.distance)))
            .filter(|(entry, _)| filter.map_or(true, |f| f(&entry.metadata)))
            .map(|(entry, distance)| SearchResult {
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
                // Not clamped: may leave [0, 1].
                similarity: 1.0 - distance,
            })
            .collect();
        Ok(results)
    }

    /// Resets `content_type` to an empty pair. The empty pair is persisted
    /// first; memory is only swapped once the write succeeded.
    pub async fn clear(&self, content_type: &ContentType) -> Result<(), IndexError> {
        let store = self.store_for(content_type).await?;
        let mut state = store.state.write().await;
        let empty = FlatL2Index::new(self.dimension());
        save_pair(&self.base_dir, content_type, &empty, &[])?;
        state.index = empty;
        state.corpus = Vec::new();
        info!("Cleared '{}' store", content_type);
        Ok(())
    }

    /// Re-persists `content_type` as currently held in memory.
    pub async fn save(&self, content_type: &ContentType) -> Result<(), IndexError> {
        let store = self.store_for(content_type).await?;
        let state = store.state.write().await;
        save_pair(&self.base_dir, content_type, &state.index, &state.corpus)
    }

    /// Re-persists every content type materialized so far. Returns how many were written.
    pub async fn save_all(&self) -> Result<usize, IndexError> {
        let cells: Vec<_> = self.stores.lock().await.values().cloned().collect();
        let mut saved = 0;
        for cell in cells {
            if let Some(store) = cell.get() {
                self.save(&store.content_type).await?;
                saved += 1;
            }
        }
        Ok(saved)
    }

    pub async fn get_corpus(&self, content_type: &ContentType) -> Result<Vec<CorpusEntry>, IndexError> {
        let store = self.store_for(content_type).await?;
        let state = store.state.read().await;
        Ok(state.corpus.clone())
    }

    /// `(index length, corpus length)` for `content_type`.
    pub async fn lengths(&self, content_type: &ContentType) -> Result<(usize, usize), IndexError> {
        let store = self.store_for(content_type).await?;
        let state = store.state.read().await;
        Ok((state.index.len(), state.corpus.len()))
    }
}
