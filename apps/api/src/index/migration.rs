//! One-time importer for the single-index layout that predates content types.
//!
//! The legacy pair is an index blob in the current binary format plus a JSON
//! corpus of `[text, filename]` pairs. Each entry becomes `(text, {filename})`
//! in the target content type. There is no dedup: running it twice imports twice.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::index::persistence::read_index_file;
use crate::index::{IndexError, IndexStore};
use crate::models::item::{ContentType, CorpusEntry, Metadata, Scalar};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// One or both legacy files are missing; nothing was touched.
    NotFound,
    Migrated { count: usize, content_type: ContentType },
}

pub async fn migrate_legacy(
    store: &IndexStore,
    legacy_index_file: &Path,
    legacy_corpus_file: &Path,
    target: &ContentType,
) -> Result<MigrationOutcome, IndexError> {
    if !(legacy_index_file.exists() && legacy_corpus_file.exists()) {
        warn!(
            "No legacy data found to migrate ({} / {})",
            legacy_index_file.display(),
            legacy_corpus_file.display()
        );
        return Ok(MigrationOutcome::NotFound);
    }

    let legacy_index = read_index_file(legacy_index_file)?;
    let legacy_corpus: Vec<(String, String)> =
        serde_json::from_reader(std::io::BufReader::new(std::fs::File::open(legacy_corpus_file)?))?;

    if legacy_index.len() != legacy_corpus.len() {
        return Err(IndexError::Inconsistent {
            content_type: "legacy".to_string(),
            index_len: legacy_index.len(),
            corpus_len: legacy_corpus.len(),
        });
    }
    if !legacy_index.is_empty() && legacy_index.dimension() != store.dimension() {
        return Err(IndexError::DimensionMismatch {
            expected: store.dimension(),
            got: legacy_index.dimension(),
        });
    }

    let vectors: Vec<Vec<f32>> = (0..legacy_index.len())
        .filter_map(|i| legacy_index.row(i).map(<[f32]>::to_vec))
        .collect();
    let entries: Vec<CorpusEntry> = legacy_corpus
        .into_iter()
        .map(|(text, filename)| {
            let mut metadata = Metadata::new();
            metadata.insert("filename".to_string(), Scalar::Text(filename));
            CorpusEntry { text, metadata }
        })
        .collect();
    let count = entries.len();

    store.append_embedded(target, &vectors, entries).await?;

    info!(
        "Migrated {} legacy items into '{}' (legacy files preserved)",
        count, target
    );
    Ok(MigrationOutcome::Migrated {
        count,
        content_type: target.clone(),
    })
}
