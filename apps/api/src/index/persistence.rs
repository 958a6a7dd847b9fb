//! On-disk layout of a content type: `index_<type>.bin` + `corpus_<type>.json`.
//!
//! Index blob (little-endian):
//! ```text
//! magic "RMIX" | version u32 | dimension u32 | count u64 | count × dimension f32
//! ```
//! The corpus is a JSON array of `{text, metadata}` in index order.
//!
//! Both files are written to a temp file in the same directory and renamed
//! into place, so a crash mid-write never leaves a half-written artifact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::index::flat::FlatL2Index;
use crate::index::IndexError;
use crate::models::item::{ContentType, CorpusEntry};

pub const INDEX_MAGIC: [u8; 4] = *b"RMIX";
pub const FORMAT_VERSION: u32 = 1;

pub fn index_path(base_dir: &Path, content_type: &ContentType) -> PathBuf {
    base_dir.join(format!("index_{}.bin", content_type.as_str()))
}

pub fn corpus_path(base_dir: &Path, content_type: &ContentType) -> PathBuf {
    base_dir.join(format!("corpus_{}.json", content_type.as_str()))
}

pub fn write_index_to(index: &FlatL2Index, writer: &mut impl Write) -> Result<(), IndexError> {
    writer.write_all(&INDEX_MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&(index.dimension() as u32).to_le_bytes())?;
    writer.write_all(&(index.len() as u64).to_le_bytes())?;
    for value in index.as_slice() {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Fixed header size: magic, version, dimension, count.
const HEADER_LEN: usize = 20;

/// Reads a whole index blob and decodes it. Every length taken from the header
/// is checked against the bytes actually present before anything is allocated.
pub fn read_index_from(reader: &mut impl Read) -> Result<FlatL2Index, IndexError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_index(&data)
}

fn decode_index(data: &[u8]) -> Result<FlatL2Index, IndexError> {
    if data.len() < 4 {
        return Err(IndexError::Truncated);
    }
    if data[0..4] != INDEX_MAGIC {
        return Err(IndexError::InvalidMagic);
    }
    if data.len() < HEADER_LEN {
        return Err(IndexError::Truncated);
    }

    let version = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    if version != FORMAT_VERSION {
        return Err(IndexError::UnsupportedVersion(version));
    }
    let dimension = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&data[12..HEADER_LEN]);
    let count = u64::from_le_bytes(count_bytes);

    let payload_len = usize::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(dimension))
        .and_then(|values| values.checked_mul(4))
        .ok_or(IndexError::Truncated)?;
    let payload_end = HEADER_LEN
        .checked_add(payload_len)
        .ok_or(IndexError::Truncated)?;
    if payload_end > data.len() {
        return Err(IndexError::Truncated);
    }

    let values = data[HEADER_LEN..payload_end]
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    FlatL2Index::from_rows(dimension, values)
}

pub fn read_index_file(path: &Path) -> Result<FlatL2Index, IndexError> {
    let mut reader = BufReader::new(File::open(path)?);
    read_index_from(&mut reader)
}

pub fn read_corpus_file(path: &Path) -> Result<Vec<CorpusEntry>, IndexError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Loads a content type's persisted pair, or an empty pair if nothing was persisted yet.
pub fn load_pair(
    base_dir: &Path,
    content_type: &ContentType,
    dimension: usize,
) -> Result<(FlatL2Index, Vec<CorpusEntry>), IndexError> {
    let index_file = index_path(base_dir, content_type);
    let corpus_file = corpus_path(base_dir, content_type);

    let index = if index_file.exists() {
        read_index_file(&index_file)?
    } else {
        FlatL2Index::new(dimension)
    };
    let corpus = if corpus_file.exists() {
        read_corpus_file(&corpus_file)?
    } else {
        Vec::new()
    };

    // An empty index carries no vectors, so its stored dimension is irrelevant.
    let index = if index.is_empty() {
        FlatL2Index::new(dimension)
    } else if index.dimension() != dimension {
        return Err(IndexError::DimensionMismatch {
            expected: dimension,
            got: index.dimension(),
        });
    } else {
        index
    };

    if index.len() != corpus.len() {
        return Err(IndexError::Inconsistent {
            content_type: content_type.to_string(),
            index_len: index.len(),
            corpus_len: corpus.len(),
        });
    }

    debug!(
        "Loaded '{}' from {}: {} items",
        content_type,
        base_dir.display(),
        corpus.len()
    );
    Ok((index, corpus))
}

/// Writes both artifacts of a content type. Each file is replaced atomically.
pub fn save_pair(
    base_dir: &Path,
    content_type: &ContentType,
    index: &FlatL2Index,
    corpus: &[CorpusEntry],
) -> Result<(), IndexError> {
    write_atomically(&index_path(base_dir, content_type), |w| {
        write_index_to(index, w)
    })?;
    write_atomically(&corpus_path(base_dir, content_type), |w| {
        serde_json::to_writer(w, corpus).map_err(IndexError::from)
    })?;
    Ok(())
}

fn write_atomically(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<&mut File>) -> Result<(), IndexError>,
) -> Result<(), IndexError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| IndexError::Io(e.error))?;
    Ok(())
}
