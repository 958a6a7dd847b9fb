//! Text → vector embedding.
//!
//! The store only needs a fixed-dimension vector per text; which model produces
//! it is pluggable behind `Embedder`. The default `HashEmbedder` is a
//! deterministic feature-hashing embedder: no model download, no network, and
//! the same text always maps to the same vector across processes, which keeps
//! persisted indexes comparable after a restart.

use async_trait::async_trait;

use crate::index::IndexError;

/// Dimension of the default embedder (matches the MiniLM-sized vectors the
/// legacy index was built with).
pub const DEFAULT_DIMENSION: usize = 384;

/// Weight of a character trigram relative to a whole-word feature.
const TRIGRAM_WEIGHT: f32 = 0.5;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError>;

    fn dimension(&self) -> usize;

    /// Short backend label for logs.
    fn name(&self) -> &str;
}

/// Feature-hashing embedder over lowercase word tokens and their character
/// trigrams. Output is L2-normalised; text with no tokens maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(text) {
            self.accumulate(&mut vector, token.as_bytes(), 1.0);

            let padded: Vec<char> = format!("#{token}#").chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                self.accumulate(&mut vector, trigram.as_bytes(), TRIGRAM_WEIGHT);
            }
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a_64(feature);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        Ok(self.embed_sync(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "feature-hash"
    }
}

/// Lowercase word tokens. `+` and `#` stay attached so "C++" and "C#" survive.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

/// FNV-1a. Stable across platforms and releases, unlike `DefaultHasher`.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_embedding_has_configured_dimension_and_unit_norm() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed_sync("Senior Rust engineer, distributed systems");
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let embedder = HashEmbedder::default();
        assert_eq!(
            embedder.embed_sync("machine learning"),
            embedder.embed_sync("machine learning")
        );
    }

    #[test]
    fn test_blank_text_is_zero_vector() {
        let v = HashEmbedder::new(16).embed_sync("  ... ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_related_texts_are_closer_than_unrelated() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed_sync("python machine learning engineer");
        let related = embedder.embed_sync("machine learning with python");
        let unrelated = embedder.embed_sync("watercolor painting for beginners");
        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[test]
    fn test_tokenize_keeps_language_suffixes() {
        let tokens: Vec<String> = tokenize("C++, C# and Rust!").collect();
        assert_eq!(tokens, vec!["c++", "c#", "and", "rust"]);
    }

    #[test]
    fn test_fnv_known_vector() {
        // Reference value for the empty input is the offset basis.
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
