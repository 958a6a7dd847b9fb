// Exact (brute-force) nearest-neighbour index over squared L2 distance.

use crate::index::IndexError;

/// A neighbour returned by `FlatL2Index::search`: insertion position and
/// squared L2 distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

/// Row-major, append-only store of fixed-dimension vectors.
///
/// Positions are insertion order and never change; the only removal is `clear`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Rebuilds an index from raw row-major data, e.g. after reading it from disk.
    pub fn from_rows(dimension: usize, data: Vec<f32>) -> Result<Self, IndexError> {
        if dimension == 0 || data.len() % dimension != 0 {
            return Err(IndexError::Truncated);
        }
        Ok(Self { dimension, data })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn row(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    pub fn add(&mut self, vector: &[f32]) -> Result<usize, IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        Ok(self.len() - 1)
    }

    /// Drops rows added after `len` rows. Used to roll back a failed write.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len * self.dimension);
    }

    /// The `k` nearest rows, nearest first. Equal distances keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                distance: squared_l2(row, query),
            })
            .collect();

        neighbors.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.position.cmp(&b.position))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(rows: &[[f32; 2]]) -> FlatL2Index {
        let mut index = FlatL2Index::new(2);
        for row in rows {
            index.add(row).unwrap();
        }
        index
    }

    #[test]
    fn test_search_returns_nearest_first() {
        let index = index_with(&[[0.0, 0.0], [5.0, 5.0], [1.0, 0.0]]);
        let hits = index.search(&[0.9, 0.0], 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].position, 2);
        assert_eq!(hits[1].position, 0);
    }

    #[test]
    fn test_distance_is_squared_l2() {
        let index = index_with(&[[3.0, 4.0]]);
        let hits = index.search(&[0.0, 0.0], 1).unwrap();
        assert!((hits[0].distance - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let index = index_with(&[[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]]);
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_index_returns_everything() {
        let index = index_with(&[[1.0, 1.0]]);
        assert_eq!(index.search(&[0.0, 0.0], 10).unwrap().len(), 1);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let mut index = FlatL2Index::new(2);
        assert!(matches!(
            index.add(&[1.0, 2.0, 3.0]),
            Err(IndexError::DimensionMismatch { expected: 2, got: 3 })
        ));
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_truncate_rolls_back_rows() {
        let mut index = index_with(&[[1.0, 1.0], [2.0, 2.0]]);
        index.truncate(1);
        assert_eq!(index.len(), 1);
        assert_eq!(index.row(0), Some(&[1.0, 1.0][..]));
        assert_eq!(index.row(1), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged_data() {
        assert!(FlatL2Index::from_rows(3, vec![1.0, 2.0]).is_err());
        assert_eq!(FlatL2Index::from_rows(2, vec![1.0, 2.0]).unwrap().len(), 1);
    }
}
