use crate::vector::l2_distance;
use crate::{Error, FeatureVector, Result};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A stored vector returned by a query, with its distance to the query
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    /// Position of the vector in build order
    pub index: usize,
    pub distance: f64,
}

/// Candidate ordered by (distance, index)
///
/// In a `BinaryHeap` the top is the worst candidate kept so far: the
/// furthest, and among equally far ones the highest index.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Candidate {
    dist: OrderedFloat<f64>,
    idx: usize,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .cmp(&other.dist)
            .then_with(|| self.idx.cmp(&other.idx))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Exact k-nearest-neighbor index under Euclidean distance
///
/// Vectors are stored contiguously in build order and never mutated; a
/// changed population needs a fresh index. Queries scan every vector and
/// keep the best `k` in a bounded max-heap, which is exact and fast enough
/// for populations of a few thousand rows.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    /// Contiguous storage for all vectors
    vectors: Vec<f64>,
    dim: usize,
    len: usize,
}

impl NeighborIndex {
    /// Build an index over feature vectors, keyed by their position
    pub fn build(vectors: &[FeatureVector]) -> Self {
        let dim = vectors.first().map_or(crate::FEATURE_COUNT, FeatureVector::dim);
        let mut data = Vec::with_capacity(vectors.len() * dim);
        for v in vectors {
            data.extend_from_slice(v.as_slice());
        }
        Self {
            vectors: data,
            dim,
            len: vectors.len(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Stored vector at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.dim;
        Some(&self.vectors[start..start + self.dim])
    }

    /// The `k` stored vectors closest to `query`, nearest first
    ///
    /// Equal distances are ordered by index. The query point itself is not
    /// excluded if it is stored.
    pub fn query(&self, query: &[f64], k: usize) -> Result<Vec<Neighbor>> {
        if k < 1 || k > self.len {
            return Err(Error::InvalidK { k, max: self.len });
        }
        if query.len() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        for (idx, stored) in self.vectors.chunks_exact(self.dim).enumerate() {
            let candidate = Candidate {
                dist: OrderedFloat(l2_distance(query, stored)),
                idx,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| Neighbor {
                index: c.idx,
                distance: c.dist.into_inner(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(x: f64, y: f64) -> FeatureVector {
        FeatureVector::new([x, y, 0.0, 0.0, 0.0, 0.0])
    }

    fn grid() -> NeighborIndex {
        NeighborIndex::build(&[
            vector(0.0, 0.0),
            vector(3.0, 4.0),
            vector(1.0, 0.0),
            vector(0.0, 2.0),
        ])
    }

    #[test]
    fn test_query_orders_by_distance() {
        let index = grid();
        let neighbors = index.query(vector(0.0, 0.0).as_slice(), 4).unwrap();

        let order: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![0, 2, 3, 1]);
        assert_eq!(neighbors[0].distance, 0.0);
        assert!((neighbors[3].distance - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_query_includes_stored_query_point() {
        let index = grid();
        let neighbors = index.query(vector(3.0, 4.0).as_slice(), 1).unwrap();
        assert_eq!(neighbors, vec![Neighbor { index: 1, distance: 0.0 }]);
    }

    #[test]
    fn test_ties_break_by_lower_index() {
        let index = NeighborIndex::build(&[
            vector(5.0, 5.0),
            vector(0.0, 1.0),
            vector(1.0, 0.0),
            vector(-1.0, 0.0),
        ]);
        let neighbors = index.query(vector(0.0, 0.0).as_slice(), 2).unwrap();
        let order: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2]);

        let neighbors = index.query(vector(0.0, 0.0).as_slice(), 3).unwrap();
        let order: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_invalid_k_is_rejected() {
        let index = grid();
        let q = vector(0.0, 0.0);
        assert!(matches!(
            index.query(q.as_slice(), 0),
            Err(Error::InvalidK { k: 0, max: 4 })
        ));
        assert!(matches!(
            index.query(q.as_slice(), 5),
            Err(Error::InvalidK { k: 5, max: 4 })
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let index = grid();
        assert!(matches!(
            index.query(&[0.0, 0.0], 1),
            Err(Error::InvalidDimension { expected: 6, actual: 2 })
        ));
    }

    #[test]
    fn test_empty_index_rejects_every_k() {
        let index = NeighborIndex::build(&[]);
        assert!(index.is_empty());
        assert!(matches!(
            index.query(&[0.0; 6], 1),
            Err(Error::InvalidK { k: 1, max: 0 })
        ));
    }

    #[test]
    fn test_get_returns_stored_vector() {
        let index = grid();
        assert_eq!(index.get(1).unwrap()[..2], [3.0, 4.0]);
        assert!(index.get(4).is_none());
    }
}
