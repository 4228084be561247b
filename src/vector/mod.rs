// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding vectors and the in-memory vector index

pub mod store;

pub use store::{ScoredChunk, VectorStore};

/// Fixed-length embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    data: Vec<f32>,
    dimension: usize,
}

impl Embedding {
    pub fn new(data: Vec<f32>) -> Self {
        let dimension = data.len();
        Self { data, dimension }
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn magnitude(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Cosine similarity over raw vectors
    ///
    /// Mismatched dimensions and zero vectors score 0.0. The index rejects
    /// both before they reach search.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.dimension != other.dimension {
            return 0.0;
        }

        let dot_product: f32 = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum();

        let magnitude_self = self.magnitude();
        let magnitude_other = other.magnitude();

        if magnitude_self == 0.0 || magnitude_other == 0.0 {
            0.0
        } else {
            dot_product / (magnitude_self * magnitude_other)
        }
    }

    /// Scale to unit magnitude; zero vectors are left unchanged
    pub fn normalize(&mut self) {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            for value in &mut self.data {
                *value /= magnitude;
            }
        }
    }
}
