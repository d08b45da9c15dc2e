//! Best-match Retrieval
//!
//! Brute-force cosine scan over an embedding matrix.

use super::matrix::EmbeddingMatrix;
use super::similarity::{cosine_with_norm, magnitude};
use crate::error::{Error, Result};

/// Winning row of a scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// Row index in the matrix
    pub index: usize,
    /// Cosine similarity to the query
    pub score: f32,
}

/// Index of the row most similar to `query`
pub fn best_match(query: &[f32], matrix: &EmbeddingMatrix) -> Result<usize> {
    scan(query, matrix).map(|m| m.index)
}

/// Linear scan returning the best row and its score
///
/// Rows tying for the maximum resolve to the lowest index. Zero-norm vectors
/// and non-finite scores fail the whole scan.
pub fn scan(query: &[f32], matrix: &EmbeddingMatrix) -> Result<Match> {
    if matrix.is_empty() {
        return Err(Error::EmptyMatrix);
    }
    if query.len() != matrix.dimension() {
        return Err(Error::QueryDimension {
            expected: matrix.dimension(),
            actual: query.len(),
        });
    }

    let query_norm = magnitude(query);
    if query_norm == 0.0 {
        return Err(Error::ZeroNormQuery);
    }

    let mut best: Option<Match> = None;
    for (index, row) in matrix.rows().enumerate() {
        let score = cosine_with_norm(query, query_norm, row).ok_or(Error::ZeroNormRow(index))?;
        if !score.is_finite() {
            return Err(Error::NonFiniteScore(index));
        }
        // strict comparison keeps the first of equal scores
        if best.map_or(true, |b| score > b.score) {
            best = Some(Match { index, score });
        }
    }

    best.ok_or(Error::EmptyMatrix)
}
