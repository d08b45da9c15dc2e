//! Embedding Matrix
//!
//! Dense row-major storage for passage embeddings.

use crate::error::{Error, Result};

/// Row-major `f32` matrix, one row per passage
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dimension: usize,
}

impl EmbeddingMatrix {
    /// Build from individual rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = rows.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * dimension);

        for (row, values) in rows.iter().enumerate() {
            if values.len() != dimension {
                return Err(Error::RowDimension {
                    row,
                    expected: dimension,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }

        Ok(Self {
            data,
            rows: rows.len(),
            dimension,
        })
    }

    /// Build from a flat row-major buffer
    pub fn from_flat(rows: usize, dimension: usize, data: Vec<f32>) -> Result<Self> {
        if rows.checked_mul(dimension) != Some(data.len()) {
            return Err(Error::Shape {
                rows,
                dimension,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            rows,
            dimension,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Width of every row
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Borrow one row
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.data[start..start + self.dimension])
    }

    /// Iterate rows in order
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on zero; a zero-width matrix has no data anyway
        self.data.chunks_exact(self.dimension.max(1)).take(self.rows)
    }

    /// Flat row-major view
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
