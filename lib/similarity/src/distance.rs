//! Pairwise similarity over a feature space
//!
//! Every matrix here is N×N, symmetric, with entries in [-1.0, 1.0] and
//! 1.0 on the diagonal. A row with no signal (zero norm) has similarity 0.0
//! to every other row.

use homex_core::simd::dot_product_simd;
use homex_core::{DenseMatrix, SparseVector, Vector};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarityMatrix {
    inner: DenseMatrix,
}

impl SimilarityMatrix {
    fn from_rows(n: usize, rows: Vec<Vec<f64>>) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            data.extend(row);
        }
        // n * n values by construction
        let inner = DenseMatrix::from_vec(n, n, data).unwrap_or_else(|_| DenseMatrix::zeros(n, n));
        Self { inner }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.n_rows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.n_rows() == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner.get(i, j)
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        self.inner.row(i)
    }
}

fn finish(i: usize, row: Vec<f64>) -> Vec<f64> {
    row.into_iter()
        .enumerate()
        .map(|(j, s)| if i == j { 1.0 } else { s.clamp(-1.0, 1.0) })
        .collect()
}

/// Cosine similarity between every pair of rows of a dense matrix
pub fn cosine_similarity_matrix(matrix: &DenseMatrix) -> SimilarityMatrix {
    let n = matrix.n_rows();
    let unit: Vec<Vector> = matrix
        .rows()
        .map(|r| Vector::new(r.to_vec()).normalized())
        .collect();

    let rows = (0..n)
        .into_par_iter()
        .map(|i| {
            let a = unit[i].as_slice();
            let row = unit
                .iter()
                .map(|b| dot_product_simd(a, b.as_slice()))
                .collect();
            finish(i, row)
        })
        .collect();

    SimilarityMatrix::from_rows(n, rows)
}

/// Cosine similarity between every pair of sparse rows
pub fn sparse_cosine_similarity_matrix(rows: &[SparseVector]) -> SimilarityMatrix {
    let n = rows.len();
    let unit: Vec<SparseVector> = rows
        .iter()
        .map(|r| {
            let mut r = r.clone();
            r.normalize();
            r
        })
        .collect();

    let out = (0..n)
        .into_par_iter()
        .map(|i| {
            let row = unit.iter().map(|b| unit[i].dot(b)).collect();
            finish(i, row)
        })
        .collect();

    SimilarityMatrix::from_rows(n, out)
}
