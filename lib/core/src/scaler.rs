use serde::{Deserialize, Serialize};

use crate::matrix::DenseMatrix;

/// Column-wise standardization to zero mean and unit (population) variance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    /// Divisor per column; 1.0 for constant columns, which then map to 0
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(matrix: &DenseMatrix) -> Self {
        let (rows, cols) = matrix.shape();
        if rows == 0 {
            return Self {
                mean: vec![0.0; cols],
                scale: vec![1.0; cols],
            };
        }

        let n = rows as f64;
        let mut mean = vec![0.0; cols];
        for row in matrix.rows() {
            for (m, x) in mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut var = vec![0.0; cols];
        for row in matrix.rows() {
            for ((v, x), m) in var.iter_mut().zip(row).zip(&mean) {
                let d = x - m;
                *v += d * d;
            }
        }

        let scale = var
            .iter()
            .zip(&mean)
            .map(|(v, m)| {
                let std = (v / n).sqrt();
                if std <= 10.0 * f64::EPSILON * m.abs().max(1.0) {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Self { mean, scale }
    }

    pub fn transform(&self, matrix: &DenseMatrix) -> DenseMatrix {
        let mut out = matrix.clone();
        for r in 0..out.n_rows() {
            for (c, x) in out.row_mut(r).iter_mut().enumerate() {
                *x = (*x - self.mean[c]) / self.scale[c];
            }
        }
        out
    }

    pub fn fit_transform(matrix: &DenseMatrix) -> (Self, DenseMatrix) {
        let scaler = Self::fit(matrix);
        let out = scaler.transform(matrix);
        (scaler, out)
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}
