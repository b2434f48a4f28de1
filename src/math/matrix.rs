use serde::{Serialize, Deserialize};

use crate::math::rng::RandomSource;

/// Dense row-major matrix. Weight matrices are laid out `input × output`, so
/// row `i` holds the weights leaving input unit `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Every entry is one draw from `rng` divided by `rows` (the fan-in,
    /// bias row included).
    pub fn random(rows: usize, cols: usize, rng: &mut RandomSource) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        let fan_in = rows as f64;

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = rng.draw() / fan_in;
            }
        }

        res
    }

    /// Builds a matrix from row vectors. Returns `None` for ragged input.
    pub fn from_data(data: Vec<Vec<f64>>) -> Option<Matrix> {
        let cols = data.first().map_or(0, Vec::len);
        if data.iter().any(|row| row.len() != cols) {
            return None;
        }
        Some(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// Row vector times matrix: `out[j] = Σ_i x[i] · self[i][j]`.
    ///
    /// `x` must have `rows` entries.
    pub fn project(&self, x: &[f64]) -> Vec<f64> {
        debug_assert_eq!(x.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        for (xi, row) in x.iter().zip(self.data.iter()) {
            for (o, w) in out.iter_mut().zip(row.iter()) {
                *o += xi * w;
            }
        }
        out
    }

    /// Matrix times column vector restricted to the first `out_len` rows:
    /// `out[j] = Σ_k self[j][k] · v[k]`.
    pub fn back_project(&self, v: &[f64], out_len: usize) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        self.data.iter()
            .take(out_len)
            .map(|row| row.iter().zip(v.iter()).map(|(w, d)| d * w).sum())
            .collect()
    }

    /// `self += a ⊗ b` (outer product), with `a.len() == rows`, `b.len() == cols`.
    pub fn add_outer(&mut self, a: &[f64], b: &[f64]) {
        debug_assert_eq!(a.len(), self.rows);
        debug_assert_eq!(b.len(), self.cols);
        for (ai, row) in a.iter().zip(self.data.iter_mut()) {
            for (cell, bj) in row.iter_mut().zip(b.iter()) {
                *cell += ai * bj;
            }
        }
    }

    /// `self -= scale · other`, element-wise.
    pub fn sub_scaled(&mut self, other: &Matrix, scale: f64) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (cell, g) in row.iter_mut().zip(other_row.iter()) {
                *cell -= g * scale;
            }
        }
    }

    pub fn fill(&mut self, value: f64) {
        for row in self.data.iter_mut() {
            row.iter_mut().for_each(|x| *x = value);
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
