//! Least-squares regression through the normal equations.
//!
//! Used by the polynomial and autoregressive estimators. Systems here are
//! tiny (at most a handful of columns, twenty rows), so the normal equations
//! are formed explicitly and solved with Gaussian elimination.

use crate::error::{ForecastError, Result};

/// Pivots smaller than this fraction of the largest matrix entry are treated
/// as zero.
const RELATIVE_PIVOT_TOLERANCE: f64 = 1e-10;

/// Fit `y ≈ X β` by ordinary least squares.
///
/// # Arguments
/// * `design` - Design matrix rows (n × m), including any intercept column
/// * `target` - Target values (length n)
///
/// # Errors
/// * [`ForecastError::EmptyData`] for an empty design matrix
/// * [`ForecastError::DimensionMismatch`] for ragged rows or mismatched target
/// * [`ForecastError::SingularSystem`] when `X'X` is (numerically) singular
pub fn least_squares(design: &[Vec<f64>], target: &[f64]) -> Result<Vec<f64>> {
    let n = design.len();
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    if target.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: target.len(),
        });
    }

    let m = design[0].len();
    if m == 0 {
        return Err(ForecastError::EmptyData);
    }
    if let Some(row) = design.iter().find(|row| row.len() != m) {
        return Err(ForecastError::DimensionMismatch {
            expected: m,
            got: row.len(),
        });
    }

    let mut xtx = vec![vec![0.0; m]; m];
    let mut xty = vec![0.0; m];

    for (row, &y) in design.iter().zip(target) {
        for i in 0..m {
            xty[i] += row[i] * y;
            for j in 0..m {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    solve_linear_system(xtx, xty)
}

/// Solve `A x = b` with Gaussian elimination and partial pivoting.
///
/// Each column swaps in the row with the largest absolute pivot before
/// eliminating below it; back substitution then recovers `x`.
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    if a.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: a.len(),
        });
    }
    if let Some(row) = a.iter().find(|row| row.len() != n) {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: row.len(),
        });
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tolerance = (scale * RELATIVE_PIVOT_TOLERANCE).max(f64::MIN_POSITIVE);

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| {
                a[i][col]
                    .abs()
                    .partial_cmp(&a[j][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);

        let pivot = a[pivot_row][col];
        if !pivot.is_finite() || pivot.abs() <= tolerance {
            return Err(ForecastError::SingularSystem { column: col, pivot });
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let tail: f64 = ((i + 1)..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - tail) / a[i][i];
    }

    Ok(x)
}
