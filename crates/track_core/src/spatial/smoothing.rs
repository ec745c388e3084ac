//! Separable Gaussian blur for density grids.
//!
//! Kernel radius is `⌊4σ + 0.5⌋`. Borders use half-sample reflection
//! (`d c b a | a b c d | d c b a`), which keeps the grid's total mass.

use nalgebra::DMatrix;

/// Kernel truncation, in standard deviations
pub const TRUNCATE_SIGMAS: f64 = 4.0;

/// Normalized 1D Gaussian weights, length `2 * radius + 1`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let radius = (TRUNCATE_SIGMAS * sigma + 0.5) as i64;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|k| {
            let x = k as f64 / sigma;
            (-0.5 * x * x).exp()
        })
        .collect();

    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Map an out-of-range index back into `0..len` by mirror reflection.
#[inline]
fn reflect_index(idx: i64, len: usize) -> usize {
    let len = len as i64;
    let period = 2 * len;
    let m = idx.rem_euclid(period);
    if m < len {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Blur `grid` along both axes. `sigma <= 0` returns a copy.
pub fn gaussian_filter(grid: &DMatrix<f64>, sigma: f64) -> DMatrix<f64> {
    if sigma <= 0.0 || grid.is_empty() {
        return grid.clone();
    }

    let kernel = gaussian_kernel(sigma);
    let along_rows = correlate_axis(grid, &kernel, Axis::Rows);
    correlate_axis(&along_rows, &kernel, Axis::Columns)
}

#[derive(Clone, Copy)]
enum Axis {
    Rows,
    Columns,
}

fn correlate_axis(grid: &DMatrix<f64>, kernel: &[f64], axis: Axis) -> DMatrix<f64> {
    let (nrows, ncols) = grid.shape();
    let radius = (kernel.len() / 2) as i64;

    DMatrix::from_fn(nrows, ncols, |i, j| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let offset = k as i64 - radius;
                let value = match axis {
                    Axis::Rows => grid[(reflect_index(i as i64 + offset, nrows), j)],
                    Axis::Columns => grid[(i, reflect_index(j as i64 + offset, ncols))],
                };
                w * value
            })
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized_and_symmetric() {
        let kernel = gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        for k in 0..kernel.len() / 2 {
            assert!((kernel[k] - kernel[kernel.len() - 1 - k]).abs() < 1e-15);
        }
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
        // wider than the grid
        assert_eq!(reflect_index(-5, 4), 3);
        assert_eq!(reflect_index(9, 4), 1);
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let grid = DMatrix::from_fn(5, 5, |i, j| (i * 5 + j) as f64);
        assert_eq!(gaussian_filter(&grid, 0.0), grid);
    }

    #[test]
    fn test_mass_preserved_in_corner() {
        let mut grid = DMatrix::zeros(50, 50);
        grid[(0, 0)] = 10.0;

        let smoothed = gaussian_filter(&grid, 1.0);
        assert!((smoothed.sum() - 10.0).abs() < 1e-9);
        assert!(smoothed[(0, 0)] < 10.0);
        assert!(smoothed[(1, 1)] > 0.0);
    }

    #[test]
    fn test_mass_preserved_when_kernel_wider_than_grid() {
        let grid = DMatrix::from_fn(3, 4, |i, j| (i + 2 * j) as f64);
        let smoothed = gaussian_filter(&grid, 3.0);
        assert!((smoothed.sum() - grid.sum()).abs() < 1e-9);
    }

    #[test]
    fn test_constant_grid_unchanged() {
        let grid = DMatrix::from_element(6, 6, 2.5);
        let smoothed = gaussian_filter(&grid, 1.5);
        for v in smoothed.iter() {
            assert!((v - 2.5).abs() < 1e-12);
        }
    }
}
