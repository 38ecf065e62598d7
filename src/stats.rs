//! Statistics primitives
//!
//! Pure numeric helpers over ordered slices of samples:
//! - `mean` and `std_dev` with explicit insufficient-data outcomes
//! - `linear_fit` (ordinary least squares) for trend estimation
//! - `pooled_std_dev` for two-window comparisons
//!
//! `std_dev` uses Welford's online algorithm: years of SpO2 readings
//! clustered at 97-99 would lose all significant digits under a naive
//! sum-of-squares pass.

use crate::error::EngineError;

/// Arithmetic mean of the samples.
///
/// Empty input fails with `InsufficientData`; silently returning 0 would
/// corrupt downstream range math.
pub fn mean(samples: &[f64]) -> Result<f64, EngineError> {
    if samples.is_empty() {
        return Err(EngineError::InsufficientData("mean of empty sequence"));
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Sample standard deviation (n-1 formula) via Welford's algorithm.
///
/// A single sample has no measured spread, so `n <= 1` fails with
/// `InsufficientData` rather than reporting a false-precision zero.
pub fn std_dev(samples: &[f64]) -> Result<f64, EngineError> {
    if samples.len() < 2 {
        return Err(EngineError::InsufficientData(
            "standard deviation needs at least two samples",
        ));
    }

    let mut count = 0usize;
    let mut running_mean = 0.0;
    let mut m2 = 0.0;

    for &x in samples {
        count += 1;
        let delta = x - running_mean;
        running_mean += delta / count as f64;
        let delta2 = x - running_mean;
        m2 += delta * delta2;
    }

    Ok((m2 / (count - 1) as f64).sqrt())
}

/// Result of an ordinary least-squares line fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope in y-units per x-unit
    pub slope: f64,
    /// Intercept at x = 0
    pub intercept: f64,
    /// Coefficient of determination in [0, 1]
    pub r_squared: f64,
}

/// Fit an ordinary least-squares line through (x, y) points.
///
/// Fewer than two points, or zero variance in x, fails with
/// `InsufficientData`. Zero variance in y is a perfectly fit constant:
/// slope 0, R-squared 1.
pub fn linear_fit(points: &[(f64, f64)]) -> Result<LinearFit, EngineError> {
    if points.len() < 2 {
        return Err(EngineError::InsufficientData(
            "line fit needs at least two points",
        ));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    // Centered sums avoid cancellation on large day offsets
    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    let mut ss_yy = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        ss_xx += dx * dx;
        ss_xy += dx * dy;
        ss_yy += dy * dy;
    }

    if ss_xx.abs() < f64::EPSILON {
        return Err(EngineError::InsufficientData(
            "line fit needs at least two distinct x values",
        ));
    }

    let slope = ss_xy / ss_xx;
    let intercept = mean_y - slope * mean_x;

    // Flat y: the constant line fits exactly
    let r_squared = if ss_yy.abs() < f64::EPSILON {
        1.0
    } else {
        ((ss_xy * ss_xy) / (ss_xx * ss_yy)).clamp(0.0, 1.0)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

/// Pooled sample standard deviation of two sub-windows, weighted by
/// their degrees of freedom.
pub fn pooled_std_dev(sd_a: f64, n_a: usize, sd_b: f64, n_b: usize) -> f64 {
    let dof_a = n_a.saturating_sub(1) as f64;
    let dof_b = n_b.saturating_sub(1) as f64;
    let dof = dof_a + dof_b;
    if dof <= 0.0 {
        return 0.0;
    }
    ((dof_a * sd_a * sd_a + dof_b * sd_b * sd_b) / dof).sqrt()
}
