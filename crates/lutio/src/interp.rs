//! Interpolation methods for LUT evaluation.

/// Interpolation method for LUT evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Nearest neighbor (no interpolation).
    Nearest,

    /// Linear interpolation (1D) / Trilinear (3D).
    ///
    /// Default method, good balance of quality and speed.
    #[default]
    Linear,

    /// Tetrahedral interpolation (3D only).
    ///
    /// Higher quality than trilinear, especially for smooth gradients.
    Tetrahedral,
}

/// Maps `x` into the continuous index space `[0, size - 1]` of a table
/// sampled over `axis`.
///
/// A two-value axis is an implicit `[min, max]` range; longer axes are
/// explicit, monotonically increasing sample coordinates.
pub(crate) fn index_position(x: f64, axis: &[f64], size: usize) -> f64 {
    let last = size.saturating_sub(1) as f64;
    match axis.len() {
        0 => 0.0,
        2 => {
            let range = axis[1] - axis[0];
            if range.abs() < 1e-12 {
                return 0.0;
            }
            ((x - axis[0]) / range * last).clamp(0.0, last)
        }
        n => {
            if !(x > axis[0]) {
                return 0.0;
            }
            if x >= axis[n - 1] {
                return (n - 1) as f64;
            }
            let upper = axis.partition_point(|&v| v <= x);
            let lower = upper - 1;
            let span = axis[upper] - axis[lower];
            let frac = if span.abs() < 1e-12 {
                0.0
            } else {
                (x - axis[lower]) / span
            };
            lower as f64 + frac
        }
    }
}

/// Linear interpolation of `values` at continuous index `pos`.
pub(crate) fn sample_linear(values: &[f64], pos: f64) -> f64 {
    let Some(last) = values.len().checked_sub(1) else {
        return pos;
    };
    let i0 = (pos.floor() as usize).min(last);
    let i1 = (i0 + 1).min(last);
    let frac = pos - i0 as f64;
    values[i0] * (1.0 - frac) + values[i1] * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_axis_is_clamped() {
        assert_eq!(index_position(0.5, &[0.0, 1.0], 11), 5.0);
        assert_eq!(index_position(-3.0, &[0.0, 1.0], 11), 0.0);
        assert_eq!(index_position(3.0, &[0.0, 1.0], 11), 10.0);
    }

    #[test]
    fn test_explicit_axis_is_piecewise() {
        let axis = [0.0, 0.1, 1.0];
        assert!((index_position(0.05, &axis, 3) - 0.5).abs() < 1e-12);
        assert!((index_position(0.55, &axis, 3) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_linear_sampling() {
        assert!((sample_linear(&[0.0, 2.0, 4.0], 1.5) - 3.0).abs() < 1e-12);
        assert_eq!(sample_linear(&[0.0, 2.0, 4.0], 2.0), 4.0);
    }
}
