//! Domain conventions shared by the table variants.
//!
//! A domain is *implicit* when it holds exactly two rows (minimum and
//! maximum, the table being a uniform sample of that range) and *explicit*
//! otherwise, one coordinate per table entry.

use crate::sampling::AxisSamples;
use crate::{LutError, LutResult};

/// Default domain of a [`Lut1D`](crate::Lut1D).
pub const DEFAULT_DOMAIN_1D: [f64; 2] = [0.0, 1.0];

/// Default domain of a [`Lut3x1D`](crate::Lut3x1D) or [`Lut3D`](crate::Lut3D).
pub const DEFAULT_DOMAIN: [[f64; 3]; 2] = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

pub(crate) fn default_rows() -> Vec<[f64; 3]> {
    DEFAULT_DOMAIN.to_vec()
}

pub(crate) fn is_default_rows(domain: &[[f64; 3]]) -> bool {
    domain == DEFAULT_DOMAIN.as_slice()
}

/// Non-NaN coordinates of one channel.
pub(crate) fn column(domain: &[[f64; 3]], channel: usize) -> Vec<f64> {
    domain
        .iter()
        .map(|row| row[channel])
        .filter(|v| !v.is_nan())
        .collect()
}

/// Number of distinct non-NaN values.
pub(crate) fn unique_count(values: impl IntoIterator<Item = f64>) -> usize {
    let mut values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len()
}

/// Sampler for one channel of a row domain over `size` entries.
pub(crate) fn axis(domain: &[[f64; 3]], channel: usize, size: usize) -> AxisSamples {
    if domain.len() == 2 {
        AxisSamples::uniform(domain[0][channel], domain[1][channel], size)
    } else {
        AxisSamples::explicit(column(domain, channel))
    }
}

pub(crate) fn check_1d(domain: &[f64], size: usize) -> LutResult<()> {
    if domain.len() == 2 || domain.len() == size {
        Ok(())
    } else {
        Err(LutError::validation(format!(
            "domain must hold 2 values or one per entry ({}), got {}",
            size,
            domain.len()
        )))
    }
}

pub(crate) fn check_rows(domain: &[[f64; 3]], size: usize) -> LutResult<()> {
    if domain.len() == 2 || domain.len() == size {
        Ok(())
    } else {
        Err(LutError::validation(format!(
            "domain must hold 2 rows or one per entry ({}), got {}",
            size,
            domain.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ignores_nan() {
        assert_eq!(unique_count([0.0, 0.0, 1.0, f64::NAN, 1.0]), 2);
    }

    #[test]
    fn test_default_rows_detected() {
        assert!(is_default_rows(&default_rows()));
        assert!(!is_default_rows(&[[0.0; 3], [2.0; 3]]));
    }

    #[test]
    fn test_explicit_column_drops_padding() {
        let domain = [[0.0, 0.0, 0.0], [0.5, f64::NAN, 1.0], [1.0, f64::NAN, 2.0]];
        assert_eq!(column(&domain, 1), vec![0.0]);
        assert_eq!(column(&domain, 2), vec![0.0, 1.0, 2.0]);
    }
}
