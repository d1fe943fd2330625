//! 1-dimensional lookup table.
//!
//! A 1D LUT applies a single transfer function to every channel.
//! Common uses include:
//! - Gamma correction
//! - Log-to-linear conversion
//! - Shapers preceding a 3D cube

use crate::common::{MAX_SHAPER_SIZE, check_size, write_summary};
use crate::domain::{DEFAULT_DOMAIN_1D, check_1d};
use crate::interp::{index_position, sample_linear};
use crate::sampling::AxisSamples;
use crate::{Lut3x1D, LutResult};
use std::fmt;

/// A 1-dimensional lookup table.
///
/// # Structure
///
/// - `size` entries, one channel
/// - implicit domain `[min, max]` or one explicit coordinate per entry
/// - linear interpolation between entries
///
/// # Example
///
/// ```rust
/// use lutio::Lut1D;
///
/// let lut = Lut1D::identity(16)?;
/// assert!((lut.apply(0.5) - 0.5).abs() < 1e-9);
/// # Ok::<(), lutio::LutError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut1D {
    /// Table entries.
    pub table: Vec<f64>,
    /// Display name.
    pub name: String,
    /// `[min, max]`, or one coordinate per entry.
    pub domain: Vec<f64>,
    /// Free-text comments, preserved verbatim by the codecs.
    pub comments: Vec<String>,
}

impl Lut1D {
    /// Creates an identity (pass-through) 1D LUT over `[0, 1]`.
    ///
    /// Fails with [`LutError::Validation`](crate::LutError::Validation)
    /// unless `2 <= size <= 65536`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutio::Lut1D;
    ///
    /// let lut = Lut1D::identity(1024).unwrap();
    /// assert_eq!(lut.size(), 1024);
    /// assert_eq!(lut.name, "Unity 1024");
    /// ```
    pub fn identity(size: usize) -> LutResult<Self> {
        check_size(size, MAX_SHAPER_SIZE, "LUT1D")?;
        Ok(Self::unity(size))
    }

    fn unity(size: usize) -> Self {
        Self {
            table: Self::linear_table(size, &DEFAULT_DOMAIN_1D).collect(),
            name: format!("Unity {}", size),
            domain: DEFAULT_DOMAIN_1D.to_vec(),
            comments: Vec::new(),
        }
    }

    /// Creates a LUT from raw entries with the default `[0, 1]` domain.
    pub fn from_table(table: Vec<f64>) -> LutResult<Self> {
        check_size(table.len(), MAX_SHAPER_SIZE, "LUT1D")?;
        Ok(Self {
            name: format!("Unity {}", table.len()),
            table,
            domain: DEFAULT_DOMAIN_1D.to_vec(),
            comments: Vec::new(),
        })
    }

    /// Sets the domain, validating its cardinality against the table.
    pub fn with_domain(mut self, domain: Vec<f64>) -> LutResult<Self> {
        check_1d(&domain, self.size())?;
        self.domain = domain;
        Ok(self)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the comments.
    pub fn with_comments<I, S>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.comments = comments.into_iter().map(Into::into).collect();
        self
    }

    /// Uniform samples of `domain`: `size` values spanning `[min, max]`,
    /// or the domain itself when it is explicit.
    pub fn linear_table(size: usize, domain: &[f64]) -> AxisSamples {
        if domain.len() == 2 {
            AxisSamples::uniform(domain[0], domain[1], size)
        } else {
            AxisSamples::explicit(domain.to_vec())
        }
    }

    /// Returns the number of entries in the LUT.
    #[inline]
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Returns true when the domain lists one coordinate per entry.
    #[inline]
    pub fn is_domain_explicit(&self) -> bool {
        self.domain.len() != 2
    }

    /// Applies the LUT to a single value using linear interpolation.
    ///
    /// Input outside the domain is clamped to the first/last entry.
    pub fn apply(&self, value: f64) -> f64 {
        let pos = index_position(value, &self.domain, self.size());
        sample_linear(&self.table, pos)
    }

    /// Applies the same curve to all three channels.
    pub fn apply_rgb(&self, rgb: [f64; 3]) -> [f64; 3] {
        rgb.map(|v| self.apply(v))
    }

    /// Broadcasts the single channel to a 3x1D LUT with identical channels.
    pub fn to_lut3x1d(&self) -> Lut3x1D {
        Lut3x1D {
            table: self.table.iter().map(|&v| [v, v, v]).collect(),
            name: self.name.clone(),
            domain: self.domain.iter().map(|&v| [v, v, v]).collect(),
            comments: self.comments.clone(),
        }
    }
}

impl Default for Lut1D {
    fn default() -> Self {
        Self::unity(10)
    }
}

impl fmt::Display for Lut1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &format!("LUT1D - {}", self.name),
            &[
                ("Dimensions", "1".to_string()),
                ("Domain", format!("{:?}", self.domain)),
                ("Size", format!("({},)", self.size())),
            ],
            &self.comments,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let lut = Lut1D::identity(256).unwrap();
        assert!((lut.apply(0.0) - 0.0).abs() < 1e-9);
        assert!((lut.apply(0.5) - 0.5).abs() < 1e-9);
        assert!((lut.apply(1.0) - 1.0).abs() < 1e-9);
        assert!(!lut.is_domain_explicit());
    }

    #[test]
    fn test_identity_rejects_bad_sizes() {
        for size in [0, 1, MAX_SHAPER_SIZE + 1] {
            assert!(matches!(
                Lut1D::identity(size),
                Err(crate::LutError::Validation(_))
            ));
        }
        assert_eq!(Lut1D::default().size(), 10);
    }

    #[test]
    fn test_gamma_over_custom_domain() {
        let domain = vec![-0.1, 1.5];
        let table: Vec<f64> = Lut1D::linear_table(64, &domain)
            .map(|v| v.max(0.0).powf(1.0 / 2.2))
            .collect();
        let lut = Lut1D::from_table(table).unwrap().with_domain(domain).unwrap();
        assert!((lut.apply(1.5) - 1.5f64.powf(1.0 / 2.2)).abs() < 1e-9);
        assert!((lut.apply(-0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_domain() {
        let lut = Lut1D::from_table(vec![0.0, 0.5, 1.0])
            .unwrap()
            .with_domain(vec![0.0, 0.1, 1.0])
            .unwrap();
        assert!(lut.is_domain_explicit());
        assert!((lut.apply(0.05) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_domain_cardinality_checked() {
        let lut = Lut1D::identity(5).unwrap();
        assert!(lut.with_domain(vec![0.0, 0.5, 1.0]).is_err());
    }

    #[test]
    fn test_promotion() {
        let lut = Lut1D::identity(4).unwrap().with_comments(["a"]);
        let promoted = lut.to_lut3x1d();
        assert_eq!(promoted.size(), 4);
        assert_eq!(promoted.domain, vec![[0.0; 3], [1.0; 3]]);
        assert_eq!(promoted.table[1], [lut.table[1]; 3]);
        assert_eq!(promoted.comments, vec!["a".to_string()]);
    }

    #[test]
    fn test_display() {
        let text = Lut1D::identity(16).unwrap().with_name("My LUT").to_string();
        assert!(text.starts_with("LUT1D - My LUT\n--------------"));
        assert!(text.contains("Size       : (16,)"));
    }
}
