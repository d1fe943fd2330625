//! Per-channel (3x1D) lookup table.
//!
//! Three independent 1D curves stored side by side, one per RGB channel.
//! This is the shape of most shaper LUTs.

use crate::common::{MAX_SHAPER_SIZE, check_size, write_summary};
use crate::domain::{self, DEFAULT_DOMAIN, check_rows};
use crate::interp::{index_position, sample_linear};
use crate::sampling::RowSamples;
use crate::{Lut1D, LutError, LutResult};
use std::fmt;

/// A 3x1D lookup table: `size` rows of independent R, G and B entries.
///
/// # Example
///
/// ```rust
/// use lutio::Lut3x1D;
///
/// let domain = vec![[-0.1, -0.2, -0.4], [1.5, 3.0, 6.0]];
/// let table = Lut3x1D::linear_table(16, &domain).collect();
/// let lut = Lut3x1D::from_table(table).unwrap().with_domain(domain).unwrap();
/// let rgb = lut.apply([0.5, 0.5, 0.5]);
/// assert!((rgb[1] - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3x1D {
    /// Table rows, one `[r, g, b]` triple per entry.
    pub table: Vec<[f64; 3]>,
    /// Display name.
    pub name: String,
    /// Two rows `[min, max]`, or one row per entry (NaN-padded when ragged).
    pub domain: Vec<[f64; 3]>,
    /// Free-text comments, preserved verbatim by the codecs.
    pub comments: Vec<String>,
}

impl Lut3x1D {
    /// Creates an identity LUT over the default domain.
    ///
    /// Fails with [`LutError::Validation`] unless `2 <= size <= 65536`.
    pub fn identity(size: usize) -> LutResult<Self> {
        check_size(size, MAX_SHAPER_SIZE, "LUT3x1D")?;
        Ok(Self::unity(size))
    }

    fn unity(size: usize) -> Self {
        Self {
            table: Self::linear_table(size, &DEFAULT_DOMAIN).collect(),
            name: format!("Unity {}", size),
            domain: domain::default_rows(),
            comments: Vec::new(),
        }
    }

    /// Creates a LUT from raw rows with the default domain.
    pub fn from_table(table: Vec<[f64; 3]>) -> LutResult<Self> {
        check_size(table.len(), MAX_SHAPER_SIZE, "LUT3x1D")?;
        Ok(Self {
            name: format!("Unity {}", table.len()),
            table,
            domain: domain::default_rows(),
            comments: Vec::new(),
        })
    }

    /// Sets the domain, validating its cardinality against the table.
    pub fn with_domain(mut self, domain: Vec<[f64; 3]>) -> LutResult<Self> {
        check_rows(&domain, self.size())?;
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

    /// Per-channel uniform samples of `domain`, one row per entry.
    pub fn linear_table(size: usize, domain: &[[f64; 3]]) -> RowSamples {
        RowSamples::new([0, 1, 2].map(|c| domain::axis(domain, c, size)))
    }

    /// Returns the number of rows.
    #[inline]
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Returns true when the domain lists one row per entry.
    #[inline]
    pub fn is_domain_explicit(&self) -> bool {
        self.domain.len() != 2
    }

    /// Applies each channel's curve to the matching input channel.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (c, value) in out.iter_mut().enumerate() {
            let axis = if self.is_domain_explicit() {
                domain::column(&self.domain, c)
            } else {
                vec![self.domain[0][c], self.domain[1][c]]
            };
            let entries: Vec<f64> = self.table.iter().map(|row| row[c]).collect();
            let count = if self.is_domain_explicit() {
                axis.len()
            } else {
                entries.len()
            };
            let pos = index_position(rgb[c], &axis, count);
            *value = sample_linear(&entries[..count.min(entries.len())], pos);
        }
        out
    }

    /// Collapses three identical channels into a single-channel LUT.
    ///
    /// # Errors
    ///
    /// [`LutError::Validation`] when the table or domain channels differ.
    pub fn to_lut1d(&self) -> LutResult<Lut1D> {
        let identical = |row: &[f64; 3]| row[0] == row[1] && row[1] == row[2];
        if !self.table.iter().all(identical) || !self.domain.iter().all(identical) {
            return Err(LutError::validation(
                "LUT3x1D channels are not identical, cannot convert to LUT1D",
            ));
        }
        Ok(Lut1D {
            table: self.table.iter().map(|row| row[0]).collect(),
            name: self.name.clone(),
            domain: self.domain.iter().map(|row| row[0]).collect(),
            comments: self.comments.clone(),
        })
    }
}

impl Default for Lut3x1D {
    fn default() -> Self {
        Self::unity(10)
    }
}

impl fmt::Display for Lut3x1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &format!("LUT3x1D - {}", self.name),
            &[
                ("Dimensions", "2".to_string()),
                ("Domain", format!("{:?}", self.domain)),
                ("Size", format!("({}, 3)", self.size())),
            ],
            &self.comments,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_per_channel_domain() {
        let domain = vec![[0.0, 0.0, 0.0], [1.0, 2.0, 4.0]];
        let lut = Lut3x1D::identity(11).unwrap().with_domain(domain).unwrap();
        // Table still spans [0, 1], so each channel rescales.
        let out = lut.apply([0.5, 1.0, 2.0]);
        assert!((out[0] - 0.5).abs() < 1e-9);
        assert!((out[1] - 0.5).abs() < 1e-9);
        assert!((out[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_collapse_identical() {
        let lut = Lut1D::identity(8).unwrap().with_name("Curve").to_lut3x1d();
        let back = lut.to_lut1d().unwrap();
        assert_eq!(back, Lut1D::identity(8).unwrap().with_name("Curve"));
    }

    #[test]
    fn test_collapse_rejects_distinct_channels() {
        let mut lut = Lut3x1D::identity(4).unwrap();
        lut.table[2][1] = 0.9;
        assert!(matches!(lut.to_lut1d(), Err(LutError::Validation(_))));
    }

    #[test]
    fn test_explicit_ragged_apply() {
        let lut = Lut3x1D {
            table: vec![[0.0, 0.0, 0.0], [0.5, 1.0, 0.5], [1.0, f64::NAN, 1.0]],
            name: "Ragged".into(),
            domain: vec![[0.0, 0.0, 0.0], [0.5, 1.0, 0.5], [1.0, f64::NAN, 1.0]],
            comments: Vec::new(),
        };
        assert!(lut.is_domain_explicit());
        let out = lut.apply([0.25, 0.5, 0.75]);
        assert!((out[0] - 0.25).abs() < 1e-9);
        assert!((out[1] - 0.5).abs() < 1e-9);
        assert!((out[2] - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_identity_rejects_bad_sizes() {
        for size in [0, 1, MAX_SHAPER_SIZE + 1] {
            assert!(matches!(Lut3x1D::identity(size), Err(LutError::Validation(_))));
        }
        let lut = Lut3x1D::identity(2).unwrap();
        assert_eq!(lut.table, vec![[0.0; 3], [1.0; 3]]);
        assert_eq!(Lut3x1D::default().size(), 10);
    }
}
