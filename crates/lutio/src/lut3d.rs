//! 3-dimensional lookup table.
//!
//! A 3D LUT maps RGB input to RGB output through a cube of color values.
//! Common uses include:
//! - Color grading / Look development
//! - Display calibration
//! - Color space conversion

use crate::common::{MAX_CUBE_SIZE, check_size, write_summary};
use crate::domain::{self, DEFAULT_DOMAIN, check_rows};
use crate::interp::index_position;
use crate::sampling::GridSamples;
use crate::{Interpolation, LutError, LutResult};
use std::fmt;

/// A 3-dimensional lookup table.
///
/// Stores a cube of RGB values indexed by input RGB. Standard sizes are
/// 17x17x17, 33x33x33, or 65x65x65.
///
/// # Structure
///
/// - `size^3` entries, each containing RGB output values
/// - Stored row-major over `(i, j, k)`: the third input channel varies
///   fastest, the first slowest, i.e. shape `(size, size, size, 3)`
/// - Trilinear or tetrahedral interpolation for lookup
///
/// File formats that store the first channel fastest (`.cube`, `.csp`)
/// reorder on read and write; the in-memory layout never changes.
///
/// # Example
///
/// ```rust
/// use lutio::Lut3D;
///
/// let lut = Lut3D::identity(33)?;
/// let output = lut.apply([0.5, 0.3, 0.2]);
/// assert!((output[1] - 0.3).abs() < 1e-9);
/// # Ok::<(), lutio::LutError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    /// Cube entries, `table[(i * size + j) * size + k]`.
    pub table: Vec<[f64; 3]>,
    /// Cube edge length.
    pub size: usize,
    /// Display name.
    pub name: String,
    /// Two rows `[min, max]`, or `size` rows of per-axis coordinates.
    pub domain: Vec<[f64; 3]>,
    /// Free-text comments, preserved verbatim by the codecs.
    pub comments: Vec<String>,
    /// Interpolation method used by [`Lut3D::apply`].
    pub interpolation: Interpolation,
}

impl Lut3D {
    /// Creates an identity (pass-through) 3D LUT over the default domain.
    ///
    /// # Errors
    ///
    /// [`LutError::Validation`] unless `2 <= size <= 256`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutio::Lut3D;
    ///
    /// let lut = Lut3D::identity(17).unwrap();
    /// assert_eq!(lut.table.len(), 17 * 17 * 17);
    /// assert!(Lut3D::identity(1).is_err());
    /// ```
    pub fn identity(size: usize) -> LutResult<Self> {
        check_size(size, MAX_CUBE_SIZE, "LUT3D")?;
        Ok(Self::unity(size))
    }

    fn unity(size: usize) -> Self {
        Self {
            table: Self::linear_table(size, &DEFAULT_DOMAIN).collect(),
            size,
            name: format!("Unity {}", size),
            domain: domain::default_rows(),
            comments: Vec::new(),
            interpolation: Interpolation::Linear,
        }
    }

    /// Creates a 3D LUT from raw data in row-major `(i, j, k)` order.
    pub fn from_table(table: Vec<[f64; 3]>, size: usize) -> LutResult<Self> {
        let expected = Self::expected_entries(size)?;
        if table.len() != expected {
            return Err(LutError::validation(format!(
                "expected {} entries for size {}, got {}",
                expected,
                size,
                table.len()
            )));
        }
        Ok(Self {
            table,
            size,
            name: format!("Unity {}", size),
            domain: domain::default_rows(),
            comments: Vec::new(),
            interpolation: Interpolation::Linear,
        })
    }

    /// Samples `f` over the grid spanned by `domain`.
    ///
    /// ```rust
    /// use lutio::{DEFAULT_DOMAIN, Lut3D};
    ///
    /// let lut = Lut3D::from_fn(9, &DEFAULT_DOMAIN, |[r, g, b]| [g, b, r]).unwrap();
    /// assert!((lut.apply([0.1, 0.2, 0.3])[0] - 0.2).abs() < 1e-9);
    /// ```
    pub fn from_fn<F>(size: usize, domain: &[[f64; 3]], f: F) -> LutResult<Self>
    where
        F: FnMut([f64; 3]) -> [f64; 3],
    {
        Self::expected_entries(size)?;
        check_rows(domain, size)?;
        let table = Self::linear_table(size, domain).map(f).collect();
        Ok(Self::from_table(table, size)?.with_domain_unchecked(domain.to_vec()))
    }

    /// `size^3`, or a validation error when `size < 2` or the count overflows.
    fn expected_entries(size: usize) -> LutResult<usize> {
        if size < 2 {
            return Err(LutError::validation(format!(
                "LUT3D size must be at least 2, got {}",
                size
            )));
        }
        size.checked_pow(3).ok_or_else(|| {
            LutError::validation(format!("LUT3D size {} overflows the entry count", size))
        })
    }

    /// Sets the input domain, validating its cardinality.
    pub fn with_domain(self, domain: Vec<[f64; 3]>) -> LutResult<Self> {
        check_rows(&domain, self.size)?;
        Ok(self.with_domain_unchecked(domain))
    }

    fn with_domain_unchecked(mut self, domain: Vec<[f64; 3]>) -> Self {
        self.domain = domain;
        self
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

    /// Sets the interpolation method.
    pub fn with_interpolation(mut self, interp: Interpolation) -> Self {
        self.interpolation = interp;
        self
    }

    /// The `size^3` grid of input coordinates spanned by `domain`, third
    /// channel fastest.
    pub fn linear_table(size: usize, domain: &[[f64; 3]]) -> GridSamples {
        GridSamples::new([0, 1, 2].map(|c| domain::axis(domain, c, size).collect()))
    }

    /// Returns true when the domain lists per-axis coordinates.
    #[inline]
    pub fn is_domain_explicit(&self) -> bool {
        self.domain.len() != 2
    }

    /// Returns the total number of entries in the LUT.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.size.saturating_pow(3)
    }

    /// Returns the flat index of grid position `(i, j, k)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.size + j) * self.size + k
    }

    /// Gets the value at grid position `(i, j, k)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        self.table[self.index(i, j, k)]
    }

    /// Applies the LUT to an RGB value.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        if self.size < 2 {
            // Degenerate cube built by hand: no cell to interpolate in.
            return self.table.first().copied().unwrap_or(rgb);
        }
        let pos = self.grid_position(rgb);
        match self.interpolation {
            Interpolation::Nearest => self.apply_nearest(pos),
            Interpolation::Linear => self.apply_trilinear(pos),
            Interpolation::Tetrahedral => self.apply_tetrahedral(pos),
        }
    }

    /// Continuous grid coordinates of `rgb`, clamped to the cube.
    fn grid_position(&self, rgb: [f64; 3]) -> [f64; 3] {
        let mut pos = [0.0; 3];
        for (c, p) in pos.iter_mut().enumerate() {
            *p = if self.is_domain_explicit() {
                index_position(rgb[c], &domain::column(&self.domain, c), self.size)
            } else {
                index_position(rgb[c], &[self.domain[0][c], self.domain[1][c]], self.size)
            };
        }
        pos
    }

    /// Lower cell corner and fractional offset along each axis.
    fn cell(&self, pos: [f64; 3]) -> ([usize; 3], [f64; 3]) {
        let corner = pos.map(|p| (p.floor() as usize).min(self.size - 2));
        let frac = [
            pos[0] - corner[0] as f64,
            pos[1] - corner[1] as f64,
            pos[2] - corner[2] as f64,
        ];
        (corner, frac)
    }

    fn apply_nearest(&self, pos: [f64; 3]) -> [f64; 3] {
        let [i, j, k] = pos.map(|p| (p.round() as usize).min(self.size - 1));
        self.get(i, j, k)
    }

    fn apply_trilinear(&self, pos: [f64; 3]) -> [f64; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(pos);

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        let mut result = [0.0; 3];
        for i in 0..3 {
            let c00 = c000[i] * (1.0 - rf) + c100[i] * rf;
            let c01 = c001[i] * (1.0 - rf) + c101[i] * rf;
            let c10 = c010[i] * (1.0 - rf) + c110[i] * rf;
            let c11 = c011[i] * (1.0 - rf) + c111[i] * rf;

            let c0 = c00 * (1.0 - gf) + c10 * gf;
            let c1 = c01 * (1.0 - gf) + c11 * gf;

            result[i] = c0 * (1.0 - bf) + c1 * bf;
        }
        result
    }

    fn apply_tetrahedral(&self, pos: [f64; 3]) -> [f64; 3] {
        let ([ri, gi, bi], [rf, gf, bf]) = self.cell(pos);

        let c000 = self.get(ri, gi, bi);
        let c100 = self.get(ri + 1, gi, bi);
        let c010 = self.get(ri, gi + 1, bi);
        let c110 = self.get(ri + 1, gi + 1, bi);
        let c001 = self.get(ri, gi, bi + 1);
        let c101 = self.get(ri + 1, gi, bi + 1);
        let c011 = self.get(ri, gi + 1, bi + 1);
        let c111 = self.get(ri + 1, gi + 1, bi + 1);

        let mut result = [0.0; 3];
        for i in 0..3 {
            result[i] = if rf > gf {
                if gf > bf {
                    c000[i] + rf * (c100[i] - c000[i]) + gf * (c110[i] - c100[i]) + bf * (c111[i] - c110[i])
                } else if rf > bf {
                    c000[i] + rf * (c100[i] - c000[i]) + bf * (c101[i] - c100[i]) + gf * (c111[i] - c101[i])
                } else {
                    c000[i] + bf * (c001[i] - c000[i]) + rf * (c101[i] - c001[i]) + gf * (c111[i] - c101[i])
                }
            } else if gf > bf {
                if rf > bf {
                    c000[i] + gf * (c010[i] - c000[i]) + rf * (c110[i] - c010[i]) + bf * (c111[i] - c110[i])
                } else {
                    c000[i] + gf * (c010[i] - c000[i]) + bf * (c011[i] - c010[i]) + rf * (c111[i] - c011[i])
                }
            } else {
                c000[i] + bf * (c001[i] - c000[i]) + gf * (c011[i] - c001[i]) + rf * (c111[i] - c011[i])
            };
        }
        result
    }
}

impl Default for Lut3D {
    fn default() -> Self {
        Self::unity(33)
    }
}

impl fmt::Display for Lut3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &format!("LUT3D - {}", self.name),
            &[
                ("Dimensions", "3".to_string()),
                ("Domain", format!("{:?}", self.domain)),
                ("Size", format!("({0}, {0}, {0}, 3)", self.size)),
            ],
            &self.comments,
        )
    }
}
