//! Affine matrix operator.
//!
//! Applies `out = matrix * in + offset` on RGB(A) values. The `.spimtx`
//! format stores one of these as a 3x3 block with an RGB offset.

use crate::common::write_summary;
use std::fmt;

const IDENTITY_4X4: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A 4x4 matrix with a 4-component offset.
///
/// # Example
///
/// ```rust
/// use lutio::LutOperatorMatrix;
///
/// let mut op = LutOperatorMatrix::identity();
/// op.offset = [0.1, 0.2, 0.3, 0.0];
/// let rgb = op.apply([0.0, 0.0, 0.0]);
/// assert!((rgb[2] - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LutOperatorMatrix {
    /// Row-major 4x4 matrix.
    pub matrix: [[f64; 4]; 4],
    /// Offset added after the matrix product.
    pub offset: [f64; 4],
    /// Display name.
    pub name: String,
    /// Free-text comments.
    pub comments: Vec<String>,
}

impl LutOperatorMatrix {
    /// Identity matrix, zero offset.
    pub fn identity() -> Self {
        Self::new(IDENTITY_4X4, [0.0; 4])
    }

    /// Creates an operator from a matrix and offset.
    pub fn new(matrix: [[f64; 4]; 4], offset: [f64; 4]) -> Self {
        Self {
            matrix,
            offset,
            name: "LUT Operator Matrix".to_string(),
            comments: Vec::new(),
        }
    }

    /// Creates an operator from a 3x3 block and an RGB offset; the fourth
    /// row and column are identity.
    pub fn from_3x3(block: [[f64; 3]; 3], offset: [f64; 3]) -> Self {
        let mut matrix = IDENTITY_4X4;
        for (row, src) in matrix.iter_mut().zip(block) {
            row[..3].copy_from_slice(&src);
        }
        Self::new(matrix, [offset[0], offset[1], offset[2], 0.0])
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

    /// Applies the upper 3x3 block and the RGB offset.
    #[inline]
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            m[0][0] * rgb[0] + m[0][1] * rgb[1] + m[0][2] * rgb[2] + self.offset[0],
            m[1][0] * rgb[0] + m[1][1] * rgb[1] + m[1][2] * rgb[2] + self.offset[1],
            m[2][0] * rgb[0] + m[2][1] * rgb[1] + m[2][2] * rgb[2] + self.offset[2],
        ]
    }

    /// Applies the full 4x4 matrix and offset.
    pub fn apply_rgba(&self, rgba: [f64; 4]) -> [f64; 4] {
        let mut out = self.offset;
        for (value, row) in out.iter_mut().zip(&self.matrix) {
            *value += row.iter().zip(&rgba).map(|(m, v)| m * v).sum::<f64>();
        }
        out
    }
}

impl Default for LutOperatorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for LutOperatorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(
            f,
            &format!("LUTOperatorMatrix - {}", self.name),
            &[
                ("Matrix", format!("{:?}", self.matrix)),
                ("Offset", format!("{:?}", self.offset)),
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
        let op = LutOperatorMatrix::identity();
        assert_eq!(op.apply([0.5, 0.3, 0.2]), [0.5, 0.3, 0.2]);
        assert_eq!(op.apply_rgba([0.5, 0.3, 0.2, 1.0]), [0.5, 0.3, 0.2, 1.0]);
    }

    #[test]
    fn test_from_3x3() {
        let op = LutOperatorMatrix::from_3x3(
            [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]],
            [0.1, 0.1, 0.1],
        );
        assert_eq!(op.matrix[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(op.matrix[0][3], 0.0);
        assert_eq!(op.offset[3], 0.0);
        let rgb = op.apply([0.25, 0.25, 0.25]);
        assert!((rgb[0] - 0.6).abs() < 1e-12);
    }
}
