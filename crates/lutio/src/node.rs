//! Tagged LUT values.
//!
//! [`LutNode`] is one element of a [`LutSequence`]; [`AnyLut`] is what a
//! reader returns and a writer accepts.

use crate::domain::{self, DEFAULT_DOMAIN};
use crate::{Lut1D, Lut3D, Lut3x1D, LutError, LutOperatorMatrix, LutResult, LutSequence};
use std::fmt;

/// Cube size used when a 1D table is promoted to a 3D LUT.
pub const DEFAULT_CUBE_SIZE: usize = 33;

/// Kind tag of a [`LutNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutKind {
    /// Single-channel table.
    Lut1D,
    /// Per-channel table.
    Lut3x1D,
    /// RGB cube.
    Lut3D,
    /// Affine matrix operator.
    Matrix,
}

impl LutKind {
    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lut1D => "LUT1D",
            Self::Lut3x1D => "LUT3x1D",
            Self::Lut3D => "LUT3D",
            Self::Matrix => "LUTOperatorMatrix",
        }
    }
}

impl fmt::Display for LutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One operation in a [`LutSequence`].
#[derive(Debug, Clone, PartialEq)]
pub enum LutNode {
    /// Single-channel table.
    Lut1D(Lut1D),
    /// Per-channel table.
    Lut3x1D(Lut3x1D),
    /// RGB cube.
    Lut3D(Lut3D),
    /// Affine matrix operator.
    Matrix(LutOperatorMatrix),
}

impl LutNode {
    /// Kind tag of this node.
    pub fn kind(&self) -> LutKind {
        match self {
            Self::Lut1D(_) => LutKind::Lut1D,
            Self::Lut3x1D(_) => LutKind::Lut3x1D,
            Self::Lut3D(_) => LutKind::Lut3D,
            Self::Matrix(_) => LutKind::Matrix,
        }
    }

    /// Display name of the wrapped value.
    pub fn name(&self) -> &str {
        match self {
            Self::Lut1D(lut) => &lut.name,
            Self::Lut3x1D(lut) => &lut.name,
            Self::Lut3D(lut) => &lut.name,
            Self::Matrix(op) => &op.name,
        }
    }

    /// Comments of the wrapped value.
    pub fn comments(&self) -> &[String] {
        match self {
            Self::Lut1D(lut) => &lut.comments,
            Self::Lut3x1D(lut) => &lut.comments,
            Self::Lut3D(lut) => &lut.comments,
            Self::Matrix(op) => &op.comments,
        }
    }

    /// Evaluates the node on an RGB value.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Lut1D(lut) => lut.apply_rgb(rgb),
            Self::Lut3x1D(lut) => lut.apply(rgb),
            Self::Lut3D(lut) => lut.apply(rgb),
            Self::Matrix(op) => op.apply(rgb),
        }
    }

    /// Converts to `target`, sampling a [`DEFAULT_CUBE_SIZE`] cube when
    /// promoting to 3D.
    pub fn as_lut(&self, target: LutKind) -> LutResult<LutNode> {
        self.as_lut_sized(target, DEFAULT_CUBE_SIZE)
    }

    /// Converts to `target`; `size` is the cube edge used for 1D to 3D
    /// promotion and is ignored otherwise.
    ///
    /// # Errors
    ///
    /// [`LutError::Validation`] for 3D to lower rank, any matrix
    /// conversion, and 3x1D to 1D when the channels differ.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lutio::{Lut1D, LutKind, LutNode};
    ///
    /// let node = LutNode::Lut1D(Lut1D::identity(16).unwrap());
    /// let cube = node.as_lut_sized(LutKind::Lut3D, 9).unwrap();
    /// assert_eq!(cube.kind(), LutKind::Lut3D);
    /// ```
    pub fn as_lut_sized(&self, target: LutKind, size: usize) -> LutResult<LutNode> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        match (self, target) {
            (Self::Lut1D(lut), LutKind::Lut3x1D) => Ok(Self::Lut3x1D(lut.to_lut3x1d())),
            (Self::Lut3x1D(lut), LutKind::Lut1D) => Ok(Self::Lut1D(lut.to_lut1d()?)),
            (Self::Lut1D(lut), LutKind::Lut3D) => sample_cube(&lut.to_lut3x1d(), size),
            (Self::Lut3x1D(lut), LutKind::Lut3D) => sample_cube(lut, size),
            _ => Err(LutError::validation(format!(
                "cannot convert {} to {}",
                self.kind(),
                target
            ))),
        }
    }
}

/// Samples a per-channel table into a cube over the same input range.
fn sample_cube(lut: &Lut3x1D, size: usize) -> LutResult<LutNode> {
    let range = if lut.is_domain_explicit() {
        let mut range = DEFAULT_DOMAIN;
        for c in 0..3 {
            let column = domain::column(&lut.domain, c);
            range[0][c] = column.iter().copied().fold(f64::INFINITY, f64::min);
            range[1][c] = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }
        range.to_vec()
    } else {
        lut.domain.clone()
    };
    let cube = Lut3D::from_fn(size, &range, |rgb| lut.apply(rgb))?
        .with_name(lut.name.clone())
        .with_comments(lut.comments.iter().cloned());
    Ok(LutNode::Lut3D(cube))
}

impl fmt::Display for LutNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lut1D(lut) => lut.fmt(f),
            Self::Lut3x1D(lut) => lut.fmt(f),
            Self::Lut3D(lut) => lut.fmt(f),
            Self::Matrix(op) => op.fmt(f),
        }
    }
}

impl From<Lut1D> for LutNode {
    fn from(lut: Lut1D) -> Self {
        Self::Lut1D(lut)
    }
}

impl From<Lut3x1D> for LutNode {
    fn from(lut: Lut3x1D) -> Self {
        Self::Lut3x1D(lut)
    }
}

impl From<Lut3D> for LutNode {
    fn from(lut: Lut3D) -> Self {
        Self::Lut3D(lut)
    }
}

impl From<LutOperatorMatrix> for LutNode {
    fn from(op: LutOperatorMatrix) -> Self {
        Self::Matrix(op)
    }
}

/// Any value a format can hold.
///
/// # Example
///
/// ```rust
/// use lutio::{AnyLut, Lut3D};
///
/// let lut: AnyLut = Lut3D::identity(17).unwrap().into();
/// assert!(lut.as_lut3d().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AnyLut {
    /// Single-channel table.
    Lut1D(Lut1D),
    /// Per-channel table.
    Lut3x1D(Lut3x1D),
    /// RGB cube.
    Lut3D(Lut3D),
    /// Ordered composite (shaper then cube).
    Sequence(LutSequence),
    /// Affine matrix operator.
    Matrix(LutOperatorMatrix),
}

impl AnyLut {
    /// Short type name, `LUTSequence` for composites.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Lut1D(_) => LutKind::Lut1D.name(),
            Self::Lut3x1D(_) => LutKind::Lut3x1D.name(),
            Self::Lut3D(_) => LutKind::Lut3D.name(),
            Self::Sequence(_) => "LUTSequence",
            Self::Matrix(_) => LutKind::Matrix.name(),
        }
    }

    /// Evaluates the value on an RGB triple.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Lut1D(lut) => lut.apply_rgb(rgb),
            Self::Lut3x1D(lut) => lut.apply(rgb),
            Self::Lut3D(lut) => lut.apply(rgb),
            Self::Sequence(seq) => seq.apply(rgb),
            Self::Matrix(op) => op.apply(rgb),
        }
    }

    /// Returns the 1D table, if that is what this is.
    pub fn as_lut1d(&self) -> Option<&Lut1D> {
        match self {
            Self::Lut1D(lut) => Some(lut),
            _ => None,
        }
    }

    /// Returns the 3x1D table, if that is what this is.
    pub fn as_lut3x1d(&self) -> Option<&Lut3x1D> {
        match self {
            Self::Lut3x1D(lut) => Some(lut),
            _ => None,
        }
    }

    /// Returns the cube, if that is what this is.
    pub fn as_lut3d(&self) -> Option<&Lut3D> {
        match self {
            Self::Lut3D(lut) => Some(lut),
            _ => None,
        }
    }

    /// Returns the sequence, if that is what this is.
    pub fn as_sequence(&self) -> Option<&LutSequence> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Returns the matrix operator, if that is what this is.
    pub fn as_matrix(&self) -> Option<&LutOperatorMatrix> {
        match self {
            Self::Matrix(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for AnyLut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lut1D(lut) => lut.fmt(f),
            Self::Lut3x1D(lut) => lut.fmt(f),
            Self::Lut3D(lut) => lut.fmt(f),
            Self::Sequence(seq) => seq.fmt(f),
            Self::Matrix(op) => op.fmt(f),
        }
    }
}

impl From<LutNode> for AnyLut {
    fn from(node: LutNode) -> Self {
        match node {
            LutNode::Lut1D(lut) => Self::Lut1D(lut),
            LutNode::Lut3x1D(lut) => Self::Lut3x1D(lut),
            LutNode::Lut3D(lut) => Self::Lut3D(lut),
            LutNode::Matrix(op) => Self::Matrix(op),
        }
    }
}

impl From<Lut1D> for AnyLut {
    fn from(lut: Lut1D) -> Self {
        Self::Lut1D(lut)
    }
}

impl From<Lut3x1D> for AnyLut {
    fn from(lut: Lut3x1D) -> Self {
        Self::Lut3x1D(lut)
    }
}

impl From<Lut3D> for AnyLut {
    fn from(lut: Lut3D) -> Self {
        Self::Lut3D(lut)
    }
}

impl From<LutSequence> for AnyLut {
    fn from(seq: LutSequence) -> Self {
        Self::Sequence(seq)
    }
}

impl From<LutOperatorMatrix> for AnyLut {
    fn from(op: LutOperatorMatrix) -> Self {
        Self::Matrix(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_kind_clones() {
        let node = LutNode::Lut3D(Lut3D::identity(3).unwrap());
        assert_eq!(node.as_lut(LutKind::Lut3D).unwrap(), node);
    }

    #[test]
    fn test_broadcast_and_collapse() {
        let node = LutNode::Lut1D(Lut1D::identity(8).unwrap());
        let wide = node.as_lut(LutKind::Lut3x1D).unwrap();
        assert_eq!(wide.kind(), LutKind::Lut3x1D);
        assert_eq!(wide.as_lut(LutKind::Lut1D).unwrap(), node);
    }

    #[test]
    fn test_promote_to_cube_keeps_curve() {
        let table = Lut1D::linear_table(32, &[0.0, 2.0]).map(|v| v * 0.5).collect();
        let lut = Lut1D::from_table(table)
            .unwrap()
            .with_domain(vec![0.0, 2.0])
            .unwrap()
            .with_name("Half");
        let cube = LutNode::Lut1D(lut).as_lut_sized(LutKind::Lut3D, 5).unwrap();
        let LutNode::Lut3D(cube) = cube else {
            panic!("expected a cube");
        };
        assert_eq!(cube.size, 5);
        assert_eq!(cube.name, "Half");
        assert_eq!(cube.domain, vec![[0.0; 3], [2.0; 3]]);
        let rgb = cube.apply([1.0, 2.0, 0.5]);
        assert!((rgb[0] - 0.5).abs() < 1e-9);
        assert!((rgb[1] - 1.0).abs() < 1e-9);
        assert!((rgb[2] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_rank_reduction_rejected() {
        let cube = LutNode::Lut3D(Lut3D::identity(3).unwrap());
        assert!(matches!(
            cube.as_lut(LutKind::Lut1D),
            Err(LutError::Validation(_))
        ));
        let op = LutNode::Matrix(LutOperatorMatrix::identity());
        assert!(op.as_lut(LutKind::Lut3D).is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(LutKind::Lut3x1D.to_string(), "LUT3x1D");
        assert_eq!(AnyLut::from(LutSequence::default()).type_name(), "LUTSequence");
    }
}
