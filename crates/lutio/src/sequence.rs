//! Ordered LUT composites.

use crate::{Lut3D, Lut3x1D, LutError, LutKind, LutNode, LutResult};
use std::borrow::Cow;
use std::fmt;
use std::ops::Index;

/// An ordered list of [`LutNode`]s applied one after the other.
///
/// Resolve and Cinespace files describe a shaper followed by a cube this way.
///
/// # Example
///
/// ```rust
/// use lutio::{Lut3D, Lut3x1D, LutSequence};
///
/// let mut seq = LutSequence::default();
/// seq.push(Lut3x1D::identity(10).unwrap());
/// seq.push(Lut3D::identity(3).unwrap());
/// assert_eq!(seq.overview(), "LUT3x1D --> LUT3D");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LutSequence {
    nodes: Vec<LutNode>,
}

impl LutSequence {
    /// Creates a sequence from its nodes.
    pub fn new(nodes: Vec<LutNode>) -> Self {
        Self { nodes }
    }

    /// Appends a node.
    pub fn push(&mut self, node: impl Into<LutNode>) {
        self.nodes.push(node.into());
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the sequence holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    pub fn get(&self, index: usize) -> Option<&LutNode> {
        self.nodes.get(index)
    }

    /// Iterates the nodes in order.
    pub fn iter(&self) -> std::slice::Iter<'_, LutNode> {
        self.nodes.iter()
    }

    /// Node kinds joined by `" --> "`.
    pub fn overview(&self) -> String {
        self.nodes
            .iter()
            .map(|node| node.kind().name())
            .collect::<Vec<_>>()
            .join(" --> ")
    }

    /// Splits a two-node shaper + cube composite into owned values.
    ///
    /// A 1D shaper is promoted to 3x1D.
    ///
    /// # Errors
    ///
    /// [`LutError::Validation`] unless the sequence is exactly
    /// `1D | 3x1D` followed by `3D`.
    pub fn shaper_and_cube(&self) -> LutResult<(Lut3x1D, Lut3D)> {
        let (shaper, cube) = self.as_shaper_and_cube()?;
        Ok((shaper.into_owned(), cube.clone()))
    }

    /// Borrowing form of [`LutSequence::shaper_and_cube`]; only a 1D
    /// shaper is copied.
    pub fn as_shaper_and_cube(&self) -> LutResult<(Cow<'_, Lut3x1D>, &Lut3D)> {
        match self.nodes.as_slice() {
            [LutNode::Lut1D(shaper), LutNode::Lut3D(cube)] => {
                Ok((Cow::Owned(shaper.to_lut3x1d()), cube))
            }
            [LutNode::Lut3x1D(shaper), LutNode::Lut3D(cube)] => Ok((Cow::Borrowed(shaper), cube)),
            _ => Err(LutError::validation(format!(
                "LUTSequence must be 1D + 3D or 3x1D + 3D, got '{}'",
                self.overview()
            ))),
        }
    }

    /// Returns true for a two-node shaper + cube composite.
    pub fn is_shaper_and_cube(&self) -> bool {
        matches!(
            self.nodes.as_slice(),
            [a, b] if matches!(a.kind(), LutKind::Lut1D | LutKind::Lut3x1D)
                && b.kind() == LutKind::Lut3D
        )
    }

    /// Applies every node in order.
    pub fn apply(&self, rgb: [f64; 3]) -> [f64; 3] {
        self.nodes.iter().fold(rgb, |acc, node| node.apply(acc))
    }
}

impl Index<usize> for LutSequence {
    type Output = LutNode;

    fn index(&self, index: usize) -> &LutNode {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a LutSequence {
    type Item = &'a LutNode;
    type IntoIter = std::slice::Iter<'a, LutNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<LutNode> for LutSequence {
    fn from_iter<I: IntoIterator<Item = LutNode>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("    {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for LutSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operations = self
            .nodes
            .iter()
            .map(|node| indent(&node.to_string()))
            .collect::<Vec<_>>()
            .join("\n\n");
        write!(
            f,
            "LUT Sequence\n------------\n\nOverview\n\n    {}\n\nOperations\n\n{}",
            self.overview(),
            operations
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lut1D, LutOperatorMatrix};

    fn shaper_cube() -> LutSequence {
        LutSequence::new(vec![
            Lut1D::identity(16).unwrap().into(),
            Lut3D::identity(3).unwrap().into(),
        ])
    }

    #[test]
    fn test_shaper_is_promoted() {
        let seq = shaper_cube();
        let (shaper, cube) = seq.shaper_and_cube().unwrap();
        assert_eq!(shaper.size(), 16);
        assert_eq!(cube.size, 3);
        // The sequence itself is untouched.
        assert_eq!(seq[0].kind(), LutKind::Lut1D);
    }

    #[test]
    fn test_arity_checked() {
        let mut seq = shaper_cube();
        seq.push(LutOperatorMatrix::identity());
        assert!(!seq.is_shaper_and_cube());
        assert!(matches!(seq.shaper_and_cube(), Err(LutError::Validation(_))));
        assert_eq!(seq.overview(), "LUT1D --> LUT3D --> LUTOperatorMatrix");
    }

    #[test]
    fn test_apply_folds() {
        let mut seq = LutSequence::default();
        let mut op = LutOperatorMatrix::identity();
        op.offset = [0.25, 0.0, 0.0, 0.0];
        seq.push(op.clone());
        seq.push(op);
        let rgb = seq.apply([0.0, 0.0, 0.0]);
        assert!((rgb[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_display_layout() {
        let text = shaper_cube().to_string();
        assert!(text.starts_with("LUT Sequence\n------------\n\nOverview\n\n    LUT1D --> LUT3D"));
        assert!(text.contains("\n    LUT3D - Unity 3\n"));
    }
}
