//! Iridas/Adobe .cube LUT format support.
//!
//! The strict Iridas dialect holds either a 3x1D table or a 3D cube, never
//! both, with a per-channel `DOMAIN_MIN`/`DOMAIN_MAX`. Files that mix a
//! shaper and a cube or use `LUT_*_INPUT_RANGE` belong to the Resolve
//! dialect ([`resolve_cube`](crate::resolve_cube)).
//!
//! # Format
//!
//! ```text
//! TITLE "LUT Name"
//! # Comment
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Cube rows are stored with the red index changing fastest.
//!
//! # Example
//!
//! ```rust,no_run
//! use lutio::cube;
//!
//! let lut = cube::read_iridas_cube("grade.cube")?;
//! let rgb = lut.apply([0.5, 0.3, 0.2]);
//! # Ok::<(), lutio::LutError>(())
//! ```

use crate::common::{
    MAX_CUBE_SIZE, MAX_SHAPER_SIZE, check_read_size, check_size, comment_text, cube_file_rows,
    cube_from_file_order, first_node, fmt_row, open, parse_f64, parse_usize, path_to_title,
    write_file,
};
use crate::domain::is_default_rows;
use crate::error::ensure;
use crate::{
    AnyLut, Lut3D, Lut3x1D, LutError, LutNode, LutReader, LutResult, LutWriter,
};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, trace};

const FORMAT: &str = "Iridas Cube";

/// Reads an Iridas .cube file.
///
/// Returns a [`Lut3x1D`] for `LUT_1D_SIZE` files and a [`Lut3D`] for
/// `LUT_3D_SIZE` files.
///
/// # Errors
///
/// [`LutError::ResolveDialect`] when the file uses Resolve-only
/// constructs, [`LutError::ParseError`] for malformed content.
pub fn read_iridas_cube<P: AsRef<Path>>(path: P) -> LutResult<AnyLut> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading Iridas cube");
    parse_iridas_cube(open(path)?, &path_to_title(path))
}

fn parse_triple(tokens: &[&str], directive: &str) -> LutResult<[f64; 3]> {
    match tokens {
        [r, g, b] => Ok([
            parse_f64(r, directive)?,
            parse_f64(g, directive)?,
            parse_f64(b, directive)?,
        ]),
        _ => Err(LutError::parse(format!(
            "{} expects 3 values, found {}",
            directive,
            tokens.len()
        ))),
    }
}

fn parse_size(tokens: &[&str], directive: &str, max: usize) -> LutResult<usize> {
    match tokens {
        [size] => check_read_size(parse_usize(size, directive)?, max, directive),
        _ => Err(LutError::parse(format!("{} expects a single size", directive))),
    }
}

/// Parses an Iridas .cube from a reader; `title` is used when the content
/// carries no `TITLE`.
pub fn parse_iridas_cube<R: BufRead>(reader: R, title: &str) -> LutResult<AnyLut> {
    let mut title = title.to_string();
    let mut comments = Vec::new();
    let mut domain_min = [0.0; 3];
    let mut domain_max = [1.0; 3];
    let mut size_1d: Option<usize> = None;
    let mut size_3d: Option<usize> = None;
    let mut rows: Vec<[f64; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = comment_text(line) {
            comments.push(comment.to_string());
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[0] {
            "TITLE" => {
                title = line["TITLE".len()..].trim().trim_matches('"').to_string();
            }
            "DOMAIN_MIN" => domain_min = parse_triple(&tokens[1..], "DOMAIN_MIN")?,
            "DOMAIN_MAX" => domain_max = parse_triple(&tokens[1..], "DOMAIN_MAX")?,
            "LUT_1D_SIZE" => {
                if size_3d.is_some() {
                    return Err(LutError::ResolveDialect(
                        "both LUT_1D_SIZE and LUT_3D_SIZE present".into(),
                    ));
                }
                size_1d = Some(parse_size(&tokens[1..], "LUT_1D_SIZE", MAX_SHAPER_SIZE)?);
            }
            "LUT_3D_SIZE" => {
                if size_1d.is_some() {
                    return Err(LutError::ResolveDialect(
                        "both LUT_1D_SIZE and LUT_3D_SIZE present".into(),
                    ));
                }
                size_3d = Some(parse_size(&tokens[1..], "LUT_3D_SIZE", MAX_CUBE_SIZE)?);
            }
            "LUT_1D_INPUT_RANGE" | "LUT_3D_INPUT_RANGE" => {
                return Err(LutError::ResolveDialect(format!("{} directive", tokens[0])));
            }
            _ => {
                if tokens.len() == 1 {
                    return Err(LutError::ResolveDialect(format!(
                        "single-value data row '{}'",
                        line
                    )));
                }
                rows.push(parse_triple(&tokens, "table")?);
            }
        }
    }

    trace!(?size_1d, ?size_3d, rows = rows.len(), "parsed Iridas cube");
    let domain = vec![domain_min, domain_max];

    match (size_1d, size_3d) {
        (Some(size), None) => {
            if rows.len() != size {
                return Err(LutError::parse(format!(
                    "expected {} entries, found {}",
                    size,
                    rows.len()
                )));
            }
            let lut = Lut3x1D::from_table(rows)?
                .with_domain(domain)?
                .with_name(title)
                .with_comments(comments);
            Ok(lut.into())
        }
        (None, Some(size)) => {
            let expected = size * size * size;
            if rows.len() != expected {
                return Err(LutError::parse(format!(
                    "expected {} entries, found {}",
                    expected,
                    rows.len()
                )));
            }
            let lut = Lut3D::from_table(cube_from_file_order(&rows, size), size)?
                .with_domain(domain)?
                .with_name(title)
                .with_comments(comments);
            Ok(lut.into())
        }
        _ => Err(LutError::parse("missing LUT_1D_SIZE or LUT_3D_SIZE")),
    }
}

enum Body<'a> {
    Shaper(Cow<'a, Lut3x1D>),
    Cube(&'a Lut3D),
}

fn node_body(node: &LutNode) -> LutResult<Body<'_>> {
    match node {
        LutNode::Lut1D(lut) => Ok(Body::Shaper(Cow::Owned(lut.to_lut3x1d()))),
        LutNode::Lut3x1D(lut) => Ok(Body::Shaper(Cow::Borrowed(lut))),
        LutNode::Lut3D(lut) => Ok(Body::Cube(lut)),
        LutNode::Matrix(_) => Err(LutError::validation(
            "Iridas Cube cannot store a LUTOperatorMatrix",
        )),
    }
}

fn prepare(lut: &AnyLut) -> LutResult<Body<'_>> {
    let body = match lut {
        AnyLut::Lut1D(lut) => Body::Shaper(Cow::Owned(lut.to_lut3x1d())),
        AnyLut::Lut3x1D(lut) => Body::Shaper(Cow::Borrowed(lut)),
        AnyLut::Lut3D(lut) => Body::Cube(lut),
        AnyLut::Sequence(seq) => node_body(first_node(seq, FORMAT)?)?,
        AnyLut::Matrix(_) => {
            return Err(LutError::validation(
                "Iridas Cube cannot store a LUTOperatorMatrix",
            ));
        }
    };
    match &body {
        Body::Shaper(lut) => {
            ensure(!lut.is_domain_explicit(), "\"LUT\" domain must be implicit")?;
            check_size(lut.size(), MAX_SHAPER_SIZE, "Shaper")?;
        }
        Body::Cube(lut) => {
            ensure(!lut.is_domain_explicit(), "\"LUT\" domain must be implicit")?;
            check_size(lut.size, MAX_CUBE_SIZE, "Cube")?;
            ensure(
                lut.table.len() == lut.entry_count(),
                "LUT3D table does not hold size^3 entries",
            )?;
        }
    }
    Ok(body)
}

/// Writes an Iridas .cube file.
///
/// Accepts a [`Lut1D`](crate::Lut1D) (promoted to 3x1D), a [`Lut3x1D`] or a
/// [`Lut3D`]; a sequence writes its first node. Domains must be implicit.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::{AnyLut, Lut3D, cube};
///
/// let lut = AnyLut::from(Lut3D::identity(33).unwrap());
/// cube::write_iridas_cube(&lut, "identity.cube", 7)?;
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn write_iridas_cube<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let body = prepare(lut)?;
    debug!(path = %path.display(), "writing Iridas cube");
    write_file(path, |writer| emit(writer, &body, decimals))
}

/// Writes an Iridas .cube to any writer.
pub fn write_iridas_cube_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let body = prepare(lut)?;
    emit(&mut writer, &body, decimals)
}

fn emit<W: Write>(writer: &mut W, body: &Body<'_>, decimals: usize) -> LutResult<()> {
    let (name, comments, domain) = match body {
        Body::Shaper(lut) => (&lut.name, &lut.comments, &lut.domain),
        Body::Cube(lut) => (&lut.name, &lut.comments, &lut.domain),
    };

    writeln!(writer, "TITLE \"{}\"", name)?;
    for comment in comments {
        writeln!(writer, "# {}", comment)?;
    }
    match body {
        Body::Shaper(lut) => writeln!(writer, "LUT_1D_SIZE {}", lut.size())?,
        Body::Cube(lut) => writeln!(writer, "LUT_3D_SIZE {}", lut.size)?,
    }
    if !is_default_rows(domain) {
        writeln!(writer, "DOMAIN_MIN {}", fmt_row(&domain[0], decimals))?;
        writeln!(writer, "DOMAIN_MAX {}", fmt_row(&domain[1], decimals))?;
    }

    match body {
        Body::Shaper(lut) => {
            for row in &lut.table {
                writeln!(writer, "{}", fmt_row(row, decimals))?;
            }
        }
        Body::Cube(lut) => {
            for row in cube_file_rows(lut) {
                writeln!(writer, "{}", fmt_row(&row, decimals))?;
            }
        }
    }
    Ok(())
}

/// Iridas .cube codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct IridasCube;

impl LutReader for IridasCube {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_iridas_cube(path)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_iridas_cube(data, title)
    }
}

impl LutWriter for IridasCube {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_iridas_cube(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_iridas_cube_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lut1D, LutSequence};

    const SHAPER: &str = "\
TITLE \"Demo\"
# Comments can go anywhere
LUT_1D_SIZE 3
DOMAIN_MIN 0 0 0
DOMAIN_MAX 3 3 3
0 0 0
0.5 0.5 0.5
1 1 1
";

    #[test]
    fn test_parse_shaper() {
        let lut = parse_iridas_cube(SHAPER.as_bytes(), "fallback").unwrap();
        let lut = lut.as_lut3x1d().unwrap();
        assert_eq!(lut.name, "Demo");
        assert_eq!(lut.size(), 3);
        assert_eq!(lut.domain, vec![[0.0; 3], [3.0; 3]]);
        assert_eq!(lut.comments, vec!["Comments can go anywhere".to_string()]);
        assert!((lut.apply([1.5, 1.5, 1.5])[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cube_reorders() {
        let data = "\
LUT_3D_SIZE 2
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
";
        let lut = parse_iridas_cube(data.as_bytes(), "Cube Name").unwrap();
        let lut = lut.as_lut3d().unwrap();
        assert_eq!(lut.name, "Cube Name");
        assert_eq!(lut.get(1, 0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(lut.get(0, 0, 1), [0.0, 0.0, 1.0]);
        assert_eq!(lut.table, Lut3D::identity(2).unwrap().table);
    }

    #[test]
    fn test_resolve_constructs_are_flagged() {
        let mixed = "LUT_1D_SIZE 2\nLUT_3D_SIZE 2\n";
        assert!(matches!(
            parse_iridas_cube(mixed.as_bytes(), ""),
            Err(LutError::ResolveDialect(_))
        ));
        let ranged = "LUT_3D_SIZE 2\nLUT_3D_INPUT_RANGE 0 2\n";
        assert!(matches!(
            parse_iridas_cube(ranged.as_bytes(), ""),
            Err(LutError::ResolveDialect(_))
        ));
    }

    #[test]
    fn test_row_count_mismatch() {
        let data = "LUT_1D_SIZE 4\n0 0 0\n1 1 1\n";
        assert!(matches!(
            parse_iridas_cube(data.as_bytes(), ""),
            Err(LutError::ParseError(_))
        ));
        assert!(matches!(
            parse_iridas_cube("0 0 0\n".as_bytes(), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_oversized_headers_rejected() {
        for header in [
            "LUT_3D_SIZE 3000000\n0 0 0\n",
            "LUT_3D_SIZE 18446744073709551615\n",
            "LUT_3D_SIZE 0\n",
            "LUT_1D_SIZE 70000\n",
        ] {
            assert!(
                matches!(
                    parse_iridas_cube(header.as_bytes(), ""),
                    Err(LutError::ParseError(_))
                ),
                "{header}"
            );
        }
    }

    #[test]
    fn test_write_layout() {
        let lut = AnyLut::from(
            Lut1D::identity(2)
                .unwrap()
                .with_name("Ramp")
                .with_comments(["first"]),
        );
        let mut buf = Vec::new();
        write_iridas_cube_to(&mut buf, &lut, 3).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "TITLE \"Ramp\"\n# first\nLUT_1D_SIZE 2\n0.000 0.000 0.000\n1.000 1.000 1.000\n"
        );
    }

    #[test]
    fn test_write_domain_and_roundtrip() {
        let domain = vec![[-0.1, -0.2, -0.4], [1.5, 3.0, 6.0]];
        let lut = Lut3D::from_fn(3, &domain, |[r, g, b]| [g, b, r])
            .unwrap()
            .with_name("Shuffle");
        let mut buf = Vec::new();
        write_iridas_cube_to(&mut buf, &AnyLut::from(lut.clone()), 10).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("DOMAIN_MIN -0.1000000000 -0.2000000000 -0.4000000000"));

        let back = parse_iridas_cube(buf.as_slice(), "").unwrap();
        let back = back.as_lut3d().unwrap();
        assert_eq!(back.domain, lut.domain);
        for (a, b) in back.table.iter().zip(&lut.table) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_sequence_writes_first_node() {
        let seq = LutSequence::new(vec![
            Lut3D::identity(2).unwrap().into(),
            Lut3x1D::identity(4).unwrap().into(),
        ]);
        let mut buf = Vec::new();
        write_iridas_cube_to(&mut buf, &AnyLut::from(seq), 7).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("LUT_3D_SIZE 2"));
    }

    #[test]
    fn test_explicit_domain_rejected() {
        let lut = Lut3x1D::identity(3)
            .unwrap()
            .with_domain(vec![[0.0; 3], [0.5; 3], [1.0; 3]])
            .unwrap();
        let mut buf = Vec::new();
        let err = write_iridas_cube_to(&mut buf, &lut.into(), 7).unwrap_err();
        assert!(matches!(err, LutError::Validation(_)));
        assert!(buf.is_empty());
    }
}
