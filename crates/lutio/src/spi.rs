//! Sony Pictures Imageworks LUT formats (SPI1D, SPI3D).
//!
//! These formats are used by Sony Pictures Imageworks' OpenColorIO pipeline
//! and other VFX tools. They are simple, human-readable text formats.
//!
//! # SPI1D Format
//!
//! 1-dimensional lookup table with the following structure:
//!
//! ```text
//! Version 1
//! From 0.0 1.0
//! Length 1024
//! Components 3
//! {
//!     0.000000 0.000000 0.000000
//!     0.001000 0.001000 0.001000
//!     ...
//! }
//! ```
//!
//! # SPI3D Format
//!
//! 3-dimensional lookup table with the following structure:
//!
//! ```text
//! SPILUT 1.0
//! 3 3
//! 32 32 32
//! 0 0 0 0.000000 0.000000 0.000000
//! 0 0 1 0.000000 0.000000 0.033333
//! ...
//! ```
//!
//! SPI3D rows carry their own grid indices and may appear in any order.
//!
//! # References
//!
//! - [OpenColorIO SPI1D](https://opencolorio.readthedocs.io/en/latest/guides/authoring/luts.html)
//! - [OpenColorIO SPI3D](https://opencolorio.readthedocs.io/en/latest/guides/authoring/luts.html)

use crate::common::{
    MAX_CUBE_SIZE, MAX_SHAPER_SIZE, check_read_size, check_size, comment_text, first_node, fmt_row,
    fmt_value, open, parse_f64, parse_usize, path_to_title, write_file,
};
use crate::domain::{DEFAULT_DOMAIN, is_default_rows, unique_count};
use crate::error::ensure;
use crate::{
    AnyLut, Lut1D, Lut3D, Lut3x1D, LutError, LutNode, LutReader, LutResult, LutWriter,
};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Reads an SPI1D file from disk.
///
/// Returns a [`Lut1D`] for single-component files and a [`Lut3x1D`] for
/// three-component files.
///
/// # Errors
///
/// Returns error if file cannot be read or has invalid format.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::spi::read_spi1d;
///
/// let lut = read_spi1d("gamma.spi1d")?;
/// let output = lut.apply([0.5, 0.5, 0.5]);
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn read_spi1d<P: AsRef<Path>>(path: P) -> LutResult<AnyLut> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading SPI1D");
    parse_spi1d(open(path)?, &path_to_title(path))
}

/// Parses SPI1D from a reader.
///
/// # Arguments
///
/// * `reader` - Any type implementing `BufRead`
/// * `title` - Name given to the LUT
pub fn parse_spi1d<R: BufRead>(reader: R, title: &str) -> LutResult<AnyLut> {
    let mut from = [0.0, 1.0];
    let mut length: Option<usize> = None;
    let mut components = 1usize;
    let mut in_data = false;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut comments = Vec::new();

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

        // Data section
        if line == "{" {
            in_data = true;
            continue;
        }
        if line == "}" {
            in_data = false;
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if in_data {
            if parts.len() != components {
                return Err(LutError::parse(format!(
                    "expected {} values per row, found {}: '{}'",
                    components,
                    parts.len(),
                    line
                )));
            }
            let row = parts
                .iter()
                .map(|token| parse_f64(token, "table"))
                .collect::<LutResult<Vec<f64>>>()?;
            rows.push(row);
            continue;
        }

        // Header parsing
        match parts[0].to_lowercase().as_str() {
            "version" => {
                let version = parts.get(1).map_or(Ok(0), |v| parse_usize(v, "Version"))?;
                if version != 1 {
                    return Err(LutError::parse(format!(
                        "unsupported SPI1D version {}",
                        version
                    )));
                }
            }
            "from" => match &parts[1..] {
                [min, max] => from = [parse_f64(min, "From")?, parse_f64(max, "From")?],
                _ => return Err(LutError::parse("From expects 2 values")),
            },
            "length" => {
                let value = parts.get(1).ok_or_else(|| LutError::parse("Length expects a value"))?;
                length = Some(check_read_size(
                    parse_usize(value, "Length")?,
                    MAX_SHAPER_SIZE,
                    "Length",
                )?);
            }
            "components" => {
                let value = parts
                    .get(1)
                    .ok_or_else(|| LutError::parse("Components expects a value"))?;
                components = parse_usize(value, "Components")?;
                if components != 1 && components != 3 {
                    return Err(LutError::parse(format!(
                        "Components must be 1 or 3, got {}",
                        components
                    )));
                }
            }
            other => trace!(directive = other, "ignoring SPI1D header line"),
        }
    }

    let length = length.ok_or_else(|| LutError::parse("missing Length"))?;
    if rows.len() != length {
        return Err(LutError::parse(format!(
            "Length is {} but {} rows were found",
            length,
            rows.len()
        )));
    }

    if components == 1 {
        let table = rows.into_iter().map(|row| row[0]).collect();
        Ok(Lut1D::from_table(table)?
            .with_domain(from.to_vec())?
            .with_name(title)
            .with_comments(comments)
            .into())
    } else {
        let table = rows.into_iter().map(|row| [row[0], row[1], row[2]]).collect();
        Ok(Lut3x1D::from_table(table)?
            .with_domain(vec![[from[0]; 3], [from[1]; 3]])?
            .with_name(title)
            .with_comments(comments)
            .into())
    }
}

enum Spi1dBody<'a> {
    Mono(&'a Lut1D),
    Rgb(&'a Lut3x1D),
}

fn spi1d_node(node: &LutNode) -> LutResult<Spi1dBody<'_>> {
    match node {
        LutNode::Lut1D(lut) => Ok(Spi1dBody::Mono(lut)),
        LutNode::Lut3x1D(lut) => Ok(Spi1dBody::Rgb(lut)),
        other => Err(LutError::validation(format!(
            "SPI1D requires a LUT1D or LUT3x1D, got {}",
            other.kind()
        ))),
    }
}

fn prepare_spi1d(lut: &AnyLut) -> LutResult<Spi1dBody<'_>> {
    let body = match lut {
        AnyLut::Lut1D(lut) => Spi1dBody::Mono(lut),
        AnyLut::Lut3x1D(lut) => Spi1dBody::Rgb(lut),
        AnyLut::Sequence(seq) => spi1d_node(first_node(seq, "Sony SPI1D")?)?,
        other => {
            return Err(LutError::validation(format!(
                "SPI1D requires a LUT1D or LUT3x1D, got {}",
                other.type_name()
            )));
        }
    };
    let (explicit, unique, size) = match &body {
        Spi1dBody::Mono(lut) => (
            lut.is_domain_explicit(),
            unique_count(lut.domain.iter().copied()),
            lut.size(),
        ),
        Spi1dBody::Rgb(lut) => (
            lut.is_domain_explicit(),
            unique_count(lut.domain.iter().flatten().copied()),
            lut.size(),
        ),
    };
    ensure(!explicit, "\"LUT\" domain must be implicit")?;
    ensure(unique == 2, "\"LUT\" domain must be 1D")?;
    check_size(size, MAX_SHAPER_SIZE, "LUT")?;
    Ok(body)
}

/// Writes an SPI1D file to disk.
///
/// Accepts a [`Lut1D`] or [`Lut3x1D`]; a sequence writes its first node.
///
/// # Errors
///
/// [`LutError::Validation`] for 3D tables, matrices and explicit or
/// per-channel domains; no file is created in that case.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::{AnyLut, Lut1D, spi::write_spi1d};
///
/// let lut = AnyLut::from(Lut1D::identity(1024).unwrap());
/// write_spi1d(&lut, "identity.spi1d", 7)?;
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn write_spi1d<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let body = prepare_spi1d(lut)?;
    debug!(path = %path.display(), "writing SPI1D");
    write_file(path, |writer| emit_spi1d(writer, &body, decimals))
}

/// Writes SPI1D to any writer.
pub fn write_spi1d_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let body = prepare_spi1d(lut)?;
    emit_spi1d(&mut writer, &body, decimals)
}

fn emit_spi1d<W: Write>(writer: &mut W, body: &Spi1dBody<'_>, decimals: usize) -> LutResult<()> {
    let (from, length, components, comments) = match body {
        Spi1dBody::Mono(lut) => ([lut.domain[0], lut.domain[1]], lut.size(), 1, &lut.comments),
        Spi1dBody::Rgb(lut) => ([lut.domain[0][0], lut.domain[1][0]], lut.size(), 3, &lut.comments),
    };

    // Header
    writeln!(writer, "Version 1")?;
    writeln!(
        writer,
        "From {} {}",
        fmt_value(from[0], decimals),
        fmt_value(from[1], decimals)
    )?;
    writeln!(writer, "Length {}", length)?;
    writeln!(writer, "Components {}", components)?;
    writeln!(writer, "{{")?;

    // Data
    match body {
        Spi1dBody::Mono(lut) => {
            for v in &lut.table {
                writeln!(writer, "    {}", fmt_value(*v, decimals))?;
            }
        }
        Spi1dBody::Rgb(lut) => {
            for row in &lut.table {
                writeln!(writer, "    {}", fmt_row(row, decimals))?;
            }
        }
    }

    writeln!(writer, "}}")?;
    for comment in comments {
        writeln!(writer, "# {}", comment)?;
    }
    Ok(())
}

/// Reads an SPI3D file from disk.
///
/// # Errors
///
/// [`LutError::Validation`] for non-uniform cubes and rows whose indices
/// do not cover the grid exactly once.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::spi::read_spi3d;
///
/// let lut = read_spi3d("grade.spi3d")?;
/// let output = lut.apply([0.5, 0.3, 0.2]);
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn read_spi3d<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading SPI3D");
    parse_spi3d(open(path)?, &path_to_title(path))
}

/// Grid indices in canonical order, third index fastest.
fn canonical_indices(size: usize) -> impl Iterator<Item = [usize; 3]> {
    let scale = size.saturating_sub(1) as f64;
    Lut3D::linear_table(size, &DEFAULT_DOMAIN).map(move |p| p.map(|v| (v * scale).round() as usize))
}

/// Parses SPI3D from a reader.
pub fn parse_spi3d<R: BufRead>(reader: R, title: &str) -> LutResult<Lut3D> {
    let mut size: Option<usize> = None;
    let mut entries: Vec<([usize; 3], [f64; 3])> = Vec::new();
    let mut comments = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if let Some(comment) = comment_text(line) {
            comments.push(comment.to_string());
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [a, b, c] => {
                if a != b || b != c {
                    return Err(LutError::validation(format!(
                        "non-uniform LUT shape is unsupported (line {}: '{}')",
                        number + 1,
                        line
                    )));
                }
                size = Some(check_read_size(parse_usize(a, "size")?, MAX_CUBE_SIZE, "SPI3D")?);
            }
            [i, j, k, r, g, b] => {
                let index = [
                    parse_usize(i, "index")?,
                    parse_usize(j, "index")?,
                    parse_usize(k, "index")?,
                ];
                let value = [
                    parse_f64(r, "table")?,
                    parse_f64(g, "table")?,
                    parse_f64(b, "table")?,
                ];
                entries.push((index, value));
            }
            // "SPILUT 1.0" and "3 3"
            _ => trace!(line, "ignoring SPI3D header line"),
        }
    }

    let size = size.ok_or_else(|| LutError::parse("missing SPI3D size line"))?;
    entries.sort_by_key(|(index, _)| *index);
    let matches = entries.len() == size * size * size
        && entries
            .iter()
            .map(|(index, _)| *index)
            .eq(canonical_indices(size));
    if !matches {
        return Err(LutError::validation(
            "indexes do not match expected LUT3D indexes",
        ));
    }

    let table = entries.into_iter().map(|(_, value)| value).collect();
    Ok(Lut3D::from_table(table, size)?
        .with_name(title)
        .with_comments(comments))
}

fn prepare_spi3d(lut: &AnyLut) -> LutResult<&Lut3D> {
    let cube = match lut {
        AnyLut::Lut3D(lut) => lut,
        AnyLut::Sequence(seq) => match first_node(seq, "Sony SPI3D")? {
            LutNode::Lut3D(lut) => lut,
            other => {
                return Err(LutError::validation(format!(
                    "SPI3D requires a LUT3D, got {}",
                    other.kind()
                )));
            }
        },
        other => {
            return Err(LutError::validation(format!(
                "SPI3D requires a LUT3D, got {}",
                other.type_name()
            )));
        }
    };
    ensure(!cube.is_domain_explicit(), "\"LUT\" domain must be implicit")?;
    ensure(
        is_default_rows(&cube.domain),
        "\"LUT\" domain must be [[0, 0, 0], [1, 1, 1]]",
    )?;
    check_size(cube.size, MAX_CUBE_SIZE, "Cube")?;
    ensure(
        cube.table.len() == cube.entry_count(),
        "LUT3D table does not hold size^3 entries",
    )?;
    Ok(cube)
}

/// Writes an SPI3D file to disk.
///
/// Accepts a [`Lut3D`] over the default domain; a sequence writes its
/// first node.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::{AnyLut, Lut3D, spi::write_spi3d};
///
/// let lut = AnyLut::from(Lut3D::identity(33).unwrap());
/// write_spi3d(&lut, "identity.spi3d", 7)?;
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn write_spi3d<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let cube = prepare_spi3d(lut)?;
    debug!(path = %path.display(), size = cube.size, "writing SPI3D");
    write_file(path, |writer| emit_spi3d(writer, cube, decimals))
}

/// Writes SPI3D to any writer.
pub fn write_spi3d_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let cube = prepare_spi3d(lut)?;
    emit_spi3d(&mut writer, cube, decimals)
}

fn emit_spi3d<W: Write>(writer: &mut W, lut: &Lut3D, decimals: usize) -> LutResult<()> {
    let size = lut.size;

    // Header
    writeln!(writer, "SPILUT 1.0")?;
    writeln!(writer, "3 3")?;
    writeln!(writer, "{} {} {}", size, size, size)?;

    // Table order already matches the canonical index order.
    for ([i, j, k], rgb) in canonical_indices(size).zip(&lut.table) {
        writeln!(writer, "{} {} {} {}", i, j, k, fmt_row(rgb, decimals))?;
    }

    for comment in &lut.comments {
        writeln!(writer, "# {}", comment)?;
    }
    Ok(())
}

/// Sony SPI1D codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spi1d;

impl LutReader for Spi1d {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_spi1d(path)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_spi1d(data, title)
    }
}

impl LutWriter for Spi1d {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_spi1d(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_spi1d_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}

/// Sony SPI3D codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spi3d;

impl LutReader for Spi3d {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_spi3d(path).map(AnyLut::from)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_spi3d(data, title).map(AnyLut::from)
    }
}

impl LutWriter for Spi3d {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_spi3d(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_spi3d_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LutOperatorMatrix, LutSequence};
    use std::io::Cursor;

    #[test]
    fn test_parse_spi1d_mono() {
        let data = r#"
Version 1
From 0.0 1.0
Length 4
Components 1
{
  0.0
  0.333333
  0.666666
  1.0
}
"#;
        let lut = parse_spi1d(Cursor::new(data), "Mono").unwrap();
        let lut = lut.as_lut1d().unwrap();
        assert_eq!(lut.size(), 4);
        assert_eq!(lut.name, "Mono");
        assert!((lut.apply(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_parse_spi1d_rgb() {
        let data = r#"
Version 1
From -0.125 1.125
Length 3
Components 3
{
  0.0 0.0 0.0
  0.5 0.5 0.5
  1.0 1.0 1.0
}
# trailing note
"#;
        let lut = parse_spi1d(Cursor::new(data), "").unwrap();
        let lut = lut.as_lut3x1d().unwrap();
        assert_eq!(lut.size(), 3);
        assert_eq!(lut.domain, vec![[-0.125; 3], [1.125; 3]]);
        assert_eq!(lut.comments, vec!["trailing note".to_string()]);
    }

    #[test]
    fn test_spi1d_header_errors() {
        let version = "Version 2\nLength 2\n{\n0\n1\n}\n";
        assert!(matches!(
            parse_spi1d(Cursor::new(version), ""),
            Err(LutError::ParseError(_))
        ));
        let components = "Version 1\nLength 2\nComponents 2\n{\n0 0\n1 1\n}\n";
        assert!(matches!(
            parse_spi1d(Cursor::new(components), ""),
            Err(LutError::ParseError(_))
        ));
        let length = "Version 1\nLength 3\nComponents 1\n{\n0\n1\n}\n";
        assert!(matches!(
            parse_spi1d(Cursor::new(length), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_spi1d_roundtrip() {
        let table = Lut1D::linear_table(64, &[0.0, 1.0]).map(|v| v.powf(1.0 / 2.2)).collect();
        let lut = Lut1D::from_table(table)
            .unwrap()
            .with_name("Gamma")
            .with_comments(["A first comment.", "A second comment."]);

        let mut buf = Vec::new();
        write_spi1d_to(&mut buf, &lut.clone().into(), 7).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Version 1\nFrom 0.0000000 1.0000000\nLength 64\nComponents 1\n{\n    0.0000000\n"));
        assert!(text.ends_with("}\n# A first comment.\n# A second comment.\n"));

        let parsed = parse_spi1d(Cursor::new(buf), "Gamma").unwrap();
        let parsed = parsed.as_lut1d().unwrap();
        assert_eq!(parsed.size(), 64);
        assert_eq!(parsed.comments, lut.comments);
        assert!((parsed.apply(0.5) - lut.apply(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_spi1d_rejects_cube_and_matrix() {
        let mut buf = Vec::new();
        assert!(matches!(
            write_spi1d_to(&mut buf, &Lut3D::identity(2).unwrap().into(), 7),
            Err(LutError::Validation(_))
        ));
        assert!(write_spi1d_to(&mut buf, &LutOperatorMatrix::identity().into(), 7).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_spi3d_any_order() {
        let data = r#"
SPILUT 1.0
3 3
2 2 2
1 1 1 1.0 1.0 1.0
0 0 0 0.0 0.0 0.0
1 0 0 1.0 0.0 0.0
0 1 0 0.0 1.0 0.0
1 1 0 1.0 1.0 0.0
0 0 1 0.0 0.0 1.0
1 0 1 1.0 0.0 1.0
0 1 1 0.0 1.0 1.0
"#;
        let lut = parse_spi3d(Cursor::new(data), "Unordered").unwrap();
        assert_eq!(lut.size, 2);
        assert_eq!(lut.table, Lut3D::identity(2).unwrap().table);

        let white = lut.apply([1.0, 1.0, 1.0]);
        assert!((white[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_spi3d_rejects_bad_grids() {
        let shape = "SPILUT 1.0\n3 3\n2 2 3\n";
        assert!(matches!(
            parse_spi3d(Cursor::new(shape), ""),
            Err(LutError::Validation(_))
        ));
        let duplicated = "2 2 2\n0 0 0 0 0 0\n0 0 0 0 0 0\n";
        assert!(matches!(
            parse_spi3d(Cursor::new(duplicated), ""),
            Err(LutError::Validation(_))
        ));
        assert!(matches!(
            parse_spi3d(Cursor::new("SPILUT 1.0\n"), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_oversized_headers_rejected() {
        for header in [
            "SPILUT 1.0\n3 3\n3000000 3000000 3000000\n0 0 0 0 0 0\n",
            "SPILUT 1.0\n3 3\n18446744073709551615 18446744073709551615 18446744073709551615\n",
            "SPILUT 1.0\n3 3\n257 257 257\n",
        ] {
            assert!(
                matches!(parse_spi3d(Cursor::new(header), ""), Err(LutError::ParseError(_))),
                "{header}"
            );
        }
        let length = "Version 1\nLength 4294967296\nComponents 1\n{\n0\n1\n}\n";
        assert!(matches!(
            parse_spi1d(Cursor::new(length), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_spi3d_roundtrip() {
        let lut = Lut3D::from_fn(8, &DEFAULT_DOMAIN, |[r, g, b]| [r * r, g, b.sqrt()])
            .unwrap()
            .with_name("Grade")
            .with_comments(["A first comment."]);

        let mut buf = Vec::new();
        write_spi3d_to(&mut buf, &lut.clone().into(), 10).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("SPILUT 1.0\n3 3\n8 8 8\n0 0 0 "));
        assert!(text.lines().nth(4).unwrap().starts_with("0 0 1 "));

        let parsed = parse_spi3d(Cursor::new(buf), "Grade").unwrap();
        assert_eq!(parsed.size, 8);
        assert_eq!(parsed.comments, lut.comments);
        for (a, b) in parsed.table.iter().zip(&lut.table) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_spi3d_write_constraints() {
        let mut buf = Vec::new();
        let scaled = Lut3D::identity(2)
            .unwrap()
            .with_domain(vec![[0.0; 3], [2.0; 3]])
            .unwrap();
        assert!(matches!(
            write_spi3d_to(&mut buf, &scaled.into(), 7),
            Err(LutError::Validation(_))
        ));
        assert!(write_spi3d_to(&mut buf, &Lut1D::identity(2).unwrap().into(), 7).is_err());

        let seq = LutSequence::new(vec![
            Lut3D::identity(2).unwrap().into(),
            Lut1D::identity(2).unwrap().into(),
        ]);
        write_spi3d_to(&mut buf, &seq.into(), 7).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("SPILUT 1.0\n"));
    }
}
