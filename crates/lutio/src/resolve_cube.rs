//! DaVinci Resolve .cube LUT format support.
//!
//! Resolve extends the .cube grammar: one file may hold a 3x1D shaper
//! followed by a 3D cube, each with its own `LUT_*_INPUT_RANGE`, and data
//! rows may carry a single value for all three channels.
//!
//! # Format
//!
//! ```text
//! TITLE "LUT3D with My Shaper"
//! # A comment
//! LUT_1D_SIZE 10
//! LUT_1D_INPUT_RANGE -0.1 3.0
//! LUT_3D_SIZE 3
//! LUT_3D_INPUT_RANGE -0.1 3.0
//! <10 shaper rows>
//!
//! <27 cube rows, red fastest>
//! ```

use crate::common::{
    MAX_CUBE_SIZE, MAX_SHAPER_SIZE, check_read_size, check_size, comment_text, cube_file_rows,
    cube_from_file_order, fmt_row, fmt_value, open, parse_f64, parse_row, parse_usize,
    path_to_title, write_file,
};
use crate::domain::{self, is_default_rows, unique_count};
use crate::error::ensure;
use crate::{
    AnyLut, Lut3D, Lut3x1D, LutError, LutReader, LutResult, LutSequence, LutWriter,
};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{debug, trace};

/// Reads a Resolve .cube file.
///
/// Returns a [`Lut3x1D`], a [`Lut3D`], or a two-node [`LutSequence`] when
/// the file holds both a shaper and a cube.
pub fn read_resolve_cube<P: AsRef<Path>>(path: P) -> LutResult<AnyLut> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading Resolve cube");
    parse_resolve_cube(open(path)?, &path_to_title(path))
}

fn parse_range(tokens: &[&str], directive: &str) -> LutResult<Vec<[f64; 3]>> {
    match tokens {
        [min, max] => {
            let min = parse_f64(min, directive)?;
            let max = parse_f64(max, directive)?;
            Ok(vec![[min; 3], [max; 3]])
        }
        _ => Err(LutError::parse(format!(
            "{} expects 2 values, found {}",
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

/// Parses a Resolve .cube from a reader; `title` is used when the content
/// carries no `TITLE`.
pub fn parse_resolve_cube<R: BufRead>(reader: R, title: &str) -> LutResult<AnyLut> {
    let mut title = title.to_string();
    let mut comments = Vec::new();
    let mut domain_1d = domain::default_rows();
    let mut domain_3d = domain::default_rows();
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
            "LUT_1D_INPUT_RANGE" => domain_1d = parse_range(&tokens[1..], tokens[0])?,
            "LUT_3D_INPUT_RANGE" => domain_3d = parse_range(&tokens[1..], tokens[0])?,
            "LUT_1D_SIZE" => {
                size_1d = Some(parse_size(&tokens[1..], tokens[0], MAX_SHAPER_SIZE)?)
            }
            "LUT_3D_SIZE" => {
                size_3d = Some(parse_size(&tokens[1..], tokens[0], MAX_CUBE_SIZE)?)
            }
            _ => rows.push(parse_row(&tokens)?),
        }
    }

    trace!(?size_1d, ?size_3d, rows = rows.len(), "parsed Resolve cube");
    let expected = size_1d.unwrap_or(0) + size_3d.map_or(0, |s| s * s * s);
    if (size_1d.is_some() || size_3d.is_some()) && rows.len() != expected {
        return Err(LutError::parse(format!(
            "expected {} entries, found {}",
            expected,
            rows.len()
        )));
    }

    match (size_1d, size_3d) {
        (Some(shaper_size), Some(cube_size)) => {
            let cube_rows = rows.split_off(shaper_size);
            let shaper = Lut3x1D::from_table(rows)?
                .with_domain(domain_1d)?
                .with_name(format!("{} - Shaper", title));
            let cube = Lut3D::from_table(cube_from_file_order(&cube_rows, cube_size), cube_size)?
                .with_domain(domain_3d)?
                .with_name(format!("{} - Cube", title))
                .with_comments(comments);
            Ok(LutSequence::new(vec![shaper.into(), cube.into()]).into())
        }
        (Some(_), None) => Ok(Lut3x1D::from_table(rows)?
            .with_domain(domain_1d)?
            .with_name(title)
            .with_comments(comments)
            .into()),
        (None, Some(size)) => Ok(Lut3D::from_table(cube_from_file_order(&rows, size), size)?
            .with_domain(domain_3d)?
            .with_name(title)
            .with_comments(comments)
            .into()),
        (None, None) => Err(LutError::parse("missing LUT_1D_SIZE or LUT_3D_SIZE")),
    }
}

struct Plan<'a> {
    name: Cow<'a, str>,
    shaper: Option<Cow<'a, Lut3x1D>>,
    cube: Option<&'a Lut3D>,
}

fn prepare(lut: &AnyLut) -> LutResult<Plan<'_>> {
    let plan = match lut {
        AnyLut::Sequence(seq) => {
            let (shaper, cube) = seq.as_shaper_and_cube()?;
            Plan {
                name: Cow::Owned(format!("{} - {}", shaper.name, cube.name)),
                shaper: Some(shaper),
                cube: Some(cube),
            }
        }
        AnyLut::Lut1D(lut) => Plan {
            name: Cow::Borrowed(&lut.name),
            shaper: Some(Cow::Owned(lut.to_lut3x1d())),
            cube: None,
        },
        AnyLut::Lut3x1D(lut) => Plan {
            name: Cow::Borrowed(&lut.name),
            shaper: Some(Cow::Borrowed(lut)),
            cube: None,
        },
        AnyLut::Lut3D(lut) => Plan {
            name: Cow::Borrowed(&lut.name),
            shaper: None,
            cube: Some(lut),
        },
        AnyLut::Matrix(_) => {
            return Err(LutError::validation(
                "LUT must be 1D, 3x1D, 3D, 1D + 3D or 3x1D + 3D",
            ));
        }
    };

    if let Some(shaper) = &plan.shaper {
        ensure(!shaper.is_domain_explicit(), "\"LUT\" domain must be implicit")?;
        ensure(
            unique_count(shaper.domain.iter().flatten().copied()) == 2,
            "\"LUT\" domain must be 1D",
        )?;
        check_size(shaper.size(), MAX_SHAPER_SIZE, "Shaper")?;
    }
    if let Some(cube) = plan.cube {
        ensure(!cube.is_domain_explicit(), "\"LUT\" domain must be implicit")?;
        ensure(
            unique_count(cube.domain.iter().flatten().copied()) == 2,
            "\"LUT\" domain must be 1D",
        )?;
        check_size(cube.size, MAX_CUBE_SIZE, "Cube")?;
        ensure(
            cube.table.len() == cube.entry_count(),
            "LUT3D table does not hold size^3 entries",
        )?;
    }
    Ok(plan)
}

/// Writes a Resolve .cube file.
///
/// Accepts a [`Lut1D`](crate::Lut1D) (promoted), a [`Lut3x1D`], a
/// [`Lut3D`] or a shaper + cube [`LutSequence`]. Domains must be implicit
/// and identical across channels.
pub fn write_resolve_cube<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let plan = prepare(lut)?;
    debug!(path = %path.display(), "writing Resolve cube");
    write_file(path, |writer| emit(writer, &plan, decimals))
}

/// Writes a Resolve .cube to any writer.
pub fn write_resolve_cube_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let plan = prepare(lut)?;
    emit(&mut writer, &plan, decimals)
}

fn write_range<W: Write>(
    writer: &mut W,
    directive: &str,
    domain: &[[f64; 3]],
    decimals: usize,
) -> LutResult<()> {
    if !is_default_rows(domain) {
        writeln!(
            writer,
            "{} {} {}",
            directive,
            fmt_value(domain[0][0], decimals),
            fmt_value(domain[1][0], decimals)
        )?;
    }
    Ok(())
}

fn emit<W: Write>(writer: &mut W, plan: &Plan<'_>, decimals: usize) -> LutResult<()> {
    writeln!(writer, "TITLE \"{}\"", plan.name)?;
    let shaper_comments = plan.shaper.iter().flat_map(|lut| lut.comments.iter());
    let cube_comments = plan.cube.iter().flat_map(|lut| lut.comments.iter());
    for comment in shaper_comments.chain(cube_comments) {
        writeln!(writer, "# {}", comment)?;
    }

    if let Some(shaper) = &plan.shaper {
        writeln!(writer, "LUT_1D_SIZE {}", shaper.size())?;
        write_range(writer, "LUT_1D_INPUT_RANGE", &shaper.domain, decimals)?;
    }
    if let Some(cube) = plan.cube {
        writeln!(writer, "LUT_3D_SIZE {}", cube.size)?;
        write_range(writer, "LUT_3D_INPUT_RANGE", &cube.domain, decimals)?;
    }

    if let Some(shaper) = &plan.shaper {
        for row in &shaper.table {
            writeln!(writer, "{}", fmt_row(row, decimals))?;
        }
        writeln!(writer)?;
    }
    if let Some(cube) = plan.cube {
        for row in cube_file_rows(cube) {
            writeln!(writer, "{}", fmt_row(&row, decimals))?;
        }
    }
    Ok(())
}

/// Resolve .cube codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveCube;

impl LutReader for ResolveCube {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_resolve_cube(path)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_resolve_cube(data, title)
    }
}

impl LutWriter for ResolveCube {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_resolve_cube(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_resolve_cube_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lut1D, LutOperatorMatrix};

    const SHAPER_AND_CUBE: &str = "\
TITLE \"LUT3D with My Shaper\"
# A first comment.
LUT_1D_SIZE 2
LUT_1D_INPUT_RANGE -0.1 3.0
LUT_3D_SIZE 2
0
1

0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
";

    #[test]
    fn test_parse_shaper_and_cube() {
        let lut = parse_resolve_cube(SHAPER_AND_CUBE.as_bytes(), "").unwrap();
        let seq = lut.as_sequence().unwrap();
        assert_eq!(seq.overview(), "LUT3x1D --> LUT3D");
        assert_eq!(seq[0].name(), "LUT3D with My Shaper - Shaper");
        assert_eq!(seq[1].name(), "LUT3D with My Shaper - Cube");
        assert!(seq[0].comments().is_empty());
        assert_eq!(seq[1].comments(), ["A first comment.".to_string()]);

        let (shaper, cube) = seq.shaper_and_cube().unwrap();
        assert_eq!(shaper.domain, vec![[-0.1; 3], [3.0; 3]]);
        assert_eq!(shaper.table, vec![[0.0; 3], [1.0; 3]]);
        assert_eq!(cube.domain, domain::default_rows());
        assert_eq!(cube.table, Lut3D::identity(2).unwrap().table);
    }

    #[test]
    fn test_missing_size_is_parse_error() {
        assert!(matches!(
            parse_resolve_cube("0 0 0\n".as_bytes(), ""),
            Err(LutError::ParseError(_))
        ));
        assert!(matches!(
            parse_resolve_cube("LUT_1D_SIZE 3\n0\n1\n".as_bytes(), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_oversized_headers_rejected() {
        for header in [
            "LUT_3D_SIZE 3000000\n",
            "LUT_3D_SIZE 18446744073709551615\n",
            "LUT_3D_SIZE 257\n",
            "LUT_3D_SIZE 1\n0 0 0\n",
            "LUT_1D_SIZE 65537\n",
            "LUT_1D_SIZE 2\nLUT_3D_SIZE 3000000\n",
        ] {
            assert!(
                matches!(
                    parse_resolve_cube(header.as_bytes(), ""),
                    Err(LutError::ParseError(_))
                ),
                "{header}"
            );
        }
    }

    #[test]
    fn test_write_sequence_layout() {
        let mut seq = LutSequence::default();
        seq.push(
            Lut1D::identity(2)
                .unwrap()
                .with_name("Shaper")
                .with_domain(vec![-0.1, 3.0])
                .unwrap()
                .with_comments(["shaper note"]),
        );
        seq.push(Lut3D::identity(2).unwrap().with_name("Cube").with_comments(["cube note"]));

        let mut buf = Vec::new();
        write_resolve_cube_to(&mut buf, &seq.into(), 2).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let head: Vec<&str> = text.lines().take(9).collect();
        assert_eq!(
            head,
            [
                "TITLE \"Shaper - Cube\"",
                "# shaper note",
                "# cube note",
                "LUT_1D_SIZE 2",
                "LUT_1D_INPUT_RANGE -0.10 3.00",
                "LUT_3D_SIZE 2",
                "0.00 0.00 0.00",
                "1.00 1.00 1.00",
                "",
            ]
        );
        // Red varies fastest in the cube rows.
        assert_eq!(text.lines().nth(10), Some("1.00 0.00 0.00"));
    }

    #[test]
    fn test_roundtrip_cube_only() {
        let domain = vec![[-0.1; 3], [3.0; 3]];
        let lut = Lut3D::from_fn(3, &domain, |[r, g, b]| [b, r, g])
            .unwrap()
            .with_name("Rotate");
        let mut buf = Vec::new();
        write_resolve_cube_to(&mut buf, &lut.clone().into(), 10).unwrap();
        let back = parse_resolve_cube(buf.as_slice(), "").unwrap();
        let back = back.as_lut3d().unwrap();
        assert_eq!(back.name, "Rotate");
        assert_eq!(back.domain, lut.domain);
        for (a, b) in back.table.iter().zip(&lut.table) {
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_write_validation() {
        let per_channel = Lut3x1D::identity(4)
            .unwrap()
            .with_domain(vec![[0.0, 0.0, 0.0], [1.0, 2.0, 4.0]])
            .unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            write_resolve_cube_to(&mut buf, &per_channel.into(), 7),
            Err(LutError::Validation(_))
        ));

        let wrong_order = LutSequence::new(vec![
            Lut3D::identity(2).unwrap().into(),
            Lut3x1D::identity(2).unwrap().into(),
        ]);
        assert!(write_resolve_cube_to(&mut buf, &wrong_order.into(), 7).is_err());
        assert!(write_resolve_cube_to(&mut buf, &LutOperatorMatrix::identity().into(), 7).is_err());
        assert!(buf.is_empty());
    }
}
