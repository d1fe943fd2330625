//! Cinespace (CSP) LUT file format parser and writer.
//!
//! CSP is a text-based LUT format used by Rising Sun Research Cinespace.
//! It supports:
//! - 1D LUTs (per-channel curves)
//! - 3D LUTs (color cubes)
//! - Pre-LUT/Shaper (input transform before the main LUT)
//! - Metadata
//!
//! # Format Structure
//!
//! ```text
//! CSPLUTV100
//! 1D or 3D
//!
//! BEGIN METADATA
//! <title>
//! <comments>
//! END METADATA
//!
//! <prelut_r_count>
//! <input_samples_r>
//! <output_samples_r>
//! <prelut_g_count>
//! <input_samples_g>
//! <output_samples_g>
//! <prelut_b_count>
//! <input_samples_b>
//! <output_samples_b>
//!
//! <lut_size> (for 1D) or <size_r> <size_g> <size_b> (for 3D)
//! <r g b>
//! ...
//! ```
//!
//! 3D rows are stored with the red index changing fastest.
//!
//! # Read mapping
//!
//! A pre-LUT is a *unity* pre-LUT when every channel holds two points
//! with outputs `0 1`; it then only carries the input range.
//!
//! | Kind | Pre-LUT | Result |
//! |------|---------|--------|
//! | 3D | unity | [`Lut3D`] over the pre-LUT inputs |
//! | 3D | other | [`LutSequence`] of a [`Lut3x1D`] shaper and the [`Lut3D`] |
//! | 1D | unity | [`Lut3x1D`] over the pre-LUT inputs |
//! | 1D | other, 2-row table | [`Lut3x1D`] with an explicit domain |
//! | 1D | other | [`LutSequence`] of two [`Lut3x1D`] |
//!
//! # References
//!
//! - OpenColorIO FileFormatCSP.cpp

use crate::common::{
    MAX_CUBE_SIZE, MAX_SHAPER_SIZE, check_read_size, check_size, cube_file_rows,
    cube_from_file_order, fmt_row, fmt_value, open, parse_f64, parse_usize, path_to_title, write_file,
};
use crate::domain::{self, DEFAULT_DOMAIN};
use crate::error::ensure;
use crate::{
    AnyLut, Lut3D, Lut3x1D, LutError, LutReader, LutResult, LutSequence, LutWriter,
};
use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::iter::Peekable;
use std::path::Path;
use std::vec::IntoIter;
use tracing::{debug, trace};

const HEADER: &str = "CSPLUTV100";

/// Pre-LUT channel data (shaper curve).
#[derive(Debug, Clone, PartialEq)]
struct PreLutChannel {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl PreLutChannel {
    fn is_unity(&self) -> bool {
        self.inputs.len() == 2 && self.outputs == [0.0, 1.0]
    }
}

/// Stacks ragged per-channel columns into rows, padding short channels
/// with NaN.
fn pad_rows(columns: [&[f64]; 3]) -> Vec<[f64; 3]> {
    let len = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    (0..len)
        .map(|i| columns.map(|c| c.get(i).copied().unwrap_or(f64::NAN)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct PreLut([PreLutChannel; 3]);

impl PreLut {
    fn is_unity(&self) -> bool {
        self.0.iter().all(PreLutChannel::is_unity)
    }

    fn inputs(&self) -> Vec<[f64; 3]> {
        pad_rows(self.0.each_ref().map(|c| c.inputs.as_slice()))
    }

    fn outputs(&self) -> Vec<[f64; 3]> {
        pad_rows(self.0.each_ref().map(|c| c.outputs.as_slice()))
    }
}

// ============================================================================
// Parsing
// ============================================================================

type Lines = Peekable<IntoIter<String>>;

/// Reads a CSP file.
///
/// See the module documentation for how pre-LUT and table combine.
pub fn read_csp<P: AsRef<Path>>(path: P) -> LutResult<AnyLut> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading Cinespace CSP");
    parse_csp(open(path)?, &path_to_title(path))
}

/// Parses a CSP file from a reader.
pub fn parse_csp<R: BufRead>(reader: R, title: &str) -> LutResult<AnyLut> {
    let mut lines: Vec<String> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    let mut lines = lines.into_iter().peekable();

    // Check header
    let header = next_line(&mut lines)?;
    if header != HEADER {
        return Err(LutError::parse(format!("invalid CSP header: {}", header)));
    }

    // Get LUT type
    let lut_type = next_line(&mut lines)?;
    let is_3d = match lut_type.as_str() {
        "3D" => true,
        "1D" => false,
        _ => return Err(LutError::parse(format!("invalid LUT type: {}", lut_type))),
    };

    let mut title = title.to_string();
    let mut comments = parse_metadata(&mut lines)?;
    if !comments.is_empty() {
        title = comments.remove(0);
    }

    let prelut = PreLut([
        parse_prelut_channel(&mut lines)?,
        parse_prelut_channel(&mut lines)?,
        parse_prelut_channel(&mut lines)?,
    ]);
    trace!(unity = prelut.is_unity(), "parsed CSP pre-LUT");

    if is_3d {
        let size = parse_3d_size(&mut lines)?;
        let rows = parse_rows(&mut lines, size * size * size)?;
        let table = cube_from_file_order(&rows, size);
        if prelut.is_unity() {
            let inputs = prelut.inputs();
            Ok(Lut3D::from_table(table, size)?
                .with_domain(inputs)?
                .with_name(title)
                .with_comments(comments)
                .into())
        } else {
            let shaper = Lut3x1D::from_table(prelut.outputs())?
                .with_domain(prelut.inputs())?
                .with_name(format!("{} - Shaper", title));
            let cube = Lut3D::from_table(table, size)?
                .with_name(format!("{} - Cube", title))
                .with_comments(comments);
            Ok(LutSequence::new(vec![shaper.into(), cube.into()]).into())
        }
    } else {
        let size = parse_1d_size(&mut lines)?;
        let rows = parse_rows(&mut lines, size)?;
        if prelut.is_unity() {
            Ok(Lut3x1D::from_table(rows)?
                .with_domain(prelut.inputs())?
                .with_name(title)
                .with_comments(comments)
                .into())
        } else if size == 2 {
            // Linear main table: fold it into the pre-LUT outputs.
            let table = prelut
                .outputs()
                .into_iter()
                .map(|row| {
                    let mut out = [0.0; 3];
                    for c in 0..3 {
                        out[c] = rows[0][c] + row[c] * (rows[1][c] - rows[0][c]);
                    }
                    out
                })
                .collect();
            Ok(Lut3x1D::from_table(table)?
                .with_domain(prelut.inputs())?
                .with_name(title)
                .with_comments(comments)
                .into())
        } else {
            let shaper = Lut3x1D::from_table(prelut.outputs())?
                .with_domain(prelut.inputs())?
                .with_name(format!("{} - Shaper", title));
            let table = Lut3x1D::from_table(rows)?
                .with_name(format!("{} - Table", title))
                .with_comments(comments);
            Ok(LutSequence::new(vec![shaper.into(), table.into()]).into())
        }
    }
}

fn next_line(lines: &mut Lines) -> LutResult<String> {
    lines
        .next()
        .ok_or_else(|| LutError::parse("unexpected end of file"))
}

fn parse_metadata(lines: &mut Lines) -> LutResult<Vec<String>> {
    if lines.peek().map(String::as_str) != Some("BEGIN METADATA") {
        return Ok(Vec::new());
    }
    lines.next();

    // Collect until "END METADATA"
    let mut metadata = Vec::new();
    loop {
        let line = next_line(lines)?;
        if line == "END METADATA" {
            return Ok(metadata);
        }
        metadata.push(line);
    }
}

fn parse_values(line: &str, what: &str) -> LutResult<Vec<f64>> {
    line.split_whitespace()
        .map(|token| parse_f64(token, what))
        .collect()
}

fn parse_prelut_channel(lines: &mut Lines) -> LutResult<PreLutChannel> {
    let count = parse_usize(&next_line(lines)?, "pre-LUT count")?;
    let inputs = parse_values(&next_line(lines)?, "pre-LUT input")?;
    let outputs = parse_values(&next_line(lines)?, "pre-LUT output")?;

    if inputs.len() != count || outputs.len() != count {
        return Err(LutError::parse(format!(
            "pre-LUT count mismatch: expected {}, got inputs={}, outputs={}",
            count,
            inputs.len(),
            outputs.len()
        )));
    }

    Ok(PreLutChannel { inputs, outputs })
}

fn parse_1d_size(lines: &mut Lines) -> LutResult<usize> {
    let size = parse_usize(&next_line(lines)?, "1D LUT size")?;
    check_read_size(size, MAX_SHAPER_SIZE, "1D LUT")
}

fn parse_3d_size(lines: &mut Lines) -> LutResult<usize> {
    let line = next_line(lines)?;
    let dims: Vec<&str> = line.split_whitespace().collect();
    match dims.as_slice() {
        [r, g, b] => {
            if r != g || g != b {
                return Err(LutError::validation(format!(
                    "non-uniform LUT shape is unsupported: '{}'",
                    line
                )));
            }
            check_read_size(parse_usize(r, "3D LUT size")?, MAX_CUBE_SIZE, "3D LUT")
        }
        _ => Err(LutError::parse(format!(
            "expected 3 dimensions, got {}",
            dims.len()
        ))),
    }
}

fn parse_rows(lines: &mut Lines, count: usize) -> LutResult<Vec<[f64; 3]>> {
    let mut rows = Vec::with_capacity(count);
    for line in lines.by_ref() {
        match parse_values(&line, "table")?.as_slice() {
            &[r, g, b] => rows.push([r, g, b]),
            other => {
                return Err(LutError::parse(format!(
                    "expected 3 values per row, found {}",
                    other.len()
                )));
            }
        }
    }
    if rows.len() != count {
        return Err(LutError::parse(format!(
            "expected {} entries, found {}",
            count,
            rows.len()
        )));
    }
    Ok(rows)
}

// ============================================================================
// Writing
// ============================================================================

enum Plan<'a> {
    /// 1D file: pre-LUT rows (inputs, outputs) and the main table.
    Table {
        name: &'a str,
        comments: &'a [String],
        prelut: (Vec<[f64; 3]>, Vec<[f64; 3]>),
        table: Cow<'a, [[f64; 3]]>,
    },
    /// 3D file: pre-LUT rows and the cube.
    Cube {
        name: Cow<'a, str>,
        comments: Cow<'a, [String]>,
        prelut: (Vec<[f64; 3]>, Vec<[f64; 3]>),
        cube: &'a Lut3D,
    },
}

fn table_plan(lut: &Lut3x1D) -> LutResult<Plan<'_>> {
    check_size(lut.size(), MAX_SHAPER_SIZE, "LUT")?;
    let plan = if lut.is_domain_explicit() {
        // Explicit samples become the pre-LUT over an identity table.
        Plan::Table {
            name: &lut.name,
            comments: &lut.comments,
            prelut: (lut.domain.clone(), lut.table.clone()),
            table: Cow::Owned(DEFAULT_DOMAIN.to_vec()),
        }
    } else {
        Plan::Table {
            name: &lut.name,
            comments: &lut.comments,
            prelut: (lut.domain.clone(), DEFAULT_DOMAIN.to_vec()),
            table: Cow::Borrowed(lut.table.as_slice()),
        }
    };
    Ok(plan)
}

fn check_cube(cube: &Lut3D) -> LutResult<()> {
    ensure(!cube.is_domain_explicit(), "Cube domain must be implicit")?;
    check_size(cube.size, MAX_CUBE_SIZE, "Cube")?;
    ensure(
        cube.table.len() == cube.entry_count(),
        "LUT3D table does not hold size^3 entries",
    )
}

/// Shaper samples as pre-LUT rows, with outputs normalised to the cube's
/// input range.
fn shaper_prelut(shaper: &Lut3x1D, cube: &Lut3D) -> LutResult<(Vec<[f64; 3]>, Vec<[f64; 3]>)> {
    let (min, max) = (cube.domain[0], cube.domain[1]);
    for c in 0..3 {
        let span = max[c] - min[c];
        if span == 0.0 || !span.is_finite() {
            return Err(LutError::validation(format!(
                "Cube domain channel {} has no usable range: [{}, {}]",
                c, min[c], max[c]
            )));
        }
    }

    let inputs: Vec<[f64; 3]> = Lut3x1D::linear_table(shaper.size(), &shaper.domain).collect();
    let outputs = shaper
        .table
        .iter()
        .map(|row| {
            let mut out = [0.0; 3];
            for c in 0..3 {
                out[c] = (row[c] - min[c]) / (max[c] - min[c]);
            }
            out
        })
        .collect();
    Ok((inputs, outputs))
}

fn prepare(lut: &AnyLut) -> LutResult<Plan<'_>> {
    match lut {
        AnyLut::Lut1D(lut) => {
            // Promotion copies the table, so build an owned plan.
            let wide = lut.to_lut3x1d();
            check_size(wide.size(), MAX_SHAPER_SIZE, "LUT")?;
            let (prelut, table) = if wide.is_domain_explicit() {
                ((wide.domain, wide.table), DEFAULT_DOMAIN.to_vec())
            } else {
                ((wide.domain, DEFAULT_DOMAIN.to_vec()), wide.table)
            };
            Ok(Plan::Table {
                name: &lut.name,
                comments: &lut.comments,
                prelut,
                table: Cow::Owned(table),
            })
        }
        AnyLut::Lut3x1D(lut) => table_plan(lut),
        AnyLut::Lut3D(cube) => {
            check_cube(cube)?;
            Ok(Plan::Cube {
                name: Cow::Borrowed(cube.name.as_str()),
                comments: Cow::Borrowed(cube.comments.as_slice()),
                prelut: (cube.domain.clone(), DEFAULT_DOMAIN.to_vec()),
                cube,
            })
        }
        AnyLut::Sequence(seq) => {
            let (shaper, cube) = seq.as_shaper_and_cube()?;
            check_cube(cube)?;
            check_size(shaper.size(), MAX_SHAPER_SIZE, "Shaper")?;
            let prelut = shaper_prelut(&shaper, cube)?;
            Ok(Plan::Cube {
                name: Cow::Owned(format!("{} - {}", shaper.name, cube.name)),
                comments: Cow::Owned(
                    shaper.comments.iter().chain(&cube.comments).cloned().collect(),
                ),
                prelut,
                cube,
            })
        }
        AnyLut::Matrix(_) => Err(LutError::validation(
            "Cinespace cannot store a LUTOperatorMatrix",
        )),
    }
}

/// Writes a CSP file.
///
/// Accepts a [`Lut1D`](crate::Lut1D), a [`Lut3x1D`], a [`Lut3D`] or a
/// shaper + cube [`LutSequence`].
pub fn write_csp<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let plan = prepare(lut)?;
    debug!(path = %path.display(), "writing Cinespace CSP");
    write_file(path, |writer| emit(writer, &plan, decimals))
}

/// Writes a CSP file to any writer.
pub fn write_csp_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let plan = prepare(lut)?;
    emit(&mut writer, &plan, decimals)
}

fn emit_prelut<W: Write>(
    writer: &mut W,
    (inputs, outputs): &(Vec<[f64; 3]>, Vec<[f64; 3]>),
    decimals: usize,
) -> LutResult<()> {
    let join = |column: Vec<f64>| {
        column
            .into_iter()
            .map(|v| fmt_value(v, decimals))
            .collect::<Vec<_>>()
            .join(" ")
    };
    for c in 0..3 {
        let ins = domain::column(inputs, c);
        let outs: Vec<f64> = outputs.iter().map(|row| row[c]).take(ins.len()).collect();
        writeln!(writer, "{}", ins.len())?;
        writeln!(writer, "{}", join(ins))?;
        writeln!(writer, "{}", join(outs))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn emit<W: Write>(writer: &mut W, plan: &Plan<'_>, decimals: usize) -> LutResult<()> {
    let (kind, name, comments): (&str, &str, &[String]) = match plan {
        Plan::Table { name, comments, .. } => ("1D", *name, *comments),
        Plan::Cube { name, comments, .. } => ("3D", &**name, &**comments),
    };

    writeln!(writer, "{}", HEADER)?;
    writeln!(writer, "{}", kind)?;
    writeln!(writer)?;
    writeln!(writer, "BEGIN METADATA")?;
    writeln!(writer, "{}", name)?;
    for comment in comments {
        writeln!(writer, "{}", comment)?;
    }
    writeln!(writer, "END METADATA")?;
    writeln!(writer)?;

    match plan {
        Plan::Table { prelut, table, .. } => {
            emit_prelut(writer, prelut, decimals)?;
            writeln!(writer, "{}", table.len())?;
            for row in table.iter() {
                writeln!(writer, "{}", fmt_row(row, decimals))?;
            }
        }
        Plan::Cube { prelut, cube, .. } => {
            emit_prelut(writer, prelut, decimals)?;
            writeln!(writer, "{0} {0} {0}", cube.size)?;
            for row in cube_file_rows(cube) {
                writeln!(writer, "{}", fmt_row(&row, decimals))?;
            }
        }
    }
    Ok(())
}

/// Cinespace .csp codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cinespace;

impl LutReader for Cinespace {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_csp(path)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_csp(data, title)
    }
}

impl LutWriter for Cinespace {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_csp(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_csp_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lut1D, LutOperatorMatrix};
    use std::io::Cursor;

    fn assert_rows_close(a: &[[f64; 3]], b: &[[f64; 3]]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            for c in 0..3 {
                assert!((x[c] - y[c]).abs() < 1e-9, "{:?} != {:?}", x, y);
            }
        }
    }

    #[test]
    fn test_parse_3d_unity_prelut() {
        let data = r#"CSPLUTV100
3D

BEGIN METADATA
Identity
A comment
END METADATA

2
0.0 2.0
0.0 1.0
2
0.0 2.0
0.0 1.0
2
0.0 2.0
0.0 1.0

2 2 2
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;
        let lut = parse_csp(Cursor::new(data), "fallback").unwrap();
        let lut = lut.as_lut3d().unwrap();
        assert_eq!(lut.name, "Identity");
        assert_eq!(lut.comments, vec!["A comment".to_string()]);
        assert_eq!(lut.domain, vec![[0.0; 3], [2.0; 3]]);
        assert_eq!(lut.table, Lut3D::identity(2).unwrap().table);
    }

    #[test]
    fn test_parse_3d_with_shaper() {
        let data = "CSPLUTV100\n3D\n\
            3\n0.0 0.5 1.0\n0.0 0.7 1.0\n\
            3\n0.0 0.5 1.0\n0.0 0.7 1.0\n\
            2\n0.0 1.0\n0.0 1.0\n\
            2 2 2\n0 0 0\n1 0 0\n0 1 0\n1 1 0\n0 0 1\n1 0 1\n0 1 1\n1 1 1\n";
        let lut = parse_csp(Cursor::new(data), "Shaped").unwrap();
        let seq = lut.as_sequence().unwrap();
        assert_eq!(seq.overview(), "LUT3x1D --> LUT3D");
        assert_eq!(seq[0].name(), "Shaped - Shaper");
        let (shaper, _) = seq.shaper_and_cube().unwrap();
        // The blue channel only has two points and is padded.
        assert!(shaper.is_domain_explicit());
        assert!(shaper.domain[2][2].is_nan());
        let rgb = seq.apply([0.5, 0.5, 0.5]);
        assert!((rgb[0] - 0.7).abs() < 1e-9);
        assert!((rgb[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_1d_variants() {
        let unity = "CSPLUTV100\n1D\n\
            2\n-0.5 1.5\n0 1\n2\n-0.5 1.5\n0 1\n2\n-0.5 1.5\n0 1\n\
            3\n0 0 0\n0.25 0.25 0.25\n1 1 1\n";
        let lut = parse_csp(Cursor::new(unity), "Unity").unwrap();
        let lut = lut.as_lut3x1d().unwrap();
        assert_eq!(lut.domain, vec![[-0.5; 3], [1.5; 3]]);
        assert_eq!(lut.size(), 3);

        let linear = "CSPLUTV100\n1D\n\
            3\n0 0.5 1\n0 0.25 1\n3\n0 0.5 1\n0 0.25 1\n3\n0 0.5 1\n0 0.25 1\n\
            2\n0 0 0\n2 2 2\n";
        let lut = parse_csp(Cursor::new(linear), "Linear").unwrap();
        let lut = lut.as_lut3x1d().unwrap();
        assert_eq!(lut.table, vec![[0.0; 3], [0.5; 3], [2.0; 3]]);
        assert_eq!(lut.domain, vec![[0.0; 3], [0.5; 3], [1.0; 3]]);

        let both = "CSPLUTV100\n1D\n\
            3\n0 0.5 1\n0 0.25 1\n3\n0 0.5 1\n0 0.25 1\n3\n0 0.5 1\n0 0.25 1\n\
            3\n0 0 0\n0.1 0.1 0.1\n1 1 1\n";
        let lut = parse_csp(Cursor::new(both), "Both").unwrap();
        assert_eq!(lut.as_sequence().unwrap().overview(), "LUT3x1D --> LUT3x1D");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_csp(Cursor::new("CSPLUTV200\n3D\n"), ""),
            Err(LutError::ParseError(_))
        ));
        let non_uniform = "CSPLUTV100\n3D\n\
            2\n0 1\n0 1\n2\n0 1\n0 1\n2\n0 1\n0 1\n2 2 3\n";
        assert!(matches!(
            parse_csp(Cursor::new(non_uniform), ""),
            Err(LutError::Validation(_))
        ));
        let short = "CSPLUTV100\n1D\n2\n0 1\n0 1\n2\n0 1\n0 1\n2\n0 1\n0 1\n3\n0 0 0\n";
        assert!(matches!(
            parse_csp(Cursor::new(short), ""),
            Err(LutError::ParseError(_))
        ));
    }

    #[test]
    fn test_cube_roundtrip() {
        let domain = vec![[-0.1; 3], [3.0; 3]];
        let lut = Lut3D::from_fn(3, &domain, |[r, g, b]| [g, b, r])
            .unwrap()
            .with_name("Rotate")
            .with_comments(["A first comment."]);
        let mut buf = Vec::new();
        write_csp_to(&mut buf, &lut.clone().into(), 10).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("CSPLUTV100\n3D\n\nBEGIN METADATA\nRotate\nA first comment.\nEND METADATA\n"));

        let back = parse_csp(Cursor::new(buf), "").unwrap();
        let back = back.as_lut3d().unwrap();
        assert_eq!(back.name, "Rotate");
        assert_eq!(back.comments, lut.comments);
        assert_eq!(back.domain, lut.domain);
        assert_rows_close(&back.table, &lut.table);
    }

    #[test]
    fn test_table_roundtrips() {
        let implicit = Lut1D::from_table(vec![0.0, 0.1, 0.4, 1.0])
            .unwrap()
            .with_domain(vec![0.0, 2.0])
            .unwrap()
            .with_name("Curve");
        let mut buf = Vec::new();
        write_csp_to(&mut buf, &implicit.clone().into(), 10).unwrap();
        let back = parse_csp(Cursor::new(buf), "").unwrap();
        let back = back.as_lut3x1d().unwrap();
        assert_eq!(back.to_lut1d().unwrap().domain, implicit.domain);
        assert_rows_close(&back.table, &implicit.to_lut3x1d().table);

        let explicit = Lut3x1D::from_table(vec![[0.0; 3], [0.3; 3], [1.0; 3]])
            .unwrap()
            .with_domain(vec![[0.0; 3], [0.2; 3], [1.0; 3]])
            .unwrap();
        let mut buf = Vec::new();
        write_csp_to(&mut buf, &explicit.clone().into(), 10).unwrap();
        let back = parse_csp(Cursor::new(buf), "").unwrap();
        let back = back.as_lut3x1d().unwrap();
        assert_rows_close(&back.domain, &explicit.domain);
        assert_rows_close(&back.table, &explicit.table);
    }

    #[test]
    fn test_sequence_write_keeps_evaluation() {
        let shaper = Lut3x1D::from_table(
            Lut3x1D::linear_table(5, &DEFAULT_DOMAIN).map(|row| row.map(f64::sqrt)).collect(),
        )
        .unwrap()
        .with_name("Sqrt");
        let cube = Lut3D::from_fn(5, &DEFAULT_DOMAIN, |[r, g, b]| [b, g, r])
            .unwrap()
            .with_name("Swap");
        let seq = LutSequence::new(vec![shaper.into(), cube.into()]);

        let mut buf = Vec::new();
        write_csp_to(&mut buf, &seq.clone().into(), 10).unwrap();
        let back = parse_csp(Cursor::new(buf), "").unwrap();
        let back = back.as_sequence().unwrap();
        assert_eq!(back.overview(), "LUT3x1D --> LUT3D");
        for rgb in [[0.25, 0.5, 1.0], [0.0, 0.75, 0.1]] {
            let a = seq.apply(rgb);
            let b = back.apply(rgb);
            for c in 0..3 {
                assert!((a[c] - b[c]).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_write_rejects() {
        let mut buf = Vec::new();
        assert!(write_csp_to(&mut buf, &LutOperatorMatrix::identity().into(), 7).is_err());
        let explicit_cube = Lut3D::identity(3)
            .unwrap()
            .with_domain(vec![[0.0; 3], [0.5; 3], [1.0; 3]])
            .unwrap();
        assert!(matches!(
            write_csp_to(&mut buf, &explicit_cube.into(), 7),
            Err(LutError::Validation(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_sequence_rejects_flat_cube_domain() {
        let shaper = Lut3x1D::identity(4).unwrap().with_name("Shaper");
        let cube = Lut3D::identity(2)
            .unwrap()
            .with_domain(vec![[0.0, 0.5, 0.0], [1.0, 0.5, 1.0]])
            .unwrap();
        let seq = LutSequence::new(vec![shaper.into(), cube.into()]);
        let mut buf = Vec::new();
        assert!(matches!(
            write_csp_to(&mut buf, &seq.into(), 7),
            Err(LutError::Validation(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_oversized_headers_rejected() {
        let prelut = "2\n0 1\n0 1\n2\n0 1\n0 1\n2\n0 1\n0 1\n";
        for body in [
            "3D\n{p}3000000 3000000 3000000\n0 0 0\n",
            "3D\n{p}18446744073709551615 18446744073709551615 18446744073709551615\n",
            "3D\n{p}1 1 1\n0 0 0\n",
            "1D\n{p}18446744073709551615\n0 0 0\n",
        ] {
            let data = format!("CSPLUTV100\n{}", body.replace("{p}", prelut));
            assert!(
                matches!(parse_csp(Cursor::new(data), ""), Err(LutError::ParseError(_))),
                "{body}"
            );
        }
    }
}
