//! Helpers shared by the table model and the format codecs.

use crate::{Lut3D, LutError, LutNode, LutResult, LutSequence};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Default number of decimals written for every table value.
pub const DEFAULT_DECIMALS: usize = 7;

/// Largest 1D / 3x1D table any writer accepts.
pub const MAX_SHAPER_SIZE: usize = 65536;

/// Largest 3D cube edge any writer accepts.
pub const MAX_CUBE_SIZE: usize = 256;

/// Derives a display title from a file name: `My_LUT.cube` -> `My LUT`.
pub(crate) fn path_to_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace('_', " "))
        .unwrap_or_default()
}

#[inline]
pub(crate) fn fmt_value(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

pub(crate) fn fmt_row(row: &[f64; 3], decimals: usize) -> String {
    format!(
        "{:.*} {:.*} {:.*}",
        decimals, row[0], decimals, row[1], decimals, row[2]
    )
}

pub(crate) fn parse_f64(token: &str, what: &str) -> LutResult<f64> {
    token
        .parse()
        .map_err(|_| LutError::parse(format!("invalid {} value: '{}'", what, token)))
}

pub(crate) fn parse_usize(token: &str, what: &str) -> LutResult<usize> {
    token
        .parse()
        .map_err(|_| LutError::parse(format!("invalid {}: '{}'", what, token)))
}

/// Parses a data row of 1 or 3 numeric tokens; a single value fills all
/// three channels.
pub(crate) fn parse_row(tokens: &[&str]) -> LutResult<[f64; 3]> {
    match tokens {
        [v] => {
            let v = parse_f64(v, "table")?;
            Ok([v, v, v])
        }
        [r, g, b] => Ok([
            parse_f64(r, "table")?,
            parse_f64(g, "table")?,
            parse_f64(b, "table")?,
        ]),
        _ => Err(LutError::parse(format!(
            "expected 1 or 3 values per row, found {}: '{}'",
            tokens.len(),
            tokens.join(" ")
        ))),
    }
}

pub(crate) fn check_size(size: usize, max: usize, what: &str) -> LutResult<()> {
    if (2..=max).contains(&size) {
        Ok(())
    } else {
        Err(LutError::validation(format!(
            "{} size must be in domain [2, {}], got {}",
            what, max, size
        )))
    }
}

/// Bounds a size read from a file header before any table is sized from it.
pub(crate) fn check_read_size(size: usize, max: usize, what: &str) -> LutResult<usize> {
    if (2..=max).contains(&size) {
        Ok(size)
    } else {
        Err(LutError::parse(format!(
            "{} size must be in domain [2, {}], got {}",
            what, max, size
        )))
    }
}

/// Strips the `#` marker and surrounding whitespace from a comment line.
pub(crate) fn comment_text(line: &str) -> Option<&str> {
    line.strip_prefix('#').map(str::trim)
}

pub(crate) fn open(path: &Path) -> LutResult<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Creates `path` and runs `emit` against a buffered writer, flushing on
/// success.
pub(crate) fn write_file<F>(path: &Path, emit: F) -> LutResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> LutResult<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    emit(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// First node of a sequence handed to a single-table format.
pub(crate) fn first_node<'a>(seq: &'a LutSequence, format: &str) -> LutResult<&'a LutNode> {
    warn!(
        format,
        overview = %seq.overview(),
        "LUT sequence passed to a single-table format, using its first node"
    );
    seq.get(0)
        .ok_or_else(|| LutError::validation("LUT sequence is empty"))
}

/// Reorders first-channel-fastest file rows into the `(i, j, k)` layout:
/// file row `i + j*S + k*S^2` holds grid entry `(i, j, k)`.
pub(crate) fn cube_from_file_order(rows: &[[f64; 3]], size: usize) -> Vec<[f64; 3]> {
    let mut table = vec![[0.0; 3]; rows.len()];
    for k in 0..size {
        for j in 0..size {
            for i in 0..size {
                table[(i * size + j) * size + k] = rows[i + j * size + k * size * size];
            }
        }
    }
    table
}

/// Cube entries in first-channel-fastest file order.
pub(crate) fn cube_file_rows(lut: &Lut3D) -> impl Iterator<Item = [f64; 3]> + '_ {
    let size = lut.size;
    (0..size).flat_map(move |k| {
        (0..size).flat_map(move |j| (0..size).map(move |i| lut.get(i, j, k)))
    })
}

/// Writes the multi-line summary used by the `Display` impls.
pub(crate) fn write_summary(
    f: &mut fmt::Formatter<'_>,
    header: &str,
    fields: &[(&str, String)],
    comments: &[String],
) -> fmt::Result {
    let mut lines = vec![
        header.to_string(),
        "-".repeat(header.chars().count()),
        String::new(),
    ];
    for (label, value) in fields {
        lines.push(format!("{:<10} : {}", label, value));
    }
    for (i, comment) in comments.iter().enumerate() {
        lines.push(format!("Comment {:02} : {}", i + 1, comment));
    }
    write!(f, "{}", lines.join("\n"))
}
