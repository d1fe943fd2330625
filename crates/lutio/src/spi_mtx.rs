//! Sony Pictures Imageworks Matrix format (.spimtx).
//!
//! A simple text format storing a 3x3 color matrix with RGB offsets.
//! Used by OCIO and various SPI color pipelines.
//!
//! # Format
//!
//! 12 whitespace-separated float values:
//! ```text
//! m00 m01 m02 offset_r
//! m10 m11 m12 offset_g
//! m20 m21 m22 offset_b
//! ```
//!
//! The offset values are stored in the 16-bit integer range (0-65535)
//! and are normalized to [0,1] on load.
//!
//! # Example
//!
//! ```rust,no_run
//! use lutio::spi_mtx::read_spimtx;
//!
//! let mtx = read_spimtx("colorspace.spimtx")?;
//! let rgb_out = mtx.apply([0.5, 0.3, 0.2]);
//! # Ok::<(), lutio::LutError>(())
//! ```

use crate::common::{comment_text, first_node, fmt_value, open, parse_f64, path_to_title, write_file};
use crate::{AnyLut, LutError, LutNode, LutOperatorMatrix, LutReader, LutResult, LutWriter};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

/// Offset normalization factor (16-bit integer range).
const OFFSET_SCALE: f64 = 65535.0;

/// Read a .spimtx file.
pub fn read_spimtx<P: AsRef<Path>>(path: P) -> LutResult<LutOperatorMatrix> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading SPImtx");
    parse_spimtx(open(path)?, &path_to_title(path))
}

/// Parse a .spimtx from reader.
///
/// The 3x3 block fills the upper-left of the operator's 4x4 matrix; the
/// fourth row and column stay identity.
pub fn parse_spimtx<R: BufRead>(reader: R, title: &str) -> LutResult<LutOperatorMatrix> {
    let mut values: Vec<f64> = Vec::with_capacity(12);
    let mut comments = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(comment) = comment_text(line) {
            comments.push(comment.to_string());
            continue;
        }
        for token in line.split_whitespace() {
            values.push(parse_f64(token, "spimtx")?);
        }
    }

    let values: [f64; 12] = values.try_into().map_err(|values: Vec<f64>| {
        LutError::parse(format!("spimtx requires 12 values, found {}", values.len()))
    })?;

    let block = [
        [values[0], values[1], values[2]],
        [values[4], values[5], values[6]],
        [values[8], values[9], values[10]],
    ];
    let offset = [
        values[3] / OFFSET_SCALE,
        values[7] / OFFSET_SCALE,
        values[11] / OFFSET_SCALE,
    ];
    Ok(LutOperatorMatrix::from_3x3(block, offset)
        .with_name(title)
        .with_comments(comments))
}

fn prepare(lut: &AnyLut) -> LutResult<&LutOperatorMatrix> {
    match lut {
        AnyLut::Matrix(op) => Ok(op),
        AnyLut::Sequence(seq) => match first_node(seq, "Sony SPImtx")? {
            LutNode::Matrix(op) => Ok(op),
            other => Err(LutError::validation(format!(
                "SPImtx requires a LUTOperatorMatrix, got {}",
                other.kind()
            ))),
        },
        other => Err(LutError::validation(format!(
            "SPImtx requires a LUTOperatorMatrix, got {}",
            other.type_name()
        ))),
    }
}

/// Write a .spimtx file.
pub fn write_spimtx<P: AsRef<Path>>(lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
    let path = path.as_ref();
    let op = prepare(lut)?;
    debug!(path = %path.display(), "writing SPImtx");
    write_file(path, |writer| emit(writer, op, decimals))
}

/// Write a .spimtx to any writer.
pub fn write_spimtx_to<W: Write>(mut writer: W, lut: &AnyLut, decimals: usize) -> LutResult<()> {
    let op = prepare(lut)?;
    emit(&mut writer, op, decimals)
}

fn emit<W: Write>(writer: &mut W, op: &LutOperatorMatrix, decimals: usize) -> LutResult<()> {
    for comment in &op.comments {
        writeln!(writer, "# {}", comment)?;
    }

    // Write in 3 rows of 4 values
    for (row, offset) in op.matrix.iter().zip(op.offset).take(3) {
        writeln!(
            writer,
            "{} {} {} {}",
            fmt_value(row[0], decimals),
            fmt_value(row[1], decimals),
            fmt_value(row[2], decimals),
            fmt_value(offset * OFFSET_SCALE, decimals)
        )?;
    }
    Ok(())
}

/// Sony SPImtx codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiMtx;

impl LutReader for SpiMtx {
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut> {
        read_spimtx(path).map(AnyLut::from)
    }

    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut> {
        parse_spimtx(data, title).map(AnyLut::from)
    }
}

impl LutWriter for SpiMtx {
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        write_spimtx(lut, path, decimals)
    }

    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>> {
        let mut buf = Vec::new();
        write_spimtx_to(&mut buf, lut, decimals)?;
        Ok(buf)
    }
}
