//! Format-agnostic read and write entry points.

use crate::{AnyLut, LutError, LutFormat, LutResult, Method};
use std::path::Path;
use tracing::debug;

/// Reads a LUT file, picking the codec from `method`.
///
/// A `.cube` read as [`LutFormat::IridasCube`] that turns out to use
/// Resolve-only constructs is re-read once as [`LutFormat::ResolveCube`].
/// Every other error is returned unchanged.
///
/// # Example
///
/// ```rust,no_run
/// use lutio::{Method, read_lut};
///
/// let lut = read_lut("show/grade.cube", Method::Auto)?;
/// println!("{}", lut);
/// # Ok::<(), lutio::LutError>(())
/// ```
pub fn read_lut<P: AsRef<Path>>(path: P, method: Method) -> LutResult<AnyLut> {
    let path = path.as_ref();
    let format = method.resolve(path)?;
    debug!(path = %path.display(), %format, "reading LUT");

    match format.read(path) {
        Err(LutError::ResolveDialect(reason)) if format == LutFormat::IridasCube => {
            debug!(%reason, "not an Iridas cube, retrying as Resolve Cube");
            LutFormat::ResolveCube.read(path)
        }
        result => result,
    }
}

/// Writes a LUT file, picking the codec from `method`.
///
/// Sequences cannot be stored in the Iridas dialect, so an Iridas request
/// for a [`LutSequence`](crate::LutSequence) writes a Resolve cube instead.
pub fn write_lut<P: AsRef<Path>>(
    lut: &AnyLut,
    path: P,
    decimals: usize,
    method: Method,
) -> LutResult<()> {
    let path = path.as_ref();
    let format = match method.resolve(path)? {
        LutFormat::IridasCube if matches!(lut, AnyLut::Sequence(_)) => LutFormat::ResolveCube,
        format => format,
    };
    debug!(path = %path.display(), %format, kind = lut.type_name(), "writing LUT");
    format.write(lut, path, decimals)
}
