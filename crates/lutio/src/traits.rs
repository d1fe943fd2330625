//! Reader and writer traits implemented by every format codec.
//!
//! Each codec module exposes a unit struct (for example
//! [`IridasCube`](crate::cube::IridasCube)) implementing both traits, so
//! callers can treat formats uniformly without going through
//! [`read_lut`](crate::read_lut).

use crate::{AnyLut, LutResult};
use std::path::Path;

/// Trait for LUT format readers.
///
/// # Example
///
/// ```rust
/// use lutio::LutReader;
/// use lutio::spi_mtx::SpiMtx;
///
/// let text = "1 0 0 0\n0 1 0 0\n0 0 1 0\n";
/// let lut = SpiMtx.read_from_memory(text.as_bytes(), "Identity").unwrap();
/// assert_eq!(lut.type_name(), "LUTOperatorMatrix");
/// ```
pub trait LutReader {
    /// Reads a LUT from a file path; the title defaults to the file name.
    fn read<P: AsRef<Path>>(&self, path: P) -> LutResult<AnyLut>;

    /// Reads a LUT from memory, using `title` when the content has none.
    fn read_from_memory(&self, data: &[u8], title: &str) -> LutResult<AnyLut>;
}

/// Trait for LUT format writers.
pub trait LutWriter {
    /// Writes a LUT to a file path with `decimals` digits per value.
    ///
    /// Validation happens before the file is created.
    fn write<P: AsRef<Path>>(&self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()>;

    /// Writes a LUT to memory.
    fn write_to_memory(&self, lut: &AnyLut, decimals: usize) -> LutResult<Vec<u8>>;
}
