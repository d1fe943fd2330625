//! CLI command implementations

pub mod convert;
pub mod formats;
pub mod info;

use anyhow::{Context, Result};
use lutio::{AnyLut, Method};
use std::path::Path;

/// Load LUT from path
pub fn load_lut(path: &Path, method: Method) -> Result<AnyLut> {
    lutio::read_lut(path, method).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save LUT to path
pub fn save_lut(path: &Path, lut: &AnyLut, decimals: usize, method: Method) -> Result<()> {
    lutio::write_lut(lut, path, decimals, method)
        .with_context(|| format!("Failed to save: {}", path.display()))
}
