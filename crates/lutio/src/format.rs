//! LUT file format registry.
//!
//! Maps format names and file extensions to the codec modules.

use crate::csp::Cinespace;
use crate::cube::IridasCube;
use crate::resolve_cube::ResolveCube;
use crate::spi::{Spi1d, Spi3d};
use crate::spi_mtx::SpiMtx;
use crate::{AnyLut, LutError, LutReader, LutResult, LutWriter};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported LUT file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LutFormat {
    /// Cinespace `.csp`.
    Cinespace,
    /// Iridas/Adobe `.cube` (strict dialect).
    IridasCube,
    /// DaVinci Resolve `.cube` (shaper + cube dialect).
    ResolveCube,
    /// Sony Pictures Imageworks `.spi1d`.
    SonySpi1d,
    /// Sony Pictures Imageworks `.spi3d`.
    SonySpi3d,
    /// Sony Pictures Imageworks `.spimtx`.
    SonySpimtx,
}

impl LutFormat {
    /// Every format, in registry order.
    pub const ALL: [LutFormat; 6] = [
        LutFormat::Cinespace,
        LutFormat::IridasCube,
        LutFormat::ResolveCube,
        LutFormat::SonySpi1d,
        LutFormat::SonySpi3d,
        LutFormat::SonySpimtx,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            LutFormat::Cinespace => "Cinespace",
            LutFormat::IridasCube => "Iridas Cube",
            LutFormat::ResolveCube => "Resolve Cube",
            LutFormat::SonySpi1d => "Sony SPI1D",
            LutFormat::SonySpi3d => "Sony SPI3D",
            LutFormat::SonySpimtx => "Sony SPImtx",
        }
    }

    /// File extensions handled by this format, lowercase and without dot.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            LutFormat::Cinespace => &["csp"],
            LutFormat::IridasCube | LutFormat::ResolveCube => &["cube"],
            LutFormat::SonySpi1d => &["spi1d"],
            LutFormat::SonySpi3d => &["spi3d"],
            LutFormat::SonySpimtx => &["spimtx"],
        }
    }

    /// Format for a file extension, case-insensitive.
    ///
    /// `.cube` resolves to [`LutFormat::IridasCube`]; reads fall back to
    /// Resolve on their own (see [`read_lut`](crate::read_lut)).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csp" => Some(LutFormat::Cinespace),
            "cube" => Some(LutFormat::IridasCube),
            "spi1d" => Some(LutFormat::SonySpi1d),
            "spi3d" => Some(LutFormat::SonySpi3d),
            "spimtx" => Some(LutFormat::SonySpimtx),
            _ => None,
        }
    }

    /// Format for a file path, from its extension.
    ///
    /// # Errors
    ///
    /// [`LutError::UnsupportedFormat`] for a missing or unknown extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LutResult<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                LutError::UnsupportedFormat(format!(
                    "cannot infer LUT format from '{}'",
                    path.display()
                ))
            })
    }

    /// Reads `path` with this format's codec.
    pub fn read<P: AsRef<Path>>(self, path: P) -> LutResult<AnyLut> {
        match self {
            LutFormat::Cinespace => Cinespace.read(path),
            LutFormat::IridasCube => IridasCube.read(path),
            LutFormat::ResolveCube => ResolveCube.read(path),
            LutFormat::SonySpi1d => Spi1d.read(path),
            LutFormat::SonySpi3d => Spi3d.read(path),
            LutFormat::SonySpimtx => SpiMtx.read(path),
        }
    }

    /// Writes `lut` to `path` with this format's codec.
    pub fn write<P: AsRef<Path>>(self, lut: &AnyLut, path: P, decimals: usize) -> LutResult<()> {
        match self {
            LutFormat::Cinespace => Cinespace.write(lut, path, decimals),
            LutFormat::IridasCube => IridasCube.write(lut, path, decimals),
            LutFormat::ResolveCube => ResolveCube.write(lut, path, decimals),
            LutFormat::SonySpi1d => Spi1d.write(lut, path, decimals),
            LutFormat::SonySpi3d => Spi3d.write(lut, path, decimals),
            LutFormat::SonySpimtx => SpiMtx.write(lut, path, decimals),
        }
    }
}

/// Lowercase, without spaces, underscores or dashes.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for LutFormat {
    type Err = LutError;

    /// Parses a display name, case-insensitive: `"sony spi3d"`,
    /// `"Sony_SPI3D"` and `"SonySpi3d"` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|format| normalize(format.name()) == wanted)
            .ok_or_else(|| LutError::UnsupportedFormat(format!("unknown LUT format '{}'", s)))
    }
}

impl fmt::Display for LutFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How [`read_lut`](crate::read_lut) and [`write_lut`](crate::write_lut)
/// pick a codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Infer the format from the file extension.
    #[default]
    Auto,
    /// Use this format regardless of the extension.
    Format(LutFormat),
}

impl Method {
    /// Resolves to a concrete format for `path`.
    pub fn resolve(self, path: &Path) -> LutResult<LutFormat> {
        match self {
            Method::Auto => LutFormat::from_path(path),
            Method::Format(format) => Ok(format),
        }
    }
}

impl From<LutFormat> for Method {
    fn from(format: LutFormat) -> Self {
        Method::Format(format)
    }
}

impl FromStr for Method {
    type Err = LutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(Method::Auto)
        } else {
            s.parse().map(Method::Format)
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Auto => f.write_str("auto"),
            Method::Format(format) => format.fmt(f),
        }
    }
}
