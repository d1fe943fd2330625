//! # lutio
//!
//! Look-Up Table (LUT) types and file formats for VFX color pipelines.
//!
//! This crate provides an in-memory LUT model and text codecs for the
//! common interchange formats, with a dispatch layer that picks the codec
//! from a file extension or an explicit format name.
//!
//! # LUT Types
//!
//! - [`Lut1D`] - single curve applied to every channel
//! - [`Lut3x1D`] - independent per-channel curves (shapers)
//! - [`Lut3D`] - full RGB cube
//! - [`LutOperatorMatrix`] - 4x4 matrix with offset
//! - [`LutSequence`] - ordered chain of the above
//!
//! [`AnyLut`] is what the readers return and the writers accept.
//!
//! # Supported Formats
//!
//! | Format | Module | Extension |
//! |--------|--------|-----------|
//! | Cinespace | [`csp`] | `.csp` |
//! | Iridas Cube | [`cube`] | `.cube` |
//! | Resolve Cube | [`resolve_cube`] | `.cube` |
//! | Sony SPI1D / SPI3D | [`spi`] | `.spi1d`, `.spi3d` |
//! | Sony SPImtx | [`spi_mtx`] | `.spimtx` |
//!
//! # Usage
//!
//! ```rust,no_run
//! use lutio::{DEFAULT_DECIMALS, LutFormat, Method, read_lut, write_lut};
//!
//! // Resolve shaper + cube files read as a two-node sequence.
//! let lut = read_lut("grade.cube", Method::Auto)?;
//! let rgb = lut.apply([0.5, 0.3, 0.2]);
//!
//! write_lut(&lut, "grade.csp", DEFAULT_DECIMALS, LutFormat::Cinespace.into())?;
//! # Ok::<(), lutio::LutError>(())
//! ```
//!
//! # Interpolation
//!
//! - 1D / 3x1D LUTs: linear interpolation
//! - 3D LUTs: nearest, trilinear or tetrahedral ([`Interpolation`])
//!
//! # Dependencies
//!
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Diagnostics

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod common;
mod dispatch;
mod domain;
mod error;
mod format;
mod interp;
mod lut1d;
mod lut3d;
mod lut3x1d;
mod node;
mod operator;
mod sampling;
mod sequence;
mod traits;

pub mod csp;
pub mod cube;
pub mod resolve_cube;
pub mod spi;
pub mod spi_mtx;

pub use common::{DEFAULT_DECIMALS, MAX_CUBE_SIZE, MAX_SHAPER_SIZE};
pub use dispatch::{read_lut, write_lut};
pub use domain::{DEFAULT_DOMAIN, DEFAULT_DOMAIN_1D};
pub use error::{LutError, LutResult};
pub use format::{LutFormat, Method};
pub use interp::Interpolation;
pub use lut1d::Lut1D;
pub use lut3d::Lut3D;
pub use lut3x1d::Lut3x1D;
pub use node::{AnyLut, DEFAULT_CUBE_SIZE, LutKind, LutNode};
pub use operator::LutOperatorMatrix;
pub use sampling::{AxisSamples, GridSamples, RowSamples};
pub use sequence::LutSequence;
pub use traits::{LutReader, LutWriter};

pub use csp::{read_csp, write_csp};
pub use cube::{read_iridas_cube, write_iridas_cube};
pub use resolve_cube::{read_resolve_cube, write_resolve_cube};
pub use spi::{read_spi1d, read_spi3d, write_spi1d, write_spi3d};
pub use spi_mtx::{read_spimtx, write_spimtx};
