//! LUT info command.
//!
//! Prints the summary of each input LUT.

use crate::InfoArgs;
use anyhow::Result;
use tracing::info;

/// Runs the info command.
pub fn run(args: InfoArgs) -> Result<()> {
    for (i, path) in args.input.iter().enumerate() {
        let lut = super::load_lut(path, args.method)?;
        info!(path = %path.display(), kind = lut.type_name(), "loaded");

        if i > 0 {
            println!();
        }
        println!("{}", path.display());
        println!();
        println!("{}", lut);
    }

    Ok(())
}
