//! LUT format conversion command.

use crate::ConvertArgs;
use anyhow::Result;
use tracing::info;

/// Runs the convert command.
pub fn run(args: ConvertArgs) -> Result<()> {
    let lut = super::load_lut(&args.input, args.from)?;
    info!(
        input = %args.input.display(),
        kind = lut.type_name(),
        "converting"
    );

    super::save_lut(&args.output, &lut, args.decimals, args.to)?;
    info!(output = %args.output.display(), "done");

    Ok(())
}
