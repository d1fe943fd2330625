//! Supported formats listing.

use anyhow::Result;
use lutio::LutFormat;

/// Prints every format with its extensions.
pub fn run() -> Result<()> {
    for line in format_table() {
        println!("{}", line);
    }
    Ok(())
}

fn format_table() -> Vec<String> {
    LutFormat::ALL
        .iter()
        .map(|format| {
            let exts: Vec<String> = format.extensions().iter().map(|e| format!(".{}", e)).collect();
            format!("{:<14} {}", format.name(), exts.join(", "))
        })
        .collect()
}
