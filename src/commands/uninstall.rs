use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::PackageManager;

pub async fn run<M: PackageManager, W: Write>(pm: &M, package: &str, out: &mut W) -> Result<()> {
    let removed = pm
        .uninstall(package)
        .await
        .with_context(|| format!("Failed to uninstall {}", package))?;

    if removed {
        writeln!(
            out,
            "{} Uninstalled {}",
            "✓".bright_green(),
            package.bright_white()
        )?;
    } else {
        // Nothing to do is not an error
        writeln!(
            out,
            "{} Package '{}' is not installed",
            "::".bright_yellow(),
            package
        )?;
    }
    Ok(())
}
