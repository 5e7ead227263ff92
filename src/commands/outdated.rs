use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::PackageManager;

pub async fn run<M: PackageManager, W: Write>(pm: &M, out: &mut W) -> Result<()> {
    let outdated = pm
        .outdated()
        .await
        .context("Failed to check for outdated packages")?;

    if outdated.is_empty() {
        writeln!(out, "{} All packages are up to date", "✓".bright_green())?;
        return Ok(());
    }

    writeln!(
        out,
        "{} Available updates ({}):",
        "::".bright_blue(),
        outdated.len()
    )?;
    for pkg in &outdated {
        writeln!(
            out,
            "   {} {} → {}",
            pkg.name.bright_white(),
            pkg.current.bright_red(),
            pkg.latest.bright_green()
        )?;
    }
    Ok(())
}
