use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::{PackageManager, UpdateOutcome};

pub async fn run<M: PackageManager, W: Write>(
    pm: &M,
    package: &str,
    version: Option<&str>,
    out: &mut W,
) -> Result<()> {
    writeln!(
        out,
        "{} Checking {} for updates...",
        "::".bright_blue(),
        package.bright_white()
    )?;

    let outcome = pm
        .update(package, version)
        .await
        .with_context(|| format!("Failed to update {}", package))?;

    match outcome {
        UpdateOutcome::Updated { name, from, to } => writeln!(
            out,
            "{} Updated {} from {} to {}",
            "✓".bright_green(),
            name.bright_white(),
            from.bright_red(),
            to.bright_green()
        )?,
        UpdateOutcome::UpToDate { name, version } => writeln!(
            out,
            "{} {} is already up to date ({})",
            "✓".bright_green(),
            name.bright_white(),
            version
        )?,
    }
    Ok(())
}
