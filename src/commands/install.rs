//! Package installation command

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::PackageManager;

pub async fn run<M: PackageManager, W: Write>(
    pm: &M,
    package: &str,
    version: Option<&str>,
    out: &mut W,
) -> Result<()> {
    match version {
        Some(v) => writeln!(
            out,
            "{} Installing {}@{}...",
            "::".bright_blue(),
            package.bright_white(),
            v
        )?,
        None => writeln!(
            out,
            "{} Installing {}...",
            "::".bright_blue(),
            package.bright_white()
        )?,
    }

    let installed = pm
        .install(package, version)
        .await
        .with_context(|| format!("Failed to install {}", package))?;

    writeln!(
        out,
        "{} Installed {}@{}",
        "✓".bright_green(),
        installed.name.bright_white(),
        installed.version.bright_green()
    )?;
    Ok(())
}
