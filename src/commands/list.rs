use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::{InstalledPackage, PackageManager};

pub async fn run<M: PackageManager, W: Write>(pm: &M, out: &mut W) -> Result<()> {
    let packages = pm
        .installed()
        .await
        .context("Failed to list installed packages")?;

    if packages.is_empty() {
        writeln!(out, "{}", "No packages installed".yellow())?;
        return Ok(());
    }

    for pkg in &packages {
        writeln!(out, "{}", format_installed(pkg))?;
    }
    Ok(())
}

/// `name@version - description`
pub fn format_installed(pkg: &InstalledPackage) -> String {
    let id = format!("{}@{}", pkg.name.bright_white(), pkg.version.bright_green());
    match pkg.description.as_deref() {
        Some(description) if !description.is_empty() => format!("{} - {}", id, description),
        _ => id,
    }
}
