//! Hands URIs to the platform opener

use anyhow::{Context, Result};
use std::process::Command;

pub trait UriLauncher {
    fn open(&self, uri: &str) -> Result<()>;
}

/// `xdg-open` on Linux/BSD, `open` on macOS, `start` on Windows
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl UriLauncher for SystemLauncher {
    fn open(&self, uri: &str) -> Result<()> {
        tracing::debug!(uri, "launching");

        let status = opener_command(uri)
            .status()
            .with_context(|| format!("Failed to launch {}", uri))?;

        if !status.success() {
            anyhow::bail!("Failed to launch {}: opener exited with {}", uri, status);
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(uri);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", uri]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(uri: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(uri);
    cmd
}
