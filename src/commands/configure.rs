use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use crate::auth::Authenticator;
use crate::credentials::SecretStore;
use crate::launcher::UriLauncher;
use crate::prompt::Prompt;

pub async fn run<S, P, L, W>(auth: &Authenticator<S, P, L>, out: &mut W) -> Result<()>
where
    S: SecretStore,
    P: Prompt,
    L: UriLauncher,
    W: Write,
{
    auth.configure(out).await?;
    Ok(())
}

pub fn logout<S, P, L, W>(auth: &Authenticator<S, P, L>, out: &mut W) -> Result<()>
where
    S: SecretStore,
    P: Prompt,
    L: UriLauncher,
    W: Write,
{
    auth.logout()?;
    writeln!(out, "{} Access key removed", "✓".bright_green())?;
    Ok(())
}
