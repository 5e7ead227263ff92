//! Interactive access key setup

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use thiserror::Error;

use crate::credentials::{Credential, CredentialError, CredentialStore, SecretStore};
use crate::launcher::UriLauncher;
use crate::prompt::{is_affirmative, Prompt};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Access key must not be empty")]
    EmptyToken,
    #[error("Access key must have the form <accessKeyId>:<secretAccessKey>")]
    InvalidToken,
    #[error("Failed to save access key")]
    Persist(#[source] CredentialError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// An access key was already stored and the user chose to keep it
    Kept,
    Configured(Credential),
}

pub struct Authenticator<S, P, L> {
    credentials: CredentialStore<S>,
    prompt: P,
    launcher: L,
    access_key_uri: String,
}

impl<S, P, L> Authenticator<S, P, L>
where
    S: SecretStore,
    P: Prompt,
    L: UriLauncher,
{
    pub fn new(store: S, prompt: P, launcher: L, access_key_uri: impl Into<String>) -> Self {
        Self {
            credentials: CredentialStore::new(store),
            prompt,
            launcher,
            access_key_uri: access_key_uri.into(),
        }
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    /// Walk the user through storing an access key.
    ///
    /// If one is stored already the user is asked before it is replaced.
    pub async fn configure<W: Write>(&self, out: &mut W) -> Result<AuthOutcome> {
        if let Some(existing) = self.credentials.get() {
            writeln!(
                out,
                "{} Already configured with access key {}",
                "::".bright_blue(),
                existing.access_key_id.bright_white()
            )?;
            let answer = self
                .prompt
                .ask("Do you want to reconfigure? (y/N)")
                .await?;
            if !is_affirmative(&answer) {
                writeln!(out, "{}", "Keeping the current access key".yellow())?;
                return Ok(AuthOutcome::Kept);
            }
        }

        writeln!(
            out,
            "{} Opening Inkdrop to show your access key...",
            "::".bright_blue()
        )?;
        self.launcher
            .open(&self.access_key_uri)
            .context("Failed to open Inkdrop")?;

        let token = self.prompt.ask("Paste your access key").await?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken.into());
        }
        let credential = Credential::parse(token).ok_or(AuthError::InvalidToken)?;

        self.credentials
            .set(&credential.to_raw())
            .map_err(AuthError::Persist)?;
        tracing::debug!(access_key_id = %credential.access_key_id, "access key stored");

        writeln!(out, "{} Access key saved", "✓".bright_green())?;
        Ok(AuthOutcome::Configured(credential))
    }

    /// The stored credential, running [`configure`](Self::configure) first
    /// when there is none. Still `None` if the user skipped setup.
    pub async fn ensure_authenticated<W: Write>(&self, out: &mut W) -> Result<Option<Credential>> {
        if let Some(credential) = self.credentials.get() {
            return Ok(Some(credential));
        }

        writeln!(
            out,
            "{} No access key configured yet",
            "::".bright_yellow()
        )?;
        self.configure(out).await?;
        Ok(self.credentials.get())
    }

    /// Forget the stored access key
    pub fn logout(&self) -> Result<()> {
        self.credentials
            .clear()
            .context("Failed to remove access key")
    }
}
