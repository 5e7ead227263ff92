//! Single-line terminal prompts

use anyhow::{Context, Result};

/// Asks the user one question and returns the trimmed answer
#[allow(async_fn_in_trait)]
pub trait Prompt {
    async fn ask(&self, message: &str) -> Result<String>;
}

/// Reads from the controlling terminal via dialoguer.
///
/// Each call opens the terminal on a blocking task and releases it when the
/// line is submitted, so nothing stays attached between prompts.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    async fn ask(&self, message: &str) -> Result<String> {
        let message = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            dialoguer::Input::<String>::new()
                .with_prompt(message)
                .allow_empty(true)
                .interact_text()
        })
        .await
        .context("Prompt task failed")?
        .context("Failed to read user input")?;

        Ok(answer.trim().to_string())
    }
}

/// `y` or `yes`, any case. Everything else is a no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", "Yes", " y "] {
            assert!(is_affirmative(answer), "{answer:?} should be yes");
        }
    }

    #[test]
    fn everything_else_is_negative() {
        for answer in ["", "n", "no", "yep", "sure", "ye", "yess", "1"] {
            assert!(!is_affirmative(answer), "{answer:?} should be no");
        }
    }
}
