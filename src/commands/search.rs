use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use crate::package::PackageManager;
use crate::registry::{PackageMetadata, SearchQuery, SearchResult};

pub async fn run<M: PackageManager, W: Write>(
    pm: &M,
    query: &SearchQuery,
    out: &mut W,
) -> Result<()> {
    let results = pm
        .search(query)
        .await
        .with_context(|| format!("Failed to search for '{}'", query.text))?;

    if results.is_empty() {
        writeln!(
            out,
            "{}",
            format!("No packages found for '{}'", query.text).yellow()
        )?;
        return Ok(());
    }

    for pkg in &results {
        write_result(pkg, out)?;
    }
    Ok(())
}

fn write_result<W: Write>(pkg: &SearchResult, out: &mut W) -> Result<()> {
    let id = format!(
        "{}@{}",
        pkg.name.bright_white(),
        pkg.releases.latest.bright_green()
    );
    match pkg.metadata.description.as_deref() {
        Some(description) if !description.is_empty() => writeln!(out, "{} - {}", id, description)?,
        _ => writeln!(out, "{}", id)?,
    }
    writeln!(out, "    {}", details(pkg.downloads, &pkg.metadata).dimmed())?;
    Ok(())
}

/// `1234 downloads · MIT · vim, keymap · inkdrop ^5.0.0`
pub(crate) fn details(downloads: u64, metadata: &PackageMetadata) -> String {
    let mut parts = vec![format!("{} downloads", downloads)];
    if let Some(license) = &metadata.license {
        parts.push(license.clone());
    }
    if !metadata.keywords.is_empty() {
        parts.push(metadata.keywords.join(", "));
    }
    if !metadata.engines.is_empty() {
        parts.push(engines(metadata));
    }
    parts.join(" · ")
}

pub(crate) fn engines(metadata: &PackageMetadata) -> String {
    metadata
        .engines
        .iter()
        .map(|(engine, range)| format!("{} {}", engine, range))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{plain_output, text, FakeManager};
    use crate::registry::{Releases, SearchSort, SortDirection};

    fn result() -> SearchResult {
        SearchResult {
            name: "vim".to_string(),
            releases: Releases {
                latest: "2.1.0".to_string(),
            },
            metadata: PackageMetadata {
                description: Some("Vim keybindings".to_string()),
                license: Some("MIT".to_string()),
                keywords: vec!["vim".to_string(), "keymap".to_string()],
                engines: [("inkdrop".to_string(), "^5.0.0".to_string())]
                    .into_iter()
                    .collect(),
            },
            downloads: 1234,
        }
    }

    #[tokio::test]
    async fn prints_results_with_details() {
        let pm = FakeManager {
            search: vec![result()],
            ..Default::default()
        };
        let mut out = plain_output();

        run(&pm, &SearchQuery::new("vim"), &mut out).await.unwrap();

        assert_eq!(
            text(out),
            "vim@2.1.0 - Vim keybindings\n    1234 downloads · MIT · vim, keymap · inkdrop ^5.0.0\n"
        );
    }

    #[tokio::test]
    async fn no_results_has_its_own_message() {
        let pm = FakeManager::default();
        let mut out = plain_output();

        run(&pm, &SearchQuery::new("zzz"), &mut out).await.unwrap();

        assert_eq!(text(out), "No packages found for 'zzz'\n");
    }

    #[tokio::test]
    async fn sort_options_reach_the_client() {
        let pm = FakeManager::default();
        let query = SearchQuery {
            text: "theme".to_string(),
            sort: Some(SearchSort::Recency),
            direction: Some(SortDirection::Asc),
        };
        let mut out = plain_output();

        run(&pm, &query, &mut out).await.unwrap();

        let calls = pm.calls.borrow();
        assert!(calls[0].contains("(\"sort\", \"recency\")"));
        assert!(calls[0].contains("(\"direction\", \"asc\")"));
    }

    #[test]
    fn details_skip_missing_metadata() {
        assert_eq!(details(0, &PackageMetadata::default()), "0 downloads");
    }
}
