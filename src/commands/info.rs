use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

use super::search::engines;
use crate::package::{PackageError, PackageManager};
use crate::registry::PackageInfo;

pub async fn run<M: PackageManager, W: Write>(pm: &M, package: &str, out: &mut W) -> Result<()> {
    let info = pm
        .package_info(package)
        .await
        .and_then(|info| info.ok_or_else(|| PackageError::NotFound(package.to_string()).into()))
        .with_context(|| format!("Failed to fetch info for {}", package))?;

    write_info(&info, out)
}

fn write_info<W: Write>(info: &PackageInfo, out: &mut W) -> Result<()> {
    let metadata = &info.summary.metadata;
    let none = || "-".to_string();

    field(out, "Name", info.name().to_string())?;
    field(out, "Version", info.latest_version().to_string())?;
    field(
        out,
        "Description",
        metadata.description.clone().unwrap_or_else(none),
    )?;
    field(out, "License", metadata.license.clone().unwrap_or_else(none))?;
    if !metadata.keywords.is_empty() {
        field(out, "Keywords", metadata.keywords.join(", "))?;
    }
    if !metadata.engines.is_empty() {
        field(out, "Engines", engines(metadata))?;
    }
    field(out, "Downloads", info.summary.downloads.to_string())?;
    field(out, "Repository", info.repository.clone().unwrap_or_else(none))?;
    if !info.versions.is_empty() {
        let versions: Vec<&str> = info.versions.iter().map(|v| v.version.as_str()).collect();
        field(out, "Versions", versions.join(", "))?;
    }
    Ok(())
}

fn field<W: Write>(out: &mut W, label: &str, value: String) -> Result<()> {
    writeln!(out, "{}: {}", label.bright_white(), value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{plain_output, text, FakeManager};
    use crate::registry::{PackageMetadata, PackageVersion, Releases, SearchResult};

    fn math() -> PackageInfo {
        PackageInfo {
            summary: SearchResult {
                name: "math".to_string(),
                releases: Releases {
                    latest: "1.4.2".to_string(),
                },
                metadata: PackageMetadata {
                    description: Some("KaTeX support".to_string()),
                    license: Some("MIT".to_string()),
                    keywords: Vec::new(),
                    engines: [("inkdrop".to_string(), "^5.0.0".to_string())]
                        .into_iter()
                        .collect(),
                },
                downloads: 42,
            },
            repository: Some("https://github.com/inkdropapp/inkdrop-math".to_string()),
            versions: vec![
                PackageVersion {
                    version: "1.4.2".to_string(),
                },
                PackageVersion {
                    version: "1.4.1".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn prints_labelled_fields() {
        let pm = FakeManager {
            info: Some(math()),
            ..Default::default()
        };
        let mut out = plain_output();

        run(&pm, "math", &mut out).await.unwrap();

        assert_eq!(
            text(out),
            "Name: math\n\
             Version: 1.4.2\n\
             Description: KaTeX support\n\
             License: MIT\n\
             Engines: inkdrop ^5.0.0\n\
             Downloads: 42\n\
             Repository: https://github.com/inkdropapp/inkdrop-math\n\
             Versions: 1.4.2, 1.4.1\n"
        );
    }

    #[tokio::test]
    async fn unknown_package_is_an_error() {
        let pm = FakeManager::default();
        let mut out = plain_output();

        let err = run(&pm, "nope", &mut out).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch info for nope");
        assert!(format!("{err:#}").contains("'nope' was not found"));
        assert!(matches!(
            err.downcast_ref::<PackageError>(),
            Some(PackageError::NotFound(name)) if name == "nope"
        ));
    }
}
