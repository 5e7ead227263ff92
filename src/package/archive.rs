//! Plugin tarball extraction
//!
//! Registry tarballs are gzipped tars with every entry under a single top
//! level directory (`package/` for npm-style packs). That directory is
//! stripped on unpack, so the plugin's `package.json` ends up at the root of
//! the destination.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

use super::local::{read_manifest, PackageManifest, MANIFEST_FILE};

/// Unpack `tarball` into `dest_dir` and return the manifest found there.
pub fn unpack(tarball: &[u8], dest_dir: &Path) -> Result<PackageManifest> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create {}", dest_dir.display()))?;

    let mut archive = Archive::new(GzDecoder::new(tarball));

    for entry in archive.entries().context("Failed to read tarball")? {
        let mut entry = entry.context("Corrupt tarball entry")?;
        let path = entry.path()?.into_owned();

        let Some(relative) = strip_top_level(&path) else {
            continue;
        };

        let kind = entry.header().entry_type();
        if kind.is_hard_link() {
            anyhow::bail!("Tarball entry {} is a hard link", relative.display());
        }
        if kind.is_symlink() {
            let link = entry
                .link_name()?
                .with_context(|| format!("Symlink {} has no target", relative.display()))?;
            if !link_stays_inside(&relative, &link) {
                anyhow::bail!(
                    "Symlink {} points outside the package ({})",
                    relative.display(),
                    link.display()
                );
            }
        }
        check_no_symlink_parents(dest_dir, &relative)?;

        let target = dest_dir.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&target)
            .with_context(|| format!("Failed to unpack {}", relative.display()))?;
    }

    if !dest_dir.join(MANIFEST_FILE).is_file() {
        anyhow::bail!("Package is missing {}", MANIFEST_FILE);
    }
    read_manifest(dest_dir)
}

/// Drop the first path component. Returns `None` for the top level
/// directory itself and for paths that try to escape the destination.
fn strip_top_level(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    components.next()?;

    let rest: PathBuf = components.collect();
    if rest.as_os_str().is_empty() {
        return None;
    }
    if rest
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        tracing::warn!("skipping suspicious tarball entry {}", path.display());
        return None;
    }
    Some(rest)
}

/// Resolve `link` lexically from the directory holding `entry` and check it
/// never climbs above the destination root.
fn link_stays_inside(entry: &Path, link: &Path) -> bool {
    let mut depth = entry.components().count().saturating_sub(1);
    for component in link.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Refuse to write through a symlink unpacked earlier. Together with
/// [`link_stays_inside`] this keeps every write under `dest_dir`.
fn check_no_symlink_parents(dest_dir: &Path, relative: &Path) -> Result<()> {
    let mut current = dest_dir.to_path_buf();
    let Some(parent) = relative.parent() else {
        return Ok(());
    };
    for component in parent.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                anyhow::bail!(
                    "Tarball entry {} is nested under a symlink",
                    relative.display()
                );
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    Ok(())
}
