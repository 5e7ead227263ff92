//! The plugin directory the desktop app loads from

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of a plugin's `package.json` we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn read_manifest(package_dir: &Path) -> Result<PackageManifest> {
    let path = package_dir.join(MANIFEST_FILE);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[derive(Debug, Clone)]
pub struct PluginDir {
    root: PathBuf,
}

impl PluginDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.package_dir(name).join(MANIFEST_FILE).is_file()
    }

    pub fn manifest(&self, name: &str) -> Result<Option<PackageManifest>> {
        if !self.is_installed(name) {
            return Ok(None);
        }
        read_manifest(&self.package_dir(name)).map(Some)
    }

    /// Every installed plugin, sorted by name. Directories without a readable
    /// manifest are skipped.
    pub fn list(&self) -> Result<Vec<PackageManifest>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut packages = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read {}", self.root.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            match read_manifest(&path) {
                Ok(manifest) => packages.push(manifest),
                Err(e) => tracing::debug!("skipping {}: {:#}", path.display(), e),
            }
        }

        packages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packages)
    }

    /// Move a freshly unpacked staging directory into place as `name`.
    ///
    /// A previous install is first moved aside next to `staged` and only
    /// deleted once the new copy is in place; if that move fails it is put
    /// back.
    pub fn replace(&self, name: &str, staged: &Path) -> Result<PathBuf> {
        let dest = self.package_dir(name);
        let backup = if dest.exists() {
            let backup = staged.with_file_name(format!("{}.previous", name));
            fs::rename(&dest, &backup)
                .with_context(|| format!("Failed to move aside {}", dest.display()))?;
            Some(backup)
        } else {
            None
        };

        if let Err(e) = fs::rename(staged, &dest) {
            if let Some(backup) = &backup {
                if let Err(restore) = fs::rename(backup, &dest) {
                    tracing::error!(
                        "could not restore {} from {}: {}",
                        dest.display(),
                        backup.display(),
                        restore
                    );
                }
            }
            return Err(e)
                .with_context(|| format!("Failed to move package into {}", dest.display()));
        }

        if let Some(backup) = backup {
            if let Err(e) = fs::remove_dir_all(&backup) {
                tracing::warn!("failed to remove {}: {}", backup.display(), e);
            }
        }
        Ok(dest)
    }

    /// Returns `false` when nothing was installed under `name`. A directory
    /// without a manifest is not an install and is left alone.
    pub fn remove(&self, name: &str) -> Result<bool> {
        if !self.is_installed(name) {
            return Ok(false);
        }
        let dir = self.package_dir(name);
        fs::remove_dir_all(&dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
        Ok(true)
    }
}
