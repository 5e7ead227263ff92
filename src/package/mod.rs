//! Plugin management: what is installed locally and how it gets there

pub mod archive;
pub mod local;

use anyhow::{Context, Result};
use std::cmp::Ordering;
use thiserror::Error;

use crate::config::Config;
use crate::credentials::Credential;
use crate::registry::{PackageInfo, RegistryClient, SearchQuery, SearchResult};

pub use local::{PackageManifest as InstalledPackage, PluginDir};

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Package '{0}' was not found in the registry")]
    NotFound(String),
    #[error("Package '{0}' is not installed")]
    NotInstalled(String),
    #[error("Invalid package name '{0}'")]
    InvalidName(String),
    #[error("Tarball for '{expected}' contains package '{found}'")]
    NameMismatch { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedPackage {
    pub name: String,
    pub current: String,
    pub latest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated {
        name: String,
        from: String,
        to: String,
    },
    UpToDate {
        name: String,
        version: String,
    },
}

/// Everything the commands need from a package manager
#[allow(async_fn_in_trait)]
pub trait PackageManager {
    async fn installed(&self) -> Result<Vec<InstalledPackage>>;
    async fn outdated(&self) -> Result<Vec<OutdatedPackage>>;
    async fn install(&self, name: &str, version: Option<&str>) -> Result<InstalledPackage>;
    async fn update(&self, name: &str, version: Option<&str>) -> Result<UpdateOutcome>;
    /// `Ok(false)` when the package was not installed to begin with.
    async fn uninstall(&self, name: &str) -> Result<bool>;
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;
    async fn package_info(&self, name: &str) -> Result<Option<PackageInfo>>;
}

/// Builds a [`PackageManager`] for whatever credential is current
pub trait ClientFactory {
    type Client: PackageManager;

    fn connect(&self, credential: Option<Credential>) -> Result<Self::Client>;
}

/// Registry-backed package manager working on the local plugin directory
#[derive(Debug, Clone)]
pub struct Ipm {
    registry: RegistryClient,
    plugins: PluginDir,
    show_progress: bool,
}

impl Ipm {
    pub fn new(registry: RegistryClient, plugins: PluginDir) -> Self {
        Self {
            registry,
            plugins,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    async fn require_info(&self, name: &str) -> Result<PackageInfo> {
        self.registry
            .package_info(name)
            .await?
            .ok_or_else(|| PackageError::NotFound(name.to_string()).into())
    }
}

impl PackageManager for Ipm {
    async fn installed(&self) -> Result<Vec<InstalledPackage>> {
        self.plugins.list()
    }

    async fn outdated(&self) -> Result<Vec<OutdatedPackage>> {
        let mut outdated = Vec::new();

        for pkg in self.plugins.list()? {
            let Some(info) = self.registry.package_info(&pkg.name).await? else {
                tracing::debug!("{} is not in the registry, skipping", pkg.name);
                continue;
            };
            let latest = info.latest_version();
            if is_newer(&pkg.version, latest) {
                outdated.push(OutdatedPackage {
                    latest: latest.to_string(),
                    name: pkg.name,
                    current: pkg.version,
                });
            }
        }

        Ok(outdated)
    }

    async fn install(&self, name: &str, version: Option<&str>) -> Result<InstalledPackage> {
        check_name(name)?;
        let info = self.require_info(name).await?;
        let version = version.unwrap_or(info.latest_version()).to_string();

        let tarball = self
            .registry
            .download_tarball(name, &version, self.show_progress)
            .await?;

        let root = self.plugins.root();
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", root.display()))?;
        let staging = tempfile::Builder::new()
            .prefix(".ipm-")
            .tempdir_in(root)
            .context("Failed to create staging directory")?;
        let unpacked = staging.path().join(name);

        let manifest = archive::unpack(&tarball, &unpacked)?;
        if manifest.name != name {
            return Err(PackageError::NameMismatch {
                expected: name.to_string(),
                found: manifest.name,
            }
            .into());
        }

        self.plugins.replace(name, &unpacked)?;
        tracing::debug!("installed {}@{}", manifest.name, manifest.version);
        Ok(manifest)
    }

    async fn update(&self, name: &str, version: Option<&str>) -> Result<UpdateOutcome> {
        check_name(name)?;
        let current = self
            .plugins
            .manifest(name)?
            .ok_or_else(|| PackageError::NotInstalled(name.to_string()))?;

        let target = match version {
            Some(v) if v != current.version => v.to_string(),
            Some(_) => {
                return Ok(UpdateOutcome::UpToDate {
                    name: current.name,
                    version: current.version,
                })
            }
            None => {
                let info = self.require_info(name).await?;
                if !is_newer(&current.version, info.latest_version()) {
                    return Ok(UpdateOutcome::UpToDate {
                        name: current.name,
                        version: current.version,
                    });
                }
                info.latest_version().to_string()
            }
        };

        let installed = self.install(name, Some(&target)).await?;
        Ok(UpdateOutcome::Updated {
            name: installed.name,
            from: current.version,
            to: installed.version,
        })
    }

    async fn uninstall(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        self.plugins.remove(name)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.registry.search(query).await
    }

    async fn package_info(&self, name: &str) -> Result<Option<PackageInfo>> {
        self.registry.package_info(name).await
    }
}

/// Connects [`Ipm`] using the loaded [`Config`]
#[derive(Debug, Clone)]
pub struct IpmFactory {
    config: Config,
    show_progress: bool,
}

impl IpmFactory {
    pub fn new(config: Config, show_progress: bool) -> Self {
        Self {
            config,
            show_progress,
        }
    }
}

impl ClientFactory for IpmFactory {
    type Client = Ipm;

    fn connect(&self, credential: Option<Credential>) -> Result<Ipm> {
        let registry = RegistryClient::new(&self.config.registry, credential)?;
        let plugins = PluginDir::new(self.config.packages_dir());
        Ok(Ipm::new(registry, plugins).with_progress(self.show_progress))
    }
}

/// Whether `latest` is a newer release than `current`. Versions that are not
/// semver compare as "newer" whenever they differ.
pub fn is_newer(current: &str, latest: &str) -> bool {
    match (
        semver::Version::parse(current),
        semver::Version::parse(latest),
    ) {
        (Ok(current), Ok(latest)) => latest.cmp(&current) == Ordering::Greater,
        _ => current != latest,
    }
}

/// Package names become directory names, so keep them to one path segment.
fn check_name(name: &str) -> Result<(), PackageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(PackageError::InvalidName(name.to_string()))
    }
}
