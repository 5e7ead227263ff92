pub mod client;
#[cfg(test)]
pub(crate) mod testing;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub use client::RegistryClient;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry rejected the access key (HTTP {0}); run `ipm configure` to set a new one")]
    Unauthorized(u16),
    #[error("Registry request to {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Download from {url} is larger than {limit} bytes")]
    TooLarge { url: String, limit: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Releases {
    pub latest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Engine name to compatible version range, e.g. `inkdrop => ^5.0.0`
    #[serde(default)]
    pub engines: BTreeMap<String, String>,
}

/// One hit from a registry search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub releases: Releases,
    #[serde(default)]
    pub metadata: PackageMetadata,
    #[serde(default)]
    pub downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersion {
    pub version: String,
}

/// Full registry record for one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    #[serde(flatten)]
    pub summary: SearchResult,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub versions: Vec<PackageVersion>,
}

impl PackageInfo {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn latest_version(&self) -> &str {
        &self.summary.releases.latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    /// Registry's default relevance ranking
    Majority,
    /// Most recently published first
    Recency,
    /// Alphabetical by name
    Title,
    /// Most downloaded first
    Downloads,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Majority => "majority",
            SearchSort::Recency => "recency",
            SearchSort::Title => "title",
            SearchSort::Downloads => "downloads",
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub sort: Option<SearchSort>,
    pub direction: Option<SortDirection>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sort: None,
            direction: None,
        }
    }

    /// Query-string pairs sent to the registry
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.text.clone())];
        if let Some(sort) = self.sort {
            params.push(("sort", sort.as_str().to_string()));
        }
        if let Some(direction) = self.direction {
            params.push(("direction", direction.as_str().to_string()));
        }
        params
    }
}
