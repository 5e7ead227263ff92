//! HTTP client for the plugin registry

use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{RequestBuilder, Response, StatusCode, Url};

use super::{PackageInfo, RegistryError, SearchQuery, SearchResult};
use crate::config::RegistryConfig;
use crate::credentials::Credential;

/// Largest tarball we are willing to buffer
pub const MAX_TARBALL_SIZE: u64 = 64 << 20;

#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: Url,
    credential: Option<Credential>,
    http: reqwest::Client,
    max_tarball_size: u64,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig, credential: Option<Credential>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(config.url.trim_end_matches('/'))
            .with_context(|| format!("Invalid registry URL {}", config.url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid registry URL {}", config.url);
        }

        Ok(Self {
            base_url,
            credential,
            http,
            max_tarball_size: MAX_TARBALL_SIZE,
        })
    }

    pub fn with_max_tarball_size(mut self, limit: u64) -> Self {
        self.max_tarball_size = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/seg/seg/..` with every segment percent-encoded. Empty, `.` and
    /// `..` segments are refused since they would change the endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            anyhow::bail!("Invalid path segment '{}' in registry URL", bad);
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Invalid registry URL {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn package_url(&self, name: &str) -> Result<Url> {
        self.endpoint(&["packages", name])
    }

    pub fn tarball_url(&self, name: &str, version: &str) -> Result<Url> {
        self.endpoint(&["packages", name, "versions", version, "tarball"])
    }

    fn get(&self, url: &Url) -> RequestBuilder {
        let request = self.http.get(url.clone());
        match &self.credential {
            Some(c) => request.basic_auth(&c.access_key_id, Some(&c.secret_access_key)),
            None => request,
        }
    }

    /// Search the registry. Ranking is done server-side.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let url = self.endpoint(&["packages"])?;
        tracing::debug!(%url, query = %query.text, "searching registry");

        let response = self
            .get(&url)
            .query(&query.params())
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        check_status(&url, response)?
            .json()
            .await
            .context("Failed to parse search results")
    }

    /// Registry record for `name`, `None` when the registry does not know it
    pub async fn package_info(&self, name: &str) -> Result<Option<PackageInfo>> {
        let url = self.package_url(name)?;
        tracing::debug!(%url, "fetching package info");

        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to query {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let info = check_status(&url, response)?
            .json()
            .await
            .with_context(|| format!("Failed to parse package info for {}", name))?;
        Ok(Some(info))
    }

    /// Download the gzipped tarball of one release
    pub async fn download_tarball(
        &self,
        name: &str,
        version: &str,
        show_progress: bool,
    ) -> Result<Vec<u8>> {
        let url = self.tarball_url(name, version)?;
        tracing::debug!(%url, "downloading tarball");

        let response = self
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to download {}", url))?;
        let response = check_status(&url, response)?;

        let limit = self.max_tarball_size;
        let total_size = response.content_length().unwrap_or(0);
        if total_size > limit {
            return Err(too_large(&url, limit));
        }
        let pb = if show_progress {
            let pb = ProgressBar::new(total_size);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("━━─");
            pb.set_style(style);
            pb.set_message(format!("{}@{}", name, version));
            Some(pb)
        } else {
            None
        };

        let mut bytes = Vec::with_capacity(total_size.min(limit) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Error reading download stream")?;
            if (bytes.len() + chunk.len()) as u64 > limit {
                if let Some(ref pb) = pb {
                    pb.abandon();
                }
                return Err(too_large(&url, limit));
            }
            bytes.extend_from_slice(&chunk);
            if let Some(ref pb) = pb {
                pb.inc(chunk.len() as u64);
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(bytes)
    }
}

fn too_large(url: &Url, limit: u64) -> anyhow::Error {
    RegistryError::TooLarge {
        url: url.to_string(),
        limit,
    }
    .into()
}

fn check_status(url: &Url, response: Response) -> Result<Response, RegistryError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(RegistryError::Unauthorized(status.as_u16()));
    }
    if !status.is_success() {
        return Err(RegistryError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}
