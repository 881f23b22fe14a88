//! Master playlist resolution.
//!
//! A master playlist is recognised by the `#EXT-X-STREAM-INF` tag. The first
//! variant listed after it is taken as the stream to download; bandwidth and
//! resolution attributes are not compared, so "best" means "listed first".

use reqwest::header::USER_AGENT;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{DownloadError, Result};

pub const MASTER_MARKER: &str = "#EXT-X-STREAM-INF";
pub const PLAYLIST_EXTENSION: &str = ".m3u8";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

pub fn is_playlist_url(url: &str) -> bool {
    url.ends_with(PLAYLIST_EXTENSION)
}

/// Pick the stream URL out of a playlist body.
///
/// Leaf playlists yield `manifest_url` untouched. For master playlists the
/// first line after the marker that ends in `.m3u8` is joined against
/// `manifest_url`; absolute variant URLs come back as they are.
pub fn select_variant(manifest_url: &str, body: &str) -> Result<String> {
    let mut lines = body.lines();
    if !lines.by_ref().any(|line| line.contains(MASTER_MARKER)) {
        return Ok(manifest_url.to_string());
    }

    let variant = lines
        .map(str::trim)
        .find(|line| line.ends_with(PLAYLIST_EXTENSION))
        .ok_or_else(|| DownloadError::NoVariant {
            url: manifest_url.to_string(),
        })?;

    resolve_url(manifest_url, variant)
}

fn resolve_url(base: &str, relative: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|source| DownloadError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;

    let resolved = base_url
        .join(relative)
        .map_err(|source| DownloadError::InvalidUrl {
            url: relative.to_string(),
            source,
        })?;

    Ok(resolved.to_string())
}

/// Fetches playlists over HTTP and resolves them to a playable stream URL.
#[derive(Debug, Clone)]
pub struct PlaylistResolver {
    client: reqwest::Client,
    user_agent: String,
}

impl PlaylistResolver {
    pub fn new(client: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
        }
    }

    pub async fn fetch_manifest(&self, url: &str) -> Result<String> {
        debug!("Fetching playlist {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }

    pub async fn resolve_variant(&self, url: &str) -> Result<String> {
        let body = self.fetch_manifest(url).await?;
        let stream_url = select_variant(url, &body)?;

        if stream_url == url {
            debug!("{} is a media playlist", url);
        } else {
            info!("Master playlist {} resolved to {}", url, stream_url);
        }

        Ok(stream_url)
    }

    /// Like [`resolve_variant`](Self::resolve_variant), but logs the failure
    /// and returns `None` instead of an error.
    pub async fn resolve(&self, url: &str) -> Option<String> {
        match self.resolve_variant(url).await {
            Ok(stream_url) => Some(stream_url),
            Err(e) => {
                warn!("Error fetching m3u8 playlist: {}", e);
                None
            }
        }
    }
}
