use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DownloadError, Result};
use crate::playlist::DEFAULT_USER_AGENT;

pub const DEFAULT_DEST_DIR: &str = "./downloads";
pub const DEFAULT_DEST_FILE: &str = "output.mp4";
pub const DEFAULT_FFMPEG: &str = "ffmpeg";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for a single download run.
#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Direct media URL or `.m3u8` playlist URL. Must not be blank.
    pub source_url: String,
    /// Directory the output file is written to; created if missing.
    pub dest_dir: PathBuf,
    /// Output file name inside `dest_dir`. The extension picks the container.
    pub dest_file: String,
    /// Media tool binary, looked up on `PATH` unless absolute.
    pub ffmpeg_program: String,
    /// User-Agent sent when fetching playlists.
    pub user_agent: String,
    /// Pass `-y` so an existing output file is replaced.
    pub overwrite: bool,
    /// Whole-request timeout for playlist fetches.
    pub http_timeout: Duration,
}

impl DownloadConfig {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.dest_dir.join(&self.dest_file)
    }

    /// Trims the URL and rejects it if nothing is left.
    pub fn validate(&mut self) -> Result<()> {
        let trimmed = self.source_url.trim();
        if trimmed.is_empty() {
            return Err(DownloadError::EmptyUrl);
        }
        self.source_url = trimmed.to_string();
        Ok(())
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()?;
        Ok(client)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            dest_dir: PathBuf::from(DEFAULT_DEST_DIR),
            dest_file: DEFAULT_DEST_FILE.to_string(),
            ffmpeg_program: DEFAULT_FFMPEG.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            overwrite: true,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
