use std::path::PathBuf;

use tracing::info;

use crate::config::DownloadConfig;
use crate::error::{DownloadError, Result};
use crate::ffmpeg::FfmpegJob;
use crate::playlist::{is_playlist_url, PlaylistResolver};

/// Download `config.source_url` into `config.output_path()` with ffmpeg
/// stream copy.
///
/// `.m3u8` sources go through the playlist resolver first; anything else is
/// handed to ffmpeg as is. Returns the path of the written file.
pub async fn download(config: &DownloadConfig) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&config.dest_dir)
        .await
        .map_err(|source| DownloadError::Filesystem {
            path: config.dest_dir.clone(),
            source,
        })?;
    let output_path = config.output_path();

    let stream_url = if is_playlist_url(&config.source_url) {
        let resolver = PlaylistResolver::new(config.http_client()?, config.user_agent.as_str());
        resolver
            .resolve(&config.source_url)
            .await
            .ok_or_else(|| DownloadError::Unresolved {
                url: config.source_url.clone(),
            })?
    } else {
        config.source_url.clone()
    };

    info!("Downloading video from: {}", stream_url);

    let mut job = FfmpegJob::new(&config.ffmpeg_program, stream_url, &output_path);
    job.overwrite = config.overwrite;
    job.run().await?;

    info!("Download completed: {}", output_path.display());
    Ok(output_path)
}
