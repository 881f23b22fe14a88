use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::Input;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod config;
mod download;
mod error;
mod ffmpeg;
mod logging;
mod playlist;

use config::{
    DownloadConfig, DEFAULT_DEST_DIR, DEFAULT_DEST_FILE, DEFAULT_FFMPEG, DEFAULT_HTTP_TIMEOUT_SECS,
};
use playlist::{PlaylistResolver, DEFAULT_USER_AGENT};

#[derive(Parser)]
#[command(name = "hls-grab")]
#[command(about = "Download a video stream or HLS playlist to a local file with ffmpeg")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    download: DownloadArgs,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a stream (the default when no subcommand is given)
    Download(DownloadArgs),
    /// Print the stream URL a playlist resolves to, without downloading
    Resolve {
        /// Playlist URL
        url: String,
        #[command(flatten)]
        http: HttpArgs,
    },
}

#[derive(Args, Clone)]
struct HttpArgs {
    /// User-Agent header sent with playlist requests
    #[arg(long, env = "HLS_GRAB_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
    /// Playlist request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Args, Clone)]
struct DownloadArgs {
    /// Video URL (.m3u8 or direct); prompted for when omitted
    #[arg(short, long)]
    url: Option<String>,
    /// Directory to save the file in; prompted for when omitted
    #[arg(short, long)]
    dir: Option<PathBuf>,
    /// Output file name; prompted for when omitted
    #[arg(short, long)]
    output: Option<String>,
    /// ffmpeg binary to run
    #[arg(long, env = "HLS_GRAB_FFMPEG", default_value = DEFAULT_FFMPEG)]
    ffmpeg: String,
    /// Keep an existing output file instead of overwriting it
    #[arg(long)]
    no_overwrite: bool,
    /// Never prompt; missing values fall back to their defaults
    #[arg(long)]
    no_prompt: bool,
    #[command(flatten)]
    http: HttpArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Download(args)) => run_download(args).await,
        Some(Commands::Resolve { url, http }) => run_resolve(&url, &http).await,
        None => run_download(cli.download).await,
    }
}

async fn run_download(args: DownloadArgs) -> Result<()> {
    let config = build_config(args)?;
    info!("Saving {} to {}", config.source_url, config.output_path().display());

    let output = download::download(&config).await?;
    println!("{}", output.display());
    Ok(())
}

async fn run_resolve(url: &str, http: &HttpArgs) -> Result<()> {
    let config = DownloadConfig {
        user_agent: http.user_agent.clone(),
        http_timeout: Duration::from_secs(http.timeout),
        ..DownloadConfig::new(url)
    };
    let client = config.http_client().context("Failed to build HTTP client")?;
    let resolver = PlaylistResolver::new(client, config.user_agent.as_str());

    let stream_url = resolver.resolve_variant(url).await?;
    println!("{}", stream_url);
    Ok(())
}

/// Fill in whatever the flags left out, asking on the terminal unless
/// `--no-prompt` is set. A blank URL stops here, before any other prompt.
fn build_config(args: DownloadArgs) -> Result<DownloadConfig> {
    let prompt = !args.no_prompt;

    let source_url = match args.url {
        Some(url) => url,
        None if prompt => Input::<String>::new()
            .with_prompt("Enter the video URL (.m3u8 or direct)")
            .allow_empty(true)
            .interact_text()?,
        None => String::new(),
    };

    let mut config = DownloadConfig::new(source_url);
    config.validate()?;

    config.dest_dir = match args.dir {
        Some(dir) => dir,
        None if prompt => PathBuf::from(
            Input::<String>::new()
                .with_prompt("Enter the directory to save the file")
                .default(DEFAULT_DEST_DIR.to_string())
                .interact_text()?,
        ),
        None => PathBuf::from(DEFAULT_DEST_DIR),
    };

    config.dest_file = match args.output {
        Some(file) => file,
        None if prompt => Input::<String>::new()
            .with_prompt("Enter the output file name")
            .default(DEFAULT_DEST_FILE.to_string())
            .interact_text()?,
        None => DEFAULT_DEST_FILE.to_string(),
    };

    config.ffmpeg_program = args.ffmpeg;
    config.user_agent = args.http.user_agent;
    config.http_timeout = Duration::from_secs(args.http.timeout);
    config.overwrite = !args.no_overwrite;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DownloadError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hls-grab").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_without_subcommand_mean_download() {
        let cli = parse(&["-u", "https://x/master.m3u8", "-d", "out", "-o", "a.mkv"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.download.url.as_deref(), Some("https://x/master.m3u8"));

        let config = build_config(cli.download).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("out").join("a.mkv"));
        assert!(config.overwrite);
    }

    #[test]
    fn no_prompt_applies_defaults() {
        let cli = parse(&["--no-prompt", "--url", "https://x/video.mp4", "--no-overwrite"]);
        let config = build_config(cli.download).unwrap();

        assert_eq!(config.dest_dir, PathBuf::from(DEFAULT_DEST_DIR));
        assert_eq!(config.dest_file, DEFAULT_DEST_FILE);
        assert!(!config.overwrite);
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn missing_url_without_prompt_is_rejected() {
        let cli = parse(&["--no-prompt"]);
        let err = build_config(cli.download).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DownloadError>(),
            Some(DownloadError::EmptyUrl)
        ));
    }

    #[test]
    fn resolve_subcommand_takes_positional_url() {
        let cli = parse(&["resolve", "https://x/master.m3u8", "--timeout", "5"]);
        match cli.command {
            Some(Commands::Resolve { url, http }) => {
                assert_eq!(url, "https://x/master.m3u8");
                assert_eq!(http.timeout, 5);
            }
            _ => panic!("expected resolve subcommand"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
