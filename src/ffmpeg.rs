use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{DownloadError, Result};

/// One stream-copy invocation of ffmpeg: the first video and first audio
/// stream of `input` are remuxed into `output` without re-encoding.
#[derive(Debug, Clone)]
pub struct FfmpegJob {
    pub program: String,
    pub input: String,
    pub output: PathBuf,
    pub overwrite: bool,
}

impl FfmpegJob {
    pub fn new(program: impl Into<String>, input: impl Into<String>, output: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            input: input.into(),
            output: output.as_ref().to_path_buf(),
            overwrite: true,
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            self.input.clone(),
            "-c".to_string(),
            "copy".to_string(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "0:a:0".to_string(),
        ];
        if self.overwrite {
            args.push("-y".to_string());
        }
        args.push(self.output.to_string_lossy().into_owned());
        args
    }

    /// Shell-like rendering for log and error messages.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }

    /// Run to completion. stdio is inherited so ffmpeg's own progress shows.
    pub async fn run(&self) -> Result<()> {
        debug!("Running {}", self.command_line());

        let status = tokio::process::Command::new(&self.program)
            .args(self.args())
            .status()
            .await
            .map_err(|source| DownloadError::ProcessSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DownloadError::ProcessFailed {
                command: self.command_line(),
                status,
            });
        }

        info!("{} finished writing {}", self.program, self.output.display());
        Ok(())
    }
}
