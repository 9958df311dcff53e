use std::path::PathBuf;

use clap::Parser as ClapParser;
use tracing::warn;

use crate::catalog;
use crate::clock::{MAX_FPS, MIN_FPS};
use crate::error::ImportError;
use crate::snippet;

/// animate a 16x16 grid of dots with a tiny expression of t, i, x and y
#[derive(Debug, Clone, ClapParser)]
#[command(name = "tixy")]
#[command(about = "Expression-driven grid animation in the terminal")]
pub struct Config {
    /// Expression to start with
    #[arg(long)]
    pub code: Option<String>,

    /// Import the starting expression from a javascript file or directory
    #[arg(long)]
    pub snippet: Option<PathBuf>,

    /// Target frame rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Write log lines to this file (filter with RUST_LOG)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn fps(&self) -> u32 {
        self.fps.clamp(MIN_FPS, MAX_FPS)
    }

    /// the text the editor opens with, plus the import failure if the
    /// snippet could not be used. a failed import keeps the other source
    pub fn initial_source(&self) -> (String, Option<ImportError>) {
        let code = self
            .code
            .clone()
            .unwrap_or_else(|| catalog::first().code.to_owned());
        match &self.snippet {
            None => (code, None),
            Some(path) => match snippet::import(path) {
                Ok(imported) => (imported, None),
                Err(error) => {
                    warn!(path = %path.display(), %error, "could not load snippet");
                    (code, Some(error))
                }
            },
        }
    }
}

/// a command line that reopens tixy with `code`, single-quoted for a posix
/// shell
pub fn share_command(code: &str) -> String {
    format!("tixy --code '{}'", code.replace('\'', r"'\''"))
}
