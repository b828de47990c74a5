//! Command-line flags and the optional TOML settings file.
//!
//! Every setting has a default; a `--config` file may override any subset,
//! and command-line flags override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "photoland-feed",
    about = "Browse photography feeds in the terminal with infinite scroll"
)]
pub struct Args {
    /// TOML settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fetch pages from this base URL instead of generating them locally
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Simulated latency of the local provider, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Probability (0..=1) that a locally generated page fails
    #[arg(long)]
    pub failure_rate: Option<f64>,

    /// Give up on a page request after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Rows below the viewport at which the next page is requested
    #[arg(long)]
    pub prefetch_rows: Option<usize>,

    /// Seed for the local provider, for reproducible feeds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to write logs (the terminal is busy with the UI)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: Option<String>,
    pub page_size: usize,
    pub latency_ms: u64,
    pub failure_rate: f64,
    pub timeout_secs: u64,
    pub prefetch_rows: usize,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            page_size: 12,
            latency_ms: 500,
            failure_rate: 0.0,
            timeout_secs: 10,
            prefetch_rows: 1,
            seed: None,
            log_file: PathBuf::from("photoland-feed.log"),
        }
    }
}

impl Settings {
    /// Build the effective settings from the command line.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let base = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let settings = base.with_args(args);
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay any flags given on the command line.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(endpoint) = &args.endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        if let Some(v) = args.page_size {
            self.page_size = v;
        }
        if let Some(v) = args.latency_ms {
            self.latency_ms = v;
        }
        if let Some(v) = args.failure_rate {
            self.failure_rate = v;
        }
        if let Some(v) = args.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = args.prefetch_rows {
            self.prefetch_rows = v;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(path) = &args.log_file {
            self.log_file = path.clone();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "failure_rate must be between 0 and 1, got {}",
                self.failure_rate
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
