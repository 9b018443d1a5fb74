use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::mirror::{DEFAULT_THREAD_COUNT, MirrorConfig, REQUEST_TIMEOUT_SEC};
use crate::names::{CURRENT_DIR_SENTINEL, OutputDir};
use crate::origin::DEFAULT_NOISE_MARKER;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Program arguments. `MirrorConfig` only describes the mirroring run.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Download a web page with its local resources", long_about = None)]
pub struct Config {
    /// Page to download
    pub url: String,
    /// Output directory, `current` for the working directory
    #[arg(short, long, default_value = CURRENT_DIR_SENTINEL)]
    pub output: String,
    /// Number of resources downloaded at once
    #[arg(long, default_value_t = DEFAULT_THREAD_COUNT)]
    pub thread_count: usize,
    /// Request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SEC)]
    pub request_timeout: u64,
    /// Skip references containing this text (repeatable)
    #[arg(short = 'e', long = "exclude", default_values_t = [DEFAULT_NOISE_MARKER.to_string()])]
    pub noise_markers: Vec<String>,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.thread_count == 0 {
            anyhow::bail!("thread_count must be greater than 0");
        }
        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }
        Url::parse(&self.url)?;
        Ok(())
    }

    pub fn mirror_config(&self) -> anyhow::Result<MirrorConfig> {
        let page_url = Url::parse(&self.url)?;
        let output: OutputDir = self.output.parse()?;
        Ok(MirrorConfig::new(page_url, output)
            .with_thread_count(self.thread_count)
            .with_request_timeout(self.request_timeout)
            .with_noise_markers(self.noise_markers.clone()))
    }
}

/// Same spelling as on the command line, which is also what log2 expects
impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_possible_value() {
            Some(value) => write!(f, "{}", value.get_name()),
            None => Ok(()),
        }
    }
}
