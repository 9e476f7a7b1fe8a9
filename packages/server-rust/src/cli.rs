//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use crate::network::{NetworkConfig, DEFAULT_PORT};
use crate::storage::BUNDLED_SEED;

/// Movies server options. Every flag can also come from the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "movies-server", version, about = "In-memory movie catalogue HTTP API")]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Extra CORS origins, comma-separated, added to the built-in allow-list.
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// JSON seed dataset to load instead of the bundled one.
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl ServerArgs {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
        .with_extra_origins(&self.allowed_origins)
    }

    /// Reads the configured seed file, or returns the bundled dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the seed file cannot be read.
    pub fn seed_json(&self) -> anyhow::Result<String> {
        match &self.seed_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read seed file {}", path.display())),
            None => Ok(BUNDLED_SEED.to_string()),
        }
    }
}
