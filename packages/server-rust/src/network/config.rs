//! Network configuration types for the movies server.

use std::time::Duration;

use super::origin::DEFAULT_ALLOWED_ORIGINS;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 1234;

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Origins whose `Origin` header is echoed back in CORS responses.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
}

impl NetworkConfig {
    /// Adds deployment-specific origins to the allow-list, skipping blanks
    /// and entries already present.
    #[must_use]
    pub fn with_extra_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for origin in origins {
            let origin = origin.as_ref().trim();
            if !origin.is_empty() && !self.cors_origins.iter().any(|o| o == origin) {
                self.cors_origins.push(origin.to_string());
            }
        }
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            cors_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
