use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

/// Client settings (TOML file and environment).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(String),
    #[error("invalid setting for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("settings error: {0}")]
    Other(String),
}

/// Webhook targets file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("configuration file not found: {path}")]
    Missing { path: PathBuf },
    #[error("configuration file is empty: {path}")]
    Empty { path: PathBuf },
    #[error("configuration file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no target matches channel {channel:?} and app {app:?}")]
    NotFound { channel: String, app: String },
    #[error("no targets are configured")]
    EmptyConfiguration,
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error("no target selected")]
    NoTarget,
    #[error("webhook host {host}:{port} is unreachable")]
    Unreachable { host: String, port: u16 },
    #[error("failed to build HTTP client")]
    Client {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("webhook answered with HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl From<reqwest::Error> for SendError {
    fn from(source: reqwest::Error) -> Self {
        Self::Request { source }
    }
}

impl Error {
    /// `true` for failures caused by the network rather than by local state.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Send(
                SendError::Request { .. }
                    | SendError::HttpStatus { .. }
                    | SendError::Unreachable { .. }
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, SelectError, SendError};

    #[test]
    fn network_failures_are_classified() {
        let unreachable = Error::from(SendError::Unreachable {
            host: "hooks.example.com".to_string(),
            port: 80,
        });
        assert!(unreachable.is_network());
        assert!(!Error::from(SendError::NoTarget).is_network());
        assert!(!Error::from(SelectError::EmptyConfiguration).is_network());
    }
}
