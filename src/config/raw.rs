use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::types::ProbePolicy;

use super::defaults::{
    default_connect_timeout, default_probe_port, default_probe_timeout, default_request_timeout,
    default_targets_path,
};
use super::env::{env_duration, env_parse, env_string};
use super::{HttpSettings, HumantimeDuration, ProbeSettings, Settings, TargetsSettings};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawSettings, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("SLACKHOOK")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawSettings {
    #[serde(default)]
    pub(super) targets: RawTargets,
    #[serde(default)]
    pub(super) probe: RawProbe,
    #[serde(default)]
    pub(super) http: RawHttp,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawTargets {
    #[serde(default = "default_targets_path")]
    pub(super) path: String,
    #[serde(default)]
    pub(super) base_dir: Option<PathBuf>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawProbe {
    #[serde(default)]
    pub(super) policy: Option<String>,
    #[serde(default = "default_probe_port")]
    pub(super) port: u16,
    #[serde(default = "default_probe_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timeout: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawHttp {
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) connect_timeout: Duration,
    #[serde(default = "default_request_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) request_timeout: Duration,
}

impl RawSettings {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(path) = env_string("SLACKHOOK_CONFIG_PATH")? {
            self.targets.path = path;
        }
        if let Some(dir) = env_string("SLACKHOOK_BASE_DIR")? {
            self.targets.base_dir = Some(PathBuf::from(dir));
        }
        if let Some(policy) = env_string("SLACKHOOK_PROBE_POLICY")? {
            self.probe.policy = Some(policy);
        }
        if let Some(port) = env_parse::<u16>("SLACKHOOK_PROBE_PORT")? {
            self.probe.port = port;
        }
        if let Some(timeout) = env_duration("SLACKHOOK_PROBE_TIMEOUT")? {
            self.probe.timeout = timeout;
        }
        if let Some(timeout) = env_duration("SLACKHOOK_HTTP_CONNECT_TIMEOUT")? {
            self.http.connect_timeout = timeout;
        }
        if let Some(timeout) = env_duration("SLACKHOOK_HTTP_TIMEOUT")? {
            self.http.request_timeout = timeout;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Settings> {
        if self.targets.path.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "targets.path",
                message: "path cannot be empty".to_string(),
            }
            .into());
        }

        let policy = match self.probe.policy {
            Some(src) => {
                ProbePolicy::from_str(&src).map_err(|err| ConfigError::InvalidField {
                    field: "probe.policy",
                    message: err,
                })?
            }
            None => ProbePolicy::default(),
        };

        if self.probe.port == 0 {
            return Err(ConfigError::InvalidField {
                field: "probe.port",
                message: "port must be greater than zero".to_string(),
            }
            .into());
        }
        if self.probe.timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "probe.timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.http.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "http.connect_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.http.request_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "http.request_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(Settings {
            targets: TargetsSettings {
                path: self.targets.path,
                base_dir: self.targets.base_dir,
            },
            probe: ProbeSettings {
                policy,
                port: self.probe.port,
                timeout: self.probe.timeout,
            },
            http: HttpSettings {
                connect_timeout: self.http.connect_timeout,
                request_timeout: self.http.request_timeout,
            },
        })
    }
}

impl Default for RawTargets {
    fn default() -> Self {
        Self {
            path: default_targets_path(),
            base_dir: None,
        }
    }
}

impl Default for RawProbe {
    fn default() -> Self {
        Self {
            policy: None,
            port: default_probe_port(),
            timeout: default_probe_timeout(),
        }
    }
}

impl Default for RawHttp {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}
