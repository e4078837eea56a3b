use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::error::Error as HookError;
use crate::types::ProbePolicy;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

pub const DEFAULT_SETTINGS_FILE: &str = "slackhook.toml";
pub const DEFAULT_TARGETS_PATH: &str = "/configuration/config.js";

#[derive(Debug, Clone)]
pub struct Settings {
    pub targets: TargetsSettings,
    pub probe: ProbeSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct TargetsSettings {
    /// Path of the targets file, resolved under `base_dir`.
    pub path: String,
    /// `None` means the process working directory.
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeSettings {
    pub policy: ProbePolicy,
    pub port: u16,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Settings {
    /// Load settings from a TOML file and the environment.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when environment
    /// overrides are invalid, or when the resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(HookError::from)?;
        raw.apply_env_overrides().map_err(HookError::from)?;
        raw.validate_and_build()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            targets: TargetsSettings {
                path: DEFAULT_TARGETS_PATH.to_string(),
                base_dir: None,
            },
            probe: ProbeSettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            policy: ProbePolicy::default(),
            port: defaults::default_probe_port(),
            timeout: defaults::default_probe_timeout(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: defaults::default_connect_timeout(),
            request_timeout: defaults::default_request_timeout(),
        }
    }
}
