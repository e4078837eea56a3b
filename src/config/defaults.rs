use std::time::Duration;

use super::DEFAULT_TARGETS_PATH;

pub(super) fn default_targets_path() -> String {
    DEFAULT_TARGETS_PATH.to_string()
}

pub(super) const fn default_probe_port() -> u16 {
    80
}

pub(super) const fn default_probe_timeout() -> Duration {
    Duration::from_secs(3)
}

pub(super) const fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}
