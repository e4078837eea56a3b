use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dispatch::host_from_url;

pub const DEFAULT_APP_NAME: &str = "none";

/// One configured webhook target.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Target {
    pub channel_name: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    pub webhook_url: String,
}

impl Target {
    /// `true` when the webhook URL parses with both a scheme and a host.
    ///
    /// The raw string must also start with `scheme://authority`, so
    /// `https:///host` and `http:/host` are rejected even though the parser
    /// repairs them. Purely structural: nothing is resolved or contacted.
    #[must_use]
    pub fn has_well_formed_url(&self) -> bool {
        host_from_url(&self.webhook_url).is_some()
            && Url::parse(&self.webhook_url)
                .is_ok_and(|url| url.host_str().is_some_and(|host| !host.is_empty()))
    }

    #[must_use]
    pub fn matches(&self, channel_name: &str, app_name: &str) -> bool {
        self.channel_name == channel_name && self.app_name == app_name
    }

    /// `scheme://host` form of the webhook URL, safe to log.
    ///
    /// Incoming webhooks carry their secret in the path, so the path and
    /// query are never part of the result.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        match Url::parse(&self.webhook_url) {
            Ok(url) => match url.host_str() {
                Some(host) => format!("{}://{host}/…", url.scheme()),
                None => format!("{}:…", url.scheme()),
            },
            Err(_) => "<invalid url>".to_string(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> TargetSummary {
        TargetSummary {
            channel_name: self.channel_name.clone(),
            app_name: self.app_name.clone(),
            url_well_formed: self.has_well_formed_url(),
        }
    }
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

/// Listing line for a configured target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetSummary {
    pub channel_name: String,
    pub app_name: String,
    pub url_well_formed: bool,
}

impl Display for TargetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Channel : {}", self.channel_name)?;
        writeln!(f, "App Name : {}", self.app_name)?;
        write!(f, "WebHook URL : {}", self.url_well_formed)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LoadStatus {
    #[default]
    NotLoaded,
    Invalid,
    Loaded,
}

impl LoadStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotLoaded => "not-loaded",
            Self::Invalid => "invalid",
            Self::Loaded => "loaded",
        }
    }
}

impl Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the dispatcher does with the reachability probe before posting.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// No probe at all.
    Off,
    /// Probe and log the outcome, then send regardless.
    #[default]
    Advisory,
    /// Refuse to send when the probe fails.
    Enforce,
}

impl ProbePolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Advisory => "advisory",
            Self::Enforce => "enforce",
        }
    }
}

impl Display for ProbePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" | "skip" => Ok(Self::Off),
            "advisory" | "warn" => Ok(Self::Advisory),
            "enforce" | "strict" => Ok(Self::Enforce),
            other => Err(format!("unknown probe policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProbePolicy, Target};
    use std::str::FromStr;

    fn target(url: &str) -> Target {
        Target {
            channel_name: "ops".to_string(),
            app_name: "bot".to_string(),
            webhook_url: url.to_string(),
        }
    }

    #[test]
    fn well_formed_requires_scheme_and_host() {
        assert!(target("https://hooks.example.com/x").has_well_formed_url());
        assert!(!target("hooks.example.com/x").has_well_formed_url());
        assert!(!target("mailto:ops@example.com").has_well_formed_url());
        assert!(!target("").has_well_formed_url());
        assert!(!target("https:///hooks.example.com/x").has_well_formed_url());
        assert!(!target("http:/hooks.example.com/x").has_well_formed_url());
    }

    #[test]
    fn redacted_url_drops_the_secret_path() {
        let redacted = target("https://hooks.slack.com/services/T0/B0/secret").redacted_url();
        assert_eq!(redacted, "https://hooks.slack.com/…");
        assert!(!redacted.contains("secret"));
    }

    #[test]
    fn missing_app_name_defaults_to_none() {
        let parsed: Target = match serde_json::from_str(
            r#"{"channel_name":"ops","webhook_url":"https://hooks.example.com/x"}"#,
        ) {
            Ok(value) => value,
            Err(err) => panic!("failed to parse target: {err}"),
        };
        assert_eq!(parsed.app_name, "none");
    }

    #[test]
    fn summary_renders_listing_lines() {
        let rendered = target("https://hooks.example.com/x").summary().to_string();
        assert_eq!(
            rendered,
            "Channel : ops\nApp Name : bot\nWebHook URL : true"
        );
    }

    #[test]
    fn probe_policy_from_str_accepts_variants() {
        assert_eq!(ProbePolicy::from_str("off"), Ok(ProbePolicy::Off));
        assert_eq!(ProbePolicy::from_str("Advisory"), Ok(ProbePolicy::Advisory));
        assert_eq!(ProbePolicy::from_str("ENFORCE"), Ok(ProbePolicy::Enforce));
        assert!(ProbePolicy::from_str("sometimes").is_err());
    }
}
