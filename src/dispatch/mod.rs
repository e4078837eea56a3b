//! Reachability probe and webhook posting for a selected target.

mod client;
mod payload;
mod probe;

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::Result;
use crate::config::{HttpSettings, ProbeSettings};
use crate::error::SendError;
use crate::types::{ProbePolicy, Target};

pub use client::WebhookClient;
pub use payload::build_payload;
pub use probe::{host_from_url, is_host_reachable};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProbeOutcome {
    Skipped,
    Reachable,
    Unreachable,
}

impl ProbeOutcome {
    /// Whether `policy` lets a send go ahead after this outcome.
    #[must_use]
    pub const fn permits_send(self, policy: ProbePolicy) -> bool {
        !matches!((policy, self), (ProbePolicy::Enforce, Self::Unreachable))
    }
}

impl Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skipped => "skipped",
            Self::Reachable => "reachable",
            Self::Unreachable => "unreachable",
        })
    }
}

/// A message accepted by the webhook endpoint.
#[derive(Clone, Debug)]
pub struct Delivery {
    pub status: StatusCode,
    pub correlation_id: Uuid,
    pub latency: Duration,
    pub probe: ProbeOutcome,
}

#[derive(Clone)]
pub struct Dispatcher {
    client: WebhookClient,
    probe: ProbeSettings,
}

impl Dispatcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(http: &HttpSettings, probe: ProbeSettings) -> Result<Self> {
        Ok(Self {
            client: WebhookClient::new(http)?,
            probe,
        })
    }

    pub const fn probe_settings(&self) -> ProbeSettings {
        self.probe
    }

    /// Run the reachability probe for `target` according to the policy.
    pub async fn probe(&self, target: &Target) -> ProbeOutcome {
        if self.probe.policy == ProbePolicy::Off {
            return ProbeOutcome::Skipped;
        }
        let reachable =
            is_host_reachable(&target.webhook_url, self.probe.port, self.probe.timeout).await;
        info!(
            url = %target.redacted_url(),
            port = self.probe.port,
            reachable,
            "webhook active"
        );
        if reachable {
            ProbeOutcome::Reachable
        } else {
            ProbeOutcome::Unreachable
        }
    }

    /// Probe `target` and report whether sending may proceed.
    ///
    /// Under the advisory policy this is always `true`; the probe result is
    /// only logged.
    pub async fn check_target(&self, target: &Target) -> bool {
        self.probe(target).await.permits_send(self.probe.policy)
    }

    /// Probe, then post `message` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Unreachable`] when the enforcing policy blocks the
    /// send, otherwise whatever [`WebhookClient::post_text`] reports.
    pub async fn send(&self, target: &Target, message: &str) -> Result<Delivery> {
        let correlation_id = Uuid::now_v7();
        let probe = self.probe(target).await;
        if !probe.permits_send(self.probe.policy) {
            warn!(%correlation_id, url = %target.redacted_url(), "webhook inactive, message not sent");
            return Err(SendError::Unreachable {
                host: host_from_url(&target.webhook_url)
                    .unwrap_or_default()
                    .to_string(),
                port: self.probe.port,
            }
            .into());
        }

        let started = Instant::now();
        match self.client.post_text(&target.webhook_url, message).await {
            Ok(status) => {
                let latency = started.elapsed();
                info!(
                    %correlation_id,
                    channel = %target.channel_name,
                    app = %target.app_name,
                    %status,
                    latency_ms = latency.as_millis(),
                    "message sending completed"
                );
                Ok(Delivery {
                    status,
                    correlation_id,
                    latency,
                    probe,
                })
            }
            Err(err) => {
                error!(
                    %correlation_id,
                    channel = %target.channel_name,
                    app = %target.app_name,
                    error = %err,
                    "message sending failed"
                );
                Err(err)
            }
        }
    }
}
