use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::Result;
use crate::config::HttpSettings;
use crate::error::SendError;

use super::payload::build_payload;

const BODY_PREVIEW_LIMIT: usize = 256;

/// HTTP side of the dispatcher: one POST per message, no retries.
#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Client`] if the underlying HTTP client fails to
    /// build (for instance when no TLS roots can be loaded).
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(concat!("slackhook/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| SendError::Client { source })?;

        Ok(Self { http })
    }

    /// POST `{"text": message}` to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Request`] on transport, DNS or timeout failures
    /// and [`SendError::HttpStatus`] when the endpoint answers outside 2xx.
    pub async fn post_text(&self, url: &str, message: &str) -> Result<StatusCode> {
        let body = build_payload(message);
        debug!(bytes = body.len(), "posting webhook payload");

        let response = self
            .http
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(SendError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map(|bytes| body_preview(&bytes))
                .unwrap_or_else(|err| format!("<unreadable body: {err}>"));
            return Err(SendError::HttpStatus { status, body }.into());
        }
        Ok(status)
    }
}

fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}
