use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Host part of `scheme://host[/path]`.
///
/// Splits once on `"://"` and once on `"/"`; no further parsing happens, so a
/// port or credentials in the authority stay part of the returned host.
pub fn host_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let host = rest.split_once('/').map_or(rest, |(host, _)| host);
    (!host.is_empty()).then_some(host)
}

/// Best-effort TCP connect to `(host, port)`.
///
/// Nothing is sent and the connection is dropped as soon as it opens. DNS
/// resolution counts against `limit`. Any error or timeout yields `false`.
pub async fn is_host_reachable(url: &str, port: u16, limit: Duration) -> bool {
    let Some(host) = host_from_url(url) else {
        debug!("probe skipped: url has no scheme://host form");
        return false;
    };

    match timeout(limit, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            drop(stream);
            true
        }
        Ok(Err(err)) => {
            debug!(host, port, error = %err, "probe connection failed");
            false
        }
        Err(_) => {
            debug!(host, port, timeout_ms = limit.as_millis(), "probe timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::host_from_url;

    #[test]
    fn extracts_host_between_scheme_and_path() {
        assert_eq!(
            host_from_url("https://hooks.slack.com/services/T0/B0/x"),
            Some("hooks.slack.com")
        );
        assert_eq!(host_from_url("http://example.com"), Some("example.com"));
        assert_eq!(host_from_url("http://127.0.0.1:8080/x"), Some("127.0.0.1:8080"));
    }

    #[test]
    fn rejects_urls_without_authority() {
        assert_eq!(host_from_url("hooks.slack.com/services"), None);
        assert_eq!(host_from_url("https:///path-only"), None);
    }
}
