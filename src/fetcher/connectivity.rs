//! Cheap pre-flight check that the API host is reachable by name.
//!
//! Used to short-circuit a load with a dedicated empty state instead of
//! waiting for the HTTP timeouts.

use std::time::Duration;

use tokio::net::lookup_host;
use url::Url;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Returns true if the host of `request_url` resolves within `timeout`.
///
/// A malformed URL or one without a host counts as offline.
pub async fn is_online(request_url: &str, timeout: Duration) -> bool {
    let url = match Url::parse(request_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!("Connectivity probe got a malformed URL: {}", e);
            return false;
        }
    };

    let (host, port) = match (url.host_str(), url.port_or_known_default()) {
        (Some(host), Some(port)) => (host.to_string(), port),
        _ => return false,
    };

    let online = match tokio::time::timeout(timeout, lookup_host((host.as_str(), port))).await {
        Ok(Ok(mut addrs)) => addrs.next().is_some(),
        Ok(Err(e)) => {
            tracing::info!("No connectivity to {}: {}", host, e);
            false
        }
        Err(_) => {
            tracing::info!("Connectivity probe for {} timed out", host);
            false
        }
    };
    online
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_loopback_is_online() {
        assert!(is_online("http://127.0.0.1:8080/search", PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_named_host_is_resolved() {
        assert!(is_online("http://localhost:8080/search", PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_malformed_url_is_offline() {
        assert!(!is_online("::nonsense", PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_url_without_host_is_offline() {
        assert!(!is_online("file:///tmp/search.json", PROBE_TIMEOUT).await);
    }
}
