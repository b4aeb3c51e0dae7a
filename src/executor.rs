use crate::{Error, NormalizedParams, Output, RequestSpec};
use reqwest::Client;
use std::time::Duration;

/// Passthrough parameter that overrides the request timeout, in seconds.
pub const REQUEST_TIMEOUT_KEY: &str = "request_timeout";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Something that can send a built request and extract its payload.
///
/// Every call issues exactly one request. Nothing is retried.
#[async_trait::async_trait]
pub trait Executor: Send + Sync + 'static {
    async fn execute(&self, request: &RequestSpec) -> Result<Output, Error>;
}

/// HTTP settings shared by both transports.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorOptions {
    /// Whole-request timeout. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Verify the server certificate. On unless explicitly disabled.
    pub verify_tls: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            verify_tls: true,
        }
    }
}

impl ExecutorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Accept any server certificate, including self-signed and expired ones.
    ///
    /// Only meant for gateways behind TLS-intercepting proxies during
    /// development. Anyone on the network path can read the API key.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Apply a `request_timeout` passthrough parameter, if present and valid.
    pub fn with_params(mut self, params: &NormalizedParams) -> Self {
        if let Some(raw) = params.get(REQUEST_TIMEOUT_KEY) {
            match raw.trim().parse::<f64>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 => {
                    self.timeout = Some(Duration::from_secs_f64(secs));
                }
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid {REQUEST_TIMEOUT_KEY}");
                }
            }
        }
        self
    }

    /// Build a fresh HTTP client for one call.
    pub(crate) fn http_client(&self) -> Result<Client, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if !self.verify_tls {
            tracing::warn!("TLS certificate verification is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_verify_tls() {
        let options = ExecutorOptions::default();
        assert!(options.verify_tls);
        assert_eq!(options.timeout, Some(Duration::from_secs(60)));
        assert!(!options.danger_accept_invalid_certs().verify_tls);
    }

    #[test]
    fn test_request_timeout_param() {
        let params = NormalizedParams::new().with(REQUEST_TIMEOUT_KEY, "2.5");
        let options = ExecutorOptions::new().with_params(&params);
        assert_eq!(options.timeout, Some(Duration::from_millis(2500)));

        let bad = NormalizedParams::new().with(REQUEST_TIMEOUT_KEY, "soon");
        let options = ExecutorOptions::new().without_timeout().with_params(&bad);
        assert_eq!(options.timeout, None);
    }

    #[test]
    fn test_http_client_builds() {
        assert!(ExecutorOptions::new().http_client().is_ok());
        assert!(ExecutorOptions::new()
            .danger_accept_invalid_certs()
            .http_client()
            .is_ok());
    }
}
