//! Carrier tracking HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One GET per code, no
//! retries: every failure becomes `TrackingStatus::QueryError` for that code.

use std::fmt;
use std::time::Duration;

use crate::status::{parse_response, TrackingStatus};

pub const DEFAULT_BASE_URL: &str = "https://proxyapp.correios.com.br/v1/sro-rastro";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can resolve a tracking code to a status.
pub trait StatusLookup {
    fn lookup(&mut self, code: &str) -> TrackingStatus;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint prefix; the code is appended as the last path segment.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Error type for client construction. Lookups themselves never fail.
#[derive(Debug)]
pub enum TrackingError {
    /// The HTTP client could not be built (TLS backend, bad user agent, ...)
    Client(String),
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::Client(msg) => write!(f, "Cannot create HTTP client: {}", msg),
        }
    }
}

impl std::error::Error for TrackingError {}

/// Tracking API client (blocking).
#[derive(Clone)]
pub struct TrackingClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl TrackingClient {
    pub fn new(config: ClientConfig) -> Result<Self, TrackingError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| TrackingError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Query one code. Non-2xx responses are still parsed: the carrier answers
    /// unknown codes with a JSON body.
    pub fn fetch_status(&self, code: &str) -> TrackingStatus {
        let url = self.url_for(code);
        log::debug!("GET {url}");

        let body = self
            .http
            .get(&url)
            .send()
            .and_then(|resp| {
                log::debug!("{code}: HTTP {}", resp.status().as_u16());
                resp.text()
            });

        match body {
            Ok(text) => parse_response(&text),
            Err(e) => {
                log::warn!("{code}: request failed: {e}");
                TrackingStatus::QueryError
            }
        }
    }
}

impl StatusLookup for TrackingClient {
    fn lookup(&mut self, code: &str) -> TrackingStatus {
        self.fetch_status(code)
    }
}
