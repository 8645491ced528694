//! Blocking HTTP transport for forwarded events

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// Transport-level failures; an HTTP error status is not one of these
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

/// Sends one request body and reports the HTTP status
pub trait Transport: Send + Sync {
    fn post(&self, url: &str, body: String) -> Result<u16, TransportError>;
}

/// `reqwest` blocking client with a bounded timeout
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, body: String) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout { url: url.to_string() }
                } else if e.is_connect() {
                    TransportError::Connect {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                } else {
                    TransportError::Request {
                        url: url.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        // Body is discarded; dropping the response releases the connection
        Ok(response.status().as_u16())
    }
}
