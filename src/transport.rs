use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result, format_status_error};
use crate::query::Params;

/// One GET against an absolute URL, returning decoded JSON.
///
/// Implementations do not retry. Any failure (connection, HTTP status
/// >= 400, undecodable body) is an [`Error::Request`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &str, params: &Params) -> Result<Value>;
}

/// The reqwest-backed transport; owns the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: HttpClient,
}

impl HttpTransport {
    pub fn new(timeout: Duration, verify: bool) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("caic-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("caic-rs")),
        );

        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(timeout);

        if !verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http })
    }
}

/// reqwest's `Display` stops at the outermost error; the actual cause
/// (refused connection, DNS, TLS, timeout) sits further down the chain.
fn cause_chain(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::from(err))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str, params: &Params) -> Result<Value> {
        let pairs = params.to_pairs();
        debug!(url, params = ?pairs, "GET");

        let resp = self
            .http
            .get(url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| {
                Error::Request(format!("error connecting to CAIC ({}): {}", url, cause_chain(e)))
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| {
                Error::Request(format!("error reading CAIC response ({}): {}", url, cause_chain(e)))
            })?;

        if status.as_u16() >= 400 {
            return Err(format_status_error(status, url, &text));
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            Error::Request(format!(
                "error decoding CAIC response (url={}, status={}): {}",
                url, status, e
            ))
        })
    }
}
