//! HTTP client wrapper for the Power BI REST API.
//!
//! Handles bearer-token injection, path-segment escaping and JSON decoding.
//! One request per call: no retries, no pagination, no caching.

use std::fmt;
use std::time::Duration;

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PowerBiError, PowerBiResult};
use crate::types::POWERBI_API_BASE;

/// Everything except RFC 3986 unreserved characters is escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Escape one path segment before interpolating it into a URL.
pub fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// HTTP client with Power BI bearer auth.
#[derive(Clone)]
pub struct PowerBiClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl PowerBiClient {
    /// Build a client against `base_url` (e.g. [`POWERBI_API_BASE`]).
    pub fn new(base_url: &str, access_token: &str, timeout_secs: u64) -> PowerBiResult<Self> {
        if access_token.is_empty() {
            return Err(PowerBiError::not_authenticated());
        }
        url::Url::parse(base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| {
                PowerBiError::invalid_request(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Client against the public commercial endpoint.
    pub fn with_token(access_token: &str) -> PowerBiResult<Self> {
        Self::new(POWERBI_API_BASE, access_token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `segments`, each one escaped.
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&escape_segment(segment));
        }
        url
    }

    // ── Core HTTP verbs ──────────────────────────────────────────────

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> PowerBiResult<T> {
        debug!("Power BI GET {}", url);
        let resp = self.execute(self.http.get(url).query(query)).await?;
        decode(resp).await
    }

    /// GET where only the status matters.
    pub async fn get_status(&self, url: &str) -> PowerBiResult<()> {
        debug!("Power BI GET (status) {}", url);
        self.execute(self.http.get(url)).await.map(|_| ())
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> PowerBiResult<T> {
        debug!("Power BI POST {}", url);
        let resp = self
            .execute(self.http.post(url).query(query).json(body))
            .await?;
        decode(resp).await
    }

    /// POST whose response body is ignored.
    pub async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> PowerBiResult<()> {
        debug!("Power BI POST {}", url);
        let mut req = self.http.post(url);
        req = match body {
            Some(b) => req.json(b),
            None => req.header(reqwest::header::CONTENT_LENGTH, "0"),
        };
        self.execute(req).await.map(|_| ())
    }

    pub async fn put_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> PowerBiResult<()> {
        debug!("Power BI PUT {}", url);
        self.execute(self.http.put(url).json(body)).await.map(|_| ())
    }

    pub async fn patch_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> PowerBiResult<()> {
        debug!("Power BI PATCH {}", url);
        self.execute(self.http.patch(url).json(body)).await.map(|_| ())
    }

    pub async fn delete(&self, url: &str) -> PowerBiResult<()> {
        debug!("Power BI DELETE {}", url);
        self.execute(self.http.delete(url)).await.map(|_| ())
    }

    /// Send with the bearer token; any non-2xx becomes a status error.
    async fn execute(&self, req: RequestBuilder) -> PowerBiResult<Response> {
        let resp = req.bearer_auth(&self.access_token).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(PowerBiError::from_status(status.as_u16(), &body))
    }
}

impl fmt::Debug for PowerBiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerBiClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> PowerBiResult<T> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(PowerBiError::from)
}
