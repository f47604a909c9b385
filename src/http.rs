use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::future::Future;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0.0.0 Safari/537.36";

#[derive(Clone, Debug)]
pub struct RequestOpts {
    pub timeout: Duration,
    pub cookie: Option<String>,
}

impl RequestOpts {
    pub fn with_timeout(timeout: Duration) -> Self { RequestOpts { timeout, cookie: None } }
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub content_type: Option<String>,
    pub body: Bytes,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

/// One blocking-style GET per call. Implementations must not follow up with retries.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str, opts: &RequestOpts) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        // no transparent decompression; gzip bodies are unwrapped by crate::decode
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("build http client")?;
        Ok(ReqwestClient { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, opts: &RequestOpts) -> Result<HttpResponse, TransportError> {
        let mut req = self.client.get(url).timeout(opts.timeout);
        if let Some(cookie) = opts.cookie.as_deref() {
            req = req.header(header::COOKIE, cookie);
        }
        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.bytes().await.map_err(classify)?;
        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            content_type,
            body,
        })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() { TransportError::Timeout }
    else if e.is_connect() { TransportError::Connect(e.to_string()) }
    else { TransportError::Other(e.to_string()) }
}
