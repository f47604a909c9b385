use chrono::Utc;
use std::time::Duration;
use tracing::Instrument;

use crate::bcid::{self, BcId};
use crate::decode;
use crate::extract;
use crate::http::{HttpClient, HttpResponse, RequestOpts, TransportError};
use crate::telemetry;
use crate::telemetry::ops::fetch::Phase as FetchPhase;
use crate::util::time::fetch_stamp;

use super::types::{FetchResult, Payload};

const RAW_HTML_LIMIT: usize = 5000;
const NO_ENDPOINT: &str = "No accessible endpoints found for this agent";

pub fn alternative_urls(agent_id: &BcId) -> Vec<String> {
    let id = agent_id.as_str();
    vec![
        format!("https://cursor.com/api/agents/{id}"),
        format!("https://api.cursor.com/agents/{id}"),
        format!("https://cursor.com/agents/{id}.json"),
        format!("https://cursor.com/agents/data/{id}"),
    ]
}

pub struct AgentFetcher<C> {
    client: C,
    timeout: Duration,
    retry_delay: Duration,
}

impl<C: HttpClient> AgentFetcher<C> {
    pub fn new(client: C, timeout: Duration) -> Self {
        AgentFetcher { client, timeout, retry_delay: Duration::from_secs(1) }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetch one URL. Never fails: transport problems and non-200 statuses land in `error_message`.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let log = telemetry::fetch();
        let mut result = FetchResult {
            url: url.to_string(),
            agent_id: bcid::from_url(url).map(|id| id.to_string()),
            timestamp: fetch_stamp(Utc::now()),
            status_code: None,
            content_type: None,
            response_size: None,
            error_message: None,
            payload: None,
        };

        let opts = RequestOpts::with_timeout(self.timeout);
        let response = self
            .client
            .get(url, &opts)
            .instrument(log.span_kv(&FetchPhase::Request, [("url", url.to_string())]))
            .await;
        match response {
            Ok(resp) => {
                result.status_code = Some(resp.status);
                result.content_type = Some(resp.content_type.clone().unwrap_or_else(|| "unknown".to_string()));
                result.response_size = Some(resp.body.len());
                match resp.status {
                    200 => result.payload = Some(self.build_payload(&resp)),
                    404 => result.error_message = Some("Agent not found (404). The URL may be invalid or the agent may not be publicly accessible.".to_string()),
                    403 => result.error_message = Some("Access forbidden (403). Authentication may be required.".to_string()),
                    code => result.error_message = Some(format!("HTTP {}: {}", code, resp.reason.as_deref().unwrap_or("Unknown"))),
                }
            }
            Err(TransportError::Timeout) => {
                result.error_message = Some(format!("Request timed out after {} seconds", self.timeout.as_secs()));
            }
            Err(TransportError::Connect(_)) => {
                result.error_message = Some("Connection error. Check your internet connection.".to_string());
            }
            Err(TransportError::Other(e)) => {
                result.error_message = Some(format!("Unexpected error: {}", e));
            }
        }

        log.outcome(url, result.status_code, result.response_size, result.error_message.as_deref());
        result
    }

    fn build_payload(&self, resp: &HttpResponse) -> Payload {
        let log = telemetry::fetch();
        let decoded = {
            let _s = log.span(&FetchPhase::Decode).entered();
            decode::decode(&resp.body)
        };
        log.debug_kv("decoded body", [
            ("encoding", format!("{:?}", decoded.encoding)),
            ("decompressed", decoded.decompressed.to_string()),
        ]);
        if let Ok(value) = serde_json::from_str(&decoded.text) {
            log.info("✓ Successfully fetched JSON data");
            return Payload::Json { value };
        }
        let lower = decoded.text.to_lowercase();
        if lower.contains("<html") || lower.contains("<!doctype") {
            log.info("✓ Successfully fetched HTML data");
            let extracted = {
                let _s = log.span(&FetchPhase::Extract).entered();
                extract::extract_info(&decoded.text)
            };
            let (raw, truncated) = truncate_chars(&decoded.text, RAW_HTML_LIMIT);
            return Payload::Html { raw, truncated, extracted };
        }
        log.info("✓ Successfully fetched text data");
        Payload::Text { value: decoded.text, encoding: decoded.encoding }
    }

    /// Walk the alternative endpoints in order, pausing between attempts, until one answers 200.
    pub async fn try_alternatives(&self, base_url: &str, agent_id: &BcId) -> FetchResult {
        let log = telemetry::fetch();
        let span = log.span_kv(&FetchPhase::Alternatives, [("agent_id", agent_id.to_string())]);
        self.walk_alternatives(base_url, agent_id).instrument(span).await
    }

    async fn walk_alternatives(&self, base_url: &str, agent_id: &BcId) -> FetchResult {
        let log = telemetry::fetch();
        log.info("Trying alternative endpoints...");

        let urls = alternative_urls(agent_id);
        for (i, alt) in urls.iter().enumerate() {
            if i > 0 && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
            log.info(format!("Trying: {}", alt));
            let result = self.fetch(alt).await;
            if result.is_ok() {
                log.info(format!("✓ Success with alternative endpoint: {}", alt));
                return result;
            }
        }

        log.warn("✗ No alternative endpoints worked");
        FetchResult {
            url: base_url.to_string(),
            agent_id: Some(agent_id.to_string()),
            timestamp: fetch_stamp(Utc::now()),
            status_code: None,
            content_type: None,
            response_size: None,
            error_message: Some(NO_ENDPOINT.to_string()),
            payload: None,
        }
    }
}

fn truncate_chars(s: &str, limit: usize) -> (String, bool) {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => (format!("{}...", &s[..idx]), true),
        None => (s.to_string(), false),
    }
}
