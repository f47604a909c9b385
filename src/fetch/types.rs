use serde::Serialize;
use serde_json::Value;

use crate::decode::TextEncoding;
use crate::extract::ExtractedInfo;

/// Outcome of one fetch attempt. Built once by the fetcher and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub url: String,
    pub agent_id: Option<String>,
    pub timestamp: String,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub response_size: Option<usize>,
    pub error_message: Option<String>,
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Json { value: Value },
    Html { raw: String, truncated: bool, extracted: ExtractedInfo },
    Text { value: String, encoding: TextEncoding },
}

impl FetchResult {
    pub fn is_ok(&self) -> bool { self.status_code == Some(200) }

    /// Top-level keys of the payload, for the summary report.
    pub fn data_keys(&self) -> Option<Vec<String>> {
        match self.payload.as_ref()? {
            Payload::Json { value: Value::Object(map) } => Some(map.keys().cloned().collect()),
            Payload::Json { .. } => None,
            Payload::Html { .. } => Some(vec!["kind".into(), "raw".into(), "truncated".into(), "extracted".into()]),
            Payload::Text { .. } => Some(vec!["kind".into(), "value".into(), "encoding".into()]),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self.payload, Some(Payload::Text { encoding: TextEncoding::Base64, .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> FetchResult {
        FetchResult {
            url: "https://example.com".into(),
            agent_id: None,
            timestamp: "2024-01-01 00:00:00 UTC".into(),
            status_code: Some(200),
            content_type: Some("application/json".into()),
            response_size: Some(7),
            error_message: None,
            payload: Some(Payload::Json { value: json!({"a": 1, "b": 2}) }),
        }
    }

    #[test]
    fn payload_is_tagged_by_kind() {
        let v = serde_json::to_value(base()).unwrap();
        assert_eq!(v["payload"], json!({"kind": "json", "value": {"a": 1, "b": 2}}));
        assert_eq!(v["error_message"], Value::Null);

        let text = Payload::Text { value: "AAEC".into(), encoding: TextEncoding::Base64 };
        assert_eq!(serde_json::to_value(text).unwrap(), json!({"kind": "text", "value": "AAEC", "encoding": "base64"}));
    }

    #[test]
    fn data_keys_per_kind() {
        assert_eq!(base().data_keys(), Some(vec!["a".to_string(), "b".to_string()]));
        let mut r = base();
        r.payload = Some(Payload::Json { value: json!([1, 2]) });
        assert_eq!(r.data_keys(), None);
        r.payload = None;
        assert_eq!(r.data_keys(), None);
    }
}
