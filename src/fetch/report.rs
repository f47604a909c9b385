use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::telemetry;
use crate::telemetry::ops::fetch::Phase as FetchPhase;

use super::types::{FetchResult, Payload};

const RULE_WIDTH: usize = 60;

pub fn print_summary(result: &FetchResult, w: &mut dyn Write) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(w, "\n{rule}")?;
    writeln!(w, "CURSOR AGENT DATA SUMMARY")?;
    writeln!(w, "{rule}")?;
    writeln!(w, "URL: {}", result.url)?;
    writeln!(w, "Agent ID: {}", result.agent_id.as_deref().unwrap_or("Not found"))?;
    writeln!(w, "Timestamp: {}", result.timestamp)?;
    writeln!(w, "Status Code: {}", opt(result.status_code))?;
    writeln!(w, "Content Type: {}", result.content_type.as_deref().unwrap_or("N/A"))?;
    writeln!(w, "Response Size: {} bytes", result.response_size.unwrap_or(0))?;
    if let Some(err) = &result.error_message {
        writeln!(w, "Error: {err}")?;
    }
    if let Some(keys) = result.data_keys() {
        writeln!(w, "Data Keys: {}", keys.join(", "))?;
    }
    if let Some(Payload::Html { extracted, .. }) = &result.payload {
        writeln!(w, "Extracted: {}", extracted.keys().join(", "))?;
    }
    if result.is_binary() {
        writeln!(w, "Note: body was not text; payload is base64")?;
    }
    writeln!(w, "{rule}")?;
    Ok(())
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "N/A".to_string())
}

/// Write the result as pretty UTF-8 JSON. Failures are logged and swallowed.
pub fn save(result: &FetchResult, path: &Path) -> bool {
    let log = telemetry::fetch();
    let _s = log.span_kv(&FetchPhase::Save, [("path", path.display().to_string())]).entered();
    match write_json(result, path) {
        Ok(()) => { log.info(format!("✓ Data saved to: {}", path.display())); true }
        Err(e) => { log.error(format!("✗ Failed to save data: {:#}", e)); false }
    }
}

fn write_json(result: &FetchResult, path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(result)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> FetchResult {
        FetchResult {
            url: "https://cursor.com/agents?selectedBcId=bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a".into(),
            agent_id: Some("bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a".into()),
            timestamp: "2024-05-01 12:03:04 UTC".into(),
            status_code: Some(200),
            content_type: Some("application/json".into()),
            response_size: Some(42),
            error_message: None,
            payload: Some(Payload::Json { value: json!({"name": "Zoë", "id": 1}) }),
        }
    }

    #[test]
    fn summary_lists_fields_and_keys() {
        let mut buf = Vec::new();
        print_summary(&sample(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("CURSOR AGENT DATA SUMMARY"));
        assert!(text.contains("Agent ID: bc-89bdb1ce"));
        assert!(text.contains("Status Code: 200"));
        assert!(text.contains("Response Size: 42 bytes"));
        assert!(text.contains("Data Keys: name, id"));
        assert!(!text.contains("Error:"));
    }

    #[test]
    fn summary_of_failed_fetch() {
        let r = FetchResult {
            agent_id: None,
            status_code: None,
            content_type: None,
            response_size: None,
            error_message: Some("Request timed out after 30 seconds".into()),
            payload: None,
            ..sample()
        };
        let mut buf = Vec::new();
        print_summary(&r, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Agent ID: Not found"));
        assert!(text.contains("Status Code: N/A"));
        assert!(text.contains("Response Size: 0 bytes"));
        assert!(text.contains("Error: Request timed out after 30 seconds"));
        assert!(!text.contains("Data Keys"));
    }

    #[test]
    fn saves_unescaped_pretty_json() {
        let path = std::env::temp_dir().join(format!("agent-fetcher-save-{}.json", uuid::Uuid::new_v4()));
        assert!(save(&sample(), &path));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Zoë"));
        assert!(text.contains("\n  \"url\""));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_failure_is_not_fatal() {
        let path = std::env::temp_dir().join("agent-fetcher-missing-dir").join("x").join("out.json");
        assert!(!save(&sample(), &path));
    }
}
