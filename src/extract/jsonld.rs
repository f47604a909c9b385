use anyhow::Result;
use scraper::Html;
use serde_json::Value;

use super::selector;

/// Every `application/ld+json` script that parses, in document order. Bad JSON is skipped.
pub fn blocks(doc: &Html) -> Result<Vec<Value>> {
    let sel = selector(r#"script[type="application/ld+json"]"#)?;
    let mut out = Vec::new();
    for script in doc.select(&sel) {
        let text = script.text().collect::<String>();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(v) => out.push(v),
            Err(e) => tracing::debug!(error = %e, "skipping unparsable json-ld block"),
        }
    }
    Ok(out)
}
