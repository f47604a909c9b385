//! Embedded state blobs serialized into `<script>` bodies.
//!
//! Two strategies share one interface: a permissive brace heuristic for `window.__*` style
//! assignments, and an exact lookup of the Next.js `__NEXT_DATA__` script. Neither parses
//! JavaScript; the heuristic simply misses scripts with trailing statements.

use anyhow::Result;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::Value;
use std::sync::LazyLock;

use super::selector;

// from the first '{' to the last '}' of the body, optional ';' and trailing whitespace
#[allow(clippy::expect_used)]
static TRAILING_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(\{.*\});?\s*\z").expect("valid regex")
});

const STATE_MARKERS: [&str; 2] = ["window.__", "window.INITIAL"];

pub trait StateStrategy {
    fn name(&self) -> &'static str;
    /// Whether this script element is a candidate at all.
    fn wants(&self, script: &ElementRef<'_>, body: &str) -> bool;
    fn try_extract(&self, body: &str) -> Option<Value>;
}

/// Generic `window.__STATE__ = {...}` heuristic.
pub struct BraceHeuristic;

impl StateStrategy for BraceHeuristic {
    fn name(&self) -> &'static str { "brace_heuristic" }

    fn wants(&self, _script: &ElementRef<'_>, body: &str) -> bool {
        STATE_MARKERS.iter().any(|m| body.contains(m))
    }

    fn try_extract(&self, body: &str) -> Option<Value> {
        let region = TRAILING_OBJECT_RE.captures(body)?.get(1)?.as_str();
        serde_json::from_str(region).ok()
    }
}

/// `<script id="__NEXT_DATA__" type="application/json">`, parsed as-is.
pub struct NextData;

impl StateStrategy for NextData {
    fn name(&self) -> &'static str { "next_data" }

    fn wants(&self, script: &ElementRef<'_>, _body: &str) -> bool {
        let el = script.value();
        el.id() == Some("__NEXT_DATA__") && el.attr("type") == Some("application/json")
    }

    fn try_extract(&self, body: &str) -> Option<Value> {
        if body.trim().is_empty() { return None; }
        serde_json::from_str(body).ok()
    }
}

/// Run `strategy` over every script in document order and keep what parses.
pub fn collect(doc: &Html, strategy: &dyn StateStrategy) -> Result<Vec<Value>> {
    let sel = selector("script")?;
    let mut out = Vec::new();
    for script in doc.select(&sel) {
        let body = script.text().collect::<String>();
        if body.is_empty() || !strategy.wants(&script, &body) { continue; }
        match strategy.try_extract(&body) {
            Some(v) => out.push(v),
            None => tracing::debug!(strategy = strategy.name(), "script matched but yielded no json"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(html: &str, s: &dyn StateStrategy) -> Vec<Value> {
        collect(&Html::parse_document(html), s).unwrap()
    }

    #[test]
    fn single_line_assignment() {
        let got = BraceHeuristic.try_extract(r#"window.__INITIAL_STATE__ = {"a":{"b":[1,2]}};"#);
        assert_eq!(got, Some(json!({"a":{"b":[1,2]}})));
    }

    #[test]
    fn multi_line_pretty_object() {
        let body = "\n  window.__DATA__ = {\n    \"agent\": {\n      \"id\": 1\n    }\n  };\n";
        assert_eq!(BraceHeuristic.try_extract(body), Some(json!({"agent":{"id":1}})));
    }

    #[test]
    fn trailing_statement_defeats_heuristic() {
        let body = r#"window.__A__ = {"a":1}; window.__B__ = {"b":2}; init();"#;
        assert_eq!(BraceHeuristic.try_extract(body), None);
    }

    #[test]
    fn only_marked_scripts_in_document_order() {
        let html = r#"<html><head>
            <script>var config = {"x":1};</script>
            <script>window.INITIAL_DATA = {"n":1}</script>
            <script>window.__two = {"n":2};</script>
            <script>window.__broken = {n: 3};</script>
        </head></html>"#;
        assert_eq!(run(html, &BraceHeuristic), vec![json!({"n":1}), json!({"n":2})]);
    }

    #[test]
    fn next_data_requires_id_and_type() {
        let html = r#"<html><body>
            <script id="__NEXT_DATA__">{"wrong":"type"}</script>
            <script type="application/json">{"wrong":"id"}</script>
            <script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"agent":1}}}</script>
        </body></html>"#;
        assert_eq!(run(html, &NextData), vec![json!({"props":{"pageProps":{"agent":1}}})]);
    }

    #[test]
    fn next_data_invalid_json_is_skipped() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{oops</script>"#;
        assert!(run(html, &NextData).is_empty());
    }
}
