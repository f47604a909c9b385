use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

mod attrs;
mod jsonld;
mod meta;
pub mod state;

pub use state::{BraceHeuristic, NextData};

/// Everything harvested from one HTML page. Each field is filled independently;
/// a failing step leaves its field empty and notes the failure in `extraction_error`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub meta_tags: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub structured_data: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embedded_state: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_data: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data_attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_error: Option<String>,
}

impl ExtractedInfo {
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.title.is_some() { keys.push("title"); }
        if !self.meta_tags.is_empty() { keys.push("meta_tags"); }
        if !self.structured_data.is_empty() { keys.push("structured_data"); }
        if !self.embedded_state.is_empty() { keys.push("embedded_state"); }
        if self.next_data.is_some() { keys.push("next_data"); }
        if !self.data_attributes.is_empty() { keys.push("data_attributes"); }
        if self.extraction_error.is_some() { keys.push("extraction_error"); }
        keys
    }
}

pub fn extract_info(html: &str) -> ExtractedInfo {
    let doc = Html::parse_document(html);
    let mut info = ExtractedInfo::default();
    let mut errors: Vec<String> = Vec::new();

    match meta::title(&doc) {
        Ok(t) => info.title = t,
        Err(e) => errors.push(format!("title: {e}")),
    }
    match meta::meta_tags(&doc) {
        Ok(m) => info.meta_tags = m,
        Err(e) => errors.push(format!("meta: {e}")),
    }
    match jsonld::blocks(&doc) {
        Ok(v) => info.structured_data = v,
        Err(e) => errors.push(format!("json-ld: {e}")),
    }
    match state::collect(&doc, &BraceHeuristic) {
        Ok(v) => info.embedded_state = v,
        Err(e) => errors.push(format!("embedded state: {e}")),
    }
    match state::collect(&doc, &NextData) {
        Ok(v) => info.next_data = v.into_iter().next(),
        Err(e) => errors.push(format!("next data: {e}")),
    }
    match attrs::data_attributes(&doc) {
        Ok(m) => info.data_attributes = m,
        Err(e) => errors.push(format!("data attributes: {e}")),
    }

    if !errors.is_empty() {
        let joined = errors.join("; ");
        tracing::warn!(error = %joined, "error extracting page info");
        info.extraction_error = Some(joined);
    }
    info
}

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}
