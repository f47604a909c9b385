use anyhow::Result;
use scraper::Html;
use std::collections::BTreeMap;

use super::selector;

const MAX_ELEMENTS: usize = 10;

/// `data-*` attributes from the first ten elements that carry any. Same-named attributes on
/// later elements overwrite earlier ones.
pub fn data_attributes(doc: &Html) -> Result<BTreeMap<String, String>> {
    let sel = selector("*")?;
    let mut out = BTreeMap::new();
    let tagged = doc
        .select(&sel)
        .filter(|el| el.value().attrs().any(|(k, _)| k.starts_with("data-")))
        .take(MAX_ELEMENTS);
    for el in tagged {
        for (k, v) in el.value().attrs() {
            if k.starts_with("data-") { out.insert(k.to_string(), v.to_string()); }
        }
    }
    Ok(out)
}
