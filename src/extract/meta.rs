use anyhow::Result;
use scraper::Html;
use std::collections::BTreeMap;

use super::selector;

pub fn title(doc: &Html) -> Result<Option<String>> {
    let sel = selector("title")?;
    Ok(doc.select(&sel).next().map(|t| t.text().collect::<String>().trim().to_string()))
}

/// name (or property) -> content for every meta tag carrying both. Later tags overwrite earlier ones.
pub fn meta_tags(doc: &Html) -> Result<BTreeMap<String, String>> {
    let sel = selector("meta")?;
    let mut out = BTreeMap::new();
    for node in doc.select(&sel) {
        let el = node.value();
        let name = el.attr("name").filter(|s| !s.is_empty()).or_else(|| el.attr("property"));
        let content = el.attr("content");
        if let (Some(name), Some(content)) = (name, content) {
            if name.is_empty() || content.is_empty() { continue; }
            out.insert(name.to_string(), content.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_title_trimmed() {
        let doc = Html::parse_document("<html><head><title>\n  One </title></head><body><svg><title>Two</title></svg></body></html>");
        assert_eq!(title(&doc).unwrap().as_deref(), Some("One"));
    }

    #[test]
    fn no_title() {
        let doc = Html::parse_document("<html><body>x</body></html>");
        assert_eq!(title(&doc).unwrap(), None);
    }

    #[test]
    fn later_duplicates_win() {
        let doc = Html::parse_document(r#"<html><head>
            <meta name="description" content="first">
            <meta name="description" content="second">
            <meta property="og:image" content="a.png">
            <meta name="" property="og:type" content="website">
            <meta name="empty" content="">
            <meta charset="utf-8">
        </head></html>"#);
        let m = meta_tags(&doc).unwrap();
        assert_eq!(m.get("description").map(String::as_str), Some("second"));
        assert_eq!(m.get("og:image").map(String::as_str), Some("a.png"));
        assert_eq!(m.get("og:type").map(String::as_str), Some("website"));
        assert!(!m.contains_key("empty"));
        assert_eq!(m.len(), 3);
    }
}
