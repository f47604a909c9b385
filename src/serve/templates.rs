use serde::Serialize;

use crate::fetch::{FetchResult, Payload};

pub fn render_index() -> String {
    let content = r#"<div class="container">
    <div class="intro">
        <h2>Fetch and analyze data from Cursor agent URLs</h2>
    </div>
    <form method="POST" action="/fetch">
        <label for="url">Cursor Agent URL:</label>
        <input type="url" id="url" name="url" placeholder="https://cursor.com/agents?selectedBcId=..." required>
        <button type="submit">Fetch Agent Data</button>
    </form>
    <p class="links"><a href="/list">View all fetched agents</a></p>
</div>"#;
    build_page("Cursor Agent Data Fetcher", content)
}

pub fn render_view(key: &str, result: &FetchResult) -> String {
    let key = html_escape(key);
    let agent = html_escape(result.agent_id.as_deref().unwrap_or("Not found"));
    let (status_class, status) = match result.status_code {
        Some(200) => ("status-success", "200 ✓ Success".to_string()),
        Some(code) => ("status-error", code.to_string()),
        None => ("status-error", "N/A".to_string()),
    };
    let content_type = html_escape(result.content_type.as_deref().unwrap_or("Unknown"));
    let size = result.response_size.unwrap_or(0);
    let fetched = html_escape(&result.timestamp);
    let url = html_escape(&result.url);

    let error_card = match &result.error_message {
        Some(e) => format!(r#"<div class="info-card"><h3>Error</h3><p class="status-error">{}</p></div>"#, html_escape(e)),
        None => String::new(),
    };

    let data_section = match &result.payload {
        None => String::new(),
        Some(Payload::Html { raw, extracted, .. }) => format!(
            r#"<div class="data-section">
    <h2>Fetched Data</h2>
    <h3>Extracted Information</h3>
    <div class="data-content"><pre>{}</pre></div>
    <h3>Raw HTML (truncated)</h3>
    <div class="data-content"><pre>{}</pre></div>
</div>"#,
            pretty(extracted),
            html_escape(raw),
        ),
        Some(payload) => {
            let banner = if result.is_binary() {
                r#"<div class="binary-warning"><strong>Binary Content Detected:</strong> The response does not look like text. It may be compressed content, an image, or other non-text data; it is shown base64-encoded.</div>"#
            } else {
                ""
            };
            format!(
                r#"<div class="data-section">
    <h2>Fetched Data</h2>
    {banner}
    <div class="data-content"><pre>{}</pre></div>
</div>"#,
                pretty(payload),
            )
        }
    };

    let content = format!(
        r#"<div class="container">
    <div class="nav-links">
        <a href="/">&larr; Back to Fetcher</a>
        <a href="/list">All Agents</a>
        <a href="/api/data/{key}">Raw JSON</a>
    </div>
    <div class="page-title"><h2>Agent Data Analysis</h2><p>{url}</p></div>
    <div class="info-grid">
        <div class="info-card"><h3>Agent ID</h3><p>{agent}</p></div>
        <div class="info-card"><h3>Status</h3><p class="{status_class}">{status}</p></div>
        <div class="info-card"><h3>Content Type</h3><p>{content_type}</p></div>
        <div class="info-card"><h3>Response Size</h3><p>{size} bytes</p></div>
        <div class="info-card"><h3>Fetch Time</h3><p>{fetched}</p></div>
        {error_card}
    </div>
    {data_section}
</div>"#
    );
    build_page(result.agent_id.as_deref().unwrap_or("Unknown"), &content)
}

pub fn render_list(entries: &[(String, FetchResult)]) -> String {
    let body = if entries.is_empty() {
        r#"<p>No agents fetched yet. <a href="/">Fetch your first agent</a>!</p>"#.to_string()
    } else {
        let rows: String = entries
            .iter()
            .map(|(key, r)| {
                let key = html_escape(key);
                let status_class = if r.is_ok() { "status-success" } else { "status-error" };
                format!(
                    r#"<tr>
    <td class="agent-id">{agent}</td>
    <td class="url" title="{url}">{url}</td>
    <td class="{status_class}">{status}</td>
    <td>{fetched}</td>
    <td><a href="/view/{key}">View</a> | <a href="/api/data/{key}">JSON</a></td>
</tr>"#,
                    agent = html_escape(r.agent_id.as_deref().unwrap_or("N/A")),
                    url = html_escape(&r.url),
                    status = r.status_code.map(|c| c.to_string()).unwrap_or_else(|| "N/A".to_string()),
                    fetched = html_escape(&r.timestamp),
                )
            })
            .collect();
        format!(
            r#"<table>
<thead><tr><th>Agent ID</th><th>URL</th><th>Status</th><th>Fetch Time</th><th>Actions</th></tr></thead>
<tbody>{rows}</tbody>
</table>"#
        )
    };

    let content = format!(
        r#"<div class="container">
    <div class="nav-links"><a href="/">&larr; Back to Fetcher</a></div>
    <div class="page-title"><h2>All Fetched Agents</h2><p>{} agent(s) fetched</p></div>
    {body}
</div>"#,
        entries.len(),
    );
    build_page("All Fetched Agents", &content)
}

// --- Helpers ---

fn pretty<T: Serialize>(v: &T) -> String {
    html_escape(&serde_json::to_string_pretty(v).unwrap_or_default())
}

fn build_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Agent Viewer</title>
<style>
*{{box-sizing:border-box;}}
body{{font-family:Arial,sans-serif;color:#1a1a1a;margin:0;}}
.header{{background:#007cba;color:#fff;padding:12px 24px;}}
.header h1{{font-size:18px;margin:0;}}
.container{{max-width:1200px;margin:0 auto;padding:20px;}}
label{{display:block;margin-bottom:5px;font-weight:bold;}}
input[type="url"]{{width:100%;padding:10px;border:1px solid #ddd;border-radius:4px;margin-bottom:15px;}}
button{{background:#007cba;color:#fff;padding:10px 20px;border:none;border-radius:4px;cursor:pointer;}}
.nav-links a,.links a{{color:#007cba;text-decoration:none;margin-right:15px;}}
.info-grid{{display:grid;grid-template-columns:repeat(auto-fit,minmax(250px,1fr));gap:15px;margin-bottom:20px;}}
.info-card{{background:#f8f9fa;padding:15px;border-radius:8px;border-left:4px solid #007cba;}}
.info-card h3{{margin-top:0;color:#007cba;}}
.status-success{{color:#28a745;}}
.status-error{{color:#dc3545;}}
.data-section{{background:#f8f9fa;padding:20px;border-radius:8px;margin-top:20px;}}
.data-content{{background:#fff;padding:15px;border-radius:4px;border:1px solid #ddd;max-height:400px;overflow-y:auto;}}
pre{{white-space:pre-wrap;word-wrap:break-word;}}
.binary-warning{{background:#fff3cd;border:1px solid #ffeaa7;padding:10px;border-radius:4px;margin-bottom:15px;}}
table{{width:100%;border-collapse:collapse;margin-top:20px;}}
th,td{{padding:12px;text-align:left;border-bottom:1px solid #ddd;}}
th{{background:#f8f9fa;}}
.agent-id{{font-family:monospace;font-size:0.9em;}}
.url{{max-width:300px;overflow:hidden;text-overflow:ellipsis;white-space:nowrap;}}
</style>
</head>
<body>
<div class="header"><h1>Cursor Agent Data Viewer</h1></div>
{content}
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
