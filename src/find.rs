use anyhow::Result;
use clap::Args;
use scraper::Html;
use serde_json::{Map, Value, json};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::bcid::{self, BcId};
use crate::decode;
use crate::extract::{self, BraceHeuristic, NextData};
use crate::finder;
use crate::http::{HttpClient, ReqwestClient, RequestOpts, TransportError};
use crate::output::{presenter, OutputFormat};
use crate::output::types::Meta;
use crate::summary;
use crate::telemetry::{self, config};
use crate::telemetry::ops::find::Phase as FindPhase;

#[derive(Args, Debug)]
pub struct FindCmd {
    /// Page to scan, e.g. https://cursor.com/agents?selectedBcId=bc-...
    #[arg(long)] url: String,
    /// Only keep objects carrying this id; defaults to the id in --url, else every bc-* object
    #[arg(long, value_parser = bcid::parse_arg)] bcid: Option<BcId>,
    /// Raw Cookie header value; wins over --cookie-file
    #[arg(long)] cookie: Option<String>,
    #[arg(long)] cookie_file: Option<PathBuf>,
    #[arg(long, default_value_t = 20)] timeout: u64, // seconds
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)] format: OutputFormat,
    /// Also write the rendered output to this path
    #[arg(long)] output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum FindError {
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("no embedded page data found (no __NEXT_DATA__ or window.__* state); the page may need a logged-in session, try --cookie or --cookie-file")]
    NoPayload,
}

impl FindError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FindError::Status { .. } | FindError::Transport(_) => 2,
            FindError::NoPayload => 3,
        }
    }
}

pub async fn run(args: FindCmd) -> Result<ExitCode> {
    let log = telemetry::find();
    let _g = log
        .root_span_kv([
            ("url", args.url.clone()),
            ("bcid", format!("{:?}", args.bcid.as_ref().map(BcId::as_str))),
            ("cookie", args.cookie.is_some().to_string()),
            ("cookie_file", format!("{:?}", args.cookie_file)),
            ("timeout", args.timeout.to_string()),
            ("format", format!("{:?}", args.format)),
        ])
        .entered();

    let client = ReqwestClient::new()?;
    let code = execute(&client, &args, &mut io::stdout()).await?;
    Ok(ExitCode::from(code))
}

/// The whole `find` run against any client; returns the process exit code.
pub async fn execute<C: HttpClient>(client: &C, args: &FindCmd, out: &mut dyn Write) -> Result<u8> {
    let log = telemetry::find();
    let t0 = Instant::now();

    let target = resolve_target(args.bcid.as_ref(), &args.url);
    if target.is_none() {
        log.warn("No bcId found in arguments or URL. Will search for any bc-* objects.");
    }
    let opts = RequestOpts {
        timeout: Duration::from_secs(args.timeout),
        cookie: build_cookie_header(args.cookie.as_deref(), args.cookie_file.as_deref()),
    };

    let tree = match locate_payload(client, &args.url, &opts).await {
        Ok(tree) => tree,
        Err(e) => {
            let code = e.exit_code();
            log.error(format!("✗ {}", e));
            if config::json_mode() {
                let meta = Meta { duration_ms: Some(t0.elapsed().as_millis()), exit_code: Some(code) };
                log.result_with_meta(&json!({ "error": e.to_string() }), meta)?;
            }
            return Ok(code);
        }
    };

    let matches = {
        let _s = log.span(&FindPhase::Match).entered();
        finder::find_bc_objects(&tree, target.as_ref())
    };
    log.match_totals(target.as_ref().map(BcId::as_str), matches.len());
    if matches.is_empty() {
        match &target {
            Some(id) => log.warn(format!("No objects found for bcId {}", id)),
            None => log.warn("No bc-* objects found in page data"),
        }
    }

    let _s = log.span(&FindPhase::Output).entered();
    let rendered = presenter::render(args.format, &matches)?;
    if let Some(path) = args.output.as_deref() {
        match fs::write(path, &rendered) {
            Ok(()) => log.info(format!("✓ Wrote {} object(s) to {}", matches.len(), path.display())),
            Err(e) => log.warn(format!("Failed to write {}: {}", path.display(), e)),
        }
    }
    if config::json_mode() {
        let meta = Meta { duration_ms: Some(t0.elapsed().as_millis()), exit_code: Some(0) };
        log.result_with_meta(&envelope_items(args.format, &matches), meta)?;
    } else {
        out.write_all(&rendered)?;
        out.flush()?;
    }
    Ok(0)
}

/// `--bcid` when given, else the id carried by the page URL.
pub fn resolve_target(explicit: Option<&BcId>, url: &str) -> Option<BcId> {
    explicit.cloned().or_else(|| bcid::from_url(url))
}

/// `--cookie` (trimmed) wins; otherwise the trimmed contents of `--cookie-file`.
/// Blank values count as absent. An unreadable file is logged and treated as no cookie.
pub fn build_cookie_header(cookie: Option<&str>, cookie_file: Option<&Path>) -> Option<String> {
    if let Some(c) = cookie.map(str::trim).filter(|c| !c.is_empty()) {
        return Some(c.to_string());
    }
    let path = cookie_file?;
    match fs::read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()).filter(|c| !c.is_empty()),
        Err(e) => {
            telemetry::find().error(format!("Could not read cookie file {}: {}", path.display(), e));
            None
        }
    }
}

/// Request the page and dig out its embedded JSON tree.
///
/// `__NEXT_DATA__` is preferred. Without it, every `window.__*` state blob is gathered into one
/// array so the walk still covers all of them.
pub async fn locate_payload<C: HttpClient>(client: &C, url: &str, opts: &RequestOpts) -> Result<Value, FindError> {
    let log = telemetry::find();
    let resp = client
        .get(url, opts)
        .instrument(log.span_kv(&FindPhase::Request, [("url", url.to_string())]))
        .await?;
    if resp.status != 200 {
        return Err(FindError::Status { url: url.to_string(), status: resp.status });
    }
    let text = {
        let _s = log.span(&FindPhase::Decode).entered();
        decode::decode(&resp.body).text
    };

    let _s = log.span(&FindPhase::LocatePayload).entered();
    let doc = Html::parse_document(&text);
    if let Some(next) = collect_first(&doc, &NextData) {
        log.debug("using __NEXT_DATA__ payload");
        return Ok(next);
    }
    let blobs = extract::state::collect(&doc, &BraceHeuristic).unwrap_or_else(|e| {
        log.warn(format!("state scan failed: {e}"));
        Vec::new()
    });
    if blobs.is_empty() {
        return Err(FindError::NoPayload);
    }
    log.debug(format!("using {} window state blob(s)", blobs.len()));
    Ok(Value::Array(blobs))
}

fn collect_first(doc: &Html, strategy: &NextData) -> Option<Value> {
    extract::state::collect(doc, strategy).ok()?.into_iter().next()
}

fn envelope_items(format: OutputFormat, matches: &[&Map<String, Value>]) -> Value {
    let items: Vec<Value> = match format {
        OutputFormat::Summary => matches.iter().map(|m| Value::Object(summary::summarize(m))).collect(),
        OutputFormat::Json | OutputFormat::Pretty => matches.iter().map(|m| Value::Object((*m).clone())).collect(),
    };
    json!({ "count": items.len(), "items": items })
}
