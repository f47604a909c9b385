pub mod fetcher;
pub mod report;
pub mod types;

use anyhow::Result;
use clap::Args;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::bcid;
use crate::http::{HttpClient, ReqwestClient};
use crate::output::types::Meta;
use crate::telemetry::{self, config};
use crate::telemetry::ops::fetch::Phase as FetchPhase;

pub use fetcher::AgentFetcher;
pub use types::{FetchResult, Payload};

#[derive(Args, Debug)]
pub struct FetchCmd {
    /// Agent page or API URL
    url: String,
    /// Save the full result as JSON to this path
    #[arg(short, long)] output: Option<PathBuf>,
    #[arg(short, long, default_value_t = 30)] timeout: u64, // seconds
    /// Fall back to the known API endpoints when the page itself is not a 200
    #[arg(short = 'a', long, default_value_t = false)] try_alternatives: bool,
}

pub async fn run(args: FetchCmd) -> Result<ExitCode> {
    let log = telemetry::fetch();
    let _g = log
        .root_span_kv([
            ("url", args.url.clone()),
            ("timeout", args.timeout.to_string()),
            ("try_alternatives", args.try_alternatives.to_string()),
            ("output", format!("{:?}", args.output)),
        ])
        .entered();
    let t0 = Instant::now();

    let fetcher = AgentFetcher::new(ReqwestClient::new()?, Duration::from_secs(args.timeout));
    log.info(format!("Fetching agent data from: {}", args.url));
    let result = fetch_with_fallback(&fetcher, &args.url, args.try_alternatives).await;

    if let Some(path) = args.output.as_deref() {
        report::save(&result, path);
    }

    let code: u8 = if result.is_ok() { 0 } else { 1 };
    let _s = log.span(&FetchPhase::Output).entered();
    if config::json_mode() {
        let meta = Meta { duration_ms: Some(t0.elapsed().as_millis()), exit_code: Some(code) };
        log.result_with_meta(&result, meta)?;
    } else {
        report::print_summary(&result, &mut io::stdout().lock())?;
    }
    Ok(ExitCode::from(code))
}

/// Fetch `url`; on a non-200 with an agent id in the URL, optionally walk the alternative
/// endpoints and keep their result only when it is itself a 200.
pub async fn fetch_with_fallback<C: HttpClient>(fetcher: &AgentFetcher<C>, url: &str, try_alternatives: bool) -> FetchResult {
    let result = fetcher.fetch(url).await;
    if result.is_ok() || !try_alternatives {
        return result;
    }
    let Some(id) = bcid::from_url(url) else {
        telemetry::fetch().warn("No agent id in URL; skipping alternative endpoints");
        return result;
    };
    let alt = fetcher.try_alternatives(url, &id).await;
    if alt.is_ok() { alt } else { result }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bcid::BcId;
    use crate::http::stub::{Canned, StubClient};

    const PAGE: &str = "https://cursor.com/agents?selectedBcId=bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a";

    fn fetcher(client: StubClient) -> AgentFetcher<StubClient> {
        AgentFetcher::new(client, Duration::from_secs(5)).with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn primary_success_skips_alternatives() {
        let f = fetcher(StubClient::new().route(PAGE, Canned::Status(200, "text/plain", b"ok".to_vec())));
        let r = fetch_with_fallback(&f, PAGE, true).await;
        assert!(r.is_ok());
        assert_eq!(r.url, PAGE);
    }

    #[tokio::test]
    async fn failed_alternatives_keep_primary_result() {
        let f = fetcher(StubClient::new().route(PAGE, Canned::Status(403, "text/html", vec![])));
        let r = fetch_with_fallback(&f, PAGE, true).await;
        assert_eq!(r.status_code, Some(403));
        assert!(r.error_message.unwrap().contains("forbidden"));
    }

    #[tokio::test]
    async fn successful_alternative_replaces_primary() {
        let id = BcId::find_in(PAGE).unwrap();
        let alt = fetcher::alternative_urls(&id)[2].clone();
        let f = fetcher(StubClient::new()
            .route(PAGE, Canned::Status(403, "text/html", vec![]))
            .route(&alt, Canned::Status(200, "application/json", b"{\"id\":1}".to_vec())));
        let r = fetch_with_fallback(&f, PAGE, true).await;
        assert!(r.is_ok());
        assert_eq!(r.url, alt);
    }

    #[tokio::test]
    async fn alternatives_need_flag_and_id() {
        let f = fetcher(StubClient::new());
        let r = fetch_with_fallback(&f, PAGE, false).await;
        assert_eq!(r.status_code, Some(404));
        let r = fetch_with_fallback(&f, "https://cursor.com/agents", true).await;
        assert_eq!(r.status_code, Some(404));
    }
}
