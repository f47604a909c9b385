use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::fetch::{report, AgentFetcher};
use crate::http::ReqwestClient;
use crate::telemetry::{self, config};

pub const EXAMPLE_URL: &str = "https://cursor.com/agents?selectedBcId=bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a";

#[derive(Args, Debug)]
pub struct DemoCmd {
    #[arg(long, default_value = EXAMPLE_URL)] url: String,
    #[arg(long, default_value_t = 30)] timeout: u64, // seconds
}

/// One end-to-end fetch of a known agent page: summary, saved file, pointers to the other commands.
pub async fn run(args: DemoCmd) -> Result<ExitCode> {
    let log = telemetry::fetch();
    let _g = log.root_span_kv([("demo", "true".to_string()), ("url", args.url.clone())]).entered();

    let mut out = io::stdout().lock();
    if !config::json_mode() {
        writeln!(out, "🤖 Cursor Agent Data Fetcher - Demo")?;
        writeln!(out, "{}", "=".repeat(50))?;
        writeln!(out, "📡 Fetching data from: {}\n", args.url)?;
    }
    drop(out);

    let fetcher = AgentFetcher::new(ReqwestClient::new()?, Duration::from_secs(args.timeout));
    let result = fetcher.fetch(&args.url).await;

    let path = output_path(Utc::now().timestamp());
    report::save(&result, &path);

    if config::json_mode() {
        log.result(&result)?;
    } else {
        let mut out = io::stdout().lock();
        report::print_summary(&result, &mut out)?;
        next_steps(&path, &mut out)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn output_path(unix: i64) -> PathBuf {
    PathBuf::from(format!("demo_agent_data_{unix}.json"))
}

fn next_steps(path: &std::path::Path, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "\n🎯 Demo Complete!")?;
    writeln!(w, "\n📋 What you can do next:")?;
    writeln!(w, "1. 🖥️  Run the web interface: agent-fetcher serve")?;
    writeln!(w, "2. 📄 View the saved data: cat {}", path.display())?;
    writeln!(w, "3. 🔍 Try other URLs: agent-fetcher fetch <url> or agent-fetcher find --url <url>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_file_is_named_by_unix_time() {
        assert_eq!(output_path(1714564984), PathBuf::from("demo_agent_data_1714564984.json"));
    }

    #[test]
    fn next_steps_mention_saved_file() {
        let mut buf = Vec::new();
        next_steps(std::path::Path::new("demo_agent_data_1.json"), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("cat demo_agent_data_1.json"));
        assert!(text.contains("agent-fetcher serve"));
    }
}
