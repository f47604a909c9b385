use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::process::ExitCode;

mod bcid;
mod decode;
mod demo;
mod extract;
mod fetch;
mod find;
mod finder;
mod http;
mod output;
mod serve;
mod summary;
mod telemetry;
mod util;

#[derive(Parser)]
#[command(name = "agent-fetcher", about = "Fetch and inspect Cursor agent pages")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one agent URL and print a summary
    Fetch(fetch::FetchCmd),
    /// Find bc-* objects in a page's embedded state
    Find(find::FindCmd),
    /// Fetch the example agent and save the result
    Demo(demo::DemoCmd),
    /// Run the web viewer
    Serve(serve::ServeCmd),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // stderr only; RUST_LOG and AGENT_LOG_FORMAT apply
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Fetch(args) => fetch::run(args).await,
        Commands::Find(args) => find::run(args).await,
        Commands::Demo(args) => demo::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
    }
}
