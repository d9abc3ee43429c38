use clap::{Parser, Subcommand};
use anyhow::Result;
use dotenvy::dotenv;

mod extraction;
mod output;
mod sites;
mod telemetry;

#[derive(Parser)]
#[command(name = "mscrape", about = "Extract image and video links from album pages")]
struct Cli {
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Extract(extraction::ExtractCmd),
    Sites(sites::SitesCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and MSCRAPE_LOG_FORMAT
    telemetry::config::init_tracing();

    match cli.command {
        Commands::Extract(args) => extraction::run(args).await?,
        Commands::Sites(args) => sites::run(args)?,
    }

    Ok(())
}
