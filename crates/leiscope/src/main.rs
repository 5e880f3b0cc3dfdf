use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use leiscope::cli::{self, Cli};
use leiscope::display;

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "leiscope=debug,warn" } else { "warn" };
  let filter =
    EnvFilter::try_from_env("LEISCOPE_LOG").unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

  if let Err(e) = cli::run(cli).await {
    display::error(&format!("{e:#}"));
    std::process::exit(1);
  }
  Ok(())
}
