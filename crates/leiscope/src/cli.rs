//! Command-line surface
//!
//! Each command drives one [`Explorer`] through the same operations an
//! interactive front end would, then prints the resulting state.

use std::future::Future;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use crate::config::Config;
use crate::display;
use crate::explorer::Explorer;

#[derive(Parser, Debug)]
#[command(name = "leiscope")]
#[command(about = "Resolve company names to Legal Entity Identifiers and explore ownership hierarchies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
  /// Base URL of the entity backend
  #[arg(long, global = true)]
  pub url: Option<String>,

  /// YAML configuration file
  #[arg(long, global = true)]
  pub config: Option<PathBuf>,

  /// Do not print progress updates
  #[arg(short, long, global = true)]
  pub quiet: bool,

  /// Log debug diagnostics to stderr (overridden by LEISCOPE_LOG)
  #[arg(short, long, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Ranked registry matches for a company name
  Search {
    name: String,
    /// Open the record of the N-th result
    #[arg(long, value_name = "N")]
    company: Option<usize>,
    /// Show the corporate hierarchy of the N-th result
    #[arg(long, value_name = "N")]
    hierarchy: Option<usize>,
    /// Place the hierarchy on the map (requires --hierarchy)
    #[arg(long, requires = "hierarchy")]
    map: bool,
  },
  /// Registry record for an LEI
  Company {
    lei: String,
    /// Also show the corporate hierarchy
    #[arg(long)]
    hierarchy: bool,
    /// Place the hierarchy on the map
    #[arg(long)]
    map: bool,
  },
  /// Resolve up to ten names at once
  Bulk {
    /// Comma or newline separated names, `-` to read stdin
    input: String,
    /// Choose the N-th candidate for TARGET instead of the first
    #[arg(long = "select", value_name = "TARGET=N", value_parser = parse_selection)]
    selections: Vec<(String, usize)>,
    /// Persist the selections as pairings
    #[arg(long)]
    save: bool,
  },
  /// List saved pairings
  Pairings {
    /// Open the record behind a saved pairing
    #[arg(long, value_name = "LEI")]
    open: Option<String>,
  },
  /// Check that the backend is reachable
  Health,
}

/// `Apple=2` -> `("Apple", 2)`. Indices are 1-based.
pub fn parse_selection(raw: &str) -> std::result::Result<(String, usize), String> {
  let (target, index) = raw.rsplit_once('=').ok_or_else(|| format!("expected TARGET=N, got '{raw}'"))?;
  let target = target.trim();
  if target.is_empty() {
    return Err(format!("missing target in '{raw}'"));
  }
  let index: usize = index.trim().parse().map_err(|_| format!("invalid index in '{raw}'"))?;
  if index == 0 {
    return Err("indices start at 1".to_string());
  }
  Ok((target.to_string(), index))
}

impl Cli {
  /// File and environment configuration with `--url` applied last.
  pub fn load_config(&self) -> Result<Config> {
    let mut config = Config::load(self.config.as_deref())?;
    if let Some(url) = &self.url {
      config.base_url = url.clone();
      config.validate()?;
    }
    Ok(config)
  }
}

pub async fn run(cli: Cli) -> Result<()> {
  let config = cli.load_config()?;
  tracing::debug!(base_url = config.base_url(), "configuration loaded");
  let explorer = Explorer::from_config(&config).context("failed to build HTTP clients")?;
  let quiet = cli.quiet;

  match cli.command {
    Command::Search { name, company, hierarchy, map } => {
      search(&explorer, quiet, &name, company, hierarchy, map).await
    }
    Command::Company { lei, hierarchy, map } => company(&explorer, quiet, &lei, hierarchy, map).await,
    Command::Bulk { input, selections, save } => bulk(&explorer, quiet, &input, &selections, save).await,
    Command::Pairings { open } => pairings(&explorer, quiet, open.as_deref()).await,
    Command::Health => health(&explorer).await,
  }
}

/// Drive `work` while echoing progress updates to stderr.
async fn with_progress<F: Future>(explorer: &Explorer, quiet: bool, work: F) -> F::Output {
  if quiet {
    return work.await;
  }

  let mut updates = explorer.runner().subscribe();
  let printer = async {
    while updates.changed().await.is_ok() {
      let progress = updates.borrow_and_update().clone();
      if progress.loading && !progress.message.is_empty() {
        eprintln!("{}", display::progress_line(&progress));
      }
    }
  };

  tokio::pin!(work);
  tokio::select! {
    output = &mut work => output,
    _ = printer => work.await,
  }
}

/// The error of the last operation, as a command failure.
fn check(explorer: &Explorer) -> Result<()> {
  match explorer.snapshot().error {
    Some(message) => Err(anyhow!(message)),
    None => Ok(()),
  }
}

fn position(n: usize) -> Result<usize> {
  n.checked_sub(1).ok_or_else(|| anyhow!("positions start at 1"))
}

async fn show_hierarchy(explorer: &Explorer, quiet: bool, map: bool) -> Result<()> {
  check(explorer)?;
  if let Some(text) = explorer.snapshot().hierarchy_text {
    println!("{text}");
  }

  if map {
    with_progress(explorer, quiet, explorer.show_map()).await;
    check(explorer)?;
    let projection = explorer.snapshot().map.and_then(|m| m.projection());
    match projection {
      Some(projection) => print!("{}", display::map_summary(&projection)),
      None => display::warn("No map data for this hierarchy"),
    }
  }
  Ok(())
}

async fn search(
  explorer: &Explorer,
  quiet: bool,
  name: &str,
  company: Option<usize>,
  hierarchy: Option<usize>,
  map: bool,
) -> Result<()> {
  with_progress(explorer, quiet, explorer.search(name)).await;
  check(explorer)?;
  print!("{}", display::search_results(&explorer.snapshot().results));

  if let Some(n) = company {
    with_progress(explorer, quiet, explorer.view_company(position(n)?)).await;
    check(explorer)?;
    if let Some(record) = explorer.snapshot().company {
      println!();
      print!("{}", display::company_card(&record));
    }
  }

  if let Some(n) = hierarchy {
    with_progress(explorer, quiet, explorer.hierarchy_for_result(position(n)?)).await;
    println!();
    show_hierarchy(explorer, quiet, map).await?;
  }
  Ok(())
}

async fn company(explorer: &Explorer, quiet: bool, lei: &str, hierarchy: bool, map: bool) -> Result<()> {
  with_progress(explorer, quiet, explorer.open_company(lei)).await;
  check(explorer)?;
  let Some(record) = explorer.snapshot().company else {
    bail!("No company data received");
  };
  print!("{}", display::company_card(&record));

  if hierarchy || map {
    with_progress(explorer, quiet, explorer.hierarchy_from_company()).await;
    println!();
    show_hierarchy(explorer, quiet, map).await?;
  }
  Ok(())
}

fn read_input(input: &str) -> Result<String> {
  if input != "-" {
    return Ok(input.to_string());
  }
  let mut buffer = String::new();
  std::io::stdin().read_to_string(&mut buffer).context("failed to read names from stdin")?;
  Ok(buffer)
}

async fn bulk(
  explorer: &Explorer,
  quiet: bool,
  input: &str,
  selections: &[(String, usize)],
  save: bool,
) -> Result<()> {
  let raw = read_input(input)?;
  with_progress(explorer, quiet, explorer.bulk_search(&raw)).await;
  check(explorer)?;

  if explorer.snapshot().bulk.rows().is_empty() {
    display::warn("No names to search for");
    return Ok(());
  }

  for (target, n) in selections {
    if !explorer.select_match_at(target, n - 1) {
      display::warn(&format!("No candidate {n} for {target}; keeping the current selection"));
    }
  }

  print!("{}", display::bulk_table(&explorer.snapshot().bulk));

  if save {
    with_progress(explorer, quiet, explorer.save_pairings()).await;
    check(explorer)?;
    let state = explorer.snapshot();
    display::success(&format!("Saved {} pairings", state.bulk.selection_count()));
    print!("{}", display::pairings(state.bulk.pairings(), state.bulk.selected_pairing()));
  }
  Ok(())
}

async fn pairings(explorer: &Explorer, quiet: bool, open: Option<&str>) -> Result<()> {
  with_progress(explorer, quiet, explorer.load_pairings()).await;
  check(explorer)?;

  if let Some(lei) = open {
    with_progress(explorer, quiet, explorer.select_pairing(lei)).await;
    check(explorer)?;
  }

  let state = explorer.snapshot();
  print!("{}", display::pairings(state.bulk.pairings(), state.bulk.selected_pairing()));
  if let Some(record) = state.company {
    println!();
    print!("{}", display::company_card(&record));
  }
  Ok(())
}

async fn health(explorer: &Explorer) -> Result<()> {
  let status = explorer.service().health().await?;
  let label = if status.status.is_empty() { "unknown" } else { status.status.as_str() };
  display::success(&format!("Backend is {}", label.green()));
  if !status.message.is_empty() {
    display::info(&status.message);
  }
  Ok(())
}
