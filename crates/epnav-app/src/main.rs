//! Command-line entry point: session replay, history listing, route resolution

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use epnav_core::{parse_read_route, parse_source_url, HistoryRecorder, NavConfig};
use epnav_history::{FileStore, HistoryStore, PersistentHistory};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod replay;
mod script;

#[derive(Parser, Debug)]
#[command(name = "epnav", version, about = "Episode boundary navigation engine")]
struct Cli {
    /// Engine configuration (JSON); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the reading history store
    #[arg(long, global = true, default_value = ".epnav")]
    history_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded reader session and print the navigations it issues
    Replay {
        script: PathBuf,

        /// Do not touch the history store
        #[arg(long)]
        no_history: bool,
    },
    /// List the reading history, most recent first
    History,
    /// Resolve a series URL or read route to the reader location
    Resolve { input: String },
}

fn load_config(path: Option<&PathBuf>) -> Result<NavConfig> {
    match path {
        Some(path) => NavConfig::from_file(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(NavConfig::default()),
    }
}

fn run_replay(cli: &Cli, script: &PathBuf, no_history: bool) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let script = script::SessionScript::from_file(script)?;

    let history: Option<Arc<dyn HistoryRecorder>> = if no_history {
        None
    } else {
        let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(&cli.history_dir));
        Some(Arc::new(PersistentHistory::from_config(store, &config.history)))
    };

    let report = replay::replay(&script, config, history);
    for navigation in &report.navigations {
        println!("{:>8}ms  {}", navigation.at.as_millis(), navigation.target.url());
    }
    if !report.focused.is_empty() {
        println!("focused units: {:?}", report.focused);
    }
    info!(
        navigations = report.navigations.len(),
        suppressed = report.suppressed,
        "replay finished"
    );
    Ok(())
}

fn run_history(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let store: Arc<dyn HistoryStore> = Arc::new(FileStore::new(&cli.history_dir));
    let log = PersistentHistory::from_config(store, &config.history).load();

    if log.is_empty() {
        println!("no reading history in {}", cli.history_dir.display());
        return Ok(());
    }
    for entry in log.entries() {
        println!(
            "{}  {:<20} ep {:<5} {}  {}",
            entry.last_accessed.format("%Y-%m-%d %H:%M"),
            entry.series_id,
            entry.last_episode,
            entry.resume_address().read_route(),
            entry.title,
        );
    }
    Ok(())
}

fn run_resolve(input: &str) -> Result<()> {
    let address = if input.starts_with('/') {
        parse_read_route(input)?
    } else if input.contains("://") {
        parse_source_url(input)?
    } else {
        bail!("expected a series URL or a /read/{{series}}/{{episode}} route, got {input:?}");
    };

    println!("{}", address.read_route());
    println!("/bibi/index.html{}", address.reader_location());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Replay { script, no_history } => run_replay(&cli, script, *no_history),
        Command::History => run_history(&cli),
        Command::Resolve { input } => run_resolve(input),
    }
}
