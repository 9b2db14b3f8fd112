mod config;
mod constants;
mod dashboard;
mod data;
mod format;
mod gallery;
mod icons;
mod links;
mod page;
mod site;
mod tabs;
mod tags;
mod theme;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use config::Config;
use constants::constants;
use site::BuildOptions;
use tabs::{FileStore, MemoryStore, StateStore, TabButton, TabController};

// --- CLI ---

#[derive(Parser, Debug)]
#[command(name = "pm", author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// More log output (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  /// Only log errors
  #[arg(short, long, global = true)]
  quiet: bool,

  /// Read preferences from this file instead of the platform config dir
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Generate the video pages and the dashboard from a folder of JSON exports
  Build {
    /// Folder containing the JSON exports (default: ~/share/_tmp)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the HTML pages (default: the input folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vault name used in deep links
    #[arg(long)]
    vault: Option<String>,

    /// Include watched count and watched duration in the stats line
    #[arg(long)]
    detailed_stats: bool,

    /// Render the dashboard with the default tab and leave the stored selection alone
    #[arg(long)]
    no_state: bool,
  },
  /// Show or change the dashboard's active tab
  Tab {
    /// Tab to switch to; prints the current tab when omitted
    id: Option<String>,
  },
  /// Print a shell completion script
  Completions {
    #[arg(value_enum)]
    shell: Shell,
  },
}

// --- Logging ---

fn init_tracing(verbose: u8, quiet: bool) -> Result<WorkerGuard> {
  let default_level = match (quiet, verbose) {
    (true, _) => "error",
    (false, 0) => "warn",
    (false, 1) => "info",
    (false, 2) => "debug",
    (false, _) => "trace",
  };
  let env_filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_level))
    .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

  let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
  let init_result = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_ansi(std::io::stderr().is_terminal())
    .with_writer(writer)
    .try_init();
  if let Err(err) = init_result {
    debug!(error = %err, "tracing subscriber already set, continuing");
  }
  Ok(guard)
}

// --- Commands ---

fn state_store() -> Result<FileStore> {
  let path = FileStore::default_location().context("Could not determine a data directory for tab state")?;
  Ok(FileStore::open(path))
}

fn run_build(config: &Config, options: BuildOptions, no_state: bool) -> Result<()> {
  debug!(?config, ?options, "build options");
  println!("Scanning folder: {}", options.input_dir.display());

  let report = if no_state { site::build(&options, MemoryStore::default())? } else { site::build(&options, state_store()?)? };

  for path in &report.written {
    println!("  Generated: {}", path.display());
  }

  println!("\nSummary:");
  for (kind, collections, items) in report.summary() {
    let label = kind.tab_label();
    println!("  {label}: {collections} collections, {items} total items");
  }

  if !report.skipped.is_empty() {
    println!("\nSkipped files:");
    for skipped in &report.skipped {
      println!("  • {}: {}", skipped.filename, skipped.reason);
    }
  }
  Ok(())
}

/// Controller over every content type's tab. The tab set isn't known without a build, so all are offered.
fn all_tabs<S: StateStore>(store: S, default_tab: &str) -> Result<TabController<S>> {
  let kinds = data::ContentType::ALL;
  let widget_ids = kinds.iter().map(|k| k.tab_id().to_string());
  let buttons = kinds.iter().map(|k| TabButton::new(k.tab_id(), k.tab_label())).collect();
  TabController::init(store, constants().storage_key.as_str(), default_tab, widget_ids, buttons)
}

/// Click the button for `id`, or switch directly when no button offers it.
fn select_tab<S: StateStore>(tabs: &mut TabController<S>, id: &str) -> Result<()> {
  match tabs.buttons().iter().position(|b| b.tab == id) {
    Some(index) => tabs.click(index),
    None => tabs.switch(id),
  }
}

fn run_tab(config: &Config, id: Option<String>) -> Result<()> {
  let store = state_store()?;
  let Some(id) = id else {
    println!("{}", store.get(&constants().storage_key).unwrap_or_else(|| config.default_tab()));
    return Ok(());
  };

  let mut tabs = all_tabs(store, &config.default_tab())?;
  select_tab(&mut tabs, &id)?;
  match tabs.active_widget() {
    Some(active) => println!("Active tab: {active}"),
    None => println!("Active tab: {id} (no matching widget; all tabs hidden)"),
  }
  Ok(())
}

// --- Main ---

fn main() -> Result<()> {
  let args = Args::parse();
  let _guard = init_tracing(args.verbose, args.quiet)?;

  let config = match &args.config {
    Some(path) => Config::load_from(path)?,
    None => Config::load(),
  };

  match args.command {
    Command::Build { input, output, vault, detailed_stats, no_state } => {
      let input_dir = input.unwrap_or_else(|| config.input_dir());
      let output_dir = output.unwrap_or_else(|| config.output_dir(&input_dir));
      let options = BuildOptions {
        input_dir,
        output_dir,
        vault: vault.unwrap_or_else(|| config.vault()),
        default_tab: config.default_tab(),
        detailed_stats: detailed_stats || config.detailed_stats.unwrap_or(false),
      };
      run_build(&config, options, no_state)
    }
    Command::Tab { id } => run_tab(&config, id),
    Command::Completions { shell } => {
      clap_complete::generate(shell, &mut Args::command(), "pm", &mut std::io::stdout());
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_definition_is_valid() {
    Args::command().debug_assert();
  }

  #[test]
  fn parse_build_flags() {
    let args = Args::try_parse_from(["pm", "-vv", "build", "--input", "/in", "--vault", "notes", "--detailed-stats"]).unwrap();
    assert_eq!(args.verbose, 2);
    match args.command {
      Command::Build { input, vault, detailed_stats, no_state, .. } => {
        assert_eq!(input, Some(PathBuf::from("/in")));
        assert_eq!(vault.as_deref(), Some("notes"));
        assert!(detailed_stats);
        assert!(!no_state);
      }
      other => panic!("unexpected command: {:?}", other),
    }
  }

  #[test]
  fn parse_tab_without_id() {
    let args = Args::try_parse_from(["pm", "tab"]).unwrap();
    assert!(matches!(args.command, Command::Tab { id: None }));
  }

  // --- select_tab ---

  #[test]
  fn select_known_tab_activates_its_button() {
    let mut tabs = all_tabs(MemoryStore::default(), "videos").unwrap();
    select_tab(&mut tabs, "notes").unwrap();
    assert_eq!(tabs.active_widget(), Some("notes"));
    assert!(tabs.buttons().iter().any(|b| b.tab == "notes" && b.active));
    assert_eq!(tabs.store().get(&constants().storage_key).as_deref(), Some("notes"));
  }

  #[test]
  fn select_unknown_tab_hides_everything_but_persists() {
    let mut tabs = all_tabs(MemoryStore::default(), "videos").unwrap();
    select_tab(&mut tabs, "archive").unwrap();
    assert_eq!(tabs.active_widget(), None);
    assert!(tabs.buttons().iter().all(|b| !b.active));
    assert_eq!(tabs.store().get(&constants().storage_key).as_deref(), Some("archive"));
  }

  #[test]
  fn all_tabs_restores_stored_selection() {
    let mut store = MemoryStore::default();
    store.set(&constants().storage_key, "calendar").unwrap();
    let tabs = all_tabs(store, "videos").unwrap();
    assert_eq!(tabs.active_widget(), Some("calendar"));
  }
}
