//! Folder scan and page generation.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::dashboard::Dashboard;
use crate::data::{ContentType, Items, detect_content_type, validate_and_sanitize};
use crate::format::format_title;
use crate::gallery::Gallery;
use crate::links::DeepLinks;
use crate::page;
use crate::tabs::StateStore;
use crate::tags::{TagDefinition, is_tags_file, load_tag_definitions};
use crate::theme;

/// File stem of the dashboard page.
const DASHBOARD_STEM: &str = "index";

/// One sanitized JSON export.
#[derive(Debug, Clone)]
pub struct Collection {
  pub stem: String,
  pub title: String,
  pub items: Items,
  /// Tag toggles offered on video cards; empty for other types.
  pub tags: Vec<TagDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
  pub filename: String,
  pub reason: String,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
  pub input_dir: PathBuf,
  pub output_dir: PathBuf,
  pub vault: String,
  pub default_tab: String,
  pub detailed_stats: bool,
}

#[derive(Debug, Default)]
pub struct BuildReport {
  pub collections: Vec<Collection>,
  pub skipped: Vec<Skipped>,
  pub written: Vec<PathBuf>,
}

impl BuildReport {
  /// `(type, collection count, item count)` for every type with at least one collection.
  pub fn summary(&self) -> Vec<(ContentType, usize, usize)> {
    ContentType::ALL
      .into_iter()
      .filter_map(|kind| {
        let of_kind: Vec<&Collection> = self.collections.iter().filter(|c| c.items.content_type() == kind).collect();
        (!of_kind.is_empty()).then(|| (kind, of_kind.len(), of_kind.iter().map(|c| c.items.len()).sum::<usize>()))
      })
      .collect()
  }
}

/// Collection JSON files in `dir`, sorted by name, excluding tag sidecars.
pub fn find_collection_files(dir: &Path) -> Result<Vec<PathBuf>> {
  let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
    .with_context(|| format!("Failed to list {}", dir.display()))?
    .filter_map(|entry| entry.ok().map(|e| e.path()))
    .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
    .filter(|path| !is_tags_file(path))
    .collect();
  files.sort();
  Ok(files)
}

/// Parse, classify and sanitize one collection file.
pub fn load_collection(path: &Path) -> Result<Collection> {
  let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let value: Value = serde_json::from_str(&raw).context("Invalid JSON")?;
  let kind = detect_content_type(&value);
  debug!(file = %path.display(), kind = kind.label(), "detected content type");

  let items = validate_and_sanitize(&value, kind)?;
  if items.is_empty() {
    bail!("No valid items after sanitization");
  }

  let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  let tags = if kind == ContentType::Video { load_tag_definitions(path)? } else { Vec::new() };
  Ok(Collection { title: format_title(&stem), stem, items, tags })
}

fn write_page(path: &Path, html: &str) -> Result<()> {
  std::fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

/// Render one page per video collection plus the dashboard, restoring the dashboard's tab from `store`.
pub fn build<S: StateStore>(options: &BuildOptions, store: S) -> Result<BuildReport> {
  if !options.input_dir.is_dir() {
    bail!("Folder '{}' not found", options.input_dir.display());
  }
  let files = find_collection_files(&options.input_dir)?;
  if files.is_empty() {
    bail!("No JSON files found in {}", options.input_dir.display());
  }
  info!(count = files.len(), dir = %options.input_dir.display(), "found collection files");

  std::fs::create_dir_all(&options.output_dir)
    .with_context(|| format!("Failed to create {}", options.output_dir.display()))?;

  let links = DeepLinks::new(options.vault.clone());
  let palette = theme::palette_css();
  let mut report = BuildReport::default();

  for path in files {
    let filename = path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let collection = match load_collection(&path) {
      Ok(collection) => collection,
      Err(e) => {
        let reason = format!("{:#}", e);
        warn!(file = %filename, reason = %reason, "skipped");
        report.skipped.push(Skipped { filename, reason });
        continue;
      }
    };

    if collection.items.content_type() == ContentType::Video && collection.stem.eq_ignore_ascii_case(DASHBOARD_STEM) {
      let reason = format!("'{DASHBOARD_STEM}.html' is reserved for the dashboard");
      warn!(file = %filename, reason = %reason, "skipped");
      report.skipped.push(Skipped { filename, reason });
      continue;
    }

    if let Items::Video(records) = &collection.items {
      let gallery = Gallery::new(&links, &collection.tags).with_detailed_stats(options.detailed_stats);
      let html = page::video_page(&collection.title, &palette, &gallery.stats(records), &gallery.grid(records));
      let out = options.output_dir.join(format!("{}.html", collection.stem));
      write_page(&out, &html)?;
      info!(file = %filename, page = %out.display(), videos = records.len(), "generated video page");
      report.written.push(out);
    } else {
      info!(file = %filename, kind = collection.items.content_type().label(), items = collection.items.len(), "loaded");
    }
    report.collections.push(collection);
  }

  let dashboard = Dashboard::new(&links, &report.collections);
  let tabs = dashboard.controller(store, &constants().storage_key, &options.default_tab)?;
  let html = page::dashboard_page(
    &palette,
    &dashboard.tabs_html(&tabs),
    &dashboard.widgets_html(&tabs),
    &options.default_tab,
  );
  let index = options.output_dir.join(format!("{DASHBOARD_STEM}.html"));
  write_page(&index, &html)?;
  info!(page = %index.display(), active = ?tabs.active_widget(), "generated dashboard");
  report.written.push(index);

  Ok(report)
}
