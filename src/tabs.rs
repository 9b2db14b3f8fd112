//! Dashboard tab switching with a persisted active tab.
//!
//! The controller owns the visibility flags of every widget and tab button
//! and writes the chosen tab to an injected [`StateStore`] on each switch.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

// --- State stores ---

/// String key-value storage for UI state.
pub trait StateStore {
  fn get(&self, key: &str) -> Option<String>;
  fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, used for previews and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  values: BTreeMap<String, String>,
  #[cfg(test)]
  writes: usize,
}

impl MemoryStore {
  /// Number of `set` calls so far.
  #[cfg(test)]
  pub fn writes(&self) -> usize {
    self.writes
  }
}

impl StateStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    #[cfg(test)]
    {
      self.writes += 1;
    }
    Ok(())
  }
}

/// JSON-file store, written through on every `set`.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  values: BTreeMap<String, String>,
}

impl FileStore {
  /// Open the store at `path`. A missing or unreadable file starts empty.
  pub fn open(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let values = std::fs::read_to_string(&path)
      .ok()
      .and_then(|content| serde_json::from_str(&content).ok())
      .unwrap_or_default();
    Self { path, values }
  }

  /// The per-user store under the platform data directory.
  pub fn default_location() -> Option<PathBuf> {
    ProjectDirs::from("", "", "playlist-maker").map(|dirs| dirs.data_dir().join("state.json"))
  }
}

impl StateStore for FileStore {
  fn get(&self, key: &str) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    if let Some(dir) = self.path.parent() {
      std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = serde_json::to_string_pretty(&self.values).context("Failed to serialize tab state")?;
    std::fs::write(&self.path, content).with_context(|| format!("Failed to write {}", self.path.display()))
  }
}

// --- Controller ---

/// A dashboard panel shown or hidden by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
  pub id: String,
  pub active: bool,
}

/// A tab button; clicking it switches to the widget named by `tab`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabButton {
  pub tab: String,
  pub label: String,
  pub active: bool,
}

impl TabButton {
  pub fn new(tab: impl Into<String>, label: impl Into<String>) -> Self {
    Self { tab: tab.into(), label: label.into(), active: false }
  }
}

pub struct TabController<S: StateStore> {
  store: S,
  key: String,
  widgets: Vec<Widget>,
  buttons: Vec<TabButton>,
}

impl<S: StateStore> TabController<S> {
  /// Register the widgets and buttons, then switch to the persisted tab, or `default_tab` when none is stored.
  pub fn init(
    store: S,
    key: impl Into<String>,
    default_tab: &str,
    widget_ids: impl IntoIterator<Item = String>,
    buttons: Vec<TabButton>,
  ) -> Result<Self> {
    let widgets = widget_ids.into_iter().map(|id| Widget { id, active: false }).collect();
    let mut controller = Self { store, key: key.into(), widgets, buttons };
    let initial = controller.store.get(&controller.key).unwrap_or_else(|| default_tab.to_string());
    controller.switch(&initial)?;
    Ok(controller)
  }

  /// Show the widget `tab_id` and highlight its button, hiding everything else.
  /// Unknown ids leave everything hidden. The id is persisted either way.
  pub fn switch(&mut self, tab_id: &str) -> Result<()> {
    for widget in &mut self.widgets {
      widget.active = widget.id == tab_id;
    }
    for button in &mut self.buttons {
      button.active = button.tab == tab_id;
    }
    debug!(tab = %tab_id, matched = self.active_widget().is_some(), "tabs: switch");
    self.store.set(&self.key, tab_id)
  }

  /// Click the button at `index`. Out-of-range clicks are ignored.
  pub fn click(&mut self, index: usize) -> Result<()> {
    let Some(tab) = self.buttons.get(index).map(|b| b.tab.clone()) else { return Ok(()) };
    self.switch(&tab)
  }

  pub fn active_widget(&self) -> Option<&str> {
    self.widgets.iter().find(|w| w.active).map(|w| w.id.as_str())
  }

  pub fn is_active(&self, widget_id: &str) -> bool {
    self.widgets.iter().any(|w| w.active && w.id == widget_id)
  }

  #[cfg(test)]
  pub fn widgets(&self) -> &[Widget] {
    &self.widgets
  }

  pub fn buttons(&self) -> &[TabButton] {
    &self.buttons
  }

  #[cfg(test)]
  pub fn store(&self) -> &S {
    &self.store
  }

  #[cfg(test)]
  pub fn into_store(self) -> S {
    self.store
  }
}
