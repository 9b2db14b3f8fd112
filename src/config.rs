use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::constants;

/// User preferences from `prefs.toml`. Every field is optional; CLI flags win.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub input_dir: Option<PathBuf>,
  pub output_dir: Option<PathBuf>,
  pub vault: Option<String>,
  pub default_tab: Option<String>,
  pub detailed_stats: Option<bool>,
}

impl Config {
  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "playlist-maker").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  /// Load from the platform config dir. A missing or malformed file yields defaults.
  pub fn load() -> Self {
    if let Some(config_file) = Self::path()
      && let Ok(content) = std::fs::read_to_string(config_file)
      && let Ok(config) = toml::from_str(&content)
    {
      return config;
    }
    Self::default()
  }

  /// Load from an explicit file; here a bad file is an error.
  pub fn load_from(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
  }

  pub fn input_dir(&self) -> PathBuf {
    self.input_dir.clone().map(expand_home).unwrap_or_else(default_input_dir)
  }

  /// Pages go next to their JSON sources unless configured otherwise.
  pub fn output_dir(&self, input_dir: &Path) -> PathBuf {
    self.output_dir.clone().map(expand_home).unwrap_or_else(|| input_dir.to_path_buf())
  }

  pub fn vault(&self) -> String {
    self.vault.clone().unwrap_or_else(|| constants().default_vault.clone())
  }

  pub fn default_tab(&self) -> String {
    self.default_tab.clone().unwrap_or_else(|| constants().default_tab.clone())
  }
}

/// `~/share/_tmp`, where the exporter drops its JSON files.
fn default_input_dir() -> PathBuf {
  BaseDirs::new().map(|dirs| dirs.home_dir().join("share").join("_tmp")).unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: PathBuf) -> PathBuf {
  if let Ok(rest) = path.strip_prefix("~")
    && let Some(dirs) = BaseDirs::new()
  {
    return dirs.home_dir().join(rest);
  }
  path
}
