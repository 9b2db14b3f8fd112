//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is no runtime file
//! I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Cycle of glyphs shown in place of a missing or broken thumbnail.
  pub placeholder_glyphs: Vec<String>,

  // Deep links
  pub deep_link_base: String,
  pub templater_object: String,
  pub default_vault: String,

  // Video platform
  pub watch_url_base: String,

  // Dashboard tabs
  pub storage_key: String,
  pub default_tab: String,

  // Loader
  pub sample_size: usize,
  pub tags_suffix: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn constants_parse() {
    let c = constants();
    assert_eq!(c.placeholder_glyphs.len(), 10);
    assert_eq!(c.storage_key, "dashboard-active-tab");
    assert!(c.sample_size > 0);
  }
}
