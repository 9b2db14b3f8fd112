use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::constants::constants;
use crate::format::format_title;

/// A named, iconized boolean attribute a record may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
  pub name: String,
  /// Markup shown inside the toggle (an emoji or inline SVG).
  pub glyph: String,
  /// Plain-text name shown beside the glyph.
  pub label: String,
}

/// Parse a `name -> glyph` object, keeping the file's key order.
pub fn parse_tag_definitions(raw: &str) -> Result<Vec<TagDefinition>> {
  let value: Value = serde_json::from_str(raw).context("Tag definitions are not valid JSON")?;
  let map = value.as_object().ok_or_else(|| anyhow!("Tag definitions must be a JSON object"))?;
  Ok(
    map
      .iter()
      .map(|(name, glyph)| {
        let glyph = match glyph {
          Value::String(s) => s.clone(),
          other => other.to_string(),
        };
        TagDefinition { name: name.clone(), label: format_title(name), glyph }
      })
      .collect(),
  )
}

/// Sidecar path holding the tag definitions for a collection: `<stem>-tags.json`.
pub fn tags_path_for(collection: &Path) -> PathBuf {
  let stem = collection.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  collection.with_file_name(format!("{}{}.json", stem, constants().tags_suffix))
}

/// Whether a JSON file is a tag sidecar rather than a collection.
pub fn is_tags_file(path: &Path) -> bool {
  path.file_stem().and_then(|s| s.to_str()).is_some_and(|s| s.ends_with(&constants().tags_suffix))
}

/// Load the tag definitions for a collection. A missing sidecar means no tags.
pub fn load_tag_definitions(collection: &Path) -> Result<Vec<TagDefinition>> {
  let path = tags_path_for(collection);
  if !path.exists() {
    return Ok(Vec::new());
  }
  let raw = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  parse_tag_definitions(&raw).with_context(|| format!("Invalid tag definitions in {}", path.display()))
}
