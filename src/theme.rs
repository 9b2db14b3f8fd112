use directories::BaseDirs;
use std::path::PathBuf;
use tracing::debug;

/// Palette used when no pywal colors are available.
pub const FALLBACK_CSS: &str = r#":root {
  --background: #1a1a2e;
  --foreground: #ffffff;
  --color0: #000000;
  --color1: #ee5396;
  --color2: #5eca89;
  --color3: #f0c674;
  --color4: #668ee8;
  --color5: #a78bfa;
  --color6: #2dd4bf;
  --color7: #ffffff;
  --color8: #666666;
}"#;

/// pywal's generated stylesheet, `~/.cache/wal/colors.css`.
pub fn pywal_path() -> Option<PathBuf> {
  BaseDirs::new().map(|dirs| dirs.home_dir().join(".cache").join("wal").join("colors.css"))
}

/// CSS custom properties for the page palette: pywal's when readable, otherwise the fallback.
pub fn palette_css() -> String {
  if let Some(path) = pywal_path()
    && let Ok(css) = std::fs::read_to_string(&path)
  {
    debug!(path = %path.display(), "theme: using pywal colors");
    return css;
  }
  FALLBACK_CSS.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fallback_defines_palette() {
    assert!(FALLBACK_CSS.contains("--background"));
    assert!(FALLBACK_CSS.contains("--color7"));
  }

  #[test]
  fn palette_is_never_empty() {
    assert!(!palette_css().trim().is_empty());
  }
}
