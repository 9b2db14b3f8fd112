//! Full HTML documents wrapping the gallery and dashboard fragments.

use crate::constants::constants;
use crate::format::html_escape;
use crate::icons::{self, svg};

const STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Source Sans Pro', sans-serif; background: var(--background); color: var(--foreground); line-height: 1.6; }
.container { max-width: 1400px; margin: 0 auto; padding: 2.5rem 2rem; }
.header { text-align: center; margin-bottom: 2rem; }
.header h1 { font-size: 2.5rem; font-weight: 600; }
.stats { text-align: center; color: var(--color8); margin-bottom: 2rem; }
.icon { display: inline; vertical-align: middle; }
a { color: inherit; text-decoration: none; }

.video-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1.5rem; }
.video-card { background: var(--color0); border-radius: 12px; overflow: hidden; position: relative; }
.video-card.watched { opacity: 0.6; }
.thumbnail-container { position: relative; aspect-ratio: 16 / 9; }
.thumbnail { width: 100%; height: 100%; object-fit: cover; }
.placeholder-thumbnail { display: flex; align-items: center; justify-content: center; width: 100%; height: 100%; font-size: 3rem; background: var(--color8); }
.starred-button { position: absolute; top: 0.5rem; right: 0.5rem; color: var(--color3); }
.starred-button.inactive { opacity: 0.5; }
.duration-badge { position: absolute; bottom: 0.5rem; right: 0.5rem; background: rgba(0, 0, 0, 0.75); padding: 0 0.4rem; border-radius: 4px; font-size: 0.85rem; }
.watched-indicator { position: absolute; bottom: 0; left: 0; height: 4px; width: 0; background: var(--color2); }
.video-card.watched .watched-indicator { width: 100%; }
.card-content { padding: 1rem; }
.video-title { font-size: 1.05rem; margin-bottom: 0.5rem; }
.video-meta { display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: center; font-size: 0.85rem; color: var(--color7); }
.separator { color: var(--color7); }
.action-buttons { display: flex; gap: 0.5rem; margin-top: 0.75rem; }
.btn { padding: 0.25rem 0.75rem; border: 1px solid var(--color8); border-radius: 6px; font-size: 0.85rem; }
.btn.active { background: var(--color2); color: var(--color0); }
.tag-toggles { display: flex; gap: 0.35rem; margin-top: 0.75rem; }
.tag-toggle { padding: 0.1rem 0.4rem; border-radius: 4px; }
.tag-toggle.active { background: var(--color4); }
.tag-toggle.inactive { opacity: 0.35; }
.tag-label { margin-left: 0.25rem; font-size: 0.75rem; }

.dashboard-tabs { display: flex; gap: 0.5rem; justify-content: center; margin-bottom: 1.5rem; }
.dashboard-tabs button { background: none; border: 1px solid var(--color8); color: inherit; padding: 0.4rem 1rem; border-radius: 6px; cursor: pointer; }
.dashboard-tabs button.active { background: var(--color4); }
.dashboard-widget { display: none; }
.dashboard-widget.active { display: block; }
.collection-links { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 1rem; }
.collection-link { display: block; padding: 1rem; border: 1px solid var(--color8); border-radius: 8px; }
.collection-count { color: var(--color8); font-size: 0.85rem; }
.refresh-button { display: flex; align-items: center; padding: 0.4rem; border-radius: 6px; color: var(--color7); }
.refresh-button:hover { color: var(--color4); }
.sub-tabs { display: flex; flex-wrap: wrap; gap: 0.35rem; margin-bottom: 1rem; }
.sub-tab-button { background: none; border: 1px solid var(--color8); color: inherit; padding: 0.2rem 0.75rem; border-radius: 4px; cursor: pointer; font-size: 0.85rem; }
.sub-tab-button.active { background: var(--color5); color: var(--color0); }
.collection { display: none; margin-bottom: 1.5rem; }
.collection.active { display: block; }
.collection-heading { margin-bottom: 0.5rem; }
.data-table { width: 100%; border-collapse: collapse; }
.data-table td { padding: 0.35rem 0.5rem; border-bottom: 1px solid var(--color8); vertical-align: middle; }
.data-row.active { background: rgba(255, 255, 255, 0.03); }
.data-row.focused { border-left: 3px solid var(--color3); }
.status-cell { width: 8rem; font-family: monospace; font-size: 0.8rem; }
.status-icon-cell[data-status="?"], .status-icon-cell[data-status="w"] { color: var(--color1); }
.status-icon-cell[data-status="t"] { color: var(--color5); }
.scheduled-cell, .date-cell, .location-cell { width: 9rem; font-size: 0.85rem; color: var(--color7); }
.description { font-size: 0.75rem; color: var(--color8); }
.action-cell { text-align: right; white-space: nowrap; }
.state-toggle { margin-left: 0.35rem; padding: 0.15rem 0.5rem; border: 1px solid var(--color8); border-radius: 3px; font-size: 0.7rem; text-transform: uppercase; }
.state-toggle.inactive, .state-toggle.unfocused { opacity: 0.4; }
.state-toggle.active { background: var(--color2); color: var(--color0); }
.state-toggle.focused { background: var(--color3); color: var(--color0); }
.empty-state { text-align: center; padding: 3rem; }
"#;

fn document(title: &str, palette_css: &str, body: &str, script: &str) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{}</title>
  <style>
{}
{}
  </style>
</head>
<body>
  <div class="container">
{}
  </div>
  <script>
{}
  </script>
</body>
</html>
"#,
    html_escape(title),
    palette_css,
    STYLES,
    body,
    script
  )
}

/// A video collection page: header, stats line and card grid.
pub fn video_page(title: &str, palette_css: &str, stats: &str, grid: &str) -> String {
  let body = format!(
    r#"    <div class="header">
      <h1>{} {}</h1>
    </div>
    <div class="stats" id="stats">{}</div>
    <div class="video-grid" id="videoGrid">{}
    </div>"#,
    svg(icons::FILM, 32, false),
    html_escape(title),
    stats,
    grid
  );
  document(title, palette_css, &body, "")
}

/// A JavaScript string literal that cannot close the surrounding `<script>`.
fn js_string(value: &str) -> String {
  serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string()).replace("</", "<\\/")
}

/// The tabbed dashboard. The embedded script repeats the switching client-side.
pub fn dashboard_page(palette_css: &str, tabs: &str, widgets: &str, default_tab: &str) -> String {
  let body = format!(
    r#"    <div class="header">
      <h1>{} Dashboard</h1>
    </div>
    {}
    <main class="dashboard">
{}
    </main>"#,
    svg(icons::EYE, 32, false),
    tabs,
    widgets
  );
  let script = include_str!("../assets/dashboard.js")
    .replace("{STORAGE_KEY}", &js_string(&constants().storage_key))
    .replace("{DEFAULT_TAB}", &js_string(default_tab));
  document("Dashboard", palette_css, &body, &script)
}
