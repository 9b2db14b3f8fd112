//! Video gallery rendering.
//!
//! Produces the stats line and one card per record, in input order. All
//! per-record actions are deep links; nothing here touches the records.

use crate::constants::constants;
use crate::data::VideoRecord;
use crate::format::{format_date, format_duration, html_escape};
use crate::icons::{self, svg};
use crate::links::{DeepLinks, watch_url};
use crate::tags::TagDefinition;

// --- Stats ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
  pub videos: usize,
  pub total_seconds: u64,
  pub watched: usize,
  pub watched_seconds: u64,
}

impl Stats {
  pub fn from_records(records: &[VideoRecord]) -> Self {
    records.iter().fold(Self::default(), |mut acc, r| {
      acc.videos += 1;
      acc.total_seconds = acc.total_seconds.saturating_add(r.duration);
      if r.watched {
        acc.watched += 1;
        acc.watched_seconds = acc.watched_seconds.saturating_add(r.duration);
      }
      acc
    })
  }

  /// `12 videos • 3:04:05 total`
  pub fn summary(&self) -> String {
    format!("{} videos • {} total", self.videos, format_duration(self.total_seconds))
  }

  /// Summary plus watched count and watched duration.
  pub fn detailed(&self) -> String {
    format!(
      "{} videos • {} watched • {} total • {} watched",
      self.videos,
      self.watched,
      format_duration(self.total_seconds),
      format_duration(self.watched_seconds)
    )
  }
}

/// Placeholder glyph for the card at `index`; cycles through the configured set.
pub fn placeholder_glyph(index: usize) -> &'static str {
  let glyphs = &constants().placeholder_glyphs;
  if glyphs.is_empty() { "" } else { glyphs[index % glyphs.len()].as_str() }
}

// --- Cards ---

pub struct Gallery<'a> {
  links: &'a DeepLinks,
  tags: &'a [TagDefinition],
  detailed_stats: bool,
}

impl<'a> Gallery<'a> {
  pub fn new(links: &'a DeepLinks, tags: &'a [TagDefinition]) -> Self {
    Self { links, tags, detailed_stats: false }
  }

  pub fn with_detailed_stats(mut self, detailed: bool) -> Self {
    self.detailed_stats = detailed;
    self
  }

  pub fn stats(&self, records: &[VideoRecord]) -> String {
    let stats = Stats::from_records(records);
    if self.detailed_stats { stats.detailed() } else { stats.summary() }
  }

  /// All cards, concatenated in input order.
  pub fn grid(&self, records: &[VideoRecord]) -> String {
    records.iter().enumerate().map(|(index, record)| self.card(record, index)).collect()
  }

  fn thumbnail(&self, record: &VideoRecord, index: usize) -> String {
    let glyph = placeholder_glyph(index);
    match record.thumbnail.as_deref() {
      // The placeholder stays hidden unless the image fails to load.
      Some(url) => format!(
        r#"<img src="{}" alt="{}" class="thumbnail" loading="lazy" onerror="this.style.display='none'; this.nextElementSibling.style.display='flex';">
          <div class="placeholder-thumbnail" style="display: none;">{}</div>"#,
        html_escape(url),
        html_escape(&record.summary),
        glyph
      ),
      None => format!(r#"<div class="placeholder-thumbnail">{}</div>"#, glyph),
    }
  }

  /// One toggle per tag definition, active when the record carries the tag.
  pub fn tag_toggles(&self, record: &VideoRecord) -> String {
    self
      .tags
      .iter()
      .map(|def| {
        let active = record.has_tag(&def.name);
        let (class, state) = if active { ("active", "Active") } else { ("inactive", "Inactive") };
        let name = html_escape(&def.name);
        format!(
          r#"<a href="{}" class="tag-toggle {class}" title="{name}: {state}" aria-label="{name} ({state})" aria-pressed="{active}">{}<span class="tag-label">{}</span></a>"#,
          html_escape(&self.links.toggle_tag(&record.id, &def.name)),
          def.glyph,
          html_escape(&def.label)
        )
      })
      .collect()
  }

  pub fn card(&self, record: &VideoRecord, index: usize) -> String {
    let id = html_escape(&record.id);
    let starred = record.has_tag("starred");
    let inbox = record.has_tag("inbox");
    let active_if = |on: bool| if on { "active" } else { "" };

    let deep_link = record.file.as_deref().map(|file| {
      let link = self.links.open_line(&self.links.vault_path(file), record.line.unwrap_or(1));
      format!(
        r#"<span class="separator">/</span> <a href="{}" class="deep-link-badge" title="Open note">{}</a>"#,
        html_escape(&link),
        svg(icons::FILE, 14, false)
      )
    });

    format!(
      r#"
<div class="video-card {watched}" data-id="{id}">
  <div class="thumbnail-container">
    <a href="{play}" class="thumbnail-link">
      {thumbnail}
    </a>
    <a href="{star_link}" class="starred-button {star_class}" title="Toggle starred">{star_icon}</a>
    <div class="duration-badge">{clock} {duration}</div>
    <div class="watched-indicator"></div>
  </div>
  <div class="card-content">
    <h3 class="video-title">{summary}</h3>
    <div class="video-meta">
      <span class="channel-name">{user}{channel}</span>
      <a href="{watch}" class="youtube-link-badge" target="_blank" rel="noopener noreferrer" title="Open in YouTube">{link_icon}</a>
      {deep_link}
      <span class="video-date">{calendar}{date}</span>
    </div>
    <div class="action-buttons">
      <a href="{inbox_watched_link}" class="btn btn-watched {watched_active}" title="Toggle watched + inbox">{check} Watched</a>
      <a href="{inbox_link}" class="btn btn-inbox {inbox_active}" title="Toggle inbox only">{inbox_icon} Inbox</a>
    </div>
    <div class="tag-toggles">{tags}</div>
  </div>
</div>"#,
      watched = if record.watched { "watched" } else { "" },
      play = html_escape(&self.links.play(&record.locator)),
      thumbnail = self.thumbnail(record, index),
      star_link = html_escape(&self.links.toggle_tag(&record.id, "starred")),
      star_class = if starred { "active" } else { "inactive" },
      star_icon = svg(icons::STAR, 20, starred),
      clock = svg(icons::CLOCK, 14, false),
      duration = format_duration(record.duration),
      summary = html_escape(&record.summary),
      user = svg(icons::USER, 14, false),
      channel = html_escape(&record.channel),
      watch = html_escape(&watch_url(&record.locator)),
      link_icon = svg(icons::LINK, 14, false),
      deep_link = deep_link.unwrap_or_default(),
      calendar = svg(icons::CALENDAR, 14, false),
      date = html_escape(&format_date(&record.date)),
      inbox_watched_link = html_escape(&self.links.toggle_inbox_watched(&record.id)),
      watched_active = active_if(record.watched),
      check = svg(icons::CHECK, 14, false),
      inbox_link = html_escape(&self.links.toggle_inbox(&record.id)),
      inbox_active = active_if(inbox),
      inbox_icon = svg(icons::INBOX, 14, false),
      tags = self.tag_toggles(record),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::format::format_title;

  fn record(id: &str) -> VideoRecord {
    VideoRecord {
      id: id.to_string(),
      locator: format!("loc-{}", id),
      summary: "Intro to lifetimes".to_string(),
      channel: "Rustacean".to_string(),
      duration: 3661,
      date: "2024-01-05".to_string(),
      ..Default::default()
    }
  }

  fn tag_defs() -> Vec<TagDefinition> {
    ["starred", "inbox", "later"]
      .iter()
      .map(|name| TagDefinition { name: name.to_string(), glyph: format!("<i>{}</i>", name), label: format_title(name) })
      .collect()
  }

  // --- Stats ---

  #[test]
  fn stats_empty() {
    let stats = Stats::from_records(&[]);
    assert_eq!(stats.videos, 0);
    assert_eq!(stats.summary(), "0 videos • 0:00 total");
  }

  #[test]
  fn stats_counts_watched() {
    let mut watched = record("a");
    watched.watched = true;
    watched.duration = 60;
    let mut unwatched = record("b");
    unwatched.duration = 59;
    let stats = Stats::from_records(&[watched, unwatched]);
    assert_eq!(stats, Stats { videos: 2, total_seconds: 119, watched: 1, watched_seconds: 60 });
    assert_eq!(stats.summary(), "2 videos • 1:59 total");
    assert_eq!(stats.detailed(), "2 videos • 1 watched • 1:59 total • 1:00 watched");
  }

  #[test]
  fn stats_saturate_on_huge_durations() {
    let mut a = record("a");
    a.duration = u64::MAX / 2 + 1;
    a.watched = true;
    let mut b = record("b");
    b.duration = u64::MAX / 2 + 1;
    b.watched = true;
    let stats = Stats::from_records(&[a, b]);
    assert_eq!(stats.total_seconds, u64::MAX);
    assert_eq!(stats.watched_seconds, u64::MAX);
    assert_eq!(stats.videos, 2);
  }

  #[test]
  fn gallery_stats_variant() {
    let links = DeepLinks::new("share");
    let records = [record("a")];
    assert_eq!(Gallery::new(&links, &[]).stats(&records), "1 videos • 1:01:01 total");
    assert!(Gallery::new(&links, &[]).with_detailed_stats(true).stats(&records).contains("0 watched"));
  }

  // --- placeholder_glyph ---

  #[test]
  fn placeholder_cycles_every_ten() {
    assert_eq!(placeholder_glyph(0), placeholder_glyph(10));
    assert_eq!(placeholder_glyph(3), placeholder_glyph(23));
    assert_ne!(placeholder_glyph(0), placeholder_glyph(1));
  }

  // --- tag_toggles ---

  #[test]
  fn only_carried_tag_is_active() {
    let links = DeepLinks::new("share");
    let defs = tag_defs();
    let gallery = Gallery::new(&links, &defs);
    let mut r = record("a");
    r.tags.insert("starred".to_string());

    let html = gallery.tag_toggles(&r);
    assert!(html.contains(r#"class="tag-toggle active" title="starred: Active""#));
    assert!(html.contains(r#"class="tag-toggle inactive" title="inbox: Inactive""#));
    assert!(html.contains(r#"class="tag-toggle inactive" title="later: Inactive""#));
    assert_eq!(html.matches("tag-toggle active").count(), 1);
  }

  #[test]
  fn svg_glyph_stays_out_of_accessible_name() {
    let links = DeepLinks::new("share");
    let glyph = r#"<svg viewBox="0 0 24 24"><circle r="10"/></svg>"#.to_string();
    let defs = [TagDefinition { name: "focus".to_string(), glyph: glyph.clone(), label: "Focus".to_string() }];
    let html = Gallery::new(&links, &defs).tag_toggles(&record("a"));
    assert!(html.contains(r#"aria-label="focus (Inactive)""#));
    assert!(html.contains(&glyph));
    assert!(html.contains(r#"<span class="tag-label">Focus</span>"#));
    assert!(!html.contains("&lt;svg"));
  }

  #[test]
  fn missing_tags_render_all_inactive() {
    let links = DeepLinks::new("share");
    let defs = tag_defs();
    let html = Gallery::new(&links, &defs).tag_toggles(&record("a"));
    assert_eq!(html.matches("tag-toggle inactive").count(), 3);
    assert!(html.contains(r#"aria-pressed="false""#));
  }

  // --- card ---

  #[test]
  fn card_without_thumbnail_shows_placeholder() {
    let links = DeepLinks::new("share");
    let html = Gallery::new(&links, &[]).card(&record("a"), 12);
    assert!(html.contains(&format!(r#"<div class="placeholder-thumbnail">{}</div>"#, placeholder_glyph(2))));
    assert!(!html.contains("<img"));
  }

  #[test]
  fn card_with_thumbnail_hides_placeholder_until_error() {
    let links = DeepLinks::new("share");
    let mut r = record("a");
    r.thumbnail = Some("https://img.example/a.jpg".to_string());
    let html = Gallery::new(&links, &[]).card(&r, 0);
    assert!(html.contains(r#"<img src="https://img.example/a.jpg""#));
    assert!(html.contains("onerror="));
    assert!(html.contains(r#"class="placeholder-thumbnail" style="display: none;""#));
  }

  #[test]
  fn card_metadata_and_links() {
    let links = DeepLinks::new("share");
    let html = Gallery::new(&links, &[]).card(&record("a"), 0);
    assert!(html.contains("1:01:01"));
    assert!(html.contains("Jan 5, 2024"));
    assert!(html.contains("https://youtube.com/watch?v=loc-a"));
    assert!(html.contains("obsidian://advanced-uri?vault=share&amp;eval="));
    assert!(html.contains(r#"class="starred-button inactive""#));
    assert!(!html.contains("deep-link-badge"));
  }

  #[test]
  fn card_watched_and_inbox_state() {
    let links = DeepLinks::new("share");
    let mut r = record("a");
    r.watched = true;
    r.tags.insert("inbox".to_string());
    let html = Gallery::new(&links, &[]).card(&r, 0);
    assert!(html.contains(r#"class="video-card watched""#));
    assert!(html.contains(r#"class="btn btn-watched active""#));
    assert!(html.contains(r#"class="btn btn-inbox active""#));
  }

  #[test]
  fn card_deep_link_when_file_present() {
    let links = DeepLinks::new("share");
    let mut r = record("a");
    r.file = Some("yt/a.md".to_string());
    r.line = Some(4);
    let html = Gallery::new(&links, &[]).card(&r, 0);
    assert!(html.contains("deep-link-badge"));
    assert!(html.contains(&urlencoding::encode(r#"openLineInNvim("~/share/yt/a.md", 4)"#).into_owned()));
  }

  #[test]
  fn card_escapes_text() {
    let links = DeepLinks::new("share");
    let mut r = record("a");
    r.summary = "<b>bold</b>".to_string();
    let html = Gallery::new(&links, &[]).card(&r, 0);
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
  }

  #[test]
  fn grid_keeps_input_order() {
    let links = DeepLinks::new("share");
    let html = Gallery::new(&links, &[]).grid(&[record("first"), record("second")]);
    let first = html.find(r#"data-id="first""#).unwrap();
    let second = html.find(r#"data-id="second""#).unwrap();
    assert!(first < second);
    assert!(Gallery::new(&links, &[]).grid(&[]).is_empty());
  }
}
