use chrono::NaiveDate;

// --- Text formatting ---

/// Format a duration in seconds as `H:MM:SS`, or `M:SS` when under an hour.
pub fn format_duration(seconds: u64) -> String {
  let hours = seconds / 3600;
  let minutes = (seconds % 3600) / 60;
  let secs = seconds % 60;

  if hours > 0 { format!("{}:{:02}:{:02}", hours, minutes, secs) } else { format!("{}:{:02}", minutes, secs) }
}

/// Format an ISO-8601 date (`2024-01-05`, optionally with a time part) as `Jan 5, 2024`.
/// Anything that doesn't parse is returned unchanged.
pub fn format_date(raw: &str) -> String {
  let trimmed = raw.trim();
  let date_part = trimmed.get(..10).unwrap_or(trimmed);
  match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
    Ok(date) => date.format("%b %-d, %Y").to_string(),
    Err(_) => raw.to_string(),
  }
}

/// Turn a file stem into a display title: `my_watch-list` → `My Watch List`.
pub fn format_title(stem: &str) -> String {
  stem
    .replace(['_', '-'], " ")
    .split_whitespace()
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
      }
    })
    .collect::<Vec<String>>()
    .join(" ")
}

/// Escape text for use inside HTML element content or a double-quoted attribute.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}
