use anyhow::{Result, anyhow, bail};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::constants::constants;

// --- Records ---

/// One video's metadata entry. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VideoRecord {
  pub id: String,
  /// External video identifier on the video platform.
  pub locator: String,
  pub summary: String,
  pub channel: String,
  /// Length in seconds.
  pub duration: u64,
  /// ISO-8601 date string, formatted lazily at render time.
  pub date: String,
  pub watched: bool,
  pub tags: BTreeSet<String>,
  pub thumbnail: Option<String>,
  /// Vault-relative note the record was exported from.
  pub file: Option<String>,
  pub line: Option<u32>,
}

impl VideoRecord {
  pub fn has_tag(&self, name: &str) -> bool {
    self.tags.contains(name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
  pub id: String,
  pub title: String,
  pub status: String,
  pub due_date: String,
  pub active: bool,
  pub focus: bool,
  pub file: String,
  pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
  pub id: String,
  pub title: String,
  pub scheduled: String,
  pub location: String,
  pub status: String,
  pub file: String,
  pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
  pub id: String,
  pub title: String,
  pub status: String,
  pub active: bool,
  pub focus: bool,
  pub file: String,
  pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
  pub id: String,
  pub title: String,
  pub description: String,
  pub status: String,
  pub active: bool,
  pub focus: bool,
  pub file: String,
  pub line: u32,
}

// --- Content types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentType {
  Video,
  Task,
  Calendar,
  Project,
  Notes,
}

impl ContentType {
  pub const ALL: [ContentType; 5] =
    [ContentType::Video, ContentType::Task, ContentType::Calendar, ContentType::Project, ContentType::Notes];

  pub fn label(self) -> &'static str {
    match self {
      ContentType::Video => "video",
      ContentType::Task => "task",
      ContentType::Calendar => "calendar",
      ContentType::Project => "project",
      ContentType::Notes => "notes",
    }
  }

  /// Dashboard tab identifier for this content type.
  pub fn tab_id(self) -> &'static str {
    match self {
      ContentType::Video => "videos",
      ContentType::Task => "tasks",
      ContentType::Calendar => "calendar",
      ContentType::Project => "projects",
      ContentType::Notes => "notes",
    }
  }

  pub fn tab_label(self) -> &'static str {
    match self {
      ContentType::Video => "Videos",
      ContentType::Task => "Tasks",
      ContentType::Calendar => "Calendar",
      ContentType::Project => "Projects",
      ContentType::Notes => "Notes",
    }
  }

  /// The `type`/`status` field pair that marks an item of this kind.
  /// Calendar is detected from `scheduled` instead.
  fn type_rule(self) -> Option<(&'static str, Option<&'static str>)> {
    match self {
      ContentType::Video => Some(("Note", Some("youtube"))),
      ContentType::Project => Some(("note", Some("current"))),
      ContentType::Task => Some(("task", None)),
      ContentType::Notes => Some(("note", None)),
      ContentType::Calendar => None,
    }
  }
}

/// Sanitized items of one collection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
  Video(Vec<VideoRecord>),
  Task(Vec<TaskItem>),
  Calendar(Vec<CalendarEvent>),
  Project(Vec<ProjectItem>),
  Notes(Vec<NoteItem>),
}

impl Items {
  pub fn content_type(&self) -> ContentType {
    match self {
      Items::Video(_) => ContentType::Video,
      Items::Task(_) => ContentType::Task,
      Items::Calendar(_) => ContentType::Calendar,
      Items::Project(_) => ContentType::Project,
      Items::Notes(_) => ContentType::Notes,
    }
  }

  pub fn len(&self) -> usize {
    match self {
      Items::Video(v) => v.len(),
      Items::Task(v) => v.len(),
      Items::Calendar(v) => v.len(),
      Items::Project(v) => v.len(),
      Items::Notes(v) => v.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// --- Helpers ---

fn sample(data: &[Value]) -> Vec<&Map<String, Value>> {
  data.iter().take(constants().sample_size).filter_map(Value::as_object).collect()
}

fn str_field<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
  item.get(key).and_then(Value::as_str)
}

/// Stringify a scalar the way a loose exporter would: strings verbatim, numbers and bools printed.
fn text_field(item: &Map<String, Value>, key: &str) -> Option<String> {
  match item.get(key)? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}

fn seconds_field(item: &Map<String, Value>, key: &str) -> u64 {
  match item.get(key) {
    Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)).unwrap_or(0),
    Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
    _ => 0,
  }
}

fn line_field(item: &Map<String, Value>) -> u32 {
  item.get("line").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok()).unwrap_or(1)
}

fn string_list(item: &Map<String, Value>, key: &str) -> Vec<String> {
  match item.get(key) {
    Some(Value::Array(values)) => values.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
    _ => Vec::new(),
  }
}

fn file_stem(file: &str) -> String {
  Path::new(file).file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

static ACTIVE_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[active::\s*(\w+)\]").expect("valid regex"));
static FOCUS_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[focus::\s*(\w+)\]").expect("valid regex"));
static DATE_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[date::\s*([^\]]+)\]").expect("valid regex"));
static SCHEDULED_FIELD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[scheduled::\s*([^\]]+)\]").expect("valid regex"));
static LOCATION_FIELD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[location::\s*([^\]]+)\]").expect("valid regex"));
static DESCRIPTION_FIELD: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[description::\s*([^\]]+)\]").expect("valid regex"));
static DESCRIPTION_STRIP: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*\[description::\s*[^\]]+\]").expect("valid regex"));
static ANY_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]").expect("valid regex"));

/// Value of an inline `[key:: value]` field.
fn inline_field(re: &Regex, text: &str) -> Option<String> {
  re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str().trim().to_string())
}

fn inline_flag(re: &Regex, text: &str) -> bool {
  inline_field(re, text).is_some_and(|v| matches!(v.to_lowercase().as_str(), "true" | "yes" | "1"))
}

// --- Detection ---

/// Most specific rule first: a current project note is also a note.
const DETECTION_ORDER: [ContentType; 4] =
  [ContentType::Video, ContentType::Project, ContentType::Task, ContentType::Notes];

/// Classify a parsed collection by sampling its first items.
pub fn detect_content_type(data: &Value) -> ContentType {
  let Some(list) = data.as_array() else { return ContentType::Task };
  let items = sample(list);
  if items.is_empty() {
    return ContentType::Task;
  }
  let majority = |count: usize| count * 2 >= items.len();

  let scheduled = items.iter().filter(|i| i.contains_key("scheduled") || str_field(i, "type") == Some("calendar")).count();
  if majority(scheduled) {
    return ContentType::Calendar;
  }

  for kind in DETECTION_ORDER {
    let Some((type_value, status_value)) = kind.type_rule() else { continue };
    let matching = items
      .iter()
      .filter(|i| str_field(i, "type") == Some(type_value))
      .filter(|i| status_value.is_none_or(|s| str_field(i, "status") == Some(s)))
      .count();
    if majority(matching) {
      return kind;
    }
  }

  ContentType::Task
}

// --- Validation ---

/// Coarse check that a collection is worth sanitizing as `kind`.
pub fn validate(data: &Value, kind: ContentType) -> Result<()> {
  let Some(list) = data.as_array() else { bail!("Not a list") };
  if list.is_empty() {
    bail!("Empty list");
  }

  let items = sample(list);
  let qualifies = |item: &&Map<String, Value>| match kind {
    ContentType::Video => VIDEO_REQUIRED.iter().all(|f| item.contains_key(*f)),
    ContentType::Task => {
      str_field(item, "type") == Some("task") && item.contains_key("file") && item.contains_key("summary")
    }
    ContentType::Calendar => item.contains_key("scheduled") || str_field(item, "type") == Some("calendar"),
    ContentType::Project => str_field(item, "type") == Some("note") && str_field(item, "status") == Some("current"),
    ContentType::Notes => str_field(item, "type") == Some("note"),
  };

  if items.iter().any(qualifies) {
    return Ok(());
  }
  Err(match kind {
    ContentType::Video => anyhow!("No items with required video fields found"),
    other => anyhow!("No valid {} items found", other.label()),
  })
}

// --- Sanitization ---

const VIDEO_REQUIRED: [&str; 6] = ["id", "summary", "duration", "channel", "date", "locator"];

pub fn sanitize_videos(data: &[Value]) -> Vec<VideoRecord> {
  data
    .iter()
    .filter_map(Value::as_object)
    .filter(|item| VIDEO_REQUIRED.iter().all(|f| item.contains_key(*f)))
    .filter_map(|item| {
      let record = VideoRecord {
        id: text_field(item, "id").unwrap_or_default(),
        locator: text_field(item, "locator").unwrap_or_default(),
        summary: text_field(item, "summary").unwrap_or_else(|| "Untitled Video".to_string()),
        channel: text_field(item, "channel").unwrap_or_else(|| "Unknown Channel".to_string()),
        duration: seconds_field(item, "duration"),
        date: text_field(item, "date").unwrap_or_default(),
        watched: item.get("watched").and_then(Value::as_bool).unwrap_or(false),
        tags: string_list(item, "tags").into_iter().collect(),
        thumbnail: str_field(item, "thumbnail").filter(|s| !s.trim().is_empty()).map(str::to_string),
        file: str_field(item, "file").filter(|s| !s.is_empty()).map(str::to_string),
        line: item.get("line").and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok()),
      };
      (!record.id.is_empty() && !record.locator.is_empty()).then_some(record)
    })
    .collect()
}

pub fn sanitize_tasks(data: &[Value]) -> Vec<TaskItem> {
  data
    .iter()
    .filter_map(Value::as_object)
    .filter(|item| str_field(item, "type") == Some("task"))
    .filter_map(|item| {
      let file = str_field(item, "file").filter(|s| !s.is_empty())?;
      let summary = str_field(item, "summary").filter(|s| !s.is_empty())?;
      let id = file_stem(file);
      if id.is_empty() {
        return None;
      }
      Some(TaskItem {
        id,
        title: ANY_FIELD.replace_all(summary, "").trim().to_string(),
        status: str_field(item, "status").map(str::trim).unwrap_or("pending").to_string(),
        due_date: inline_field(&DATE_FIELD, summary).unwrap_or_default(),
        active: inline_flag(&ACTIVE_FIELD, summary),
        focus: inline_flag(&FOCUS_FIELD, summary),
        file: file.to_string(),
        line: line_field(item),
      })
    })
    .collect()
}

pub fn sanitize_calendar(data: &[Value]) -> Vec<CalendarEvent> {
  data
    .iter()
    .filter_map(Value::as_object)
    .filter_map(|item| {
      let file = str_field(item, "file").unwrap_or_default();
      let summary = str_field(item, "summary").unwrap_or_default();
      let scheduled = str_field(item, "scheduled")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| inline_field(&SCHEDULED_FIELD, summary))
        .or_else(|| str_field(item, "date").filter(|s| !s.is_empty()).map(str::to_string))?;
      let id = file_stem(file);
      if id.is_empty() {
        return None;
      }
      let location = str_field(item, "location")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| inline_field(&LOCATION_FIELD, summary))
        .unwrap_or_default();
      Some(CalendarEvent {
        id,
        title: ANY_FIELD.replace_all(summary, "").trim().to_string(),
        scheduled,
        location,
        status: str_field(item, "status").unwrap_or("scheduled").to_string(),
        file: file.to_string(),
        line: line_field(item),
      })
    })
    .collect()
}

pub fn sanitize_projects(data: &[Value]) -> Vec<ProjectItem> {
  data
    .iter()
    .filter_map(Value::as_object)
    .filter(|item| str_field(item, "type") == Some("note") && str_field(item, "status") == Some("current"))
    .filter_map(|item| {
      let file = str_field(item, "file").filter(|s| !s.is_empty())?;
      let summary = str_field(item, "summary").filter(|s| !s.is_empty())?;
      let id = file_stem(file);
      // A current project is in progress and active by definition.
      (!id.is_empty()).then(|| ProjectItem {
        id,
        title: summary.to_string(),
        status: "in-progress".to_string(),
        active: true,
        focus: false,
        file: file.to_string(),
        line: line_field(item),
      })
    })
    .collect()
}

pub fn sanitize_notes(data: &[Value]) -> Vec<NoteItem> {
  data
    .iter()
    .filter_map(Value::as_object)
    .filter(|item| str_field(item, "type") == Some("note"))
    .filter_map(|item| {
      let file = str_field(item, "file").filter(|s| !s.is_empty())?;
      let summary = str_field(item, "summary").filter(|s| !s.is_empty())?;
      let id = file_stem(file);
      if id.is_empty() {
        return None;
      }
      Some(NoteItem {
        id,
        title: DESCRIPTION_STRIP.replace_all(summary, "").trim().to_string(),
        description: inline_field(&DESCRIPTION_FIELD, summary).unwrap_or_default(),
        status: str_field(item, "status").unwrap_or("active").to_string(),
        active: inline_flag(&ACTIVE_FIELD, summary),
        focus: inline_flag(&FOCUS_FIELD, summary),
        file: file.to_string(),
        line: line_field(item),
      })
    })
    .collect()
}

/// Validate `data` as `kind` and return its sanitized items.
pub fn validate_and_sanitize(data: &Value, kind: ContentType) -> Result<Items> {
  validate(data, kind)?;
  let list = data.as_array().map(Vec::as_slice).unwrap_or_default();
  Ok(match kind {
    ContentType::Video => Items::Video(sanitize_videos(list)),
    ContentType::Task => Items::Task(sanitize_tasks(list)),
    ContentType::Calendar => Items::Calendar(sanitize_calendar(list)),
    ContentType::Project => Items::Project(sanitize_projects(list)),
    ContentType::Notes => Items::Notes(sanitize_notes(list)),
  })
}
