use anyhow::Result;

use crate::data::{CalendarEvent, ContentType, Items, NoteItem, ProjectItem, TaskItem};
use crate::format::{format_date, html_escape};
use crate::icons::{self, svg};
use crate::links::DeepLinks;
use crate::site::Collection;
use crate::tabs::{StateStore, TabButton, TabController};

/// The unified dashboard: one tab and widget per content type that has collections.
pub struct Dashboard<'a> {
  links: &'a DeepLinks,
  collections: &'a [Collection],
}

impl<'a> Dashboard<'a> {
  pub fn new(links: &'a DeepLinks, collections: &'a [Collection]) -> Self {
    Self { links, collections }
  }

  fn of_type(&self, kind: ContentType) -> impl Iterator<Item = &'a Collection> + 'a {
    self.collections.iter().filter(move |c| c.items.content_type() == kind)
  }

  /// Videos always get a tab; other types only when present.
  pub fn content_types(&self) -> Vec<ContentType> {
    ContentType::ALL
      .into_iter()
      .filter(|kind| *kind == ContentType::Video || self.of_type(*kind).next().is_some())
      .collect()
  }

  pub fn buttons(&self) -> Vec<TabButton> {
    self
      .content_types()
      .into_iter()
      .map(|kind| TabButton::new(kind.tab_id(), format!("{} ({})", kind.tab_label(), self.of_type(kind).count())))
      .collect()
  }

  pub fn widget_ids(&self) -> Vec<String> {
    self.content_types().into_iter().map(|kind| kind.tab_id().to_string()).collect()
  }

  /// Build a controller over this dashboard's tabs, restoring the persisted selection.
  pub fn controller<S: StateStore>(&self, store: S, key: &str, default_tab: &str) -> Result<TabController<S>> {
    TabController::init(store, key, default_tab, self.widget_ids(), self.buttons())
  }

  /// Tab bar markup reflecting the controller's active button.
  pub fn tabs_html<S: StateStore>(&self, tabs: &TabController<S>) -> String {
    let buttons: String = tabs
      .buttons()
      .iter()
      .map(|b| {
        format!(
          r#"<button class="tab-button{}" data-tab="{}">{}</button>"#,
          if b.active { " active" } else { "" },
          html_escape(&b.tab),
          html_escape(&b.label)
        )
      })
      .collect::<Vec<_>>()
      .join("\n      ");
    format!(
      r#"<nav class="dashboard-tabs">
      {}
      <a href="{}" class="refresh-button" title="Refresh all data">{}</a>
    </nav>"#,
      buttons,
      html_escape(&self.links.refresh()),
      svg(icons::ROTATE_CCW, 20, false)
    )
  }

  /// All widget panels; only the controller's active widget carries `active`.
  pub fn widgets_html<S: StateStore>(&self, tabs: &TabController<S>) -> String {
    self
      .content_types()
      .into_iter()
      .map(|kind| {
        format!(
          r#"<section class="dashboard-widget{}" id="{}">{}</section>"#,
          if tabs.is_active(kind.tab_id()) { " active" } else { "" },
          kind.tab_id(),
          self.widget_body(kind)
        )
      })
      .collect::<Vec<_>>()
      .join("\n")
  }

  fn widget_body(&self, kind: ContentType) -> String {
    if kind == ContentType::Video {
      return self.video_links();
    }
    let collections: Vec<&Collection> = self.of_type(kind).collect();
    // With several collections only the selected one is shown; the first starts selected.
    let sub_tabs = if collections.len() > 1 {
      let buttons: String = collections
        .iter()
        .enumerate()
        .map(|(index, c)| {
          format!(
            r#"<button class="sub-tab-button{}" data-subtab="{}" data-type="{}">{}</button>"#,
            if index == 0 { " active" } else { "" },
            html_escape(&c.stem),
            kind.label(),
            html_escape(&c.title)
          )
        })
        .collect();
      format!(r#"<div class="sub-tabs" id="{}-subtabs">{}</div>"#, kind.tab_id(), buttons)
    } else {
      String::new()
    };
    let sections: String = collections.iter().enumerate().map(|(index, c)| self.collection_html(c, index == 0)).collect();
    format!("{sub_tabs}\n{sections}")
  }

  fn collection_html(&self, collection: &Collection, selected: bool) -> String {
    let kind = collection.items.content_type();
    let rows: String = match &collection.items {
      Items::Task(items) => items.iter().map(|t| self.task_row(t)).collect(),
      Items::Calendar(items) => items.iter().map(|e| self.event_row(e)).collect(),
      Items::Project(items) => items.iter().map(|p| self.project_row(p)).collect(),
      Items::Notes(items) => items.iter().map(|n| self.note_row(n)).collect(),
      Items::Video(_) => String::new(),
    };
    format!(
      r#"<section class="collection{}" data-type="{}" id="{}-collection"><h3 class="collection-heading">{}</h3><table class="data-table {}-table"><tbody>{}</tbody></table></section>"#,
      if selected { " active" } else { "" },
      kind.label(),
      html_escape(&collection.stem),
      html_escape(&collection.title),
      kind.label(),
      rows
    )
  }

  fn video_links(&self) -> String {
    let links: Vec<String> = self
      .of_type(ContentType::Video)
      .map(|c| {
        let title = c.title.strip_suffix(" Videos").unwrap_or(&c.title);
        format!(
          r#"<a href="{}.html" class="collection-link"><div class="collection-title">{}</div><div class="collection-count">{} videos</div></a>"#,
          html_escape(&c.stem),
          html_escape(title),
          c.items.len()
        )
      })
      .collect();
    if links.is_empty() {
      return r#"<div class="empty-state"><h2>No Video Collections Found</h2><p>Add some JSON files with video data to get started</p></div>"#.to_string();
    }
    format!("<div class=\"collection-links\">{}</div>", links.join("\n"))
  }

  fn title_cell(&self, title: &str, description: &str, file: &str, line: u32) -> String {
    let description = if description.is_empty() {
      String::new()
    } else {
      format!(r#"<div class="description">{}</div>"#, html_escape(description))
    };
    format!(
      r#"<td class="title-cell"><a href="{}" class="title-link" title="Open in editor">{}</a>{}</td>"#,
      html_escape(&self.links.open_line(&self.links.vault_path(file), line)),
      html_escape(title),
      description
    )
  }

  fn task_row(&self, task: &TaskItem) -> String {
    let cells = format!(
      r#"{}{}<td class="date-cell">{}</td>{}"#,
      status_cell(&task.status),
      self.title_cell(&task.title, "", &task.file, task.line),
      html_escape(&format_date(&task.due_date)),
      state_cell(task.active, task.focus)
    );
    row(&task.id, ContentType::Task, task.active, task.focus, &cells)
  }

  fn event_row(&self, event: &CalendarEvent) -> String {
    let cells = format!(
      r#"<td class="scheduled-cell">{}{}</td>{}{}<td class="location-cell">{}</td><td class="action-cell"></td>"#,
      svg(icons::CALENDAR, 14, false),
      html_escape(&event.scheduled),
      status_cell(&event.status),
      self.title_cell(&event.title, "", &event.file, event.line),
      html_escape(&event.location)
    );
    row(&event.id, ContentType::Calendar, false, false, &cells)
  }

  fn project_row(&self, project: &ProjectItem) -> String {
    let cells = format!(
      "{}{}{}",
      status_cell(&project.status),
      self.title_cell(&project.title, "", &project.file, project.line),
      state_cell(project.active, project.focus)
    );
    row(&project.id, ContentType::Project, project.active, project.focus, &cells)
  }

  fn note_row(&self, note: &NoteItem) -> String {
    let cells = format!(
      "{}{}{}",
      status_cell(&note.status),
      self.title_cell(&note.title, &note.description, &note.file, note.line),
      state_cell(note.active, note.focus)
    );
    row(&note.id, ContentType::Notes, note.active, note.focus, &cells)
  }
}

// --- Row cells ---

fn row(id: &str, kind: ContentType, active: bool, focus: bool, cells: &str) -> String {
  format!(
    r#"<tr class="data-row{}{}" data-id="{}" data-type="{}">{}</tr>"#,
    if active { " active" } else { "" },
    if focus { " focused" } else { "" },
    html_escape(id),
    kind.label(),
    cells
  )
}

/// Status marker: an icon for the known markers, the raw text otherwise.
fn status_cell(status: &str) -> String {
  match icons::status_icon(status) {
    Some(paths) => format!(
      r#"<td class="status-cell status-icon-cell" data-status="{}">{}</td>"#,
      html_escape(status),
      svg(paths, 18, false)
    ),
    None => format!(r#"<td class="status-cell">{}</td>"#, html_escape(status)),
  }
}

/// Read-only active/focus indicators.
fn state_cell(active: bool, focus: bool) -> String {
  format!(
    r#"<td class="action-cell"><span class="state-toggle toggle-active {}" title="Active">Active</span><span class="state-toggle toggle-focus {}" title="Focus">Focus</span></td>"#,
    if active { "active" } else { "inactive" },
    if focus { "focused" } else { "unfocused" }
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::VideoRecord;
  use crate::tabs::MemoryStore;

  const KEY: &str = "dashboard-active-tab";

  fn collections() -> Vec<Collection> {
    vec![
      Collection {
        stem: "watch_later".to_string(),
        title: "Watch Later Videos".to_string(),
        items: Items::Video(vec![VideoRecord::default(), VideoRecord::default()]),
        tags: Vec::new(),
      },
      Collection {
        stem: "todo".to_string(),
        title: "Todo".to_string(),
        items: Items::Task(vec![TaskItem {
          id: "plan".to_string(),
          title: "Ship <it>".to_string(),
          status: "open".to_string(),
          due_date: "2024-02-01".to_string(),
          active: true,
          focus: false,
          file: "work/plan.md".to_string(),
          line: 3,
        }]),
        tags: Vec::new(),
      },
    ]
  }

  #[test]
  fn tabs_only_for_present_types() {
    let links = DeepLinks::new("share");
    let colls = collections();
    let dashboard = Dashboard::new(&links, &colls);
    assert_eq!(dashboard.content_types(), vec![ContentType::Video, ContentType::Task]);
    let labels: Vec<String> = dashboard.buttons().into_iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["Videos (1)", "Tasks (1)"]);
  }

  #[test]
  fn videos_tab_exists_without_video_collections() {
    let links = DeepLinks::new("share");
    let dashboard = Dashboard::new(&links, &[]);
    assert_eq!(dashboard.widget_ids(), vec!["videos".to_string()]);
    let tabs = dashboard.controller(MemoryStore::default(), KEY, "videos").unwrap();
    assert!(dashboard.widgets_html(&tabs).contains("No Video Collections Found"));
  }

  #[test]
  fn active_markup_follows_controller() {
    let links = DeepLinks::new("share");
    let colls = collections();
    let dashboard = Dashboard::new(&links, &colls);
    let mut store = MemoryStore::default();
    store.set(KEY, "tasks").unwrap();
    let tabs = dashboard.controller(store, KEY, "videos").unwrap();

    let bar = dashboard.tabs_html(&tabs);
    assert!(bar.contains(r#"<button class="tab-button active" data-tab="tasks">"#));
    assert!(bar.contains(r#"<button class="tab-button" data-tab="videos">"#));

    let widgets = dashboard.widgets_html(&tabs);
    assert!(widgets.contains(r#"<section class="dashboard-widget active" id="tasks">"#));
    assert!(widgets.contains(r#"<section class="dashboard-widget" id="videos">"#));
  }

  #[test]
  fn video_widget_links_to_collection_pages() {
    let links = DeepLinks::new("share");
    let colls = collections();
    let dashboard = Dashboard::new(&links, &colls);
    let tabs = dashboard.controller(MemoryStore::default(), KEY, "videos").unwrap();
    let widgets = dashboard.widgets_html(&tabs);
    assert!(widgets.contains(r#"href="watch_later.html""#));
    assert!(widgets.contains(r#"<div class="collection-title">Watch Later</div>"#));
    assert!(widgets.contains("2 videos"));
  }

  #[test]
  fn task_rows_deep_link_and_escape() {
    let links = DeepLinks::new("share");
    let colls = collections();
    let dashboard = Dashboard::new(&links, &colls);
    let tabs = dashboard.controller(MemoryStore::default(), KEY, "videos").unwrap();
    let widgets = dashboard.widgets_html(&tabs);
    assert!(widgets.contains("Ship &lt;it&gt;"));
    assert!(widgets.contains(r#"<tr class="data-row active" data-id="plan" data-type="task">"#));
    assert!(widgets.contains(r#"<td class="status-cell">open</td>"#));
    assert!(widgets.contains(r#"toggle-active active"#));
    assert!(widgets.contains(r#"toggle-focus unfocused"#));
    assert!(widgets.contains("Feb 1, 2024"));
    assert!(widgets.contains(&urlencoding::encode(r#"openLineInNvim("~/share/work/plan.md", 3)"#).into_owned()));
  }

  fn task(id: &str, status: &str) -> TaskItem {
    TaskItem {
      id: id.to_string(),
      title: id.to_string(),
      status: status.to_string(),
      due_date: String::new(),
      active: false,
      focus: true,
      file: format!("{id}.md"),
      line: 1,
    }
  }

  fn task_collection(stem: &str, items: Vec<TaskItem>) -> Collection {
    Collection { stem: stem.to_string(), title: format!("{stem} list"), items: Items::Task(items), tags: Vec::new() }
  }

  fn render(colls: &[Collection]) -> String {
    let links = DeepLinks::new("share");
    let dashboard = Dashboard::new(&links, colls);
    let tabs = dashboard.controller(MemoryStore::default(), KEY, "videos").unwrap();
    dashboard.widgets_html(&tabs)
  }

  // --- refresh ---

  #[test]
  fn tab_bar_carries_refresh_link() {
    let links = DeepLinks::new("share");
    let dashboard = Dashboard::new(&links, &[]);
    let tabs = dashboard.controller(MemoryStore::default(), KEY, "videos").unwrap();
    let bar = dashboard.tabs_html(&tabs);
    assert!(bar.contains(r#"class="refresh-button""#));
    assert!(bar.contains(&urlencoding::encode("tp.user.marshallAllQueries(tp);").into_owned()));
  }

  // --- sub-tabs ---

  #[test]
  fn several_collections_get_sub_tabs() {
    let colls = [task_collection("home", vec![task("a", "open")]), task_collection("work", vec![task("b", "open")])];
    let widgets = render(&colls);
    assert!(widgets.contains(r#"<div class="sub-tabs" id="tasks-subtabs">"#));
    assert!(widgets.contains(r#"<button class="sub-tab-button active" data-subtab="home" data-type="task">home list</button>"#));
    assert!(widgets.contains(r#"<button class="sub-tab-button" data-subtab="work" data-type="task">work list</button>"#));
    assert!(widgets.contains(r#"<section class="collection active" data-type="task" id="home-collection">"#));
    assert!(widgets.contains(r#"<section class="collection" data-type="task" id="work-collection">"#));
  }

  #[test]
  fn single_collection_has_no_sub_tabs() {
    let widgets = render(&[task_collection("home", vec![task("a", "open")])]);
    assert!(!widgets.contains("sub-tab-button"));
    assert!(widgets.contains(r#"<section class="collection active" data-type="task" id="home-collection">"#));
  }

  // --- rows ---

  #[test]
  fn question_status_renders_icon() {
    let widgets = render(&[task_collection("home", vec![task("a", "?"), task("b", "x")])]);
    assert!(widgets.contains(r#"<td class="status-cell status-icon-cell" data-status="?"><svg"#));
    assert!(widgets.contains(r#"<td class="status-cell">x</td>"#));
    assert!(widgets.contains(r#"<tr class="data-row focused" data-id="a" data-type="task">"#));
  }

  #[test]
  fn note_rows_show_description_and_state() {
    let note = NoteItem {
      id: "idea".to_string(),
      title: "Idea".to_string(),
      description: "worth a look".to_string(),
      status: "active".to_string(),
      active: true,
      focus: true,
      file: "notes/idea.md".to_string(),
      line: 2,
    };
    let colls =
      [Collection { stem: "ideas".to_string(), title: "Ideas".to_string(), items: Items::Notes(vec![note]), tags: Vec::new() }];
    let widgets = render(&colls);
    assert!(widgets.contains(r#"<tr class="data-row active focused" data-id="idea" data-type="notes">"#));
    assert!(widgets.contains(r#"<div class="description">worth a look</div>"#));
    assert!(widgets.contains("toggle-active active"));
    assert!(widgets.contains("toggle-focus focused"));
  }

  #[test]
  fn calendar_rows_have_no_state_toggles() {
    let event = CalendarEvent {
      id: "standup".to_string(),
      title: "Standup".to_string(),
      scheduled: "2024-01-02 09:00".to_string(),
      location: "Room 1".to_string(),
      status: "scheduled".to_string(),
      file: "cal/standup.md".to_string(),
      line: 1,
    };
    let colls =
      [Collection { stem: "cal".to_string(), title: "Cal".to_string(), items: Items::Calendar(vec![event]), tags: Vec::new() }];
    let widgets = render(&colls);
    assert!(widgets.contains(r#"data-id="standup" data-type="calendar""#));
    assert!(widgets.contains(r#"<td class="status-cell">scheduled</td>"#));
    assert!(widgets.contains(r#"<td class="location-cell">Room 1</td><td class="action-cell"></td>"#));
    assert!(!widgets.contains("toggle-active"));
  }

  #[test]
  fn project_rows_carry_id_and_status() {
    let project = ProjectItem {
      id: "alpha".to_string(),
      title: "Alpha".to_string(),
      status: "in-progress".to_string(),
      active: true,
      focus: false,
      file: "p/alpha.md".to_string(),
      line: 1,
    };
    let colls =
      [Collection { stem: "proj".to_string(), title: "Proj".to_string(), items: Items::Project(vec![project]), tags: Vec::new() }];
    let widgets = render(&colls);
    assert!(widgets.contains(r#"<tr class="data-row active" data-id="alpha" data-type="project">"#));
    assert!(widgets.contains(r#"<td class="status-cell">in-progress</td>"#));
  }
}
