//! Outbound link construction.
//!
//! Every toggle in the gallery is a link into the note-taking app's
//! Advanced URI handler, which evaluates a Templater user-script call.
//! The page itself never mutates anything.

use crate::constants::constants;

/// Builds deep links for one vault.
#[derive(Debug, Clone)]
pub struct DeepLinks {
  vault: String,
}

impl DeepLinks {
  pub fn new(vault: impl Into<String>) -> Self {
    Self { vault: vault.into() }
  }

  /// Wrap a command in an `advanced-uri` link with a percent-encoded `eval` payload.
  pub fn eval(&self, command: &str) -> String {
    format!(
      "{}?vault={}&eval={}",
      constants().deep_link_base,
      urlencoding::encode(&self.vault),
      urlencoding::encode(command)
    )
  }

  pub fn play(&self, locator: &str) -> String {
    self.eval(&format!(r#"{}.user.captureMdPlay("{}")"#, constants().templater_object, locator))
  }

  pub fn toggle_inbox_watched(&self, id: &str) -> String {
    self.eval(&format!(
      r#"let tp = {}; tp.user.toggleInbox(tp, "{id}");tp.user.toggleWatched(tp,"{id}");"#,
      constants().templater_object
    ))
  }

  pub fn toggle_inbox(&self, id: &str) -> String {
    self.eval(&format!(r#"let tp = {}; tp.user.toggleInbox(tp,"{}");"#, constants().templater_object, id))
  }

  pub fn toggle_tag(&self, id: &str, tag: &str) -> String {
    self.eval(&format!(r#"let tp = {}; tp.user.toggleTag(tp,"{}", "{}");"#, constants().templater_object, id, tag))
  }

  /// Re-run every saved query so the JSON exports are regenerated.
  pub fn refresh(&self) -> String {
    self.eval(&format!("let tp = {}; tp.user.marshallAllQueries(tp);", constants().templater_object))
  }

  /// Open `file` at `line` in the external editor.
  pub fn open_line(&self, file: &str, line: u32) -> String {
    self.eval(&format!(r#"let tp = {}; tp.user.openLineInNvim("{}", {});"#, constants().templater_object, file, line))
  }

  /// Path of a vault-relative file as the editor sees it.
  pub fn vault_path(&self, file: &str) -> String {
    format!("~/{}/{}", self.vault, file)
  }
}

/// Direct link to the video on the external platform.
pub fn watch_url(locator: &str) -> String {
  format!("{}{}", constants().watch_url_base, urlencoding::encode(locator))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decoded_eval(link: &str) -> String {
    let (_, payload) = link.split_once("&eval=").expect("eval param");
    urlencoding::decode(payload).expect("valid encoding").into_owned()
  }

  #[test]
  fn eval_link_shape() {
    let links = DeepLinks::new("share");
    let link = links.eval("a b");
    assert_eq!(link, "obsidian://advanced-uri?vault=share&eval=a%20b");
  }

  #[test]
  fn eval_payload_is_fully_encoded() {
    let link = DeepLinks::new("share").toggle_inbox("vid-1");
    let (_, payload) = link.split_once("&eval=").unwrap();
    assert!(!payload.contains('"'));
    assert!(!payload.contains(' '));
    assert!(!payload.contains(';'));
  }

  #[test]
  fn play_command() {
    let link = DeepLinks::new("share").play("dQw4w9WgXcQ");
    let cmd = decoded_eval(&link);
    assert!(cmd.ends_with(r#".user.captureMdPlay("dQw4w9WgXcQ")"#));
    assert!(cmd.starts_with(r#"app.plugins.plugins["templater-obsidian"]"#));
  }

  #[test]
  fn inbox_watched_command_toggles_both() {
    let cmd = decoded_eval(&DeepLinks::new("share").toggle_inbox_watched("v1"));
    assert!(cmd.contains(r#"tp.user.toggleInbox(tp, "v1");"#));
    assert!(cmd.contains(r#"tp.user.toggleWatched(tp,"v1");"#));
  }

  #[test]
  fn tag_command() {
    let cmd = decoded_eval(&DeepLinks::new("share").toggle_tag("v1", "starred"));
    assert!(cmd.ends_with(r#"tp.user.toggleTag(tp,"v1", "starred");"#));
  }

  #[test]
  fn refresh_command() {
    let cmd = decoded_eval(&DeepLinks::new("share").refresh());
    assert!(cmd.starts_with("let tp = app.plugins.plugins"));
    assert!(cmd.ends_with("tp.user.marshallAllQueries(tp);"));
  }

  #[test]
  fn open_line_command() {
    let links = DeepLinks::new("notes");
    let cmd = decoded_eval(&links.open_line(&links.vault_path("inbox/a.md"), 12));
    assert!(cmd.ends_with(r#"tp.user.openLineInNvim("~/notes/inbox/a.md", 12);"#));
  }

  #[test]
  fn vault_name_is_encoded() {
    let link = DeepLinks::new("my vault").eval("x");
    assert!(link.contains("vault=my%20vault&"));
  }

  #[test]
  fn watch_url_uses_locator() {
    assert_eq!(watch_url("abc123"), "https://youtube.com/watch?v=abc123");
  }
}
