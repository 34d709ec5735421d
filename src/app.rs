use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::{
    classify::{Dashboard, Status},
    thresholds::ThresholdTable,
};

const PAGE: usize = 10;

/// What the event loop should do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Redraw,
    Quit,
}

/// Interactive grid state: the dashboard plus where its input comes from.
#[derive(Debug)]
pub struct App {
    pub dashboard: Dashboard,
    pub source: Option<PathBuf>,
    pub scroll_offset: usize,
    pub watch: bool,
    last_modified: Option<SystemTime>,
}

impl App {
    pub fn new(table: ThresholdTable, source: Option<PathBuf>, watch: bool) -> Self {
        Self {
            dashboard: Dashboard::new(table),
            source,
            scroll_offset: 0,
            watch,
            last_modified: None,
        }
    }

    /// Feed CSV text that was obtained elsewhere (stdin, tests).
    pub fn upload_text(&mut self, text: &str) {
        self.scroll_offset = 0;
        // the dashboard keeps the error as its status
        let _ = self.dashboard.upload(text);
    }

    /// Re-read the source file and run a fresh pass over it.
    pub fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            return;
        };
        self.last_modified = modified(&path);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(path = %path.display(), bytes = text.len(), "read upload");
                self.upload_text(&text);
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read upload");
                self.scroll_offset = 0;
                self.dashboard
                    .fail(format!("Could not read {}: {err}", path.display()));
            }
        }
    }

    pub fn status(&self) -> &Status {
        self.dashboard.status()
    }

    /// Watched sources are re-read whenever their modification time moves.
    pub fn on_tick(&mut self) -> Action {
        if !self.watch {
            return Action::Continue;
        }
        let Some(path) = self.source.as_ref() else {
            return Action::Continue;
        };
        let current = modified(path);
        if current.is_some() && current != self.last_modified {
            debug!(path = %path.display(), "source changed, reloading");
            self.reload();
            return Action::Redraw;
        }
        Action::Continue
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        let depth = self.dashboard.classification().depth();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('r') => {
                self.reload();
                Action::Redraw
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                Action::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = (self.scroll_offset + 1).min(depth.saturating_sub(1));
                Action::Redraw
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(PAGE);
                Action::Redraw
            }
            KeyCode::PageDown => {
                self.scroll_offset = (self.scroll_offset + PAGE).min(depth.saturating_sub(1));
                Action::Redraw
            }
            KeyCode::Home => {
                self.scroll_offset = 0;
                Action::Redraw
            }
            _ => Action::Continue,
        }
    }
}

fn modified(path: &std::path::Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use tempfile::tempdir;

    const HEADER: &str =
        "exercise,difficulty,no_of_hint,percent_hint,percent_wrong,total,wrong,right,hint,not_understood";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new(ThresholdTable::default(), None, false);
        assert_eq!(app.on_key(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(app.on_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(app.on_key(key(KeyCode::Char('x'))), Action::Continue);
    }

    #[test]
    fn scrolling_is_bounded_by_longest_column() {
        let mut app = App::new(ThresholdTable::default(), None, false);
        let rows = (0..3)
            .map(|i| format!("ex{i},1,0,0,0,25,15,5,0,0"))
            .collect::<Vec<_>>()
            .join("\n");
        app.upload_text(&format!("{HEADER}\n{rows}"));
        assert_eq!(app.dashboard.classification().depth(), 3);

        app.on_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll_offset, 2);
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.scroll_offset, 1);
        app.on_key(key(KeyCode::Home));
        assert_eq!(app.scroll_offset, 0);
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn reload_reads_file_and_replaces_results() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        fs::write(&path, format!("{HEADER}\nex1,1,0,0,0,25,15,5,0,0")).unwrap();

        let mut app = App::new(ThresholdTable::default(), Some(path.clone()), false);
        app.reload();
        assert_eq!(
            app.dashboard.classification().get(Category::NeedsManyHints),
            ["ex1"]
        );

        fs::write(&path, format!("{HEADER}\nex2,1,0,0,0,25,15,5,0,0")).unwrap();
        assert_eq!(app.on_key(key(KeyCode::Char('r'))), Action::Redraw);
        assert_eq!(
            app.dashboard.classification().get(Category::NeedsManyHints),
            ["ex2"]
        );
        assert_eq!(app.status(), &Status::Classified(1));
    }

    #[test]
    fn unreadable_source_is_reported_in_status() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let mut app = App::new(ThresholdTable::default(), Some(path), false);
        app.reload();
        assert!(app.status().is_failure());
        assert!(app.status().to_string().starts_with("Could not read"));
        assert!(app.dashboard.classification().is_empty());
    }

    #[test]
    fn tick_without_watch_does_nothing() {
        let mut app = App::new(ThresholdTable::default(), None, false);
        assert_eq!(app.on_tick(), Action::Continue);
    }

    #[test]
    fn watched_source_reloads_on_first_tick() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("upload.csv");
        fs::write(&path, format!("{HEADER}\nex1,1,0,0,0,25,15,5,0,0")).unwrap();
        let mut app = App::new(ThresholdTable::default(), Some(path), true);
        assert_eq!(app.on_tick(), Action::Redraw);
        assert_eq!(app.status(), &Status::Classified(1));
        assert_eq!(app.on_tick(), Action::Continue);
    }
}
