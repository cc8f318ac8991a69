//! Application state and event handling.
//!
//! All mutation happens here, on the event-loop thread, in response to discrete
//! user actions. Every mutating action ends by running the persistence hook so
//! the on-disk shelf always mirrors the in-memory library.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use mdshelf_core::intake;
use mdshelf_core::library::Library;
use mdshelf_core::storage::Storage;
use mdshelf_markdown::chunk_view::ChunkedDocView;
use mdshelf_markdown::chunk_view::ScrollAction;
use mdshelf_markdown::theme::Theme;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Files,
    Viewer,
}

pub struct App {
    pub library: Library,
    storage: Storage,
    chunk_size: usize,
    pub dark_mode: bool,
    pub error: Option<String>,
    pub focus: Pane,
    pub file_cursor: usize,
    pub viewer: ChunkedDocView,
    pub should_quit: bool,
}

impl App {
    /// Restores the prior session from storage; the first stored document is
    /// selected, matching the restore-time convention of the shelf.
    pub fn new(storage: Storage, chunk_size: usize) -> Self {
        let library = Library::from_documents(storage.load_documents());
        let dark_mode = storage.load_dark_mode();
        let mut app = Self {
            library,
            storage,
            chunk_size,
            dark_mode,
            error: None,
            focus: Pane::Files,
            file_cursor: 0,
            viewer: ChunkedDocView::new(),
            should_quit: false,
        };
        app.sync_viewer();
        app
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode)
    }

    /// Submits one intake batch. On failure the batch is abandoned whole: one
    /// message is shown and the library is left exactly as it was.
    pub fn submit_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        self.error = None;
        let result = intake::read_paths(&paths)
            .and_then(|raw| intake::submit_files(raw, self.chunk_size));
        match result {
            Ok(documents) => {
                tracing::debug!(count = documents.len(), "intake batch accepted");
                self.library.add(documents);
                self.cursor_to_selection();
                self.sync_viewer();
                self.persist_documents();
            }
            Err(err) => {
                tracing::debug!(%err, "intake batch rejected");
                self.error = Some(err.to_string());
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.viewer.invalidate_styles();
        if let Err(err) = self.storage.save_dark_mode(self.dark_mode) {
            self.error = Some(err.to_string());
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let Some(doc) = self.library.documents().get(self.file_cursor) else {
            return;
        };
        let name = doc.name.clone();
        self.library.remove(&name);
        self.file_cursor = self
            .file_cursor
            .min(self.library.len().saturating_sub(1));
        self.sync_viewer();
        self.persist_documents();
    }

    pub fn select_at_cursor(&mut self) {
        if let Some(doc) = self.library.documents().get(self.file_cursor) {
            let name = doc.name.clone();
            self.library.select(&name);
            self.sync_viewer();
        }
    }

    pub fn on_paste(&mut self, pasted: &str) {
        let paths = crate::paste::parse_dropped_paths(pasted);
        self.submit_paths(paths);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // A visible intake error clears on the next keypress.
        let had_error = self.error.take().is_some();

        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                if !had_error {
                    self.should_quit = true;
                }
            }
            KeyCode::Esc => {
                if !had_error {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Pane::Files => Pane::Viewer,
                    Pane::Viewer => Pane::Files,
                };
            }
            KeyCode::Char('t') if key.modifiers.is_empty() => self.toggle_theme(),
            _ => match self.focus {
                Pane::Files => self.on_files_key(key),
                Pane::Viewer => self.on_viewer_key(key),
            },
        }
    }

    fn on_files_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Enter => self.select_at_cursor(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_at_cursor(),
            _ => {}
        }
    }

    fn on_viewer_key(&mut self, key: KeyEvent) {
        let action = if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') => Some(ScrollAction::HalfPageDown),
                KeyCode::Char('u') => Some(ScrollAction::HalfPageUp),
                _ => None,
            }
        } else {
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => Some(ScrollAction::Down),
                KeyCode::Up | KeyCode::Char('k') => Some(ScrollAction::Up),
                KeyCode::PageDown => Some(ScrollAction::PageDown),
                KeyCode::PageUp => Some(ScrollAction::PageUp),
                KeyCode::Home | KeyCode::Char('g') => Some(ScrollAction::Top),
                KeyCode::End | KeyCode::Char('G') => Some(ScrollAction::Bottom),
                _ => None,
            }
        };
        if let Some(action) = action {
            self.viewer.handle_scroll(action);
        }
    }

    fn move_cursor(&mut self, delta: i32) {
        if self.library.is_empty() {
            self.file_cursor = 0;
            return;
        }
        let last = self.library.len() - 1;
        let next = (self.file_cursor as i64 + delta as i64).clamp(0, last as i64);
        self.file_cursor = next as usize;
    }

    fn cursor_to_selection(&mut self) {
        if let Some(name) = self.library.selected_name() {
            if let Some(idx) = self
                .library
                .documents()
                .iter()
                .position(|d| d.name == name)
            {
                self.file_cursor = idx;
            }
        }
    }

    fn sync_viewer(&mut self) {
        match self.library.selected_document() {
            Some(doc) => self.viewer.set_chunks(&doc.chunks),
            None => self.viewer.clear(),
        }
    }

    fn persist_documents(&mut self) {
        if let Err(err) = self.storage.save_documents(self.library.documents()) {
            tracing::warn!(%err, "failed to persist document list");
            self.error = Some(err.to_string());
        }
    }
}
