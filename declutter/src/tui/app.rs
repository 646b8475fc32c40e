//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.
//! Capture itself (file I/O) is left to the runner via `pending_capture`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::state::{AppState, InteractionMode};
use crate::capture::CaptureError;
use crate::session::{SessionEvent, ViewState};

/// TUI application
#[derive(Debug)]
pub struct App {
    /// Application state
    state: AppState,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        debug!("App::new: called");
        Self { state: AppState::new() }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        trace!("App::state: called");
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        trace!("App::state_mut: called");
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_key: called");
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            debug!("App::handle_key: Ctrl+C force quit");
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => {
                debug!("App::handle_key: Normal mode");
                self.handle_normal_key(key)
            }
            InteractionMode::PathInput(_) => {
                debug!("App::handle_key: PathInput mode");
                self.handle_path_input_key(key)
            }
            InteractionMode::ConfirmQuit => {
                debug!("App::handle_key: ConfirmQuit mode");
                self.handle_confirm_quit_key(key)
            }
            InteractionMode::Help => {
                debug!("App::handle_key: Help mode");
                self.state.interaction_mode = InteractionMode::Normal;
                false
            }
        }
    }

    /// Handle pasted text (bracketed paste, or a file dropped on the terminal)
    pub fn handle_paste(&mut self, text: String) {
        debug!(len = text.len(), "App::handle_paste: called");
        if self.state.notice_open() {
            debug!("App::handle_paste: notice open, ignoring");
            return;
        }

        match &mut self.state.interaction_mode {
            InteractionMode::PathInput(buf) => {
                buf.push_str(text.trim_end_matches(['\r', '\n']));
            }
            InteractionMode::Normal if !self.state.session.view().is_analyzing() => {
                debug!("App::handle_paste: capturing pasted path");
                self.state.pending_capture = Some(text);
            }
            _ => {
                debug!("App::handle_paste: ignored in current mode");
            }
        }
    }

    /// Handle key in normal mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_normal_key: called");

        // Blocking notice: only dismissal gets through
        if self.state.notice_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
                debug!("App::handle_normal_key: dismissing notice");
                self.state.session.handle(SessionEvent::DismissNotice);
            }
            return false;
        }

        let analyzing = self.state.session.view().is_analyzing();
        match key.code {
            KeyCode::Char('q') => {
                if analyzing {
                    debug!("App::handle_normal_key: analysis running, confirm quit");
                    self.state.interaction_mode = InteractionMode::ConfirmQuit;
                } else {
                    debug!("App::handle_normal_key: quit requested");
                    self.state.should_quit = true;
                }
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                debug!("App::handle_normal_key: showing help");
                self.state.interaction_mode = InteractionMode::Help;
            }
            KeyCode::Char('c') | KeyCode::Char('o') | KeyCode::Char('s') if !analyzing => {
                debug!("App::handle_normal_key: opening path prompt");
                self.state.interaction_mode = InteractionMode::PathInput(String::new());
            }
            KeyCode::Char('t') => {
                self.state.session.handle(SessionEvent::ShowTips);
            }
            KeyCode::Char('r') => {
                self.reset();
            }
            KeyCode::Char('h') | KeyCode::Esc | KeyCode::Backspace => {
                let in_result = matches!(self.state.session.view(), ViewState::Result(_));
                if in_result {
                    // Leaving a result discards it
                    self.reset();
                } else {
                    self.state.session.handle(SessionEvent::ShowHome);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if matches!(self.state.session.view(), ViewState::Result(_)) {
                    self.state.result_scroll = self.state.result_scroll.saturating_add(1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.result_scroll = self.state.result_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                if matches!(self.state.session.view(), ViewState::Result(_)) {
                    self.state.result_scroll = self.state.result_scroll.saturating_add(10);
                }
            }
            KeyCode::PageUp => {
                self.state.result_scroll = self.state.result_scroll.saturating_sub(10);
            }
            KeyCode::Char('g') => {
                self.state.result_scroll = 0;
            }
            _ => {
                debug!("App::handle_normal_key: unhandled key");
            }
        }

        false
    }

    /// Handle key in path input mode
    fn handle_path_input_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_path_input_key: called");
        match key.code {
            KeyCode::Esc => {
                debug!("App::handle_path_input_key: Esc - cancel capture");
                self.state.interaction_mode = InteractionMode::Normal;
                self.state.session.handle(SessionEvent::CaptureFailed(CaptureError::Cancelled));
            }
            KeyCode::Enter => {
                debug!("App::handle_path_input_key: Enter - submit path");
                if let InteractionMode::PathInput(path) = &self.state.interaction_mode {
                    self.state.pending_capture = Some(path.clone());
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.state.interaction_mode.input_buffer_mut() {
                    buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buf) = self.state.interaction_mode.input_buffer_mut() {
                    buf.push(c);
                }
            }
            _ => {
                debug!("App::handle_path_input_key: unhandled key");
            }
        }

        false
    }

    /// Handle key in quit confirmation
    fn handle_confirm_quit_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, "App::handle_confirm_quit_key: called");
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                debug!("App::handle_confirm_quit_key: confirmed");
                self.state.should_quit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                debug!("App::handle_confirm_quit_key: cancelled");
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
        false
    }

    fn reset(&mut self) {
        debug!("App::reset: called");
        self.state.session.handle(SessionEvent::Reset);
        if !self.state.session.view().is_analyzing() {
            self.state.result_scroll = 0;
        }
    }
}
