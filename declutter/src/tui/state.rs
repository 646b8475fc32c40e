//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here.

use std::time::Instant;

use tracing::debug;

use crate::session::Session;

/// Spinner frames for the Analyzing view
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Typing or pasting an image path (c key)
    PathInput(String),
    /// Quit requested while an analysis is running
    ConfirmQuit,
    /// Help overlay
    Help,
}

impl InteractionMode {
    /// Get the input buffer if in an input mode
    pub fn input_buffer(&self) -> Option<&str> {
        match self {
            Self::PathInput(s) => Some(s),
            _ => None,
        }
    }

    /// Get mutable input buffer
    pub fn input_buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::PathInput(s) => Some(s),
            _ => None,
        }
    }
}

/// Complete TUI application state
#[derive(Debug)]
pub struct AppState {
    /// View state machine
    pub session: Session,

    /// Current interaction mode
    pub interaction_mode: InteractionMode,

    /// Raw path text waiting to be captured by the runner
    pub pending_capture: Option<String>,

    /// Result view scroll offset (in lines)
    pub result_scroll: u16,

    /// Spinner frame for the Analyzing view
    pub spinner_frame: usize,

    /// When the current analysis started (None when idle)
    pub analysis_started: Option<Instant>,

    /// Should quit
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create new state
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self {
            session: Session::new(),
            interaction_mode: InteractionMode::Normal,
            pending_capture: None,
            result_scroll: 0,
            spinner_frame: 0,
            analysis_started: None,
            should_quit: false,
        }
    }

    /// Advance animations; called on every tick
    pub fn tick(&mut self) {
        if self.session.view().is_analyzing() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            self.analysis_started.get_or_insert_with(Instant::now);
        } else {
            self.analysis_started = None;
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    /// A failure notice blocks all other input
    pub fn notice_open(&self) -> bool {
        self.session.notice().is_some()
    }
}
