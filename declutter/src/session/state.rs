//! Session state machine
//!
//! Pure: events in, state changes and at most one analysis request out.
//! Nothing here touches the network or the terminal.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analysis::{AnalysisError, ErrorKind};
use crate::capture::{CaptureError, ImagePayload};
use crate::domain::AnalysisResult;

/// Identifies one capture-to-result cycle
pub type Ticket = u64;

/// The screen the user is on; exactly one is active
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Landing view with the capture affordance
    #[default]
    Home,
    /// Waiting for the analysis of `payload`
    Analyzing { payload: Arc<ImagePayload>, ticket: Ticket },
    /// Showing a completed analysis
    Result(AnalysisResult),
    /// Static maintenance tips
    Tips,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Home => "Home",
            ViewState::Analyzing { .. } => "Analyzing",
            ViewState::Result(_) => "Result",
            ViewState::Tips => "Tips",
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, ViewState::Analyzing { .. })
    }
}

/// Inputs to the state machine
#[derive(Debug)]
pub enum SessionEvent {
    /// A valid image was captured
    CaptureTriggered(ImagePayload),
    /// Capture did not produce an image
    CaptureFailed(CaptureError),
    AnalysisSucceeded { ticket: Ticket, result: AnalysisResult },
    AnalysisFailed { ticket: Ticket, error: AnalysisError },
    /// Discard everything and go Home
    Reset,
    ShowTips,
    ShowHome,
    /// Close the failure notice
    DismissNotice,
}

/// Work handed to the driver when capture starts an analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticket: Ticket,
    pub payload: Arc<ImagePayload>,
}

/// What kind of failure a notice reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    CaptureRejected,
    TransportError,
    MalformedResponse,
}

/// Blocking notice shown after a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl FailureNotice {
    pub fn capture_rejected(error: &CaptureError) -> Self {
        Self {
            kind: NoticeKind::CaptureRejected,
            title: "Can't use that image".to_string(),
            message: error.to_string(),
        }
    }

    pub fn analysis_failed(error: &AnalysisError) -> Self {
        match error.kind() {
            ErrorKind::TransportError => Self {
                kind: NoticeKind::TransportError,
                title: "Couldn't reach the analysis service".to_string(),
                message: format!("{}. Please try again.", error),
            },
            ErrorKind::MalformedResponse => Self {
                kind: NoticeKind::MalformedResponse,
                title: "Something went wrong with the AI analysis".to_string(),
                message: format!("{}. Please try again.", error),
            },
        }
    }
}

/// Application session: current view, pending notice, ticket counter
#[derive(Debug, Default)]
pub struct Session {
    view: ViewState,
    notice: Option<FailureNotice>,
    last_ticket: Ticket,
}

impl Session {
    pub fn new() -> Self {
        debug!("Session::new: called");
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn notice(&self) -> Option<&FailureNotice> {
        self.notice.as_ref()
    }

    /// Ticket of the in-flight analysis, if any
    pub fn in_flight(&self) -> Option<Ticket> {
        match &self.view {
            ViewState::Analyzing { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Show a notice without changing the view
    pub fn set_notice(&mut self, notice: FailureNotice) {
        debug!(?notice.kind, "Session::set_notice: called");
        self.notice = Some(notice);
    }

    /// Apply one event
    ///
    /// Returns a request only when a new analysis must be started.
    pub fn handle(&mut self, event: SessionEvent) -> Option<AnalysisRequest> {
        debug!(view = self.view.name(), "Session::handle: called");
        match event {
            SessionEvent::CaptureTriggered(payload) => self.on_capture(payload),
            SessionEvent::CaptureFailed(error) => {
                self.on_capture_failed(error);
                None
            }
            SessionEvent::AnalysisSucceeded { ticket, result } => {
                if self.accepts(ticket) {
                    info!(ticket, task_count = result.tasks.len(), "Session::handle: analysis succeeded");
                    self.view = ViewState::Result(result);
                }
                None
            }
            SessionEvent::AnalysisFailed { ticket, error } => {
                if self.accepts(ticket) {
                    warn!(ticket, kind = %error.kind(), error = %error, "Session::handle: analysis failed");
                    self.notice = Some(FailureNotice::analysis_failed(&error));
                    self.view = ViewState::Home;
                }
                None
            }
            SessionEvent::Reset => {
                if self.view.is_analyzing() {
                    debug!("Session::handle: reset ignored while analyzing");
                } else {
                    self.view = ViewState::Home;
                }
                None
            }
            SessionEvent::ShowTips => {
                if self.view == ViewState::Home {
                    self.view = ViewState::Tips;
                }
                None
            }
            SessionEvent::ShowHome => {
                if self.view == ViewState::Tips {
                    self.view = ViewState::Home;
                }
                None
            }
            SessionEvent::DismissNotice => {
                self.notice = None;
                None
            }
        }
    }

    fn on_capture(&mut self, payload: ImagePayload) -> Option<AnalysisRequest> {
        if let Some(ticket) = self.in_flight() {
            debug!(ticket, "Session::on_capture: analysis in flight, ignoring capture");
            return None;
        }

        self.last_ticket += 1;
        let ticket = self.last_ticket;
        let payload = Arc::new(payload);
        info!(ticket, file = %payload.preview.file_name, "Session::on_capture: starting analysis");

        self.notice = None;
        self.view = ViewState::Analyzing {
            payload: Arc::clone(&payload),
            ticket,
        };
        Some(AnalysisRequest { ticket, payload })
    }

    fn on_capture_failed(&mut self, error: CaptureError) {
        match error {
            CaptureError::Cancelled => {
                debug!("Session::on_capture_failed: cancelled, nothing to do");
            }
            CaptureError::Rejected { .. } => {
                warn!(error = %error, "Session::on_capture_failed: capture rejected");
                self.notice = Some(FailureNotice::capture_rejected(&error));
            }
        }
    }

    /// Check an outcome belongs to the current analysis
    fn accepts(&self, ticket: Ticket) -> bool {
        let current = self.in_flight();
        if current != Some(ticket) {
            debug!(ticket, ?current, "Session::accepts: stale outcome ignored");
            return false;
        }
        true
    }
}
