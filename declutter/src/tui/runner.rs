//! TUI Runner - main loop that owns the terminal and the analysis driver
//!
//! The TuiRunner is responsible for:
//! - Dispatching terminal events to App for handling
//! - Performing captures requested by App
//! - Starting analyses and feeding their outcomes back to the session

use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tracing::{debug, info, warn};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;
use crate::analysis::{AnalysisClient, AnalysisError};
use crate::capture::capture_input;
use crate::config::{CaptureConfig, Config};
use crate::session::{AnalysisOutcome, Driver, FailureNotice, SessionEvent};

/// What woke the main loop
enum Wakeup {
    Terminal(Event),
    Analysis(AnalysisOutcome),
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Event handler
    event_handler: EventHandler,
    /// Analysis driver; None when no client could be built
    driver: Option<Driver>,
    /// Why the client could not be built
    client_error: Option<String>,
    /// Capture limits
    capture: CaptureConfig,
}

impl TuiRunner {
    /// Create a runner; a client error is reported on first capture
    pub fn new(
        terminal: Tui,
        config: &Config,
        client: std::result::Result<Arc<dyn AnalysisClient>, AnalysisError>,
    ) -> Self {
        debug!(tick_ms = config.tui.tick_ms, "TuiRunner::new: called");
        let (driver, client_error) = match client {
            Ok(client) => (Some(Driver::new(client)), None),
            Err(e) => {
                warn!(error = %e, "TuiRunner::new: no analysis client");
                (None, Some(e.to_string()))
            }
        };

        Self {
            app: App::new(),
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(config.tui.tick_ms)),
            driver,
            client_error,
            capture: config.capture.clone(),
        }
    }

    /// Run the main loop until the user quits
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            // Wait for either a terminal event or a finished analysis
            let wakeup = {
                let events = &mut self.event_handler;
                let driver = &mut self.driver;
                tokio::select! {
                    event = events.next() => Wakeup::Terminal(event?),
                    Some(outcome) = async {
                        match driver.as_mut() {
                            Some(driver) => driver.next().await,
                            None => std::future::pending::<Option<AnalysisOutcome>>().await,
                        }
                    } => Wakeup::Analysis(outcome),
                }
            };

            match wakeup {
                Wakeup::Terminal(Event::Tick) => self.handle_tick(),
                Wakeup::Terminal(Event::Key(key)) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                }
                Wakeup::Terminal(Event::Paste(text)) => self.app.handle_paste(text),
                Wakeup::Terminal(Event::Resize(width, height)) => {
                    debug!(width, height, "TuiRunner::run: resize");
                }
                Wakeup::Analysis(outcome) => {
                    info!(ticket = outcome.ticket, ok = outcome.result.is_ok(), "TuiRunner::run: analysis finished");
                    self.app.state_mut().result_scroll = 0;
                    self.app.state_mut().session.handle(outcome.into_event());
                }
            }

            // Pasted paths are captured right away, not on the next tick
            if self.app.state().pending_capture.is_some() {
                self.process_pending_capture();
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.app.state_mut().tick();
    }

    /// Capture the pending path and start an analysis if it is accepted
    fn process_pending_capture(&mut self) {
        let Some(raw) = self.app.state_mut().pending_capture.take() else {
            return;
        };
        debug!(raw_len = raw.len(), "TuiRunner::process_pending_capture: called");

        let event = match capture_input(&raw, &self.capture) {
            Ok(payload) => {
                if self.driver.is_none() {
                    let message = self
                        .client_error
                        .clone()
                        .unwrap_or_else(|| "No analysis client configured".to_string());
                    warn!(%message, "TuiRunner::process_pending_capture: cannot analyze");
                    let notice = FailureNotice::analysis_failed(&AnalysisError::Config(message));
                    self.app.state_mut().session.set_notice(notice);
                    return;
                }
                SessionEvent::CaptureTriggered(payload)
            }
            Err(e) => SessionEvent::CaptureFailed(e),
        };

        if let Some(request) = self.app.state_mut().session.handle(event)
            && let Some(driver) = &self.driver
        {
            info!(ticket = request.ticket, "TuiRunner::process_pending_capture: dispatching analysis");
            driver.dispatch(request);
        }
    }
}
