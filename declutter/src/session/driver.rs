//! Analysis driver
//!
//! Runs the client call for an [`AnalysisRequest`] on a background task and
//! hands the outcome back over a channel, so the UI loop never blocks on
//! the network.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::state::{AnalysisRequest, SessionEvent, Ticket};
use crate::analysis::{AnalysisClient, AnalysisError};
use crate::domain::AnalysisResult;

/// Result of one background analysis
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub ticket: Ticket,
    pub result: Result<AnalysisResult, AnalysisError>,
}

impl AnalysisOutcome {
    /// Convert into the session event that reports it
    pub fn into_event(self) -> SessionEvent {
        match self.result {
            Ok(result) => SessionEvent::AnalysisSucceeded {
                ticket: self.ticket,
                result,
            },
            Err(error) => SessionEvent::AnalysisFailed {
                ticket: self.ticket,
                error,
            },
        }
    }
}

/// Owns the client and the outcome channel
pub struct Driver {
    client: Arc<dyn AnalysisClient>,
    tx: mpsc::Sender<AnalysisOutcome>,
    rx: mpsc::Receiver<AnalysisOutcome>,
}

impl Driver {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        debug!("Driver::new: called");
        // One analysis at a time, so one slot is enough
        let (tx, rx) = mpsc::channel(1);
        Self { client, tx, rx }
    }

    /// Start the client call for `request` on a background task
    pub fn dispatch(&self, request: AnalysisRequest) -> JoinHandle<()> {
        debug!(ticket = request.ticket, "Driver::dispatch: called");
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = client.analyze(&request.payload).await;
            debug!(ticket = request.ticket, ok = result.is_ok(), "Driver::dispatch: analysis finished");
            let outcome = AnalysisOutcome {
                ticket: request.ticket,
                result,
            };
            if tx.send(outcome).await.is_err() {
                debug!("Driver::dispatch: receiver dropped, discarding outcome");
            }
        })
    }

    /// Non-blocking poll for a finished analysis
    pub fn try_next(&mut self) -> Option<AnalysisOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished analysis
    pub async fn next(&mut self) -> Option<AnalysisOutcome> {
        self.rx.recv().await
    }
}
