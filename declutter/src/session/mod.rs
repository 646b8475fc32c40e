//! Application session
//!
//! The view state machine and the driver that runs its single in-flight
//! analysis.

mod driver;
mod state;

pub use driver::{AnalysisOutcome, Driver};
pub use state::{AnalysisRequest, FailureNotice, NoticeKind, Session, SessionEvent, Ticket, ViewState};
