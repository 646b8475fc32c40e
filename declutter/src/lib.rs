//! Declutter - AI-assisted room decluttering
//!
//! Photograph a messy room, send the image to a hosted vision model, and
//! show the returned clean-up plan as an ordered list of prioritized task
//! cards.
//!
//! # Core Concepts
//!
//! - **One analysis at a time**: the session only starts a new analysis
//!   when none is in flight
//! - **All or nothing parsing**: a response that does not match the schema
//!   is an error, never a partial plan
//! - **Swappable provider**: everything network-facing sits behind
//!   [`analysis::AnalysisClient`]
//!
//! # Modules
//!
//! - [`domain`] - Priority, clutter tasks and the analysis result
//! - [`capture`] - Reading and encoding one image file
//! - [`analysis`] - Vision client trait, providers and response parsing
//! - [`session`] - View state machine and the analysis driver
//! - [`present`] - Task cards, badges and maintenance tips
//! - [`tui`] - Terminal user interface
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod analysis;
pub mod capture;
pub mod cli;
pub mod config;
pub mod domain;
pub mod present;
pub mod session;
pub mod tui;

pub use analysis::{AnalysisClient, AnalysisError, ErrorKind, create_client};
pub use capture::{CaptureError, ImagePayload, capture_file};
pub use config::Config;
pub use domain::{AnalysisResult, ClutterTask, Priority};
pub use present::{TaskCard, present};
pub use session::{Driver, Session, SessionEvent, ViewState};
