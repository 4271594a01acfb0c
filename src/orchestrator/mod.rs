//! Application-level orchestration.
//!
//! The UI thread owns the session state machine; this module owns command execution on the
//! tokio runtime and feeds results back as events, keeping the two sides free of shared state.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
