//! Presentation session.
//!
//! Ties a keyword list to a speech engine, applies matches as transcripts
//! arrive and publishes state for the API and the terminal.

pub mod controller;
pub mod status;

pub use controller::{PresentationSession, SessionCommand, SessionOptions};
pub use status::{DisplayState, EnginePhase, SessionStatus, SessionStatusHandle};
