//! Main application module
//!
//! - `controller`: the playback state machine
//! - `queue_navigator`: next/previous/end-of-track index decisions
//! - `runner`: terminal event loop around the controller

mod controller;
mod message;
mod queue_navigator;
mod runner;
mod state;

pub use runner::{RunOptions, run};
pub use state::RepeatMode;
