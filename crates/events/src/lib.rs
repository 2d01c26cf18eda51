//! Progress event system for the ticket analysis pipeline.
//!
//! This crate provides the broadcaster and event types used to stream
//! per-ticket analysis progress to live observers.

mod bus;
mod types;

pub use bus::ProgressBus;
pub use types::*;
