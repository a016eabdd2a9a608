//! The `astrocal` pipeline: configuration, task fan-out, event
//! routing, and calendar output.
//!
//! The binary in `main.rs` is a thin wrapper; everything that matters
//! lives here so the full pipeline can be driven in-process by tests.

pub mod cli;
pub mod config;
pub mod convert;
pub mod location;
pub mod logging;
pub mod pipeline;
