//! Shared types for the SmartScan store stack
//!
//! Domain models, the exit-pass wire payload and its textual codec,
//! and ID/time utilities used by the server and its tooling.

pub mod exit_pass;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
