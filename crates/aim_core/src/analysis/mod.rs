//! Replay analysis: pattern-relative deviation and aggregate statistics.

pub mod deviation;

pub use deviation::{aggregate, analyze, tap_offsets};
