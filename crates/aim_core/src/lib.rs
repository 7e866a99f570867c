//! # aim_core - Deterministic Aim/Tap Precision Simulation Engine
//!
//! Estimates how precisely a synthetic player can aim and tap a sequence of
//! timed on-screen targets, and how that precision scales with target
//! spacing, tempo, and movement angle.
//!
//! ## Features
//! - Fixed-timestep player model: perception latency, corrective velocity
//!   control, tap-timing jitter
//! - Deviation analyzer re-projecting aim error into the pattern-relative
//!   frame (along-path / cross-path)
//! - 100% deterministic given a seeded random stream
//! - Closed-form pattern generator for sweep drivers and tests

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod pattern;

// Re-export the core API surface
pub use analysis::{aggregate, analyze, tap_offsets};
pub use config::{circle_radius_for_cs, BehaviorConfig};
pub use engine::{simulate, RecordMode, TimeDomain, SIM_STEP_MS};
pub use error::{Result, SimError};
pub use models::{AimDeviation, DeviationSample, ReplaySample, TapState, Target};
pub use pattern::{PatternSpec, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
