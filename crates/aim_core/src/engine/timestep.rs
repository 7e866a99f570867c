//! Fixed-timestep constants and the simulated time domain.
//!
//! The simulation runs in whole-millisecond ticks. The domain is padded on
//! both sides by six tap-timing standard deviations so taps that fire well
//! before or after their nominal target time are still captured.

use crate::config::BehaviorConfig;
use crate::models::Target;

/// Simulation tick length (ms).
pub const SIM_STEP_MS: i64 = 3;

/// Padding around the first/last target, in tap-timing standard deviations.
pub const TAP_MARGIN_SIGMAS: i64 = 6;

/// Half-open tick range `[start_ms, end_ms)` covering one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDomain {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeDomain {
    /// Domain for a target sequence under a given config. Callers guarantee
    /// `targets` is non-empty and time-ordered.
    pub fn for_targets(targets: &[Target], config: &BehaviorConfig) -> Self {
        let first_ms = targets[0].time_ms();
        let last_ms = targets[targets.len() - 1].time_ms();
        // ceil keeps fractional tap deviations covered
        let margin = TAP_MARGIN_SIGMAS * config.tap_deviation.ceil() as i64;

        Self {
            start_ms: first_ms - margin - SIM_STEP_MS,
            end_ms: last_ms + margin + SIM_STEP_MS,
        }
    }

    /// Number of ticks in the domain. Deterministic from target timestamps
    /// and config; equals the full-trace replay length.
    pub fn tick_count(&self) -> usize {
        if self.end_ms <= self.start_ms {
            return 0;
        }
        ((self.end_ms - self.start_ms + SIM_STEP_MS - 1) / SIM_STEP_MS) as usize
    }

    /// Tick timestamps in ms, ascending.
    pub fn ticks(&self) -> impl Iterator<Item = i64> {
        (self.start_ms..self.end_ms).step_by(SIM_STEP_MS as usize)
    }
}
