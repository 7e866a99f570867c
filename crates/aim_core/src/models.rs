//! Core record types shared by the engine, the analyzer and the sweep driver.
//!
//! The engine consumes an ordered `Target` sequence (a "map") and produces an
//! ordered `ReplaySample` sequence (a "replay"). The analyzer turns a
//! map/replay pair into `DeviationSample`s and an `AimDeviation` aggregate.

use serde::{Deserialize, Serialize};

/// One timed on-screen target the simulated player must aim at and tap.
///
/// Sequences are time-ordered (non-decreasing) and at least two targets long,
/// since pattern direction needs two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    /// Nominal tap time (seconds)
    pub time: f64,
    /// Horizontal position (px)
    pub x: f64,
    /// Vertical position (px)
    pub y: f64,
}

impl Target {
    pub fn new(time: f64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }

    /// Nominal tap time in whole milliseconds.
    pub fn time_ms(&self) -> i64 {
        (1000.0 * self.time) as i64
    }
}

/// Key state recorded with a replay sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TapState {
    /// No tap on this frame. Only appears on non-event ticks in full-trace
    /// recording mode.
    #[default]
    None,
    /// Tap landed within the normal timing window.
    Hit,
    /// Tap arrived abnormally late (> 100 ms after the target's nominal time).
    Miss,
}

/// One recorded frame of the simulated player's input trace.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReplaySample {
    /// Simulation time (seconds)
    pub time: f64,
    /// Cursor position (px, truncated to whole pixels on record)
    pub x: f64,
    pub y: f64,
    /// Tap state of this frame
    pub state: TapState,
}

/// Aim error for one target, decomposed relative to the direction of
/// approach rather than the absolute screen axes. This makes deviation
/// comparable across patterns with different orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeviationSample {
    /// Error component along the incoming approach vector (px)
    pub along_path: f64,
    /// Error component perpendicular to the approach vector (px)
    pub cross_path: f64,
}

/// Aggregate precision statistic over a set of deviation samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AimDeviation {
    /// Population standard deviation of the along-path components (px)
    pub along_stddev: f64,
    /// Population standard deviation of the cross-path components (px)
    pub cross_stddev: f64,
    /// Combined scalar "skill" metric: sqrt(along² + cross²) (px)
    pub combined: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_time_ms_truncates() {
        assert_eq!(Target::new(0.1, 0.0, 0.0).time_ms(), 100);
        assert_eq!(Target::new(0.0999, 0.0, 0.0).time_ms(), 99);
    }

    #[test]
    fn test_tap_state_default_is_none() {
        assert_eq!(ReplaySample::default().state, TapState::None);
    }
}
