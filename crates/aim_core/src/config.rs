//! Player behavior configuration.
//!
//! One immutable `BehaviorConfig` is constructed per simulation run; the
//! random stream is threaded separately so reruns are reproducible.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Capture radius in px for a circle-size setting, per the published
/// formula `radius = 54.4 - 4.48 * cs`.
pub fn circle_radius_for_cs(cs: f64) -> f64 {
    54.4 - 4.48 * cs
}

/// Immutable per-run player model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Target capture radius (px). See [`circle_radius_for_cs`].
    pub circle_radius: f64,
    /// Std-dev of tap-timing jitter (ms, 95% CI semantics)
    pub tap_deviation: f64,
    /// Mean of the perception re-evaluation interval (ms)
    pub mean_read_latency: f64,
    /// Std-dev of the perception re-evaluation interval (ms)
    pub read_latency_stddev: f64,
    /// Relative std-dev applied to corrective velocity. 0 disables jitter.
    pub velocity_deviation: f64,
}

impl Default for BehaviorConfig {
    /// Reference player: cs 6 circles, 18 ms tap jitter, 140 +/- 10 ms read
    /// interval, velocity deviation 10.
    fn default() -> Self {
        Self {
            circle_radius: circle_radius_for_cs(6.0),
            tap_deviation: 18.0,
            mean_read_latency: 140.0,
            read_latency_stddev: 10.0,
            velocity_deviation: 10.0,
        }
    }
}

impl BehaviorConfig {
    /// Default parameters at a given circle size.
    pub fn for_circle_size(cs: f64) -> Self {
        Self { circle_radius: circle_radius_for_cs(cs), ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.circle_radius.is_finite() || self.circle_radius <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "circle_radius must be positive, got {}",
                self.circle_radius
            )));
        }
        for (name, value) in [
            ("tap_deviation", self.tap_deviation),
            ("mean_read_latency", self.mean_read_latency),
            ("read_latency_stddev", self.read_latency_stddev),
            ("velocity_deviation", self.velocity_deviation),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_radius_formula() {
        // cs 6 -> 27.52 px radius
        assert!((circle_radius_for_cs(6.0) - 27.52).abs() < 1e-9);
        // Larger cs value means a smaller circle
        assert!(circle_radius_for_cs(7.0) < circle_radius_for_cs(4.0));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(BehaviorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_negative_deviation_rejected() {
        let config = BehaviorConfig { tap_deviation: -1.0, ..Default::default() };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let config = BehaviorConfig { circle_radius: 0.0, ..Default::default() };
        assert!(config.validate().is_err());
    }
}
