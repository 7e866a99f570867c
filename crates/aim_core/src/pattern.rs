//! Closed-form geometric target-pattern generator.
//!
//! Produces the constant-tempo jump patterns the sweep driver feeds to the
//! engine: starting at the playfield center, each jump covers the same
//! distance and the jump direction rotates by a fixed turn angle per note.
//! A turn angle of 0 is a straight stream; pi is a back-and-forth jump.

use serde::{Deserialize, Serialize};

use crate::models::Target;

/// Playfield dimensions (px).
pub const PLAYFIELD_WIDTH: f64 = 512.0;
pub const PLAYFIELD_HEIGHT: f64 = 384.0;

/// Parameters of one generated pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    /// Direction of the first jump (radians)
    pub initial_angle: f64,
    /// Distance between consecutive targets (px)
    pub distance: f64,
    /// Time between consecutive targets (seconds)
    pub interval: f64,
    /// Rotation added to the jump direction per note (radians)
    pub turn_angle: f64,
    /// Targets per repeat
    pub points: usize,
    /// Number of times the walk is repeated (continuing in time)
    pub repeats: usize,
}

impl PatternSpec {
    pub fn new(
        initial_angle: f64,
        distance: f64,
        interval: f64,
        turn_angle: f64,
        points: usize,
        repeats: usize,
    ) -> Self {
        Self { initial_angle, distance, interval, turn_angle, points, repeats }
    }

    /// Straight stream: every jump in the same direction.
    pub fn stream(distance: f64, interval: f64, points: usize) -> Self {
        Self::new(0.0, distance, interval, 0.0, points, 1)
    }

    /// 180 degree back-and-forth jump.
    pub fn back_and_forth(distance: f64, interval: f64, points: usize) -> Self {
        Self::new(0.0, distance, interval, std::f64::consts::PI, points, 1)
    }

    /// Generate the target sequence. Pure closed-form math; positions are
    /// not clamped to the playfield.
    pub fn generate(&self) -> Vec<Target> {
        let repeats = self.repeats.max(1);

        // One walk of `points` positions from the playfield center.
        let mut walk = Vec::with_capacity(self.points);
        let mut x = PLAYFIELD_WIDTH / 2.0;
        let mut y = PLAYFIELD_HEIGHT / 2.0;
        let mut theta = self.initial_angle;
        for _ in 0..self.points {
            walk.push((x, y));
            x += self.distance * theta.cos();
            y += self.distance * theta.sin();
            theta += self.turn_angle;
        }

        let mut targets = Vec::with_capacity(self.points * repeats);
        for repeat in 0..repeats {
            for (i, &(px, py)) in walk.iter().enumerate() {
                let index = repeat * self.points + i;
                targets.push(Target::new(index as f64 * self.interval, px, py));
            }
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_count() {
        let spec = PatternSpec::stream(100.0, 0.2, 30);
        assert_eq!(spec.generate().len(), 30);

        let repeated = PatternSpec::new(0.0, 100.0, 0.2, 0.0, 10, 3);
        assert_eq!(repeated.generate().len(), 30);
    }

    #[test]
    fn test_times_are_strictly_increasing() {
        let targets = PatternSpec::back_and_forth(80.0, 0.125, 16).generate();
        for pair in targets.windows(2) {
            assert!(pair[1].time > pair[0].time);
            assert!((pair[1].time - pair[0].time - 0.125).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stream_keeps_constant_spacing() {
        let targets = PatternSpec::stream(60.0, 0.2, 8).generate();
        for pair in targets.windows(2) {
            let dx = pair[1].x - pair[0].x;
            let dy = pair[1].y - pair[0].y;
            assert!((dx.hypot(dy) - 60.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_back_and_forth_alternates_between_two_points() {
        let targets = PatternSpec::back_and_forth(100.0, 0.1, 6).generate();
        let first = targets[0];
        let second = targets[1];
        for (i, target) in targets.iter().enumerate() {
            let expected = if i % 2 == 0 { first } else { second };
            assert!((target.x - expected.x).abs() < 1e-9);
            assert!((target.y - expected.y).abs() < 1e-9);
        }
        assert!((second.x - first.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_starts_at_playfield_center() {
        let targets = PatternSpec::stream(50.0, 0.2, 4).generate();
        assert_eq!(targets[0].x, PLAYFIELD_WIDTH / 2.0);
        assert_eq!(targets[0].y, PLAYFIELD_HEIGHT / 2.0);
    }
}
