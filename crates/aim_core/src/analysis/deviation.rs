//! Deviation analyzer.
//!
//! Re-projects raw target-minus-replay offsets into the frame of each
//! target's incoming approach vector, so aim error is measured relative to
//! the direction of travel instead of the screen axes. That makes the
//! aggregate statistic comparable across patterns with different absolute
//! orientation.

use crate::error::{Result, SimError};
use crate::models::{AimDeviation, DeviationSample, ReplaySample, Target};

/// Pattern-relative deviation for every target with a predecessor.
///
/// Returns at most `targets.len() - 1` samples: the first target has no
/// incoming vector and is dropped, and non-finite candidates (degenerate
/// zero-length approach vectors from coincident consecutive targets) are
/// filtered out rather than propagated as errors.
///
/// The target and replay sequences must pair index-for-index; a length
/// mismatch is a precondition violation.
pub fn analyze(targets: &[Target], replay: &[ReplaySample]) -> Result<Vec<DeviationSample>> {
    check_paired(targets, replay)?;

    let mut samples = Vec::with_capacity(targets.len() - 1);
    for i in 0..targets.len() - 1 {
        // Incoming approach vector of target i+1
        let dir_x = targets[i + 1].x - targets[i].x;
        let dir_y = targets[i + 1].y - targets[i].y;
        // Raw offset of the replay at target i+1
        let offset_x = targets[i + 1].x - replay[i + 1].x;
        let offset_y = targets[i + 1].y - replay[i + 1].y;

        // A zero-length approach vector has no direction; poison the
        // candidate so the finiteness filter below drops it.
        let path_theta = if dir_x == 0.0 && dir_y == 0.0 {
            f64::NAN
        } else {
            dir_y.atan2(dir_x)
        };
        let offset_theta = offset_y.atan2(offset_x);
        let magnitude = offset_x.hypot(offset_y);

        let along_path = magnitude * (path_theta - offset_theta).cos();
        let cross_path = magnitude * (path_theta - offset_theta).sin();

        if along_path.is_finite() && cross_path.is_finite() {
            samples.push(DeviationSample { along_path, cross_path });
        }
    }
    Ok(samples)
}

/// Per-target tap-time offsets (seconds, `target - replay`). Tracked
/// alongside the positional deviations but not part of the aggregate.
pub fn tap_offsets(targets: &[Target], replay: &[ReplaySample]) -> Result<Vec<f64>> {
    check_paired(targets, replay)?;
    Ok(targets
        .iter()
        .zip(replay.iter())
        .map(|(target, sample)| target.time - sample.time)
        .collect())
}

/// Aggregate precision statistic. `None` when fewer than two finite samples
/// exist - a standard deviation over fewer points is undefined, and sweep
/// drivers are expected to skip such cells rather than fail.
pub fn aggregate(samples: &[DeviationSample]) -> Option<AimDeviation> {
    if samples.len() < 2 {
        return None;
    }

    let along_stddev = population_stddev(samples.iter().map(|s| s.along_path));
    let cross_stddev = population_stddev(samples.iter().map(|s| s.cross_path));

    Some(AimDeviation {
        along_stddev,
        cross_stddev,
        combined: (along_stddev.powi(2) + cross_stddev.powi(2)).sqrt(),
    })
}

fn check_paired(targets: &[Target], replay: &[ReplaySample]) -> Result<()> {
    if targets.len() < 2 {
        return Err(SimError::TooFewTargets { found: targets.len() });
    }
    if targets.len() != replay.len() {
        return Err(SimError::LengthMismatch { targets: targets.len(), replay: replay.len() });
    }
    Ok(())
}

/// Population standard deviation (divides by N, matching the aggregate's
/// "spread of this sample set" semantics).
fn population_stddev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let count = values.clone().count();
    if count == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / count as f64;
    let variance = values.map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TapState;

    fn replay_from(targets: &[Target]) -> Vec<ReplaySample> {
        targets
            .iter()
            .map(|t| ReplaySample { time: t.time, x: t.x, y: t.y, state: TapState::Hit })
            .collect()
    }

    fn square_targets() -> Vec<Target> {
        vec![
            Target::new(0.0, 0.0, 0.0),
            Target::new(0.1, 100.0, 0.0),
            Target::new(0.2, 100.0, 100.0),
            Target::new(0.3, 0.0, 100.0),
        ]
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let targets = square_targets();
        let mut replay = replay_from(&targets);
        replay.pop();

        assert_eq!(
            analyze(&targets, &replay),
            Err(SimError::LengthMismatch { targets: 4, replay: 3 })
        );
    }

    #[test]
    fn test_zero_error_gives_zero_deviation() {
        let targets = square_targets();
        let replay = replay_from(&targets);

        let samples = analyze(&targets, &replay).unwrap();
        assert_eq!(samples.len(), targets.len() - 1);
        for sample in &samples {
            assert_eq!(sample.along_path, 0.0);
            assert_eq!(sample.cross_path, 0.0);
        }

        let stats = aggregate(&samples).unwrap();
        assert_eq!(stats.combined, 0.0);
    }

    #[test]
    fn test_candidate_count_without_degenerates() {
        let targets = square_targets();
        let mut replay = replay_from(&targets);
        for sample in replay.iter_mut() {
            sample.x += 3.0;
            sample.y -= 2.0;
        }

        let samples = analyze(&targets, &replay).unwrap();
        assert_eq!(samples.len(), targets.len() - 1);
        assert!(samples.iter().all(|s| s.along_path.is_finite() && s.cross_path.is_finite()));
    }

    #[test]
    fn test_coincident_targets_filtered_not_raised() {
        // Second and third targets coincide: the approach vector of index 2
        // has zero length, so that candidate must vanish silently.
        let targets = vec![
            Target::new(0.0, 0.0, 0.0),
            Target::new(0.1, 50.0, 0.0),
            Target::new(0.2, 50.0, 0.0),
            Target::new(0.3, 0.0, 0.0),
        ];
        let mut replay = replay_from(&targets);
        for sample in replay.iter_mut() {
            sample.x += 1.0;
        }

        let samples = analyze(&targets, &replay).unwrap();
        assert_eq!(samples.len(), targets.len() - 2);
    }

    #[test]
    fn test_reprojection_is_rotation_invariant() {
        let targets = square_targets();
        let mut replay = replay_from(&targets);
        for (i, sample) in replay.iter_mut().enumerate() {
            sample.x += 2.0 + i as f64;
            sample.y -= 1.5;
        }
        let base = analyze(&targets, &replay).unwrap();

        let theta = 0.7_f64;
        let rotate = |x: f64, y: f64| {
            (x * theta.cos() - y * theta.sin(), x * theta.sin() + y * theta.cos())
        };
        let rotated_targets: Vec<Target> = targets
            .iter()
            .map(|t| {
                let (x, y) = rotate(t.x, t.y);
                Target::new(t.time, x, y)
            })
            .collect();
        let rotated_replay: Vec<ReplaySample> = replay
            .iter()
            .map(|s| {
                let (x, y) = rotate(s.x, s.y);
                ReplaySample { x, y, ..*s }
            })
            .collect();
        let rotated = analyze(&rotated_targets, &rotated_replay).unwrap();

        assert_eq!(base.len(), rotated.len());
        for (a, b) in base.iter().zip(rotated.iter()) {
            assert!((a.along_path - b.along_path).abs() < 1e-9, "{a:?} vs {b:?}");
            assert!((a.cross_path - b.cross_path).abs() < 1e-9, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_aggregate_needs_two_samples() {
        assert_eq!(aggregate(&[]), None);
        assert_eq!(aggregate(&[DeviationSample { along_path: 1.0, cross_path: 0.0 }]), None);
    }

    #[test]
    fn test_aggregate_combines_axes() {
        // along: +1/-1 -> stddev 1; cross: all zero -> stddev 0
        let samples = vec![
            DeviationSample { along_path: 1.0, cross_path: 0.0 },
            DeviationSample { along_path: -1.0, cross_path: 0.0 },
        ];
        let stats = aggregate(&samples).unwrap();
        assert!((stats.along_stddev - 1.0).abs() < 1e-12);
        assert_eq!(stats.cross_stddev, 0.0);
        assert!((stats.combined - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tap_offsets_track_time_error() {
        let targets = square_targets();
        let mut replay = replay_from(&targets);
        for sample in replay.iter_mut() {
            sample.time += 0.01;
        }

        let offsets = tap_offsets(&targets, &replay).unwrap();
        assert_eq!(offsets.len(), targets.len());
        for offset in offsets {
            assert!((offset + 0.01).abs() < 1e-12);
        }
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::models::TapState;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn analyze_returns_at_most_n_minus_one_finite_samples(
            points in proptest::collection::vec(
                ((-500.0..500.0f64), (-500.0..500.0f64), (-20.0..20.0f64), (-20.0..20.0f64)),
                2..30,
            )
        ) {
            let targets: Vec<Target> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, _, _))| Target::new(i as f64 * 0.1, x, y))
                .collect();
            let replay: Vec<ReplaySample> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, y, ex, ey))| ReplaySample {
                    time: i as f64 * 0.1,
                    x: x + ex,
                    y: y + ey,
                    state: TapState::Hit,
                })
                .collect();

            let samples = analyze(&targets, &replay).unwrap();
            prop_assert!(samples.len() <= targets.len() - 1);
            prop_assert!(samples.iter().all(|s| s.along_path.is_finite() && s.cross_path.is_finite()));
        }
    }
}
