//! Parameter sweep driver.
//!
//! Repeatedly invokes the simulation engine and deviation analyzer across
//! combinations of tempo, distance and movement angle, averages the combined
//! deviation per grid cell, and summarizes how deviation grows with note
//! velocity via a per-angle linear regression ("skill slope").
//!
//! Sweeps run sequentially to completion; cells whose aggregate is undefined
//! (fewer than two finite deviation samples) are skipped, never fatal.

use aim_core::{
    aggregate, analyze, simulate, BehaviorConfig, PatternSpec, RecordMode, ReplaySample, Result,
    Target,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tempo x distance x angle grid walked by [`run_sweep`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    /// Tempo range (BPM, half-open upper bound)
    pub bpm_min: u32,
    pub bpm_max: u32,
    pub bpm_step: u32,
    /// Distance range (px, half-open upper bound)
    pub distance_min: u32,
    pub distance_max: u32,
    pub distance_step: u32,
    /// Pattern turn angles (degrees): 0 = stream, 180 = back-and-forth jump
    pub angles_deg: Vec<f64>,
    /// Simulation runs averaged per grid cell
    pub trials: u32,
    /// Targets per generated pattern
    pub points: usize,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            bpm_min: 120,
            bpm_max: 480,
            bpm_step: 50,
            distance_min: 50,
            distance_max: 510,
            distance_step: 50,
            angles_deg: vec![0.0, 180.0],
            trials: 30,
            points: 30,
        }
    }
}

/// One measured grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Pattern turn angle (degrees)
    pub angle_deg: f64,
    /// Tempo (BPM)
    pub bpm: f64,
    /// Distance between targets (px)
    pub distance: f64,
    /// Mean combined deviation over the cell's trials (px)
    pub deviation: f64,
}

/// Walk the grid, averaging the combined deviation over each cell's trials.
/// Trials whose aggregate is undefined are skipped; a cell with no valid
/// trial at all produces no point.
pub fn run_sweep(
    grid: &SweepGrid,
    config: &BehaviorConfig,
    rng: &mut impl Rng,
) -> Result<Vec<SweepPoint>> {
    let mut points = Vec::new();

    for &angle_deg in &grid.angles_deg {
        for bpm in (grid.bpm_min..grid.bpm_max).step_by(grid.bpm_step.max(1) as usize) {
            for distance in
                (grid.distance_min..grid.distance_max).step_by(grid.distance_step.max(1) as usize)
            {
                let interval = 60.0 / bpm as f64;
                let spec = PatternSpec::new(
                    0.0,
                    distance as f64,
                    interval,
                    angle_deg.to_radians(),
                    grid.points,
                    1,
                );

                let mut deviations = Vec::with_capacity(grid.trials as usize);
                for _ in 0..grid.trials {
                    let targets = spec.generate();
                    let replay = simulate(&targets, config, RecordMode::HitsOnly, rng)?;
                    let samples = analyze(&targets, &replay)?;
                    if let Some(stats) = aggregate(&samples) {
                        deviations.push(stats.combined);
                    }
                }

                if !deviations.is_empty() {
                    let mean = deviations.iter().sum::<f64>() / deviations.len() as f64;
                    points.push(SweepPoint {
                        angle_deg,
                        bpm: bpm as f64,
                        distance: distance as f64,
                        deviation: mean,
                    });
                }
            }
        }
    }

    Ok(points)
}

/// Least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
}

/// `None` when fewer than two points exist or x has no spread.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<Regression> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = xs.iter().zip(ys.iter()).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();

    let slope = sxy / sxx;
    Some(Regression { slope, intercept: mean_y - slope * mean_x })
}

/// Per-angle growth of deviation with note velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillSlope {
    /// Pattern turn angle (degrees)
    pub angle_deg: f64,
    /// Regression slope of deviation vs velocity, scaled to ms at 95% CI
    pub slope_ms: f64,
    /// Standard error of the slope at 95% CI, same scale. `None` when the
    /// cell count is too small or the fit is degenerate.
    pub stderr_95_ms: Option<f64>,
}

/// Summarize sweep points into one slope per angle. Angles whose regression
/// is degenerate are skipped.
pub fn skill_slopes(points: &[SweepPoint]) -> Vec<SkillSlope> {
    let mut angles: Vec<f64> = Vec::new();
    for point in points {
        if !angles.iter().any(|&a| a == point.angle_deg) {
            angles.push(point.angle_deg);
        }
    }
    angles.sort_by(|a, b| a.total_cmp(b));

    let mut slopes = Vec::with_capacity(angles.len());
    for angle_deg in angles {
        let selected: Vec<&SweepPoint> =
            points.iter().filter(|p| p.angle_deg == angle_deg).collect();

        // Note velocity in px/s
        let velocities: Vec<f64> = selected.iter().map(|p| p.distance * p.bpm / 60.0).collect();
        let deviations: Vec<f64> = selected.iter().map(|p| p.deviation).collect();

        let Some(fit) = linear_regression(&velocities, &deviations) else {
            continue;
        };
        let slope_ms = fit.slope * 2.0 * 1000.0;

        let stderr_95_ms = slope_stderr_95(&velocities, &deviations, &fit).map(|se| se * 2.0 * 1000.0);
        slopes.push(SkillSlope { angle_deg, slope_ms, stderr_95_ms });
    }
    slopes
}

/// Standard error of the regression slope at the 95% confidence interval,
/// from the spread of the data around the fitted model on both axes.
fn slope_stderr_95(xs: &[f64], ys: &[f64], fit: &Regression) -> Option<f64> {
    let n = xs.len();
    if n <= 2 || fit.slope == 0.0 {
        return None;
    }

    let residual_y: Vec<f64> =
        xs.iter().zip(ys).map(|(x, y)| y - (fit.slope * x + fit.intercept)).collect();
    let residual_x: Vec<f64> =
        xs.iter().zip(ys).map(|(x, y)| x - (y - fit.intercept) / fit.slope).collect();

    let dev_y = population_stddev(&residual_y);
    let dev_x = population_stddev(&residual_x);
    if dev_x == 0.0 {
        return None;
    }

    Some((dev_y / dev_x) / ((n - 2) as f64).sqrt() * 1.96)
}

fn population_stddev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Everything a visualization layer needs to render one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayDump {
    pub config: BehaviorConfig,
    pub pattern: PatternSpec,
    pub targets: Vec<Target>,
    pub replay: Vec<ReplaySample>,
}

/// Run one pattern and capture the full trace for external rendering.
pub fn run_single(
    spec: &PatternSpec,
    config: &BehaviorConfig,
    rng: &mut impl Rng,
) -> Result<ReplayDump> {
    let targets = spec.generate();
    let replay = simulate(&targets, config, RecordMode::FullTrace, rng)?;
    Ok(ReplayDump { config: *config, pattern: *spec, targets, replay })
}
