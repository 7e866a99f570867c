//! Player behavior simulation engine.
//!
//! Converts a target sequence into a synthetic input trace by stepping a
//! player model in fixed 3 ms ticks. The model has three independently
//! lagging progress pointers over the target sequence:
//!
//! - `read_idx` - the target currently being read (perception),
//! - `aim_idx` - the target currently being aimed,
//! - `tap_idx` - the tap deadline currently being waited on.
//!
//! Perception fires on a stochastic interval and corrects cursor velocity
//! when the extrapolated trajectory is judged to miss; taps fire on
//! pre-drawn jittered deadlines independent of where the cursor is.
//!
//! All randomness flows through the caller-provided `Rng`, so a seeded
//! stream reproduces a run exactly.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BehaviorConfig;
use crate::engine::timestep::{TimeDomain, SIM_STEP_MS};
use crate::error::{Result, SimError};
use crate::models::{ReplaySample, TapState, Target};

/// What the engine records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordMode {
    /// One row per target, each a tap event.
    HitsOnly,
    /// One row per simulated tick: a tap event or a plain cursor-position
    /// row with state `None` - never both.
    FullTrace,
}

/// Draw from `Normal(mean, sigma)`, degenerating to `mean` when the scale
/// is zero or invalid. Keeps zero-width draws out of the distribution code.
fn sample_normal(rng: &mut impl Rng, mean: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return mean;
    }
    match Normal::new(mean, sigma) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    }
}

/// Next perception interval in whole ms.
fn draw_read_period(config: &BehaviorConfig, rng: &mut impl Rng) -> i64 {
    if config.read_latency_stddev == 0.0 {
        config.mean_read_latency as i64
    } else {
        sample_normal(rng, config.mean_read_latency, config.read_latency_stddev) as i64
    }
}

/// Velocity the player actually applies after deciding on `target_vel`:
/// the intended value plus multiplicative misjudgment noise.
fn jittered_velocity(target_vel: f64, velocity_deviation: f64, rng: &mut impl Rng) -> f64 {
    if velocity_deviation == 0.0 {
        return target_vel;
    }
    sample_normal(rng, target_vel, target_vel.abs() * 0.05 * velocity_deviation)
}

/// Pre-drawn tap deadlines, consumed in ascending order.
///
/// Each target contributes one deadline: its nominal time plus
/// `Normal(0, tap_deviation)` jitter, truncated to whole ms. The deadlines
/// are then globally re-sorted, so a tap event is classified against
/// whichever target `tap_idx` currently points to, not necessarily the
/// target whose jitter produced that deadline. If two sorted deadlines land
/// inside one tick window the second never fires and the pointer stalls.
struct TapSchedule {
    deadlines_ms: Vec<i64>,
    tap_idx: usize,
    deadline_ms: i64,
    /// Deadline classified as abnormally late for its matched target.
    late: bool,
}

impl TapSchedule {
    fn new(targets: &[Target], config: &BehaviorConfig, rng: &mut impl Rng) -> Self {
        let mut deadlines_ms: Vec<i64> = targets
            .iter()
            .map(|target| {
                let jitter = sample_normal(rng, 0.0, config.tap_deviation);
                (1000.0 * target.time + jitter) as i64
            })
            .collect();
        deadlines_ms.sort_unstable();

        let mut schedule = Self { deadlines_ms, tap_idx: 0, deadline_ms: 0, late: false };
        schedule.reload(targets);
        schedule
    }

    /// Refresh the active deadline and its early/late classification.
    fn reload(&mut self, targets: &[Target]) {
        self.deadline_ms = self.deadlines_ms[self.tap_idx];
        // Late when the matched target's nominal time is more than 100 ms
        // earlier than the deadline that will fire for it.
        self.late = 1000.0 * targets[self.tap_idx].time < (self.deadline_ms - 100) as f64;
    }

    /// True when tick `t` enters the half-tick window around the deadline.
    fn fires_at(&self, t: i64) -> bool {
        let half_step = SIM_STEP_MS as f64 / 2.0;
        let t = t as f64;
        let deadline = self.deadline_ms as f64;
        t >= deadline - half_step && t < deadline + half_step
    }

    /// Move to the next deadline, strictly one target per tap event.
    fn advance(&mut self, targets: &[Target]) {
        if self.tap_idx < targets.len() - 1 {
            self.tap_idx += 1;
            self.reload(targets);
        }
    }
}

/// Mutable state scoped to one run. Discarded at run end; nothing is shared
/// across `simulate` calls except the caller's RNG.
struct SimulationState {
    cursor_x: f64,
    cursor_y: f64,
    vel_x: f64,
    vel_y: f64,
    read_idx: usize,
    aim_idx: usize,
    last_read_ms: i64,
    read_period_ms: i64,
}

impl SimulationState {
    fn new(targets: &[Target], config: &BehaviorConfig, rng: &mut impl Rng) -> Self {
        Self {
            cursor_x: targets[0].x,
            cursor_y: targets[0].y,
            vel_x: 0.0,
            vel_y: 0.0,
            read_idx: 0,
            aim_idx: 0,
            last_read_ms: 0,
            read_period_ms: draw_read_period(config, rng),
        }
    }

    /// Perception update. Runs only when the current read period has
    /// elapsed; redraws the period, advances the read pointer, judges the
    /// current trajectory and applies a (jittered) corrective velocity.
    fn perceive(
        &mut self,
        targets: &[Target],
        config: &BehaviorConfig,
        t: i64,
        rng: &mut impl Rng,
    ) {
        if t - self.last_read_ms < self.read_period_ms {
            return;
        }
        self.read_period_ms = draw_read_period(config, rng);
        self.last_read_ms = t;

        // Advance to the first target still readable in adequate time.
        // Never reads past the last target, and never outruns the target
        // still being aimed.
        let (read_x, read_y, time_to_note) = loop {
            let target = &targets[self.read_idx];
            let time_to_note = 1000.0 * target.time - t as f64;

            if time_to_note >= self.read_period_ms as f64
                || self.read_idx >= targets.len() - 1
                || self.read_idx >= self.aim_idx
            {
                break (target.x, target.y, time_to_note);
            }
            self.read_idx += 1;
        };
        // The read pointer never outruns the aim pointer.
        debug_assert!(self.read_idx <= self.aim_idx);

        // Judge whether the current velocity reaches the note: extrapolate
        // to the note time and compare per axis against a tolerance that
        // widens with cursor speed - the player cannot perceive small
        // positional errors while moving fast.
        let future_x = self.cursor_x + self.vel_x * time_to_note;
        let future_y = self.cursor_y + self.vel_y * time_to_note;
        let tolerance_x = (config.circle_radius / 2.0) * 4.0 * self.vel_x.abs();
        let tolerance_y = (config.circle_radius / 2.0) * 4.0 * self.vel_y.abs();

        let off_course = future_x < read_x - tolerance_x
            || future_x > read_x + tolerance_x
            || future_y < read_y - tolerance_y
            || future_y > read_y + tolerance_y;

        let (target_vel_x, target_vel_y) = if off_course {
            if time_to_note == 0.0 {
                // No time left to correct in; stop instead of dividing by zero
                (0.0, 0.0)
            } else {
                (
                    (read_x - self.cursor_x) / time_to_note,
                    (read_y - self.cursor_y) / time_to_note,
                )
            }
        } else {
            // Trajectory perceived adequate, keep going
            (self.vel_x, self.vel_y)
        };

        self.vel_x = jittered_velocity(target_vel_x, config.velocity_deviation, rng);
        self.vel_y = jittered_velocity(target_vel_y, config.velocity_deviation, rng);
    }

    /// Once simulated time passes the aimed target, focus the next one.
    fn advance_aim(&mut self, targets: &[Target], t: i64) {
        if t as f64 > 1000.0 * targets[self.aim_idx].time && self.aim_idx < targets.len() - 1 {
            self.aim_idx += 1;
        }
    }

    /// Explicit Euler step.
    fn integrate(&mut self) {
        self.cursor_x += self.vel_x * SIM_STEP_MS as f64;
        self.cursor_y += self.vel_y * SIM_STEP_MS as f64;
    }

    fn sample_at(&self, t: i64, state: TapState) -> ReplaySample {
        ReplaySample {
            time: t as f64 / 1000.0,
            // whole-pixel recording
            x: self.cursor_x.trunc(),
            y: self.cursor_y.trunc(),
            state,
        }
    }
}

/// Simulate a player over `targets`, producing a replay.
///
/// Deterministic given a fixed random stream; fails only on malformed
/// input (fewer than two targets, invalid config).
pub fn simulate(
    targets: &[Target],
    config: &BehaviorConfig,
    mode: RecordMode,
    rng: &mut impl Rng,
) -> Result<Vec<ReplaySample>> {
    if targets.len() < 2 {
        return Err(SimError::TooFewTargets { found: targets.len() });
    }
    config.validate()?;

    let domain = TimeDomain::for_targets(targets, config);
    let mut replay = match mode {
        RecordMode::HitsOnly => vec![ReplaySample::default(); targets.len()],
        RecordMode::FullTrace => vec![ReplaySample::default(); domain.tick_count()],
    };

    let mut state = SimulationState::new(targets, config, rng);
    let mut taps = TapSchedule::new(targets, config, rng);

    debug!(
        targets = targets.len(),
        ticks = domain.tick_count(),
        start_ms = domain.start_ms,
        end_ms = domain.end_ms,
        "starting player simulation"
    );

    // Monotonic write cursor; a tick emits a tap row or (in full-trace
    // mode) a cursor row, never both.
    let mut write_idx = 0usize;

    for t in domain.ticks() {
        state.perceive(targets, config, t, rng);
        state.advance_aim(targets, t);
        state.integrate();

        if taps.fires_at(t) {
            let tap_state = if taps.late { TapState::Miss } else { TapState::Hit };
            replay[write_idx] = state.sample_at(t, tap_state);
            taps.advance(targets);
            write_idx += 1;
        } else if mode == RecordMode::FullTrace {
            replay[write_idx] = state.sample_at(t, TapState::None);
            write_idx += 1;
        }
    }

    debug!(rows = write_idx, "simulation finished");
    Ok(replay)
}
