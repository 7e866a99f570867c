//! Aim simulation CLI
//!
//! Sweep driver (tempo x distance x angle grid) and single-run replay dump
//! for external visualization.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use aim_cli::{run_single, run_sweep, skill_slopes, SweepGrid};
#[cfg(feature = "cli")]
use aim_core::{BehaviorConfig, PatternSpec};
#[cfg(feature = "cli")]
use rand::SeedableRng;
#[cfg(feature = "cli")]
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "aim_cli")]
#[command(about = "Simulate aim/tap precision across pattern parameters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RNG seed; identical seeds reproduce runs exactly
    #[arg(long, default_value = "42", global = true)]
    seed: u64,

    /// Circle size setting (determines capture radius)
    #[arg(long, default_value = "6.0", global = true)]
    cs: f64,

    /// Tap-timing jitter std-dev (ms)
    #[arg(long, default_value = "18.0", global = true)]
    tap_deviation: f64,

    /// Mean perception interval (ms)
    #[arg(long, default_value = "140.0", global = true)]
    read_latency: f64,

    /// Perception interval std-dev (ms)
    #[arg(long, default_value = "10.0", global = true)]
    read_latency_stddev: f64,

    /// Relative corrective-velocity jitter (0 disables)
    #[arg(long, default_value = "10.0", global = true)]
    velocity_deviation: f64,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Sweep deviation over a tempo x distance x angle grid
    Sweep {
        /// Tempo range start (BPM)
        #[arg(long, default_value = "120")]
        bpm_min: u32,

        /// Tempo range end, exclusive (BPM)
        #[arg(long, default_value = "480")]
        bpm_max: u32,

        #[arg(long, default_value = "50")]
        bpm_step: u32,

        /// Distance range start (px)
        #[arg(long, default_value = "50")]
        distance_min: u32,

        /// Distance range end, exclusive (px)
        #[arg(long, default_value = "510")]
        distance_max: u32,

        #[arg(long, default_value = "50")]
        distance_step: u32,

        /// Pattern turn angles in degrees (0 = stream, 180 = jump)
        #[arg(long, value_delimiter = ',', default_value = "0,180")]
        angles: Vec<f64>,

        /// Simulation runs averaged per cell
        #[arg(long, default_value = "30")]
        trials: u32,

        /// Targets per generated pattern
        #[arg(long, default_value = "30")]
        points: usize,

        /// Write sweep points and slopes as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run one pattern and dump the full replay trace as JSON
    Replay {
        /// Distance between targets (px)
        #[arg(long, default_value = "100")]
        distance: f64,

        /// Tempo (BPM)
        #[arg(long, default_value = "300")]
        bpm: f64,

        /// Turn angle per note (degrees)
        #[arg(long, default_value = "180")]
        angle: f64,

        /// Number of targets
        #[arg(long, default_value = "60")]
        points: usize,

        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = BehaviorConfig {
        circle_radius: aim_core::circle_radius_for_cs(cli.cs),
        tap_deviation: cli.tap_deviation,
        mean_read_latency: cli.read_latency,
        read_latency_stddev: cli.read_latency_stddev,
        velocity_deviation: cli.velocity_deviation,
    };
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);

    match cli.command {
        Commands::Sweep {
            bpm_min,
            bpm_max,
            bpm_step,
            distance_min,
            distance_max,
            distance_step,
            angles,
            trials,
            points,
            out,
        } => {
            let grid = SweepGrid {
                bpm_min,
                bpm_max,
                bpm_step,
                distance_min,
                distance_max,
                distance_step,
                angles_deg: angles,
                trials,
                points,
            };

            println!("Sweeping {} angle(s), seed {}...", grid.angles_deg.len(), cli.seed);
            let sweep_points = run_sweep(&grid, &config, &mut rng)?;
            let slopes = skill_slopes(&sweep_points);

            println!("\n{:>9} {:>8} {:>10} {:>12}", "angle", "bpm", "distance", "deviation");
            for point in &sweep_points {
                println!(
                    "{:>8}\u{b0} {:>8} {:>8}px {:>10.2}px",
                    point.angle_deg, point.bpm, point.distance, point.deviation
                );
            }

            println!("\nSkill slopes (deviation growth per note velocity):");
            for slope in &slopes {
                match slope.stderr_95_ms {
                    Some(se) => println!(
                        "  {:>6}\u{b0}  {:.3} ms  \u{b1}{:.3} ms @95%",
                        slope.angle_deg, slope.slope_ms, se
                    ),
                    None => println!("  {:>6}\u{b0}  {:.3} ms", slope.angle_deg, slope.slope_ms),
                }
            }

            if let Some(path) = out {
                let report = serde_json::json!({
                    "config": config,
                    "grid": grid,
                    "points": sweep_points,
                    "slopes": slopes,
                });
                std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
                println!("\nReport saved to: {}", path.display());
            }
        }

        Commands::Replay { distance, bpm, angle, points, out } => {
            let spec =
                PatternSpec::new(0.0, distance, 60.0 / bpm, angle.to_radians(), points, 1);
            let dump = run_single(&spec, &config, &mut rng)?;

            println!(
                "Simulated {} targets over {} replay frames",
                dump.targets.len(),
                dump.replay.len()
            );

            let json = serde_json::to_string_pretty(&dump)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Replay saved to: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("aim_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
