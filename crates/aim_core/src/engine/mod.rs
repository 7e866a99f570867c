//! Fixed-timestep player simulation engine.

pub mod simulator;
pub mod timestep;

pub use simulator::{simulate, RecordMode};
pub use timestep::{TimeDomain, SIM_STEP_MS};
