use thiserror::Error;

/// Precondition violations surfaced to the caller. Numerical edge cases
/// (zero time-to-target, degenerate vectors, zero-scale draws) never reach
/// this type; they are handled by explicit fallback guards at the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("target sequence too short: need at least 2 targets, found {found}")]
    TooFewTargets { found: usize },

    #[error("target/replay length mismatch: {targets} targets vs {replay} replay samples")]
    LengthMismatch { targets: usize, replay: usize },

    #[error("invalid behavior config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
