use thiserror::Error;

/// Construction-time contract violations.
///
/// Near-singular numerics (r close to 0 or to the horizon) are never reported
/// here; the field model guards those with floors and clamps instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("mass must be finite and positive, got {0}")]
    NonPositiveMass(f64),
    #[error("spin must lie in [0, 1), got {0}")]
    SpinOutOfRange(f64),
    #[error("grid resolution must be at least 1")]
    ZeroResolution,
    #[error("grid extent must be finite and positive, got {0}")]
    NonPositiveExtent(f64),
    #[error("phase step must be finite and positive, got {0}")]
    NonPositivePhaseStep(f64),
}
