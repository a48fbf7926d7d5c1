use crate::error::ConfigError;

/// Monotonic rotation phases for an animation, `phase = frame * step`.
///
/// The renderer has no frame counter of its own; whoever drives it owns the
/// phase sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSchedule {
    frames: usize,
    step: f64,
}

impl PhaseSchedule {
    pub fn new(frames: usize, step: f64) -> Result<Self, ConfigError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::NonPositivePhaseStep(step));
        }
        Ok(Self { frames, step })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn phase(&self, frame: usize) -> f64 {
        frame as f64 * self.step
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.frames).map(move |frame| (frame, self.phase(frame)))
    }
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self {
            frames: 400,
            step: 0.05,
        }
    }
}
