//! Frame-by-frame synthesis of a spinning mass bending a background field.
//!
//! A [`LensRenderer`] owns a [`FieldModel`] and a [`SampleGrid`]; each call to
//! [`LensRenderer::render`] turns a rotation phase into an N×N intensity frame
//! in `[0, 2]`. Colorizing and encoding frames is left to consumers such as
//! [`palette::Palette`] and the `lens_animation` binary.

pub mod error;
pub mod grid;
pub mod palette;
pub mod physics;
pub mod renderer;
pub mod schedule;

pub use crate::error::ConfigError;
pub use crate::grid::SampleGrid;
pub use crate::physics::{FieldModel, PhysicalParameters};
pub use crate::renderer::LensRenderer;
pub use crate::schedule::PhaseSchedule;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensConfig {
    pub mass: f64,
    pub spin: f64,
    pub resolution: usize,
    pub extent: f64,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            mass: 2.0,
            spin: 0.8,
            resolution: 200,
            extent: 8.0,
        }
    }
}

impl LensConfig {
    pub fn build(&self) -> Result<LensRenderer, ConfigError> {
        LensRenderer::from_config(self)
    }
}
