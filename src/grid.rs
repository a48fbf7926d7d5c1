use glam::DVec2;
use ndarray::{Array1, Array2};

use crate::error::ConfigError;
use crate::physics::radius;

/// Fixed square sample grid over `[-extent, extent]²` with its cached
/// background field.
///
/// Row index follows the y axis and column index the x axis, so
/// `background[[row, col]]` is the value at `(x_axis[col], y_axis[row])`.
/// Nothing here changes after construction; a different resolution means a
/// new grid.
#[derive(Clone, Debug)]
pub struct SampleGrid {
    extent: f64,
    resolution: usize,
    x_axis: Array1<f64>,
    y_axis: Array1<f64>,
    radius: Array2<f64>,
    background: Array2<f64>,
}

impl SampleGrid {
    pub fn new(extent: f64, resolution: usize) -> Result<Self, ConfigError> {
        if !extent.is_finite() || extent <= 0.0 {
            return Err(ConfigError::NonPositiveExtent(extent));
        }
        if resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }

        let x_axis = Array1::linspace(-extent, extent, resolution);
        let y_axis = x_axis.clone();

        let radii = Array2::from_shape_fn((resolution, resolution), |(row, col)| {
            radius(x_axis[col], y_axis[row])
        });
        let background = Array2::from_shape_fn((resolution, resolution), |(row, col)| {
            background_pattern(x_axis[col], y_axis[row])
        });

        log::debug!(
            "sample grid {}x{} over [-{extent}, {extent}]",
            resolution,
            resolution
        );

        Ok(Self {
            extent,
            resolution,
            x_axis,
            y_axis,
            radius: radii,
            background,
        })
    }

    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn x_axis(&self) -> &Array1<f64> {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Array1<f64> {
        &self.y_axis
    }

    pub fn radius(&self) -> &Array2<f64> {
        &self.radius
    }

    pub fn background(&self) -> &Array2<f64> {
        &self.background
    }

    pub fn position(&self, row: usize, col: usize) -> DVec2 {
        DVec2::new(self.x_axis[col], self.y_axis[row])
    }

    /// Map one coordinate onto a cell index by truncation.
    ///
    /// Returns `None` when the coordinate is not strictly inside
    /// `(-extent, extent)` or the truncated index leaves `[0, N)`.
    pub fn index_of(&self, coord: f64) -> Option<usize> {
        if !(coord.abs() < self.extent) {
            return None;
        }
        let scaled = (coord + self.extent) * self.resolution as f64 / (2.0 * self.extent);
        let index = scaled.trunc();
        if index >= 0.0 && index < self.resolution as f64 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// Nearest-index background lookup, no interpolation.
    pub fn sample(&self, source: DVec2) -> Option<f64> {
        let col = self.index_of(source.x)?;
        let row = self.index_of(source.y)?;
        Some(self.background[[row, col]])
    }
}

/// Procedural background: two sinusoidal gratings plus a faint radial ripple.
pub fn background_pattern(x: f64, y: f64) -> f64 {
    let grid_freq = 8.0;
    let pattern1 = (x * grid_freq).sin() * (y * grid_freq).sin();
    let pattern2 = (x * grid_freq * 0.7).sin() * (y * grid_freq * 1.3).cos();
    let r = radius(x, y);
    let radial = (r * 2.0).sin() * (-r / 10.0).exp();

    0.5 + 0.3 * pattern1 + 0.2 * pattern2 + 0.2 * radial
}
