use glam::DVec2;
use ndarray::{Array2, Zip};

use crate::error::ConfigError;
use crate::grid::SampleGrid;
use crate::physics::{radius, FieldModel, PhysicalParameters};
use crate::LensConfig;

/// Cells closer than this multiple of rs are dark before compositing.
pub const HORIZON_MARGIN: f64 = 1.1;
/// Upper bound of every composited intensity.
pub const MAX_INTENSITY: f64 = 2.0;

const RING_WIDTH: f64 = 0.5;
const RING_PEAK: f64 = 2.0;
const RING_LOBES: f64 = 3.0;
const RING_SPEEDUP: f64 = 4.0;

/// Per-frame quantities shared by every cell.
#[derive(Clone, Copy, Debug)]
struct FrameTerms {
    phase: f64,
    rotation: DVec2,
}

impl FrameTerms {
    fn new(phase: f64) -> Self {
        Self {
            phase,
            rotation: DVec2::from_angle(phase),
        }
    }
}

/// Turns a rotation phase into a finished intensity frame.
///
/// The field model and the sample grid are fixed at construction and only
/// read while rendering, so one renderer may be shared across threads.
/// `render` keeps no state between calls: the same phase always produces the
/// same frame.
#[derive(Clone, Debug)]
pub struct LensRenderer {
    field: FieldModel,
    grid: SampleGrid,
}

impl LensRenderer {
    pub fn new(
        mass: f64,
        spin: f64,
        resolution: usize,
        extent: f64,
    ) -> Result<Self, ConfigError> {
        let params = PhysicalParameters::new(mass, spin)?;
        let grid = SampleGrid::new(extent, resolution)?;

        log::debug!(
            "lens renderer: mass {mass}, spin {spin}, rs {}, grid {resolution}",
            params.rs()
        );

        Ok(Self::from_parts(FieldModel::new(params), grid))
    }

    pub fn from_config(config: &LensConfig) -> Result<Self, ConfigError> {
        Self::new(config.mass, config.spin, config.resolution, config.extent)
    }

    pub fn from_parts(field: FieldModel, grid: SampleGrid) -> Self {
        Self { field, grid }
    }

    pub fn field(&self) -> &FieldModel {
        &self.field
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Render one frame into a freshly allocated N×N array.
    pub fn render(&self, rotation_phase: f64) -> Array2<f64> {
        let n = self.grid.resolution();
        let mut frame = Array2::zeros((n, n));
        self.render_into(rotation_phase, &mut frame);
        frame
    }

    /// Render one frame into a caller-owned scratch buffer.
    ///
    /// The buffer is reallocated if its shape does not match the grid. Its
    /// contents are the frame for `rotation_phase` until the next call.
    pub fn render_into(&self, rotation_phase: f64, frame: &mut Array2<f64>) {
        let n = self.grid.resolution();
        if frame.dim() != (n, n) {
            *frame = Array2::zeros((n, n));
        }

        let terms = FrameTerms::new(rotation_phase);
        Zip::indexed(frame).par_for_each(|(row, col), value| {
            *value = self.shade(row, col, &terms);
        });
    }

    fn shade(&self, row: usize, col: usize, terms: &FrameTerms) -> f64 {
        let r = self.grid.radius()[[row, col]];
        if r <= self.field.params().rs() {
            return 0.0;
        }

        let position = self.grid.position(row, col);
        let lensed = self.lensed_value(position, r, terms.rotation);
        let composited =
            self.apply_relativistic(lensed, position, terms.phase).clamp(0.0, MAX_INTENSITY);

        (composited + self.photon_ring_at(position, terms.phase)).clamp(0.0, MAX_INTENSITY)
    }

    /// Background light arriving at a cell after deflection, before any
    /// relativistic weighting. Zero inside `HORIZON_MARGIN * rs` and for
    /// sources outside the sampled domain.
    fn lensed_value(&self, position: DVec2, r: f64, rotation: DVec2) -> f64 {
        if r < self.field.params().rs() * HORIZON_MARGIN {
            return 0.0;
        }

        let deflection = rotation.rotate(self.field.deflection(position.x, position.y));
        self.grid.sample(position + deflection).unwrap_or(0.0)
    }

    /// The deflected background for the whole grid.
    pub fn lensed_background(&self, rotation_phase: f64) -> Array2<f64> {
        let rotation = DVec2::from_angle(rotation_phase);
        let n = self.grid.resolution();
        let mut image = Array2::zeros((n, n));
        Zip::indexed(&mut image).par_for_each(|(row, col), value| {
            let r = self.grid.radius()[[row, col]];
            *value = self.lensed_value(self.grid.position(row, col), r, rotation);
        });
        image
    }

    /// Weight `intensity` by time dilation, Doppler factor and focusing gain,
    /// all evaluated at the undeflected position, in that order.
    pub fn apply_relativistic(&self, intensity: f64, position: DVec2, rotation_phase: f64) -> f64 {
        let r = radius(position.x, position.y);
        let dilated = intensity * self.field.time_dilation(r);
        let beamed = dilated * self.field.doppler_factor(position.x, position.y, rotation_phase);
        beamed * self.field.brightening(r)
    }

    /// Photon-sphere emission at one position.
    pub fn photon_ring_at(&self, position: DVec2, rotation_phase: f64) -> f64 {
        let r = radius(position.x, position.y);
        let ring_distance = (r - self.field.params().photon_sphere_radius()).abs();
        let ring = (-ring_distance * ring_distance / RING_WIDTH).exp() * RING_PEAK;

        let phi = position.y.atan2(position.x);
        let shimmer = 1.0 + 0.5 * (RING_LOBES * phi + rotation_phase * RING_SPEEDUP).sin();

        ring * shimmer
    }

    /// Photon-sphere emission for the whole grid, unmasked.
    pub fn photon_ring(&self, rotation_phase: f64) -> Array2<f64> {
        let n = self.grid.resolution();
        Array2::from_shape_fn((n, n), |(row, col)| {
            self.photon_ring_at(self.grid.position(row, col), rotation_phase)
        })
    }
}
