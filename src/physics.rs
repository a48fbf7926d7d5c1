use glam::DVec2;

use crate::error::ConfigError;

/// Smallest radius used as a divisor anywhere in the field model.
pub const RADIUS_FLOOR: f64 = 0.1;
/// Floor applied to `1 - rs/r` before the square root / reciprocal.
pub const METRIC_FLOOR: f64 = 0.01;
pub const DOPPLER_MIN: f64 = 0.3;
pub const DOPPLER_MAX: f64 = 2.0;

/// Radial distance from the origin, `sqrt(x² + y²)`.
pub fn radius(x: f64, y: f64) -> f64 {
    (x * x + y * y).sqrt()
}

/// Mass, spin and the derived horizon radius of the lensing body.
///
/// Only [`PhysicalParameters::new`] builds one, so `rs = 2 * mass > 0` holds
/// for every value in circulation.
///
/// ```compile_fail
/// let params = lensing::PhysicalParameters {
///     mass: f64::NAN,
///     spin: 0.8,
///     a: f64::NAN,
///     rs: f64::NAN,
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalParameters {
    mass: f64,
    spin: f64,
    a: f64,
    rs: f64,
}

impl PhysicalParameters {
    pub fn new(mass: f64, spin: f64) -> Result<Self, ConfigError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        if !(0.0..1.0).contains(&spin) {
            return Err(ConfigError::SpinOutOfRange(spin));
        }

        Ok(Self {
            mass,
            spin,
            a: spin * mass,
            rs: 2.0 * mass,
        })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }

    /// Angular momentum per unit mass, `spin * mass`.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Horizon radius, `2 * mass`.
    pub fn rs(&self) -> f64 {
        self.rs
    }

    pub fn photon_sphere_radius(&self) -> f64 {
        1.5 * self.rs
    }
}

/// Closed-form field quantities around the body.
///
/// Every method is pure. Singular inputs (the origin, radii at or inside the
/// horizon) are handled with the floors and clamps above, never with errors.
#[derive(Clone, Copy, Debug)]
pub struct FieldModel {
    params: PhysicalParameters,
}

impl FieldModel {
    pub fn new(params: PhysicalParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Returns `(time_dilation, spatial_curvature)` at radius `r`.
    ///
    /// Only the time dilation feeds compositing; the curvature term is kept
    /// for callers that want to visualise it.
    pub fn time_dilation_and_curvature(&self, r: f64) -> (f64, f64) {
        let metric = (1.0 - self.params.rs / r).max(METRIC_FLOOR);
        (metric.sqrt(), 1.0 / metric)
    }

    pub fn time_dilation(&self, r: f64) -> f64 {
        self.time_dilation_and_curvature(r).0
    }

    /// Tangential offset of a ray arriving at `(x, y)`, magnitude `4M/r`.
    pub fn deflection(&self, x: f64, y: f64) -> DVec2 {
        let r = radius(x, y).max(RADIUS_FLOOR);
        let strength = 4.0 * self.params.mass / r;

        // perpendicular to the radial direction
        DVec2::new(-strength * (y / r), strength * (x / r))
    }

    /// Beaming factor from frame-dragged azimuthal motion.
    pub fn doppler_factor(&self, x: f64, y: f64, rotation_phase: f64) -> f64 {
        let mass = self.params.mass;
        let a = self.params.a;
        let r = radius(x, y).max(RADIUS_FLOOR);

        let omega_drag = 2.0 * mass * a / (r.powf(3.0) + a * a * r);
        let v_phi = omega_drag * r;
        let phi = y.atan2(x);

        let raw = 1.0 / (1.0 + v_phi * (phi + rotation_phase).sin());
        // a vanishing denominator gives +-inf, which the clamp still bounds
        raw.clamp(DOPPLER_MIN, DOPPLER_MAX)
    }

    /// Focusing gain outside the horizon, `1 + 2M/r²`; unity at or inside it.
    pub fn brightening(&self, r: f64) -> f64 {
        if r > self.params.rs {
            1.0 + 2.0 * self.params.mass / (r * r)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn reference_model() -> FieldModel {
        FieldModel::new(PhysicalParameters::new(2.0, 0.8).unwrap())
    }

    #[test]
    fn test_derived_parameters() {
        let params = PhysicalParameters::new(2.0, 0.8).unwrap();
        assert_relative_eq!(params.mass(), 2.0);
        assert_relative_eq!(params.spin(), 0.8);
        assert_relative_eq!(params.a(), 1.6, epsilon = 1e-12);
        assert_relative_eq!(params.rs(), 4.0);
        assert_relative_eq!(params.photon_sphere_radius(), 6.0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            PhysicalParameters::new(0.0, 0.5),
            Err(ConfigError::NonPositiveMass(0.0))
        );
        assert_eq!(
            PhysicalParameters::new(-1.0, 0.5),
            Err(ConfigError::NonPositiveMass(-1.0))
        );
        assert!(matches!(
            PhysicalParameters::new(f64::NAN, 0.5),
            Err(ConfigError::NonPositiveMass(_))
        ));
        assert_eq!(
            PhysicalParameters::new(1.0, 1.0),
            Err(ConfigError::SpinOutOfRange(1.0))
        );
        assert_eq!(
            PhysicalParameters::new(1.0, -0.1),
            Err(ConfigError::SpinOutOfRange(-0.1))
        );
        assert!(PhysicalParameters::new(1.0, 0.0).is_ok());
    }

    #[test]
    fn test_constructed_parameters_keep_horizon_invariant() {
        // construction is the only way in, so every accepted set has rs = 2M > 0
        for &(mass, spin) in &[(1e-6, 0.0), (0.5, 0.3), (2.0, 0.8), (1e6, 0.999)] {
            let params = PhysicalParameters::new(mass, spin).unwrap();
            assert!(params.rs() > 0.0);
            assert_eq!(params.rs(), 2.0 * params.mass());
            assert_eq!(params.a(), spin * mass);
        }

        for &(mass, spin) in &[
            (f64::NAN, 0.8),
            (f64::INFINITY, 0.8),
            (-2.0, 0.8),
            (2.0, f64::NAN),
            (2.0, 1.0),
        ] {
            assert!(PhysicalParameters::new(mass, spin).is_err());
        }
    }

    #[test]
    fn test_radius_is_euclidean_norm() {
        assert_eq!(radius(3.0, 4.0), 5.0);
        assert_eq!(radius(0.0, 0.0), 0.0);
        let (x, y): (f64, f64) = (0.3, -7.1);
        assert_eq!(radius(x, y), (x * x + y * y).sqrt());
    }

    #[test]
    fn test_time_dilation_bounds_and_monotonicity() {
        let model = reference_model();
        let mut previous = 0.0;
        for i in 1..2000 {
            let r = i as f64 * 0.01;
            let (td, curvature) = model.time_dilation_and_curvature(r);
            assert!(td >= METRIC_FLOOR.sqrt() - 1e-15 && td <= 1.0, "td {td} at r {r}");
            assert!(curvature >= 1.0 && curvature <= 1.0 / METRIC_FLOOR);
            assert!(td >= previous, "time dilation decreased at r = {r}");
            previous = td;
        }
    }

    #[test]
    fn test_time_dilation_floor_inside_horizon() {
        let model = reference_model();
        let (td, curvature) = model.time_dilation_and_curvature(1.0);
        assert_relative_eq!(td, 0.1, epsilon = 1e-12);
        assert_relative_eq!(curvature, 100.0, epsilon = 1e-9);

        let (td_far, _) = model.time_dilation_and_curvature(1.0e9);
        assert_relative_eq!(td_far, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_deflection_is_tangential() {
        let model = reference_model();
        let d = model.deflection(3.0, 4.0);
        // r = 5, strength = 8/5
        assert_relative_eq!(d.x, -1.6 * 0.8, epsilon = 1e-12);
        assert_relative_eq!(d.y, 1.6 * 0.6, epsilon = 1e-12);
        assert_relative_eq!(d.dot(DVec2::new(3.0, 4.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deflection_falls_off_with_radius() {
        let model = reference_model();
        let mut previous = f64::INFINITY;
        for i in 1..100 {
            let r = 0.1 + i as f64 * 0.25;
            let magnitude = model.deflection(r * 0.6, r * 0.8).length();
            assert!(magnitude < previous);
            previous = magnitude;
        }
    }

    #[test]
    fn test_deflection_finite_at_origin() {
        let model = reference_model();
        let d = model.deflection(0.0, 0.0);
        assert!(d.x.is_finite() && d.y.is_finite());
        assert_eq!(d, DVec2::ZERO);

        let near = model.deflection(0.0, 1e-9);
        assert!(near.is_finite());
        assert!(near.length() <= 4.0 * 2.0 / RADIUS_FLOOR + 1e-9);
    }

    #[test]
    fn test_doppler_factor_bounded_everywhere() {
        let model = reference_model();
        let coords = [-8.0, -1.0, -1e-6, 0.0, 1e-6, 0.05, 0.5, 3.0, 8.0];
        for &x in &coords {
            for &y in &coords {
                for k in 0..16 {
                    let phase = k as f64 * PI / 8.0;
                    let factor = model.doppler_factor(x, y, phase);
                    assert!(
                        (DOPPLER_MIN..=DOPPLER_MAX).contains(&factor),
                        "doppler {factor} at ({x}, {y}, {phase})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_doppler_neutral_without_spin() {
        let model = FieldModel::new(PhysicalParameters::new(2.0, 0.0).unwrap());
        assert_relative_eq!(model.doppler_factor(5.0, 1.0, 0.3), 1.0);
    }

    #[test]
    fn test_doppler_value() {
        let model = reference_model();
        // on the +y axis, phi = pi/2, phase 0 -> sin = 1
        let r: f64 = 6.0;
        let omega = 2.0 * 2.0 * 1.6 / (r.powf(3.0) + 1.6 * 1.6 * r);
        let expected = 1.0 / (1.0 + omega * r);
        assert_relative_eq!(model.doppler_factor(0.0, 6.0, 0.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_brightening() {
        let model = reference_model();
        assert_relative_eq!(model.brightening(4.0), 1.0);
        assert_relative_eq!(model.brightening(2.0), 1.0);
        assert_relative_eq!(model.brightening(5.0), 1.0 + 4.0 / 25.0);
    }
}
