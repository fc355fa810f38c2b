//! Radial attenuation factors for finite beams.
//!
//! Each factor multiplies the axial term and tends to 1 for a beam much wider
//! than the diffusion length `sqrt(4 alpha t)`.

use retina_therm_special::marcum_q::MarcumQ;

use crate::config::BeamProfile;

/// Radial factor of `profile` at radius `r` (cm) and time `t` (s).
///
/// - Flat-top disk of radius `R`: `1 - Q_1(r / sigma, R / sigma)` with
///   `sigma = sqrt(2 alpha t)`, which reduces on axis to
///   `1 - exp(-R^2 / (4 alpha t))`. At `t = 0` it is the disk indicator, with
///   1/2 on the rim.
/// - Gaussian with 1/e radius `R`:
///   `R^2 / (R^2 + 4 alpha t) * exp(-r^2 / (R^2 + 4 alpha t))`.
pub(super) fn factor(
    profile: &BeamProfile,
    r: f64,
    t: f64,
    alpha: f64,
    marcum: &impl MarcumQ,
) -> f64 {
    match profile {
        BeamProfile::OneD => 1.0,
        BeamProfile::FlatTop { radius } => {
            flat_top(radius.into_inner(), r.abs(), t, alpha, marcum)
        }
        BeamProfile::Gaussian { radius } => gaussian(radius.into_inner(), r, t.max(0.0), alpha),
    }
}

fn flat_top(radius: f64, r: f64, t: f64, alpha: f64, marcum: &impl MarcumQ) -> f64 {
    if t <= 0.0 {
        return if r < radius {
            1.0
        } else if r > radius {
            0.0
        } else {
            0.5
        };
    }
    #[allow(clippy::float_cmp)]
    if r == 0.0 {
        return -(-radius * radius / (4.0 * alpha * t)).exp_m1();
    }
    let sigma = (2.0 * alpha * t).sqrt();
    1.0 - marcum.q(1.0, r / sigma, radius / sigma)
}

fn gaussian(radius: f64, r: f64, t: f64, alpha: f64) -> f64 {
    let spread = radius * radius + 4.0 * alpha * t;
    radius * radius / spread * (-r * r / spread).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use retina_therm_special::marcum_q::MarcumQFunction;

    const ALPHA: f64 = 1.5e-3;

    fn flat(radius: f64) -> BeamProfile {
        BeamProfile::flat_top(radius).unwrap()
    }

    #[test]
    fn infinite_beam_has_no_radial_dependence() {
        let q = MarcumQFunction::new();
        assert_relative_eq!(factor(&BeamProfile::OneD, 10.0, 1.0, ALPHA, &q), 1.0);
    }

    #[test]
    fn flat_top_on_axis_closed_form() {
        let q = MarcumQFunction::new();
        let value = factor(&flat(1.0), 0.0, 1.0, 1.0, &q);
        assert_relative_eq!(value, 1.0 - (-0.25f64).exp(), epsilon = 1e-15);
    }

    #[test]
    fn flat_top_off_axis_is_continuous_at_the_axis() {
        let q = MarcumQFunction::new();
        let beam = flat(0.01);
        let on_axis = factor(&beam, 0.0, 0.05, ALPHA, &q);
        let near_axis = factor(&beam, 1e-7, 0.05, ALPHA, &q);
        assert_relative_eq!(near_axis, on_axis, max_relative = 1e-8);
    }

    #[test]
    fn flat_top_at_onset_is_the_disk() {
        let q = MarcumQFunction::new();
        let beam = flat(0.01);
        assert_relative_eq!(factor(&beam, 0.005, 0.0, ALPHA, &q), 1.0);
        assert_relative_eq!(factor(&beam, 0.01, 0.0, ALPHA, &q), 0.5);
        assert_relative_eq!(factor(&beam, 0.02, 0.0, ALPHA, &q), 0.0);
    }

    #[test]
    fn flat_top_decreases_outward_and_in_time() {
        let q = MarcumQFunction::new();
        let beam = flat(0.01);
        let inside = factor(&beam, 0.002, 0.01, ALPHA, &q);
        let rim = factor(&beam, 0.01, 0.01, ALPHA, &q);
        let outside = factor(&beam, 0.02, 0.01, ALPHA, &q);
        assert!(inside > rim && rim > outside && outside > 0.0);

        let later = factor(&beam, 0.002, 1.0, ALPHA, &q);
        assert!(later < inside);
    }

    #[test]
    fn gaussian_spreads_with_diffusion() {
        let q = MarcumQFunction::new();
        let beam = BeamProfile::gaussian(0.01).unwrap();
        assert_relative_eq!(factor(&beam, 0.0, 0.0, ALPHA, &q), 1.0);
        assert_relative_eq!(factor(&beam, 0.01, 0.0, ALPHA, &q), (-1.0f64).exp());

        // R^2 = 4 alpha t halves the on-axis factor.
        let t = 1e-4 / (4.0 * ALPHA);
        assert_relative_eq!(factor(&beam, 0.0, t, ALPHA, &q), 0.5, epsilon = 1e-15);
        assert_relative_eq!(
            factor(&beam, 0.01, t, ALPHA, &q),
            0.5 * (-0.5f64).exp(),
            epsilon = 1e-15
        );
    }
}
