//! Retarded-field detectors.
//!
//! A detector receives one trajectory sample at a time and turns it into a
//! contribution at the observer, tagged with the observer (retarded) time at
//! which that contribution arrives:
//!
//! - far field: $t_{\text{obs}} = t - \hat{\mathbf{n}} \cdot \mathbf{r}(t)/c$,
//! - near field: $t_{\text{obs}} = t + |\mathbf{x}_{\text{obs}} - \mathbf{r}(t)|/c$.
//!
//! For $|\beta| < 1$ both mappings are strictly increasing in emitter time
//! ($dt_{\text{obs}}/dt = 1 - \hat{\mathbf{n}}\cdot\boldsymbol\beta > 0$), so
//! a time-ordered trajectory produces a time-ordered observer record. The
//! [`accumulate`] driver checks the input once and enforces exactly that.
//!
//! The far-field angular amplitude is the standard acceleration-field kernel
//! (Jackson, *Classical Electrodynamics*, 3rd ed., ch. 14)
//!
//! $$\mathbf{a}(t) = \hat{\mathbf{n}} \times \bigl[(\hat{\mathbf{n}} -
//! \boldsymbol\beta) \times \dot{\boldsymbol\beta}\bigr],$$
//!
//! divided by a power of the Doppler factor $1 - \hat{\mathbf{n}} \cdot
//! \boldsymbol\beta$ that depends on whether the detector integrates over
//! observer time (cube) or emitter time (square, one factor cancelled by the
//! Jacobian $dt_{\text{obs}} = (1 - \hat{\mathbf{n}}\cdot\boldsymbol\beta)\,dt$).

pub mod direct;
pub mod fft;
pub mod near_field;

use crate::solver::RadiationError;
use crate::types::{TrajectorySample, Vec3};

/// One-sample sink for retarded-field contributions.
///
/// Implementations are transient: one detector per direction computation,
/// created before the trajectory pass and dropped when its results have been
/// interpolated onto the caller's query grid.
pub trait Detector {
    /// Record the contribution of one trajectory sample.
    fn record(&mut self, sample: &TrajectorySample);
}

/// Feed a whole trajectory through a detector, validating it on the way.
///
/// Performs the single pass over the samples that the detectors rely on:
/// emitter times must be strictly increasing and every sample subluminal,
/// otherwise the observer-time record would fold over and the later
/// resampling/interpolation stages would be meaningless.
///
/// # Arguments
/// * `trajectory` - Time-ordered samples, at least 2.
/// * `detector` - Receives one [`Detector::record`] call per sample, in order.
pub fn accumulate<D: Detector>(
    trajectory: &[TrajectorySample],
    detector: &mut D,
) -> Result<(), RadiationError> {
    if trajectory.is_empty() {
        return Err(RadiationError::EmptyTrajectory);
    }
    if trajectory.len() < 2 {
        return Err(RadiationError::TrajectoryTooShort {
            found: trajectory.len(),
        });
    }

    let mut previous_t = f64::NEG_INFINITY;
    for (index, sample) in trajectory.iter().enumerate() {
        if sample.t <= previous_t {
            return Err(RadiationError::UnorderedTrajectory { index });
        }
        if sample.beta.norm_squared() >= 1.0 {
            return Err(RadiationError::SuperluminalSample { index });
        }
        previous_t = sample.t;
        detector.record(sample);
    }
    Ok(())
}

/// Doppler factor $1 - \hat{\mathbf{n}} \cdot \boldsymbol\beta$.
pub(crate) fn doppler_factor(n_unit: &Vec3, beta: &Vec3) -> f64 {
    1.0 - n_unit.dot(beta)
}

/// Acceleration-field vector amplitude
/// $\hat{\mathbf{n}} \times [(\hat{\mathbf{n}} - \boldsymbol\beta) \times \dot{\boldsymbol\beta}]$.
pub(crate) fn acceleration_amplitude(n_unit: &Vec3, beta: &Vec3, beta_dot: &Vec3) -> Vec3 {
    n_unit.cross(&(n_unit - beta).cross(beta_dot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct CountingDetector {
        seen: usize,
    }

    impl Detector for CountingDetector {
        fn record(&mut self, _sample: &TrajectorySample) {
            self.seen += 1;
        }
    }

    fn straight_line(n: usize) -> Vec<TrajectorySample> {
        (0..n)
            .map(|i| {
                let t = i as f64 * 1e-9;
                TrajectorySample::new(
                    t,
                    Vec3::new(0.5 * crate::constants::SPEED_OF_LIGHT * t, 0.0, 0.0),
                    Vec3::new(0.5, 0.0, 0.0),
                    Vec3::zeros(),
                )
            })
            .collect()
    }

    #[test]
    fn test_accumulate_visits_every_sample_once() {
        let trajectory = straight_line(17);
        let mut det = CountingDetector { seen: 0 };
        accumulate(&trajectory, &mut det).unwrap();
        assert_eq!(det.seen, 17);
    }

    #[test]
    fn test_accumulate_rejects_empty_and_single_sample() {
        let mut det = CountingDetector { seen: 0 };
        assert!(matches!(
            accumulate(&[], &mut det),
            Err(RadiationError::EmptyTrajectory)
        ));
        let one = straight_line(1);
        assert!(matches!(
            accumulate(&one, &mut det),
            Err(RadiationError::TrajectoryTooShort { found: 1 })
        ));
    }

    #[test]
    fn test_accumulate_rejects_unordered_times() {
        let mut trajectory = straight_line(5);
        trajectory[3].t = trajectory[2].t; // duplicate time
        let mut det = CountingDetector { seen: 0 };
        assert!(matches!(
            accumulate(&trajectory, &mut det),
            Err(RadiationError::UnorderedTrajectory { index: 3 })
        ));
    }

    #[test]
    fn test_accumulate_rejects_superluminal_samples() {
        let mut trajectory = straight_line(5);
        trajectory[4].beta = Vec3::new(1.0, 0.2, 0.0);
        let mut det = CountingDetector { seen: 0 };
        assert!(matches!(
            accumulate(&trajectory, &mut det),
            Err(RadiationError::SuperluminalSample { index: 4 })
        ));
    }

    #[test]
    fn test_amplitude_is_transverse_to_observation_direction() {
        let n = Vec3::new(1.0, 0.0, 0.0);
        let beta = Vec3::new(0.3, 0.2, -0.1);
        let beta_dot = Vec3::new(1.0e8, -3.0e8, 2.0e8);
        let a = acceleration_amplitude(&n, &beta, &beta_dot);
        assert_relative_eq!(n.dot(&a), 0.0, epsilon = 1e-9 * a.norm());
    }

    #[test]
    fn test_amplitude_reduces_to_transverse_acceleration_at_rest() {
        // beta = 0: a = n x (n x beta_dot) = n(n.beta_dot) - beta_dot
        let n = Vec3::new(0.0, 0.0, 1.0);
        let beta_dot = Vec3::new(2.0e7, 0.0, 5.0e7);
        let a = acceleration_amplitude(&n, &Vec3::zeros(), &beta_dot);
        assert_relative_eq!(a.x, -2.0e7, max_relative = 1e-12);
        assert_relative_eq!(a.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(a.z, 0.0, epsilon = 1e-3);
    }
}
