//! Near-field detector: exact Liénard–Wiechert electric field at a point.
//!
//! For observation points close to the trajectory the far-field approximation
//! breaks down, so the full retarded field is evaluated per sample
//! (Jackson, 3rd ed., eq. 14.14):
//!
//! $$\mathbf{E} = \frac{q}{4\pi\epsilon_0} \left[
//! \frac{(\hat{\mathbf{n}} - \boldsymbol\beta)(1 - \beta^2)}
//! {(1 - \hat{\mathbf{n}}\cdot\boldsymbol\beta)^3 R^2}
//! + \frac{\hat{\mathbf{n}} \times [(\hat{\mathbf{n}} - \boldsymbol\beta)
//! \times \dot{\boldsymbol\beta}]}
//! {c\,(1 - \hat{\mathbf{n}}\cdot\boldsymbol\beta)^3 R} \right]$$
//!
//! with $\hat{\mathbf{n}}$ and $R$ taken from the sample position to the
//! observation point. Each contribution arrives at observer time
//! $t_{\text{obs}} = t + R/c$; the trace is kept as $(t_{\text{obs}},
//! \mathbf{E})$ pairs for the interpolation stage.

use ndarray::Array2;

use super::{acceleration_amplitude, doppler_factor, Detector};
use crate::constants::{coulomb_prefactor, SPEED_OF_LIGHT};
use crate::types::{TrajectorySample, Vec3};

/// Detector accumulating the time-domain electric field at a fixed point.
pub struct NearFieldDetector {
    /// Observation point (m).
    point: Vec3,
    /// Particle charge (C).
    charge: f64,
    /// Observer arrival time per recorded sample (s), strictly increasing.
    observer_time: Vec<f64>,
    /// Field components per recorded sample (V/m), shape (capacity, 3).
    field: Array2<f64>,
}

impl NearFieldDetector {
    /// Create a detector for one observation point.
    ///
    /// # Arguments
    /// * `point` - Observation point (m).
    /// * `capacity` - Number of trajectory samples that will be recorded.
    /// * `charge` - Particle charge (C).
    pub fn new(point: Vec3, capacity: usize, charge: f64) -> Self {
        Self {
            point,
            charge,
            observer_time: Vec::with_capacity(capacity),
            field: Array2::zeros((capacity, 3)),
        }
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> usize {
        self.observer_time.len()
    }

    /// Observer arrival times (s), one per recorded sample.
    pub fn observer_time(&self) -> &[f64] {
        &self.observer_time
    }

    /// Field trace, shape (count, 3) in V/m, row-aligned with
    /// [`Self::observer_time`].
    pub fn field(&self) -> &Array2<f64> {
        &self.field
    }
}

impl Detector for NearFieldDetector {
    /// # Panics
    /// Panics if the sample position coincides with the observation point, or
    /// if more samples are recorded than the declared capacity.
    fn record(&mut self, sample: &TrajectorySample) {
        let separation = self.point - sample.position;
        let distance = separation.norm();
        assert!(
            distance > 1e-15,
            "Observation point lies on the trajectory"
        );
        let n_unit = separation / distance;

        let dp = doppler_factor(&n_unit, &sample.beta);
        let dp3 = dp * dp * dp;
        let velocity_term = (n_unit - sample.beta)
            * ((1.0 - sample.beta.norm_squared()) / (dp3 * distance * distance));
        let radiation_term = acceleration_amplitude(&n_unit, &sample.beta, &sample.beta_dot)
            / (SPEED_OF_LIGHT * dp3 * distance);
        let e_field = coulomb_prefactor(self.charge) * (velocity_term + radiation_term);

        let row = self.observer_time.len();
        let mut target = self.field.row_mut(row);
        target[0] = e_field.x;
        target[1] = e_field.y;
        target[2] = e_field.z;
        self.observer_time
            .push(sample.t + distance / SPEED_OF_LIGHT);
    }
}
