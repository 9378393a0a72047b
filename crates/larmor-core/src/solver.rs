//! Per-direction radiation pipeline.
//!
//! A [`RadiationSolver`] owns the physical configuration (charge, spectral
//! method) and drives one observation direction or point at a time through a
//! fixed sequence: resolve the observation geometry, validate and sweep the
//! trajectory through a detector, transform the accumulated record, and
//! interpolate onto the caller's query grid. Each call builds its detector
//! locally, so a failed or finished computation leaves no state behind and
//! the same solver can serve any number of directions, sequentially or from
//! parallel callers.
//!
//! Output buffers are zeroed on entry. A call that returns an error
//! therefore leaves well-defined zeros in the output rather than stale data
//! from a previous direction.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::ELEMENTARY_CHARGE;
use crate::detector::accumulate;
use crate::detector::direct::DirectSumDetector;
use crate::detector::fft::FftDetector;
use crate::detector::near_field::NearFieldDetector;
use crate::geometry;
use crate::interpolate::{rebin_conserving, sample_field_linear, validate_query_grid};
use crate::types::{ObservationSpec, SpectralMethod, TrajectorySample, Vec3};

/// Errors reported by the radiation pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadiationError {
    /// The trajectory holds no samples at all.
    #[error("Trajectory is empty")]
    EmptyTrajectory,

    /// The trajectory is too short to define a time step.
    #[error("Trajectory has {found} sample(s) but at least 2 are required")]
    TrajectoryTooShort { found: usize },

    /// Emitter times must be strictly increasing.
    #[error("Trajectory times are not strictly increasing at sample {index}")]
    UnorderedTrajectory { index: usize },

    /// A sample moves at or above the speed of light, so the retarded-time
    /// mapping is not invertible.
    #[error("Sample {index} has |beta| >= 1")]
    SuperluminalSample { index: usize },

    /// The caller's query grid is unusable.
    #[error("Invalid query grid: {0}")]
    InvalidQueryGrid(String),

    /// The caller's output buffer cannot hold one value per query point.
    #[error("Output buffer holds {found} entries but {needed} are required")]
    OutputCapacityMismatch { needed: usize, found: usize },
}

/// Radiation computation for a single particle observed from one direction
/// or point per call.
///
/// The default solver models an electron and evaluates far-field spectra
/// through the FFT path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiationSolver {
    /// Charge of the radiating particle (C).
    pub charge: f64,
    /// How far-field spectra are evaluated.
    pub spectral_method: SpectralMethod,
}

impl Default for RadiationSolver {
    fn default() -> Self {
        Self {
            charge: -ELEMENTARY_CHARGE,
            spectral_method: SpectralMethod::default(),
        }
    }
}

impl RadiationSolver {
    /// Create a solver for a particle of the given charge (C), using the
    /// default FFT spectral method.
    pub fn new(charge: f64) -> Self {
        Self {
            charge,
            spectral_method: SpectralMethod::default(),
        }
    }

    /// Switch the far-field spectral method.
    pub fn with_method(mut self, method: SpectralMethod) -> Self {
        self.spectral_method = method;
        self
    }

    /// Compute the far-field spectral energy density
    /// $\mathrm{d}^2 W / \mathrm{d}\omega\,\mathrm{d}\Omega$ along one
    /// observation direction.
    ///
    /// The direction is given as spherical angle offsets from the $+x$ beam
    /// axis (see [`geometry::far_field_direction`]). The result is written
    /// into `out_spectrum`, one value per entry of `query_omega`; query
    /// frequencies outside the resolved band come back as zero, as does any
    /// excess capacity of the output buffer.
    ///
    /// # Arguments
    /// * `trajectory` - Strictly time-ordered samples, at least 2.
    /// * `theta_deg` - Polar angle from the beam axis (degrees).
    /// * `phi_deg` - Azimuth around the beam axis (degrees).
    /// * `query_omega` - Strictly increasing angular frequencies (rad/s).
    /// * `out_spectrum` - Caller-owned output (J·s/rad per steradian), at
    ///   least `query_omega.len()` long. Zeroed before any other work, so an
    ///   `Err` return leaves zeros rather than stale values.
    pub fn compute_far_field(
        &self,
        trajectory: &[TrajectorySample],
        theta_deg: f64,
        phi_deg: f64,
        query_omega: &[f64],
        out_spectrum: &mut [f64],
    ) -> Result<(), RadiationError> {
        for v in out_spectrum.iter_mut() {
            *v = 0.0;
        }
        if out_spectrum.len() < query_omega.len() {
            return Err(RadiationError::OutputCapacityMismatch {
                needed: query_omega.len(),
                found: out_spectrum.len(),
            });
        }
        validate_query_grid(query_omega, true)?;

        let spec = ObservationSpec::FarField { theta_deg, phi_deg };
        let direction = geometry::observation_vector(&spec);

        match self.spectral_method {
            SpectralMethod::Fft => {
                let mut detector =
                    FftDetector::new(direction, trajectory.len(), self.charge);
                accumulate(trajectory, &mut detector)?;
                let spectrum = detector.compute_spectrum()?;
                debug!(
                    "Far-field FFT pass: {} samples, {} native bins, d_omega = {:.3e} rad/s",
                    detector.count(),
                    spectrum.len(),
                    spectrum.delta_omega()
                );

                let half_bin = 0.5 * spectrum.delta_omega();
                let band_lo = spectrum.omega()[0] - half_bin;
                let band_hi = spectrum.omega()[spectrum.len() - 1] + half_bin;
                let outside = query_omega
                    .iter()
                    .filter(|&&w| w < band_lo || w > band_hi)
                    .count();
                if 2 * outside > query_omega.len() {
                    warn!(
                        "{outside} of {} query frequencies lie outside the resolved \
                         band [{band_lo:.3e}, {band_hi:.3e}] rad/s",
                        query_omega.len()
                    );
                }

                rebin_conserving(
                    spectrum.omega(),
                    spectrum.density(),
                    query_omega,
                    out_spectrum,
                )
            }
            SpectralMethod::DirectSum => {
                let mut detector =
                    DirectSumDetector::new(direction, query_omega, self.charge);
                accumulate(trajectory, &mut detector)?;
                let density = detector.compute_spectrum()?;
                debug!(
                    "Far-field direct-sum pass: {} samples, {} query frequencies",
                    detector.count(),
                    density.len()
                );
                out_spectrum[..density.len()].copy_from_slice(&density);
                Ok(())
            }
        }
    }

    /// Compute the time-domain electric field seen at a fixed observation
    /// point close to the trajectory.
    ///
    /// The full Liénard-Wiechert field (velocity and acceleration terms) is
    /// evaluated at the observer arrival time of every trajectory sample,
    /// then interpolated linearly onto `query_time`. Query times outside the
    /// arrival window come back as the zero vector, as does any excess
    /// capacity of the output buffer. Query times may be in any order.
    ///
    /// # Arguments
    /// * `trajectory` - Strictly time-ordered samples, at least 2.
    /// * `observation_point` - Observer position (m); must not lie on the
    ///   trajectory itself.
    /// * `query_time` - Observer times to sample at (s), non-empty.
    /// * `out_field` - Caller-owned output (V/m), at least
    ///   `query_time.len()` long. Zeroed before any other work.
    pub fn compute_near_field(
        &self,
        trajectory: &[TrajectorySample],
        observation_point: Vec3,
        query_time: &[f64],
        out_field: &mut [Vec3],
    ) -> Result<(), RadiationError> {
        for v in out_field.iter_mut() {
            *v = Vec3::zeros();
        }
        if out_field.len() < query_time.len() {
            return Err(RadiationError::OutputCapacityMismatch {
                needed: query_time.len(),
                found: out_field.len(),
            });
        }
        validate_query_grid(query_time, false)?;

        let mut detector =
            NearFieldDetector::new(observation_point, trajectory.len(), self.charge);
        accumulate(trajectory, &mut detector)?;
        debug!(
            "Near-field pass: {} samples, arrival window [{:.6e}, {:.6e}] s",
            detector.count(),
            detector.observer_time()[0],
            detector.observer_time()[detector.count() - 1]
        );

        sample_field_linear(
            detector.observer_time(),
            detector.field(),
            query_time,
            out_field,
        )
    }
}
