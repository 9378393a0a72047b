//! Far-field spectral detector (FFT path).
//!
//! Accumulates the per-observer-time amplitude
//!
//! $$\mathbf{A}(t_{\text{obs}}) = \frac{\hat{\mathbf{n}} \times
//! [(\hat{\mathbf{n}} - \boldsymbol\beta) \times \dot{\boldsymbol\beta}]}
//! {(1 - \hat{\mathbf{n}} \cdot \boldsymbol\beta)^3}$$
//!
//! and turns it into the spectral energy density per unit solid angle
//!
//! $$\frac{d^2 W}{d\omega\, d\Omega} = \frac{q^2}{16 \pi^3 \epsilon_0 c}
//! \left| \int \mathbf{A}(t_{\text{obs}})\, e^{-i\omega t_{\text{obs}}}\,
//! dt_{\text{obs}} \right|^2$$
//!
//! (one-sided in $\omega$; Jackson, 3rd ed., §14.5). The observer-time record
//! is strictly increasing but not uniform (the Doppler factor compresses the
//! samples wherever the particle runs towards the observer), so the detector
//! first resamples it linearly onto a uniform grid of the same length and
//! span, then transforms each Cartesian component with a complex FFT. The
//! caller must sample the trajectory finely enough that the *average* spacing
//! resolves the compressed pulses; the native grid then reaches
//! $\omega_{\max} = \pi (N-1) / \text{span}$.

use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;

use super::{acceleration_amplitude, doppler_factor, Detector};
use crate::constants::{spectral_prefactor, SPEED_OF_LIGHT, TWO_PI};
use crate::solver::RadiationError;
use crate::types::{TrajectorySample, Vec3};

/// Far-field detector that builds a spectrum on its native frequency grid.
pub struct FftDetector {
    /// Unit observation direction.
    direction: Vec3,
    /// Particle charge (C).
    charge: f64,
    /// Observer arrival time per recorded sample (s), strictly increasing.
    observer_time: Vec<f64>,
    /// Amplitude components per recorded sample, shape (capacity, 3).
    amplitude: Array2<f64>,
}

impl FftDetector {
    /// Create a detector for one observation direction.
    ///
    /// # Arguments
    /// * `direction` - Unit vector towards the observer.
    /// * `capacity` - Number of trajectory samples that will be recorded.
    /// * `charge` - Particle charge (C).
    pub fn new(direction: Vec3, capacity: usize, charge: f64) -> Self {
        Self {
            direction,
            charge,
            observer_time: Vec::with_capacity(capacity),
            amplitude: Array2::zeros((capacity, 3)),
        }
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> usize {
        self.observer_time.len()
    }

    /// Transform the accumulated record into the native-grid spectrum.
    ///
    /// Resamples the observer-time record onto a uniform grid (same length,
    /// same span), transforms, and scales bin $k$ of the raw transform by the
    /// uniform step so that it approximates the continuous Fourier integral:
    /// $\hat{\mathbf{A}}_k = \Delta t \sum_m \mathbf{A}_m e^{-2\pi i k m / N}$.
    ///
    /// The detector itself is left untouched, so the direct-sum cross-check
    /// can consume the same accumulation.
    pub fn compute_spectrum(&self) -> Result<Spectrum, RadiationError> {
        let n = self.observer_time.len();
        if n < 2 {
            return Err(RadiationError::TrajectoryTooShort { found: n });
        }

        let t0 = self.observer_time[0];
        let span = self.observer_time[n - 1] - t0;
        debug_assert!(span > 0.0, "observer times must be strictly increasing");
        let dt = span / (n - 1) as f64;

        // Linear resampling onto the uniform grid; one forward pass since
        // both grids are increasing.
        let mut uniform = Array2::<f64>::zeros((n, 3));
        let mut seg = 0usize;
        for m in 0..n {
            let tm = t0 + m as f64 * dt;
            while seg + 2 < n && self.observer_time[seg + 1] < tm {
                seg += 1;
            }
            let t_lo = self.observer_time[seg];
            let t_hi = self.observer_time[seg + 1];
            let w = ((tm - t_lo) / (t_hi - t_lo)).clamp(0.0, 1.0);
            for c in 0..3 {
                uniform[[m, c]] =
                    (1.0 - w) * self.amplitude[[seg, c]] + w * self.amplitude[[seg + 1, c]];
            }
        }

        let mut planner = FftPlanner::new();
        let fft: std::sync::Arc<dyn Fft<f64>> = planner.plan_fft_forward(n);
        let mut buffer = vec![Complex64::new(0.0, 0.0); n];
        let mut scratch = vec![Complex64::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let n_bins = n / 2 + 1;
        let mut density = vec![0.0; n_bins];
        for c in 0..3 {
            for (slot, &value) in buffer.iter_mut().zip(uniform.column(c).iter()) {
                *slot = Complex64::new(value, 0.0);
            }
            fft.process_with_scratch(&mut buffer, &mut scratch);
            for (k, d) in density.iter_mut().enumerate() {
                *d += (buffer[k] * dt).norm_sqr();
            }
        }

        let prefactor = spectral_prefactor(self.charge);
        for d in density.iter_mut() {
            *d *= prefactor;
        }

        let d_omega = TWO_PI / (n as f64 * dt);
        let omega: Vec<f64> = (0..n_bins).map(|k| k as f64 * d_omega).collect();

        // dW/dOmega by direct time integration of the same uniform buffer,
        // kept on the spectrum so the Parseval identity is checkable.
        let sum_sq: f64 = uniform.iter().map(|a| a * a).sum();
        let time_domain_energy = prefactor * PI * sum_sq * dt;

        Ok(Spectrum {
            omega,
            density,
            signal_length: n,
            time_domain_energy,
        })
    }
}

impl Detector for FftDetector {
    /// # Panics
    /// Panics if more samples are recorded than the declared capacity.
    fn record(&mut self, sample: &TrajectorySample) {
        let row = self.observer_time.len();
        let dp = doppler_factor(&self.direction, &sample.beta);
        let amp = acceleration_amplitude(&self.direction, &sample.beta, &sample.beta_dot)
            / dp.powi(3);
        let t_obs = sample.t - self.direction.dot(&sample.position) / SPEED_OF_LIGHT;

        let mut target = self.amplitude.row_mut(row);
        target[0] = amp.x;
        target[1] = amp.y;
        target[2] = amp.z;
        self.observer_time.push(t_obs);
    }
}

/// Spectral energy density on the transform's native frequency grid.
///
/// Never handed to callers of the public entry points; the orchestrator
/// rebins it onto the requested frequencies and drops it.
#[derive(Debug, Clone)]
pub struct Spectrum {
    omega: Vec<f64>,
    density: Vec<f64>,
    signal_length: usize,
    time_domain_energy: f64,
}

impl Spectrum {
    /// Native angular frequencies $\omega_k = 2\pi k / (N \Delta t)$ (rad/s).
    pub fn omega(&self) -> &[f64] {
        &self.omega
    }

    /// Spectral energy density $d^2W/d\omega\,d\Omega$ per bin (J·s/sr).
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Number of native bins ($N/2 + 1$).
    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    /// Native bin spacing (rad/s).
    pub fn delta_omega(&self) -> f64 {
        self.omega[1] - self.omega[0]
    }

    /// Total energy per solid angle from the spectrum (J/sr).
    ///
    /// Half-weights the DC bin and, for even-length signals, the Nyquist bin,
    /// which makes this identical (to rounding) to [`Self::time_domain_energy`]
    /// by the discrete Parseval identity.
    pub fn integrated_energy(&self) -> f64 {
        let nyquist_bin = self.signal_length % 2 == 0;
        let last = self.density.len() - 1;
        let mut acc = 0.0;
        for (k, &s) in self.density.iter().enumerate() {
            let weight = if k == 0 || (nyquist_bin && k == last) {
                0.5
            } else {
                1.0
            };
            acc += weight * s;
        }
        acc * self.delta_omega()
    }

    /// Total energy per solid angle from the time domain (J/sr),
    /// $\frac{q^2}{16\pi^2\epsilon_0 c} \sum_m |\mathbf{A}_m|^2 \Delta t$.
    pub fn time_domain_energy(&self) -> f64 {
        self.time_domain_energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::accumulate;
    use approx::assert_relative_eq;

    /// Stationary particle with a sinusoidal acceleration: the observer-time
    /// grid is already uniform and the tone is commensurate with the window,
    /// so the whole pipeline is exact up to rounding.
    fn tone_detector(n: usize, dt: f64, bin: usize, a0: f64) -> FftDetector {
        let omega_s = TWO_PI * bin as f64 / (n as f64 * dt);
        let direction = Vec3::new(1.0, 0.0, 0.0);
        let trajectory: Vec<TrajectorySample> = (0..n)
            .map(|m| {
                let t = m as f64 * dt;
                TrajectorySample::new(
                    t,
                    Vec3::zeros(),
                    Vec3::zeros(),
                    Vec3::new(0.0, a0 * (omega_s * t).cos(), 0.0),
                )
            })
            .collect();
        let mut det = FftDetector::new(direction, n, 1.0);
        accumulate(&trajectory, &mut det).unwrap();
        det
    }

    #[test]
    fn test_pure_tone_lands_in_its_bin() {
        let (n, dt, bin, a0) = (1024, 1.0e-3, 32, 2.5e6);
        let det = tone_detector(n, dt, bin, a0);
        let spectrum = det.compute_spectrum().unwrap();

        assert_eq!(spectrum.len(), n / 2 + 1);
        assert_relative_eq!(spectrum.delta_omega(), TWO_PI / (n as f64 * dt), max_relative = 1e-12);

        // |FFT| at the tone bin is a0*N/2, so the density is pref*(a0*dt*N/2)^2
        let expected = spectral_prefactor(1.0) * (a0 * dt * n as f64 / 2.0).powi(2);
        assert_relative_eq!(spectrum.density()[bin], expected, max_relative = 1e-9);

        for (k, &s) in spectrum.density().iter().enumerate() {
            if k != bin {
                assert!(
                    s < 1e-12 * expected,
                    "leakage at bin {k}: {s:.3e} vs peak {expected:.3e}"
                );
            }
        }
    }

    #[test]
    fn test_parseval_identity_is_exact() {
        let det = tone_detector(1024, 1.0e-3, 32, 2.5e6);
        let spectrum = det.compute_spectrum().unwrap();
        assert_relative_eq!(
            spectrum.integrated_energy(),
            spectrum.time_domain_energy(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_parseval_holds_for_odd_length_and_broadband_signal() {
        // Non-commensurate tone on an odd-length record: leakage everywhere,
        // but Parseval must still hold bit-for-bit-ish.
        let n = 1023;
        let dt = 2.0e-4;
        let direction = Vec3::new(1.0, 0.0, 0.0);
        let trajectory: Vec<TrajectorySample> = (0..n)
            .map(|m| {
                let t = m as f64 * dt;
                TrajectorySample::new(
                    t,
                    Vec3::zeros(),
                    Vec3::zeros(),
                    Vec3::new(0.0, (3.137e4 * t).cos() * 1.0e6, (7.03e3 * t).sin() * 4.0e5),
                )
            })
            .collect();
        let mut det = FftDetector::new(direction, n, 1.0);
        accumulate(&trajectory, &mut det).unwrap();
        let spectrum = det.compute_spectrum().unwrap();
        assert_relative_eq!(
            spectrum.integrated_energy(),
            spectrum.time_domain_energy(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_compute_spectrum_needs_two_samples() {
        let mut det = FftDetector::new(Vec3::new(1.0, 0.0, 0.0), 4, 1.0);
        det.record(&TrajectorySample::new(
            0.0,
            Vec3::zeros(),
            Vec3::zeros(),
            Vec3::new(0.0, 1.0, 0.0),
        ));
        assert!(matches!(
            det.compute_spectrum(),
            Err(RadiationError::TrajectoryTooShort { found: 1 })
        ));
    }
}
