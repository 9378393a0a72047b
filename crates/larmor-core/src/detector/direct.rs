//! Far-field spectral detector (direct-summation path).
//!
//! Evaluates the retarded-field Fourier integral explicitly at an arbitrary
//! list of angular frequencies,
//!
//! $$\hat{\mathbf{A}}(\omega) = \Delta t \sum_j
//! \frac{\hat{\mathbf{n}} \times [(\hat{\mathbf{n}} - \boldsymbol\beta_j)
//! \times \dot{\boldsymbol\beta}_j]}{(1 - \hat{\mathbf{n}} \cdot
//! \boldsymbol\beta_j)^2}\, e^{-i \omega t_{\text{obs},j}},$$
//!
//! i.e. a Riemann sum over *emitter* time; one power of the Doppler factor is
//! cancelled against the Jacobian $dt_{\text{obs}} = (1 - \hat{\mathbf{n}}
//! \cdot \boldsymbol\beta)\,dt$, which is why the denominator carries a square
//! where the FFT detector carries a cube. $O(N \cdot M)$ instead of
//! $O(N \log N)$, but exact on non-uniform observer-time records and free of
//! resampling/rebinning bias, which makes it the correctness oracle for the
//! FFT path. Assumes the trajectory is uniformly sampled in emitter time (the
//! usual case for stored particle tracks).

use ndarray::Array2;
use num_complex::Complex64;

use super::{acceleration_amplitude, doppler_factor, Detector};
use crate::constants::{spectral_prefactor, SPEED_OF_LIGHT};
use crate::solver::RadiationError;
use crate::types::{TrajectorySample, Vec3};

/// Far-field detector evaluating the spectrum at fixed query frequencies.
pub struct DirectSumDetector {
    /// Unit observation direction.
    direction: Vec3,
    /// Particle charge (C).
    charge: f64,
    /// Angular frequencies to evaluate (rad/s).
    omega: Vec<f64>,
    /// Running Fourier sums, shape (M, 3).
    accumulator: Array2<Complex64>,
    /// Emitter time of the first/last recorded sample (s).
    first_time: f64,
    last_time: f64,
    /// Number of recorded samples.
    count: usize,
}

impl DirectSumDetector {
    /// Create a detector evaluating at the given angular frequencies.
    pub fn new(direction: Vec3, omega: &[f64], charge: f64) -> Self {
        Self {
            direction,
            charge,
            omega: omega.to_vec(),
            accumulator: Array2::from_elem((omega.len(), 3), Complex64::new(0.0, 0.0)),
            first_time: 0.0,
            last_time: 0.0,
            count: 0,
        }
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Spectral energy density at each query frequency (J·s/sr).
    ///
    /// Scales the accumulated sums by the emitter time step and the spectral
    /// prefactor. The detector is left untouched.
    pub fn compute_spectrum(&self) -> Result<Vec<f64>, RadiationError> {
        if self.count < 2 {
            return Err(RadiationError::TrajectoryTooShort { found: self.count });
        }
        let dt = (self.last_time - self.first_time) / (self.count - 1) as f64;
        let prefactor = spectral_prefactor(self.charge);

        let density = (0..self.omega.len())
            .map(|i| {
                let sq: f64 = (0..3)
                    .map(|c| (self.accumulator[[i, c]] * dt).norm_sqr())
                    .sum();
                prefactor * sq
            })
            .collect();
        Ok(density)
    }
}

impl Detector for DirectSumDetector {
    fn record(&mut self, sample: &TrajectorySample) {
        let dp = doppler_factor(&self.direction, &sample.beta);
        let amp = acceleration_amplitude(&self.direction, &sample.beta, &sample.beta_dot)
            / (dp * dp);
        let t_obs = sample.t - self.direction.dot(&sample.position) / SPEED_OF_LIGHT;

        for (i, &w) in self.omega.iter().enumerate() {
            let phase = Complex64::new(0.0, -w * t_obs).exp();
            self.accumulator[[i, 0]] += amp.x * phase;
            self.accumulator[[i, 1]] += amp.y * phase;
            self.accumulator[[i, 2]] += amp.z * phase;
        }

        if self.count == 0 {
            self.first_time = sample.t;
        }
        self.last_time = sample.t;
        self.count += 1;
    }
}
