//! Core types shared across the radiation pipeline.
//!
//! This module defines the kinematic trajectory record fed to the detectors,
//! the observation specification distinguishing the two computation modes, and
//! the runtime-selectable spectral strategy.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::SPEED_OF_LIGHT;

/// 3-component real vector (positions, velocities, fields).
pub type Vec3 = Vector3<f64>;

/// One time-ordered record of a particle's kinematic state.
///
/// A strictly time-increasing sequence of these forms a trajectory. The
/// velocity and acceleration are stored in normalised form ($\boldsymbol\beta
/// = \mathbf{v}/c$, $\dot{\boldsymbol\beta} = d\boldsymbol\beta/dt$) so the
/// detectors can evaluate retarded fields without further conversion; the
/// momentum constructors below do the relativistic conversion once per
/// trajectory, and every observation direction then reuses it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Emitter (laboratory) time (s).
    pub t: f64,
    /// Position (m).
    pub position: Vec3,
    /// Normalised velocity $\boldsymbol\beta = \mathbf{v}/c$ (dimensionless).
    pub beta: Vec3,
    /// Normalised acceleration $\dot{\boldsymbol\beta}$ (1/s).
    pub beta_dot: Vec3,
}

impl TrajectorySample {
    /// Create a sample directly from normalised kinematics.
    pub fn new(t: f64, position: Vec3, beta: Vec3, beta_dot: Vec3) -> Self {
        Self {
            t,
            position,
            beta,
            beta_dot,
        }
    }

    /// Create a sample from relativistic momentum and its time derivative.
    ///
    /// With the reduced momentum $\mathbf{u} = \mathbf{p}/(mc)$ and
    /// $\gamma = \sqrt{1 + u^2}$:
    ///
    /// $$\boldsymbol\beta = \mathbf{u}/\gamma, \qquad
    /// \dot{\boldsymbol\beta} = \dot{\mathbf{u}}/\gamma
    ///   - \mathbf{u}\,(\mathbf{u}\cdot\dot{\mathbf{u}})/\gamma^3$$
    ///
    /// # Arguments
    /// * `t` - Emitter time (s).
    /// * `position` - Position (m).
    /// * `momentum` - Momentum $\mathbf{p}$ (kg·m/s).
    /// * `momentum_rate` - Momentum derivative $\dot{\mathbf{p}}$ (kg·m/s²).
    /// * `mass` - Rest mass (kg).
    pub fn from_momentum(
        t: f64,
        position: Vec3,
        momentum: Vec3,
        momentum_rate: Vec3,
        mass: f64,
    ) -> Self {
        let mc = mass * SPEED_OF_LIGHT;
        let u = momentum / mc;
        let u_dot = momentum_rate / mc;
        let gamma = (1.0 + u.norm_squared()).sqrt();
        let beta = u / gamma;
        let beta_dot = u_dot / gamma - u * (u.dot(&u_dot)) / gamma.powi(3);
        Self {
            t,
            position,
            beta,
            beta_dot,
        }
    }

    /// Lorentz factor $\gamma = (1 - \beta^2)^{-1/2}$ of this sample.
    pub fn gamma(&self) -> f64 {
        1.0 / (1.0 - self.beta.norm_squared()).sqrt()
    }
}

/// Convert a whole stored trajectory from momenta to normalised kinematics.
///
/// $\dot{\mathbf{p}}$ is estimated by central differences on the interior
/// samples and one-sided differences at the ends, then each sample is
/// converted via [`TrajectorySample::from_momentum`]. Doing this once per
/// trajectory (rather than once per observation direction) keeps the
/// per-direction pass free of per-trajectory precomputation.
///
/// # Arguments
/// * `times` - Strictly increasing emitter times (s).
/// * `positions` - Positions (m), one per time.
/// * `momenta` - Momenta (kg·m/s), one per time.
/// * `mass` - Rest mass (kg).
///
/// # Panics
/// Panics if the slices differ in length or hold fewer than 2 entries.
pub fn samples_from_momenta(
    times: &[f64],
    positions: &[Vec3],
    momenta: &[Vec3],
    mass: f64,
) -> Vec<TrajectorySample> {
    assert_eq!(
        times.len(),
        positions.len(),
        "times and positions must have equal length"
    );
    assert_eq!(
        times.len(),
        momenta.len(),
        "times and momenta must have equal length"
    );
    assert!(times.len() >= 2, "Need at least 2 samples to differentiate");

    let n = times.len();
    let mut samples = Vec::with_capacity(n);
    for i in 0..n {
        let (lo, hi) = if i == 0 {
            (0, 1)
        } else if i == n - 1 {
            (n - 2, n - 1)
        } else {
            (i - 1, i + 1)
        };
        let momentum_rate = (momenta[hi] - momenta[lo]) / (times[hi] - times[lo]);
        samples.push(TrajectorySample::from_momentum(
            times[i],
            positions[i],
            momenta[i],
            momentum_rate,
            mass,
        ));
    }
    samples
}

/// Where the radiation is observed.
///
/// Exactly one variant is active per computation: far field wants a direction
/// (spherical angle offsets, degrees), near field wants a point (Cartesian
/// offsets, metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum ObservationSpec {
    /// Observation direction from spherical angle offsets (degrees).
    FarField { theta_deg: f64, phi_deg: f64 },
    /// Observation point (m); the exact position matters in this regime.
    NearField { x: f64, y: f64, z: f64 },
}

/// How the far-field spectrum is evaluated.
///
/// The FFT method resamples observer time onto a uniform grid and transforms,
/// then rebins onto the query frequencies; the direct sum evaluates the
/// retarded-field Fourier integral explicitly at each query frequency. The
/// direct sum is $O(N \cdot M)$ instead of $O(N \log N)$ but needs no uniform
/// grid and no rebinning, which makes it the natural cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpectralMethod {
    /// Uniform resampling + real-input FFT + conservative rebinning.
    #[default]
    Fft,
    /// Explicit Fourier summation at the query frequencies.
    DirectSum,
}
