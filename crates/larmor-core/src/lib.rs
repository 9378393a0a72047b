//! # Larmor Core
//!
//! Radiation diagnostics for charged-particle trajectories: given a
//! time-sampled trajectory (position, normalised velocity and acceleration
//! per sample), compute what an observer receives, one observation direction
//! or point per call.
//!
//! Two observation regimes are covered. In the far field the crate
//! accumulates the retarded acceleration field against observer time and
//! returns the spectral energy density
//! $\mathrm{d}^2 W / \mathrm{d}\omega\,\mathrm{d}\Omega$ on a caller-chosen
//! frequency grid, either through an FFT of the resampled record or through
//! a direct Fourier sum at the query frequencies. In the near field it
//! evaluates the full Liénard-Wiechert electric field at a fixed observation
//! point and returns the time-domain trace on a caller-chosen grid of
//! observer times.
//!
//! ## Architecture
//!
//! Computations flow through [`solver::RadiationSolver`], which resolves the
//! observation geometry, sweeps the trajectory through a per-call detector,
//! transforms the accumulated record, and interpolates onto the caller's
//! query grid. Detectors are independent per call, so one solver can serve
//! many directions, sequentially or from parallel callers.
//!
//! ## Modules
//!
//! - [`types`] - Trajectory samples, observation specifications, method
//!   selection.
//! - [`geometry`] - Observation directions and points from their
//!   specifications.
//! - [`detector`] - Retarded-field accumulation: FFT, direct-sum and
//!   near-field detectors.
//! - [`interpolate`] - Energy-conserving spectral rebinning and linear field
//!   sampling.
//! - [`solver`] - The per-direction pipeline and its error type.
//! - [`synchrotron`] - Analytic bending-magnet reference spectrum.
//! - [`constants`] - Physical constants (SI).

pub mod constants;
pub mod detector;
pub mod geometry;
pub mod interpolate;
pub mod solver;
pub mod synchrotron;
pub mod types;
