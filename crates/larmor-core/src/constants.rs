//! Physical constants (SI, CODATA 2018) and shared prefactors.
//!
//! All quantities in this crate are SI: metres, seconds, coulombs, V/m.
//! Spectral energy densities $d^2W/d\omega\,d\Omega$ come out in J·s/sr.

use std::f64::consts::PI;

/// Speed of light in vacuum (m/s, exact).
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e8;

/// Vacuum permittivity $\epsilon_0$ (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;

/// Elementary charge (C, exact).
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Electron rest mass (kg).
pub const ELECTRON_MASS: f64 = 9.109_383_701_5e-31;

/// $2\pi$, for angular-frequency conversions.
pub const TWO_PI: f64 = 2.0 * PI;

/// Prefactor of the far-field spectral energy density,
/// $q^2 / (16 \pi^3 \epsilon_0 c)$.
///
/// With the one-sided spectrum convention used throughout this crate
/// (positive frequencies only, the $\pm\omega$ contributions folded together),
/// the spectral energy density is this prefactor times $|\hat{G}(\omega)|^2$,
/// where $\hat{G}$ is the Fourier transform of the retarded amplitude over
/// observer time.
pub fn spectral_prefactor(charge: f64) -> f64 {
    charge * charge / (16.0 * PI.powi(3) * VACUUM_PERMITTIVITY * SPEED_OF_LIGHT)
}

/// Coulomb-law prefactor $q / (4 \pi \epsilon_0)$.
pub fn coulomb_prefactor(charge: f64) -> f64 {
    charge / (4.0 * PI * VACUUM_PERMITTIVITY)
}
