//! Analytic bending-magnet radiation reference.
//!
//! The angular spectral energy density radiated by a relativistic charge on
//! an instantaneous circular arc of radius $\rho$ is, in SI units (Jackson,
//! *Classical Electrodynamics*, 3rd ed., eq. 14.83):
//!
//! $$\frac{\mathrm{d}^2 W}{\mathrm{d}\omega\,\mathrm{d}\Omega}
//!   = \frac{q^2}{12\pi^3 \varepsilon_0 c}
//!     \left(\frac{\omega\rho}{c}\right)^2
//!     \left(\frac{1}{\gamma^2} + \psi^2\right)^2
//!     \left[K_{2/3}^2(\xi)
//!       + \frac{\psi^2}{1/\gamma^2 + \psi^2}\,K_{1/3}^2(\xi)\right]$$
//!
//! with the vertical angle $\psi$ out of the orbital plane and
//! $\xi = (\omega\rho / 3c)\,(1/\gamma^2 + \psi^2)^{3/2}$. The spectrum
//! rolls over near the critical frequency $\omega_c = 3\gamma^3 c / (2\rho)$
//! and grows as $\omega^{2/3}$ well below it.
//!
//! This closed form is the standard oracle for retarded-field pipelines: a
//! trajectory sampled on a circular arc must reproduce it bin for bin.

use std::f64::consts::PI;

use crate::constants::{SPEED_OF_LIGHT, VACUUM_PERMITTIVITY};

/// Critical angular frequency $\omega_c = 3\gamma^3 c / (2\rho)$ (rad/s).
///
/// # Arguments
/// * `gamma` - Lorentz factor of the circulating charge.
/// * `radius` - Bending radius $\rho$ (m).
pub fn critical_frequency(gamma: f64, radius: f64) -> f64 {
    1.5 * gamma.powi(3) * SPEED_OF_LIGHT / radius
}

/// Modified Bessel function of the second kind, $K_\nu(x)$, for real
/// non-negative order.
///
/// Evaluates the integral representation
/// $K_\nu(x) = \int_0^\infty e^{-x\cosh t}\cosh(\nu t)\,\mathrm{d}t$
/// with composite Simpson quadrature. The upper limit is chosen where the
/// exponential factor reaches the bottom of the double-precision range, so
/// the truncation error is below the quadrature error everywhere.
///
/// # Arguments
/// * `nu` - Order, `nu >= 0`.
/// * `x` - Argument, `x > 0`. Arguments of 700 or more return 0, the
///   correct value to double precision.
///
/// # Panics
/// Panics if `x <= 0` or `nu < 0`.
pub fn modified_bessel_k(nu: f64, x: f64) -> f64 {
    assert!(x > 0.0, "Bessel argument must be positive");
    assert!(nu >= 0.0, "Bessel order must be non-negative");
    if x >= 700.0 {
        return 0.0;
    }

    // Truncate where x cosh(t) = 745, the edge of the subnormal range
    let y = 745.0 / x;
    let t_max = (y + (y * y - 1.0).sqrt()).ln();
    let panels = 2000;
    let h = t_max / panels as f64;
    let integrand = |t: f64| (-x * t.cosh()).exp() * (nu * t).cosh();

    let mut sum = integrand(0.0) + integrand(t_max);
    for i in 1..panels {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * integrand(i as f64 * h);
    }
    sum * h / 3.0
}

/// Bending-magnet spectral energy density
/// $\mathrm{d}^2 W / \mathrm{d}\omega\,\mathrm{d}\Omega$ (J·s/rad per
/// steradian) after one pass through the arc.
///
/// # Arguments
/// * `omega` - Angular frequency (rad/s), positive.
/// * `gamma` - Lorentz factor, at least 1.
/// * `radius` - Bending radius (m), positive.
/// * `psi` - Vertical observation angle out of the orbital plane (rad).
/// * `charge` - Charge of the circulating particle (C).
///
/// # Panics
/// Panics if `omega` or `radius` is not positive, or `gamma < 1`.
pub fn bending_spectrum(omega: f64, gamma: f64, radius: f64, psi: f64, charge: f64) -> f64 {
    assert!(omega > 0.0, "Frequency must be positive");
    assert!(gamma >= 1.0, "Lorentz factor must be at least 1");
    assert!(radius > 0.0, "Bending radius must be positive");

    let inv_gamma_sq = 1.0 / (gamma * gamma);
    let window = inv_gamma_sq + psi * psi;
    let xi = omega * radius / (3.0 * SPEED_OF_LIGHT) * window.powf(1.5);

    let k23 = modified_bessel_k(2.0 / 3.0, xi);
    let k13 = modified_bessel_k(1.0 / 3.0, xi);

    let prefactor =
        charge * charge / (12.0 * PI.powi(3) * VACUUM_PERMITTIVITY * SPEED_OF_LIGHT);
    let scale = (omega * radius / SPEED_OF_LIGHT).powi(2) * window * window;
    prefactor * scale * (k23 * k23 + psi * psi / window * k13 * k13)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ELEMENTARY_CHARGE;
    use approx::assert_relative_eq;

    const GAMMA_ONE_THIRD: f64 = 2.678_938_534_707_747;
    const GAMMA_TWO_THIRDS: f64 = 1.354_117_939_426_400_4;

    #[test]
    fn test_bessel_small_argument_limit() {
        // K_nu(x) -> Gamma(nu) (2/x)^nu / 2 as x -> 0
        let x: f64 = 1.0e-4;
        for (nu, gamma_nu) in [
            (1.0 / 3.0, GAMMA_ONE_THIRD),
            (2.0 / 3.0, GAMMA_TWO_THIRDS),
        ] {
            let expected = 0.5 * gamma_nu * (2.0 / x).powf(nu);
            assert_relative_eq!(modified_bessel_k(nu, x), expected, max_relative = 1e-2);
        }
    }

    #[test]
    fn test_bessel_large_argument_asymptotics() {
        let x: f64 = 10.0;
        for nu in [1.0 / 3.0, 2.0 / 3.0] {
            let mu = 4.0 * nu * nu;
            let series =
                1.0 + (mu - 1.0) / (8.0 * x) + (mu - 1.0) * (mu - 9.0) / (2.0 * (8.0 * x).powi(2));
            let expected = (PI / (2.0 * x)).sqrt() * (-x).exp() * series;
            assert_relative_eq!(modified_bessel_k(nu, x), expected, max_relative = 2e-4);
        }
    }

    #[test]
    fn test_bessel_recurrence_identity() {
        // K_{nu+1} = K_{nu-1} + (2 nu / x) K_nu, at nu = 1/3, with
        // K_{-2/3} = K_{2/3}
        let x = 2.5;
        let lhs = modified_bessel_k(4.0 / 3.0, x);
        let rhs =
            modified_bessel_k(2.0 / 3.0, x) + 2.0 / (3.0 * x) * modified_bessel_k(1.0 / 3.0, x);
        assert_relative_eq!(lhs, rhs, max_relative = 1e-6);
    }

    #[test]
    fn test_critical_frequency_scaling() {
        let base = critical_frequency(10.0, 1.0);
        assert_relative_eq!(base, 1.5e3 * SPEED_OF_LIGHT, max_relative = 1e-12);
        // omega_c ~ gamma^3 / rho
        assert_relative_eq!(critical_frequency(20.0, 1.0), 8.0 * base, max_relative = 1e-12);
        assert_relative_eq!(critical_frequency(10.0, 4.0), 0.25 * base, max_relative = 1e-12);
    }

    #[test]
    fn test_low_frequency_power_law() {
        // Well below omega_c the on-axis spectrum grows as omega^(2/3)
        let gamma = 100.0;
        let radius = 1.0;
        let omega_1 = 1.0e-4 * critical_frequency(gamma, radius);
        let s1 = bending_spectrum(omega_1, gamma, radius, 0.0, ELEMENTARY_CHARGE);
        let s2 = bending_spectrum(2.0 * omega_1, gamma, radius, 0.0, ELEMENTARY_CHARGE);
        assert_relative_eq!(s2 / s1, 2.0_f64.powf(2.0 / 3.0), max_relative = 1e-3);
    }

    #[test]
    fn test_spectrum_decays_beyond_critical_frequency() {
        let gamma = 10.0;
        let radius = 0.5;
        let omega_c = critical_frequency(gamma, radius);
        let low = bending_spectrum(0.5 * omega_c, gamma, radius, 0.0, ELEMENTARY_CHARGE);
        let high = bending_spectrum(8.0 * omega_c, gamma, radius, 0.0, ELEMENTARY_CHARGE);
        assert!(high < 0.01 * low, "high/low = {:.3e}", high / low);

        // Radiation is beamed into the orbital plane
        let off_axis =
            bending_spectrum(omega_c, gamma, radius, 1.0 / gamma, ELEMENTARY_CHARGE);
        let on_axis = bending_spectrum(omega_c, gamma, radius, 0.0, ELEMENTARY_CHARGE);
        assert!(off_axis < on_axis);
    }
}
