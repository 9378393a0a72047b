//! Interpolation from native grids onto caller-supplied query grids.
//!
//! Spectra are rebinned *conservatively*: each query point owns the band
//! between the midpoints to its neighbours, the native-grid energy inside
//! that band is summed, and the result is reported as the band-averaged
//! density. Total radiated energy is therefore preserved whether the query
//! grid is coarser or finer than the native one, which a pointwise pick of
//! nearby bin values would not guarantee. Field traces are interpolated
//! pointwise (linearly) instead, since a time-domain field is not an additive
//! density. In both cases query points outside the native coverage yield
//! exactly zero; there is no extrapolation.

use ndarray::Array2;

use crate::solver::RadiationError;
use crate::types::Vec3;

/// Check a query grid: non-empty, and strictly increasing where required.
pub(crate) fn validate_query_grid(
    query: &[f64],
    require_sorted: bool,
) -> Result<(), RadiationError> {
    if query.is_empty() {
        return Err(RadiationError::InvalidQueryGrid(
            "Query grid is empty".into(),
        ));
    }
    if require_sorted {
        for i in 1..query.len() {
            if query[i] <= query[i - 1] {
                return Err(RadiationError::InvalidQueryGrid(format!(
                    "Query grid must be strictly increasing (violated at index {i})"
                )));
            }
        }
    }
    Ok(())
}

/// Rebin a native-grid spectral density onto query frequencies, conserving
/// band-integrated energy.
///
/// Native bin $k$ covers $[\omega_k - \Delta\omega/2,\, \omega_k +
/// \Delta\omega/2)$; query point $j$ owns the band between the midpoints of
/// its neighbouring query points (end bands padded by half the local
/// spacing, single-point grids fall back to one native bin width). The
/// output is the overlapped native energy divided by the band width.
///
/// # Arguments
/// * `omega` - Native angular-frequency grid, uniform, at least 2 bins.
/// * `density` - Native spectral density, same length as `omega`.
/// * `query` - Strictly increasing query frequencies.
/// * `out` - Caller-owned output, at least `query.len()` long; the excess
///   (and every band with no native overlap) is set to zero.
pub fn rebin_conserving(
    omega: &[f64],
    density: &[f64],
    query: &[f64],
    out: &mut [f64],
) -> Result<(), RadiationError> {
    if out.len() < query.len() {
        return Err(RadiationError::OutputCapacityMismatch {
            needed: query.len(),
            found: out.len(),
        });
    }
    validate_query_grid(query, true)?;
    debug_assert_eq!(omega.len(), density.len());
    debug_assert!(omega.len() >= 2);

    let n_bins = omega.len();
    let d_omega = omega[1] - omega[0];
    let lower_edge = omega[0] - 0.5 * d_omega;
    let m = query.len();

    for j in 0..m {
        let band_lo = if m == 1 {
            query[0] - 0.5 * d_omega
        } else if j == 0 {
            query[0] - 0.5 * (query[1] - query[0])
        } else {
            0.5 * (query[j - 1] + query[j])
        };
        let band_hi = if m == 1 {
            query[0] + 0.5 * d_omega
        } else if j == m - 1 {
            query[m - 1] + 0.5 * (query[m - 1] - query[m - 2])
        } else {
            0.5 * (query[j] + query[j + 1])
        };

        // Native-bin coordinates: bin k covers [k, k+1)
        let a = (band_lo - lower_edge) / d_omega;
        let b = (band_hi - lower_edge) / d_omega;
        let k_first = a.max(0.0).floor() as usize;
        let k_last_excl = (b.min(n_bins as f64).ceil()).max(0.0) as usize;

        let mut energy = 0.0;
        for (k, &s) in density
            .iter()
            .enumerate()
            .take(k_last_excl)
            .skip(k_first)
        {
            let overlap = (b.min((k + 1) as f64) - a.max(k as f64)).max(0.0);
            energy += s * overlap * d_omega;
        }
        out[j] = energy / (band_hi - band_lo);
    }
    for v in out.iter_mut().skip(m) {
        *v = 0.0;
    }
    Ok(())
}

/// Sample a field trace at query times by linear interpolation.
///
/// Query times may be in any order; each lookup is an independent binary
/// search. Times outside `[time[0], time[last]]` yield the zero vector.
///
/// # Arguments
/// * `time` - Strictly increasing observer times, at least 2.
/// * `field` - Field components, shape `(time.len(), 3)`.
/// * `query` - Query times, any order, non-empty.
/// * `out` - Caller-owned output, at least `query.len()` long; the excess is
///   zeroed.
pub fn sample_field_linear(
    time: &[f64],
    field: &Array2<f64>,
    query: &[f64],
    out: &mut [Vec3],
) -> Result<(), RadiationError> {
    if out.len() < query.len() {
        return Err(RadiationError::OutputCapacityMismatch {
            needed: query.len(),
            found: out.len(),
        });
    }
    validate_query_grid(query, false)?;
    debug_assert_eq!(time.len(), field.nrows());
    debug_assert!(time.len() >= 2);

    let n = time.len();
    for (j, &tq) in query.iter().enumerate() {
        out[j] = if tq < time[0] || tq > time[n - 1] {
            Vec3::zeros()
        } else {
            // Binary search for the enclosing interval
            let mut lo = 0;
            let mut hi = n - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if time[mid] > tq {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            let w = (tq - time[lo]) / (time[hi] - time[lo]);
            Vec3::new(
                (1.0 - w) * field[[lo, 0]] + w * field[[hi, 0]],
                (1.0 - w) * field[[lo, 1]] + w * field[[hi, 1]],
                (1.0 - w) * field[[lo, 2]] + w * field[[hi, 2]],
            )
        };
    }
    for v in out.iter_mut().skip(query.len()) {
        *v = Vec3::zeros();
    }
    Ok(())
}
