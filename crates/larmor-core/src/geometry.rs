//! Observation geometry: angle offsets to direction vectors.
//!
//! Far-field directions are measured from the beam axis ($+x$): `theta_deg`
//! is the polar offset from $+x$ and `phi_deg` the azimuth around it, so a
//! head-on observer sits at $(1, 0, 0)$. Near-field observation points are
//! plain Cartesian offsets and are passed through unnormalised.

use crate::types::{ObservationSpec, Vec3};

/// Resolve an observation specification into its 3-vector.
///
/// Far field yields a unit direction (unit length by construction of the
/// spherical formula); near field yields the observation point itself.
pub fn observation_vector(spec: &ObservationSpec) -> Vec3 {
    match *spec {
        ObservationSpec::FarField { theta_deg, phi_deg } => {
            far_field_direction(theta_deg, phi_deg)
        }
        ObservationSpec::NearField { x, y, z } => Vec3::new(x, y, z),
    }
}

/// Unit direction for far-field observation angles (degrees).
///
/// $\hat{\mathbf{n}} = (\cos\theta,\; \sin\theta\cos\phi,\; \sin\theta\sin\phi)$
pub fn far_field_direction(theta_deg: f64, phi_deg: f64) -> Vec3 {
    let theta = theta_deg.to_radians();
    let phi = phi_deg.to_radians();
    Vec3::new(theta.cos(), theta.sin() * phi.cos(), theta.sin() * phi.sin())
}
