//! Polar and Cartesian conversions and angle normalisation.
//!
//! Angles of the state are in degrees and kept in [0, 360).
//! Polar to Cartesian conversions take radians, as a bearing is always converted before projection.

use nalgebra::Vector2;

/// Cartesian position of a polar coordinate. `phi` is in radians.
pub fn pol2cart(rho: f64, phi: f64) -> Vector2<f64> {
    Vector2::new(rho * phi.cos(), rho * phi.sin())
}

/// Range and bearing (degrees in [0, 360)) of a Cartesian position.
pub fn cart2pol(p: &Vector2<f64>) -> (f64, f64) {
    let rho = p.norm();
    let theta = normalize_deg(p[1].atan2(p[0]).to_degrees());
    (rho, theta)
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_deg(a: f64) -> f64 {
    let r = a.rem_euclid(360.);
    // rem_euclid of a tiny negative value rounds up to 360
    if r >= 360. {
        0.
    } else {
        r
    }
}

/// Signed difference a - b in degrees, wrapped into [-180, 180).
pub fn angle_diff(a: f64, b: f64) -> f64 {
    normalize_deg(a - b + 180.) - 180.
}
