//! A single converged center estimate from the simplex search.

use serde::{Deserialize, Serialize};

/// One candidate vortex center: a Cartesian offset from the radar, the
/// search-ring radius it was found on, and the peak tangential wind there.
///
/// Candidates are immutable values; absence is expressed by the `None` of
/// the grid slot holding them, and the analysis level is the grid index the
/// candidate is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterCandidate {
    /// Kilometers east of the radar.
    pub x_km: f64,
    /// Kilometers north of the radar.
    pub y_km: f64,
    /// Search-ring radius, km.
    pub radius_km: f64,
    /// Peak mean tangential wind at this center, m/s.
    pub max_wind: f64,
}

impl CenterCandidate {
    pub fn new(x_km: f64, y_km: f64, radius_km: f64, max_wind: f64) -> Self {
        CenterCandidate {
            x_km,
            y_km,
            radius_km,
            max_wind,
        }
    }
}
