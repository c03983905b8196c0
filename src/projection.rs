//! Radar-relative Cartesian to geographic conversion.
//!
//! Candidate centers are expressed as kilometer offsets east (`x`) and north
//! (`y`) of the radar. The conversion to latitude/longitude uses the
//! standard kilometers-per-degree cosine series in radar latitude, which is
//! accurate to well under the radar gate spacing anywhere a ground-based
//! radar can usefully see a storm.

use serde::{Deserialize, Serialize};

/// Geographic location of the radar, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarSite {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl RadarSite {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        RadarSite {
            latitude_deg,
            longitude_deg,
        }
    }

    /// Kilometers per degree of latitude and of longitude at the radar.
    ///
    /// Return
    /// ------
    /// * `(km_per_deg_lat, km_per_deg_lon)`
    pub fn km_per_degree(&self) -> (f64, f64) {
        let lat = self.latitude_deg.to_radians();
        let fac_lat = 111.13209 - 0.56605 * (2.0 * lat).cos() + 0.00012 * (4.0 * lat).cos()
            - 0.000002 * (6.0 * lat).cos();
        let fac_lon =
            111.41513 * lat.cos() - 0.09455 * (3.0 * lat).cos() + 0.00012 * (5.0 * lat).cos();
        (fac_lat, fac_lon)
    }

    /// Convert a radar-relative offset (km east, km north) to geographic
    /// degrees.
    pub fn offset_to_lat_lon(&self, x_km: f64, y_km: f64) -> (f64, f64) {
        let (fac_lat, fac_lon) = self.km_per_degree();
        (
            self.latitude_deg + y_km / fac_lat,
            self.longitude_deg + x_km / fac_lon,
        )
    }

    /// Inverse of [`RadarSite::offset_to_lat_lon`].
    pub fn lat_lon_to_offset(&self, latitude_deg: f64, longitude_deg: f64) -> (f64, f64) {
        let (fac_lat, fac_lon) = self.km_per_degree();
        (
            (longitude_deg - self.longitude_deg) * fac_lon,
            (latitude_deg - self.latitude_deg) * fac_lat,
        )
    }
}
