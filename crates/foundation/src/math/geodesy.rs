use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters). Also the sphere radius used by Web Mercator.
pub const WGS84_A: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square (degrees).
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }
}
