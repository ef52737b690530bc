use serde::{Deserialize, Serialize};

use super::{LonLat, MERCATOR_MAX_LAT_DEG, Vec2, WGS84_A};

/// Map projection of the engine's internal coordinate plane.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Spherical Web Mercator (EPSG:3857), meters.
    #[default]
    WebMercator,
    /// Plate carrée in degrees (EPSG:4326); projected == geographic.
    Geographic,
}

impl Projection {
    /// Geographic to projected.
    pub fn forward(self, geo: LonLat) -> Vec2 {
        match self {
            Projection::WebMercator => {
                let lat = geo
                    .lat_deg
                    .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
                    .to_radians();
                let x = WGS84_A * geo.lon_deg.to_radians();
                let y = WGS84_A * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
                Vec2::new(x, y)
            }
            Projection::Geographic => Vec2::new(geo.lon_deg, geo.lat_deg),
        }
    }

    /// Projected to geographic.
    pub fn inverse(self, coord: Vec2) -> LonLat {
        match self {
            Projection::WebMercator => {
                let lon = (coord.x / WGS84_A).to_degrees();
                let lat = (2.0 * (coord.y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                LonLat::new(lon, lat)
            }
            Projection::Geographic => LonLat::new(coord.x, coord.y),
        }
    }
}
