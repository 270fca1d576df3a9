use super::Point2d;

/// The mean radius of the Earth in m.
pub const EARTH_RADIUS: f64 = 6_371_000.0; // m

/// A geographic coordinate in decimal degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new coordinate.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The coordinate as a point in planar `(lat, lng)` space.
    pub fn to_point(self) -> Point2d {
        Point2d::new(self.lat, self.lng)
    }

    /// Linearly interpolates latitude and longitude independently.
    pub fn lerp(self, other: LatLng, t: f64) -> LatLng {
        LatLng {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

/// Computes the great-circle distance between two coordinates in m,
/// using the haversine formula.
pub fn haversine(p1: LatLng, p2: LatLng) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS * c
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn one_degree_along_equator() {
        let d = haversine(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert_approx_eq!(d, EARTH_RADIUS * std::f64::consts::PI / 180.0, 1e-6);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = LatLng::new(-15.6, -56.1);
        let b = LatLng::new(-16.47, -54.63);
        assert_approx_eq!(haversine(a, b), haversine(b, a), 1e-9);
        assert_eq!(haversine(a, a), 0.0);
    }
}
