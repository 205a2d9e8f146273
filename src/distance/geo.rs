//! Great-circle distance between geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated (latitude, longitude) pair in degrees.
///
/// # Examples
///
/// ```
/// use u_facility::distance::Coordinate;
///
/// let zurich = Coordinate::new(47.36667, 8.55).unwrap();
/// assert_eq!(zurich.latitude(), 47.36667);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    ///
    /// Fails with [`Error::InvalidCoordinate`] if either component is
    /// non-finite or outside `[-90, 90]` / `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(Error::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance in kilometers to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dlon / 2.0).sin().powi(2);
        // Rounding can push `a` just past 1 for near-antipodal points.
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Haversine distance in kilometers between two raw `(latitude, longitude)` pairs.
///
/// # Examples
///
/// ```
/// use u_facility::distance::haversine;
///
/// // One degree of latitude along a meridian.
/// let d = haversine((0.0, 0.0), (1.0, 0.0)).unwrap();
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn haversine(p1: (f64, f64), p2: (f64, f64)) -> Result<f64> {
    let a = Coordinate::new(p1.0, p1.1)?;
    let b = Coordinate::new(p2.0, p2.1)?;
    Ok(a.distance_to(&b))
}
