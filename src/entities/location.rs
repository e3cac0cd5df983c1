use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_coordinates_error, Error};

/// A validated WGS84 position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = Error;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(invalid_coordinates_error(latitude, longitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl From<Coordinates> for Coord<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Coord {
            x: coordinates.longitude,
            y: coordinates.latitude,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::from(Coord::from(coordinates))
    }
}

impl TryFrom<&str> for Coordinates {
    type Error = Error;

    /// Parses `"lat,lng"`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (latitude, longitude) = value
            .split_once(',')
            .ok_or_else(|| invalid_coordinates_error(f64::NAN, f64::NAN))?;

        let latitude: f64 = latitude
            .trim()
            .parse()
            .map_err(|_| invalid_coordinates_error(f64::NAN, f64::NAN))?;
        let longitude: f64 = longitude
            .trim()
            .parse()
            .map_err(|_| invalid_coordinates_error(latitude, f64::NAN))?;

        Coordinates::new(latitude, longitude)
    }
}
