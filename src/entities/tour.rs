use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{Coordinates, ServerId, Waypoint, WaypointRef};
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tour_steps: Vec<TourStop>,
}

/// A stop as the server reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TourStop {
    pub id: ServerId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order: u32,
}

impl TourStop {
    pub fn into_waypoint(self) -> Result<Waypoint, Error> {
        let coordinates = Coordinates::new(self.latitude, self.longitude)?;

        Ok(Waypoint::new(
            WaypointRef::Saved(self.id),
            coordinates,
            self.title,
            self.description,
            self.order,
        ))
    }
}

/// Basic tour information edited alongside the route.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TourInput {
    pub title: String,
    pub description: String,
}

impl TourInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(invalid_input_error());
        }

        Ok(())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
