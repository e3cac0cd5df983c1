use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// Identifier handed out by the editor to stops that were never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalId(pub u64);

/// Identifier issued by the server for a persisted stop.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(pub String);

impl ServerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        ServerId(id.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WaypointRef {
    Unsaved(LocalId),
    Saved(ServerId),
}

impl WaypointRef {
    pub fn server_id(&self) -> Option<&ServerId> {
        match self {
            Self::Saved(id) => Some(id),
            Self::Unsaved(_) => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

impl fmt::Display for WaypointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsaved(LocalId(n)) => write!(f, "unsaved#{}", n),
            Self::Saved(id) => write!(f, "{}", id),
        }
    }
}

/// One stop of a tour route.
#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub id: WaypointRef,
    coordinates: Coordinates,
    pub title: String,
    pub description: String,
    pub order: u32,
}

impl Waypoint {
    pub fn new(
        id: WaypointRef,
        coordinates: Coordinates,
        title: String,
        description: String,
        order: u32,
    ) -> Self {
        Self {
            id,
            coordinates,
            title,
            description,
            order,
        }
    }

    // location is fixed once placed; moving a stop means removing and re-adding it
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// Fields sent with both create and update calls.
#[derive(Clone, Debug, PartialEq)]
pub struct StopInput {
    pub title: String,
    pub description: String,
    pub coordinates: Coordinates,
    pub order: u32,
}

impl StopInput {
    pub fn from_waypoint(waypoint: &Waypoint, order: u32) -> Self {
        Self {
            title: waypoint.title.clone(),
            description: waypoint.description.clone(),
            coordinates: waypoint.coordinates(),
            order,
        }
    }
}
