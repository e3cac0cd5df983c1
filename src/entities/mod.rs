mod location;
mod tour;
mod waypoint;

pub use location::Coordinates;
pub use tour::{Tour, TourInput, TourStop};
pub use waypoint::{LocalId, ServerId, StopInput, Waypoint, WaypointRef};
