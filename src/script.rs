//! JSON edit scripts replayed against a tour draft by the CLI.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::draft::TourDraft;
use crate::entities::WaypointRef;
use crate::error::{unknown_waypoint_error, Error};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    Add {
        lat: f64,
        lng: f64,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// `stop` is the 1-based position in the route when the op runs.
    Remove { stop: usize },
    Update {
        stop: usize,
        title: String,
        #[serde(default)]
        description: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ops: Vec<EditOp>,
}

impl EditScript {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&raw)?)
    }

    /// Applies every op in order; stops at the first one that fails.
    pub fn apply(&self, draft: &mut TourDraft) -> Result<(), Error> {
        if let Some(title) = &self.title {
            draft.info.title = title.clone();
        }
        if let Some(description) = &self.description {
            draft.info.description = description.clone();
        }

        for op in &self.ops {
            match op {
                EditOp::Add {
                    lat,
                    lng,
                    title,
                    description,
                } => {
                    let id = draft.route.add_at(*lat, *lng)?;
                    if title.is_some() || description.is_some() {
                        let current = draft.route.get(&id).map(|wp| wp.title.clone());
                        draft.route.update_text(
                            &id,
                            title.clone().or(current).unwrap_or_default(),
                            description.clone().unwrap_or_default(),
                        )?;
                    }
                }
                EditOp::Remove { stop } => {
                    let id = stop_ref(draft, *stop)?;
                    draft.route.remove(&id)?;
                }
                EditOp::Update {
                    stop,
                    title,
                    description,
                } => {
                    let id = stop_ref(draft, *stop)?;
                    draft.route.update_text(&id, title.clone(), description.clone())?;
                }
            }
        }

        Ok(())
    }
}

fn stop_ref(draft: &TourDraft, position: usize) -> Result<WaypointRef, Error> {
    position
        .checked_sub(1)
        .and_then(|index| draft.route.ref_at(index))
        .cloned()
        .ok_or_else(unknown_waypoint_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::TourInput;

    fn script(raw: &str) -> EditScript {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn ops_run_in_order_against_current_positions() {
        let mut draft = TourDraft::new(TourInput::default());
        let script = script(
            r#"{
                "title": "Harbour walk",
                "description": "Two hours along the docks",
                "ops": [
                    { "op": "add", "lat": 1.0, "lng": 1.0 },
                    { "op": "add", "lat": 2.0, "lng": 2.0, "description": "Fish market" },
                    { "op": "add", "lat": 3.0, "lng": 3.0 },
                    { "op": "remove", "stop": 1 },
                    { "op": "update", "stop": 2, "title": "Lighthouse" }
                ]
            }"#,
        );

        script.apply(&mut draft).unwrap();

        let stops = draft.route.waypoints();
        assert_eq!(draft.info.title, "Harbour walk");
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].title, "Stop 2");
        assert_eq!(stops[0].description, "Fish market");
        assert_eq!(stops[1].title, "Lighthouse");
    }

    #[test]
    fn out_of_range_positions_fail() {
        let mut draft = TourDraft::new(TourInput::default());

        let err = script(r#"{ "ops": [{ "op": "remove", "stop": 0 }] }"#)
            .apply(&mut draft)
            .unwrap_err();
        assert_eq!(err.code, 102);
        assert!(script(r#"{ "ops": [{ "op": "update", "stop": 3, "title": "x" }] }"#)
            .apply(&mut draft)
            .is_err());
    }
}
