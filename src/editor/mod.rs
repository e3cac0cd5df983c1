mod plan;
mod reconcile;

pub use plan::{plan_reconciliation, SavePlan, StopMutation};
pub use reconcile::{reconcile, reconcile_with, Applied, SaveSummary};

use geo_types::LineString;

use crate::api::StopAPI;
use crate::entities::{Coordinates, LocalId, ServerId, TourStop, Waypoint, WaypointRef};
use crate::error::{unknown_waypoint_error, Error};

/// In-memory route of a tour being edited.
///
/// Edits stay local until [`RouteEditor::save`] reconciles them with the
/// server. The editor remembers what the server last held so unchanged stops
/// are not resent.
#[derive(Debug, Default)]
pub struct RouteEditor {
    waypoints: Vec<Waypoint>,
    snapshot: Vec<Waypoint>,
    pending_deletions: Vec<ServerId>,
    editing: Option<WaypointRef>,
    next_local: u64,
}

impl RouteEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the editor from the stops of an existing tour.
    pub fn load(stops: Vec<TourStop>) -> Result<Self, Error> {
        let mut waypoints = stops
            .into_iter()
            .map(TourStop::into_waypoint)
            .collect::<Result<Vec<_>, _>>()?;
        waypoints.sort_by_key(|wp| wp.order);

        Ok(Self {
            snapshot: waypoints.clone(),
            waypoints,
            ..Self::default()
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn pending_deletions(&self) -> &[ServerId] {
        &self.pending_deletions
    }

    pub fn editing(&self) -> Option<&WaypointRef> {
        self.editing.as_ref()
    }

    pub fn get(&self, id: &WaypointRef) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| &wp.id == id)
    }

    /// Reference of the stop at a 0-based position.
    pub fn ref_at(&self, index: usize) -> Option<&WaypointRef> {
        self.waypoints.get(index).map(|wp| &wp.id)
    }

    fn position(&self, id: &WaypointRef) -> Result<usize, Error> {
        self.waypoints
            .iter()
            .position(|wp| &wp.id == id)
            .ok_or_else(unknown_waypoint_error)
    }

    /// Appends a stop at the picked location and opens it for editing.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, coordinates: Coordinates) -> WaypointRef {
        self.next_local += 1;
        let id = WaypointRef::Unsaved(LocalId(self.next_local));
        let n = self.waypoints.len() as u32 + 1;

        self.waypoints.push(Waypoint::new(
            id.clone(),
            coordinates,
            format!("Stop {}", n),
            String::new(),
            n,
        ));
        self.editing = Some(id.clone());

        id
    }

    pub fn add_at(&mut self, latitude: f64, longitude: f64) -> Result<WaypointRef, Error> {
        let coordinates = Coordinates::new(latitude, longitude)?;

        Ok(self.add(coordinates))
    }

    /// Drops a stop. Persisted stops are queued for deletion on the next save.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub fn remove(&mut self, id: &WaypointRef) -> Result<Waypoint, Error> {
        let index = self.position(id)?;
        let removed = self.waypoints.remove(index);

        if let WaypointRef::Saved(server_id) = &removed.id {
            self.pending_deletions.push(server_id.clone());
        }
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }

        Ok(removed)
    }

    #[tracing::instrument(skip(self, id, title, description), fields(id = %id))]
    pub fn update_text(
        &mut self,
        id: &WaypointRef,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), Error> {
        let index = self.position(id)?;
        let waypoint = &mut self.waypoints[index];
        waypoint.title = title.into();
        waypoint.description = description.into();

        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }

        Ok(())
    }

    pub fn begin_edit(&mut self, id: &WaypointRef) -> Result<(), Error> {
        self.position(id)?;
        self.editing = Some(id.clone());

        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// The route in visiting order, as (lng, lat) coordinates.
    pub fn path(&self) -> LineString<f64> {
        self.waypoints
            .iter()
            .map(|wp| geo_types::Coord::from(wp.coordinates()))
            .collect()
    }

    /// The path to draw on a map; a single stop has none.
    pub fn polyline(&self) -> Option<LineString<f64>> {
        if self.waypoints.len() < 2 {
            return None;
        }

        Some(self.path())
    }

    /// A tour needs at least two stops before it can be published.
    pub fn is_publishable(&self) -> bool {
        self.waypoints.len() >= 2
    }

    pub fn plan(&self) -> SavePlan {
        plan_reconciliation(&self.snapshot, &self.waypoints, &self.pending_deletions)
    }

    pub fn is_dirty(&self) -> bool {
        !self.plan().is_empty()
    }

    /// Reconciles the route with the server.
    ///
    /// Each call that succeeds is folded back into the editor right away, so
    /// after a failure the editor reflects what the server holds and saving
    /// again only resends the remainder.
    #[tracing::instrument(skip(self, api))]
    pub async fn save<A>(&mut self, api: &A, tour_id: &str) -> Result<SaveSummary, Error>
    where
        A: StopAPI + ?Sized,
    {
        let plan = self.plan();
        if plan.is_empty() {
            tracing::info!("route unchanged, nothing to save");
            return Ok(SaveSummary::default());
        }

        let summary = reconcile_with(api, tour_id, &plan, |applied| self.apply(applied)).await?;

        for (index, waypoint) in self.waypoints.iter_mut().enumerate() {
            waypoint.order = index as u32 + 1;
        }

        Ok(summary)
    }

    fn apply(&mut self, applied: Applied) {
        match applied {
            Applied::Deleted(id) => {
                self.pending_deletions.retain(|pending| pending != &id);
                self.snapshot
                    .retain(|wp| wp.id.server_id() != Some(&id));
            }
            Applied::Created { local, id, order } => {
                let unsaved = WaypointRef::Unsaved(local);
                let saved = WaypointRef::Saved(id);

                if self.editing.as_ref() == Some(&unsaved) {
                    self.editing = Some(saved.clone());
                }
                if let Some(waypoint) = self.waypoints.iter_mut().find(|wp| wp.id == unsaved) {
                    waypoint.id = saved;
                    waypoint.order = order;
                    self.snapshot.push(waypoint.clone());
                }
            }
            Applied::Updated { id, order } => {
                let saved = WaypointRef::Saved(id);

                if let Some(waypoint) = self.waypoints.iter_mut().find(|wp| wp.id == saved) {
                    waypoint.order = order;
                    let persisted = waypoint.clone();

                    match self.snapshot.iter_mut().find(|wp| wp.id == saved) {
                        Some(entry) => *entry = persisted,
                        None => self.snapshot.push(persisted),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeAPI};

    fn stop(id: &str, order: u32) -> TourStop {
        TourStop {
            id: id.into(),
            title: format!("Stop {}", order),
            description: String::new(),
            latitude: -34.6,
            longitude: -58.38 + order as f64 / 100.0,
            order,
        }
    }

    #[test]
    fn add_uses_default_title_and_next_order() {
        let mut editor = RouteEditor::new();
        let first = editor.add_at(1.0, 1.0).unwrap();
        let second = editor.add_at(2.0, 2.0).unwrap();

        assert_ne!(first, second);
        let waypoint = editor.get(&second).unwrap();
        assert_eq!(waypoint.title, "Stop 2");
        assert_eq!(waypoint.description, "");
        assert_eq!(waypoint.order, 2);
        assert_eq!(editor.editing(), Some(&second));
    }

    #[test]
    fn add_rejects_invalid_coordinates() {
        let mut editor = RouteEditor::new();

        assert!(editor.add_at(91.0, 0.0).is_err());
        assert!(editor.is_empty());
    }

    #[test]
    fn load_sorts_by_server_order() {
        let editor = RouteEditor::load(vec![stop("b", 2), stop("a", 1)]).unwrap();

        assert_eq!(editor.ref_at(0), Some(&WaypointRef::Saved("a".into())));
        assert!(!editor.is_dirty());
    }

    #[test]
    fn removing_only_queues_persisted_stops() {
        let mut editor = RouteEditor::load(vec![stop("srv-1", 1)]).unwrap();
        let local = editor.add_at(1.0, 1.0).unwrap();

        editor.remove(&local).unwrap();
        assert!(editor.pending_deletions().is_empty());
        assert_eq!(editor.editing(), None);

        editor.remove(&WaypointRef::Saved("srv-1".into())).unwrap();
        assert_eq!(editor.pending_deletions(), &[ServerId::from("srv-1")]);
    }

    #[test]
    fn unknown_references_are_reported() {
        let mut editor = RouteEditor::new();
        let missing = WaypointRef::Unsaved(LocalId(42));

        assert_eq!(editor.remove(&missing).unwrap_err().code, 102);
        assert_eq!(editor.update_text(&missing, "a", "b").unwrap_err().code, 102);
        assert!(editor.begin_edit(&missing).is_err());
    }

    #[test]
    fn update_text_closes_the_inline_form() {
        let mut editor = RouteEditor::new();
        let id = editor.add_at(1.0, 1.0).unwrap();

        editor.update_text(&id, "Cathedral", "Enter by the side door").unwrap();

        let waypoint = editor.get(&id).unwrap();
        assert_eq!(waypoint.title, "Cathedral");
        assert_eq!(waypoint.description, "Enter by the side door");
        assert_eq!(editor.editing(), None);
    }

    #[test]
    fn polyline_needs_two_stops() {
        let mut editor = RouteEditor::new();
        editor.add_at(10.0, 20.0).unwrap();
        assert!(editor.polyline().is_none());
        assert!(!editor.is_publishable());

        editor.add_at(11.0, 21.0).unwrap();
        let line = editor.polyline().unwrap();
        assert_eq!(line.0.len(), 2);
        assert_eq!(line.0[0].x, 20.0);
        assert_eq!(line.0[0].y, 10.0);
        assert!(editor.is_publishable());
    }

    #[tokio::test]
    async fn save_promotes_new_stops_and_is_idempotent() {
        let api = FakeAPI::new();
        let mut editor = RouteEditor::new();
        let id = editor.add_at(1.0, 1.0).unwrap();
        editor.add_at(2.0, 2.0).unwrap();

        let summary = editor.save(&api, "tour-1").await.unwrap();
        assert_eq!(summary.created, 2);
        assert!(editor.waypoints().iter().all(|wp| wp.id.is_saved()));
        assert!(editor.get(&id).is_none());

        let summary = editor.save(&api, "tour-1").await.unwrap();
        assert_eq!(summary, SaveSummary::default());
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn failed_save_resumes_where_it_stopped() {
        let api = FakeAPI::new();
        api.seed_stops("tour-1", vec![stop("srv-1", 1), stop("srv-2", 2)]);
        let mut editor = RouteEditor::load(api.stops("tour-1")).unwrap();

        editor.remove(&WaypointRef::Saved("srv-1".into())).unwrap();
        editor.add_at(10.0, 20.0).unwrap();
        api.fail_on_call(2);

        assert!(editor.save(&api, "tour-1").await.is_err());
        assert!(editor.pending_deletions().is_empty());

        let summary = editor.save(&api, "tour-1").await.unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.deleted, 0);

        let calls = api.calls();
        assert!(matches!(calls[0], Call::Delete(_)));
        assert_eq!(api.stops("tour-1").len(), 2);
        assert_eq!(editor.waypoints()[0].order, 1);
        assert_eq!(editor.waypoints()[1].order, 2);
    }
}
