//! In-memory stand-in for the marketplace API. Only the crate's unit and
//! integration tests use it; `--dry-run` prints the save plan without any API.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{StopAPI, TourAPI};
use crate::entities::{ServerId, StopInput, Tour, TourInput, TourStop};
use crate::error::{invalid_input_error, upstream_error, Error};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateTour(TourInput),
    UpdateTour { id: String, input: TourInput },
    RemoveTour(String),
    Create { tour_id: String, input: StopInput },
    Update { id: ServerId, input: StopInput },
    Delete(ServerId),
}

#[derive(Default)]
struct State {
    tours: HashMap<String, Tour>,
    // tour id -> guide id
    guides: HashMap<String, String>,
    stops: HashMap<String, Vec<TourStop>>,
    calls: Vec<Call>,
    attempts: usize,
    fail_at: Option<usize>,
    next_id: u64,
}

impl State {
    fn issue_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    // counts every mutating call and fails the armed one
    fn attempt(&mut self) -> Result<(), Error> {
        self.attempts += 1;
        if self.fail_at == Some(self.attempts) {
            self.fail_at = None;
            return Err(upstream_error());
        }

        Ok(())
    }

    fn owner_of(&self, id: &ServerId) -> Option<String> {
        self.stops
            .iter()
            .find(|(_, stops)| stops.iter().any(|s| &s.id == id))
            .map(|(tour_id, _)| tour_id.clone())
    }
}

#[derive(Default)]
pub struct FakeAPI {
    state: Mutex<State>,
}

impl FakeAPI {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn seed_tour(&self, tour: Tour, guide_id: &str) {
        let mut state = self.state();
        state.guides.insert(tour.id.clone(), guide_id.into());
        state.stops.insert(tour.id.clone(), tour.tour_steps.clone());
        state.tours.insert(tour.id.clone(), tour);
    }

    pub fn seed_stops(&self, tour_id: &str, stops: Vec<TourStop>) {
        self.state().stops.insert(tour_id.into(), stops);
    }

    /// Makes the `n`th mutating call from now on (1-based) fail once.
    pub fn fail_on_call(&self, n: usize) {
        let mut state = self.state();
        state.fail_at = Some(state.attempts + n);
    }

    /// Successful mutating calls, in the order they arrived.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn stops(&self, tour_id: &str) -> Vec<TourStop> {
        let mut stops = self.state().stops.get(tour_id).cloned().unwrap_or_default();
        stops.sort_by_key(|s| s.order);
        stops
    }
}

#[async_trait]
impl StopAPI for FakeAPI {
    async fn create_stop(&self, tour_id: &str, input: &StopInput) -> Result<ServerId, Error> {
        let mut state = self.state();
        state.attempt()?;

        let id = ServerId(state.issue_id("stop"));
        let stop = TourStop {
            id: id.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            latitude: input.coordinates.latitude(),
            longitude: input.coordinates.longitude(),
            order: input.order,
        };
        state.stops.entry(tour_id.into()).or_default().push(stop);
        state.calls.push(Call::Create {
            tour_id: tour_id.into(),
            input: input.clone(),
        });

        Ok(id)
    }

    async fn update_stop(&self, id: &ServerId, input: &StopInput) -> Result<ServerId, Error> {
        let mut state = self.state();
        state.attempt()?;

        let tour_id = state.owner_of(id).ok_or_else(invalid_input_error)?;
        if let Some(stop) = state
            .stops
            .get_mut(&tour_id)
            .and_then(|stops| stops.iter_mut().find(|s| &s.id == id))
        {
            stop.title = input.title.clone();
            stop.description = input.description.clone();
            stop.latitude = input.coordinates.latitude();
            stop.longitude = input.coordinates.longitude();
            stop.order = input.order;
        }
        state.calls.push(Call::Update {
            id: id.clone(),
            input: input.clone(),
        });

        Ok(id.clone())
    }

    async fn delete_stop(&self, id: &ServerId) -> Result<(), Error> {
        let mut state = self.state();
        state.attempt()?;

        let tour_id = state.owner_of(id).ok_or_else(invalid_input_error)?;
        if let Some(stops) = state.stops.get_mut(&tour_id) {
            stops.retain(|s| &s.id != id);
        }
        state.calls.push(Call::Delete(id.clone()));

        Ok(())
    }

    async fn find_stops(&self, tour_id: &str) -> Result<Vec<TourStop>, Error> {
        Ok(self.stops(tour_id))
    }
}

#[async_trait]
impl TourAPI for FakeAPI {
    async fn find_tour(&self, id: &str) -> Result<Tour, Error> {
        let mut tour = self
            .state()
            .tours
            .get(id)
            .cloned()
            .ok_or_else(invalid_input_error)?;
        tour.tour_steps = self.stops(id);

        Ok(tour)
    }

    async fn find_tours_by_guide(&self, guide_id: &str) -> Result<Vec<Tour>, Error> {
        let ids: Vec<String> = self
            .state()
            .guides
            .iter()
            .filter(|(_, guide)| guide.as_str() == guide_id)
            .map(|(tour_id, _)| tour_id.clone())
            .collect();
        let mut tours = Vec::with_capacity(ids.len());
        for id in ids {
            tours.push(self.find_tour(&id).await?);
        }
        tours.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(tours)
    }

    async fn create_tour(&self, input: &TourInput, guide_id: &str) -> Result<Tour, Error> {
        let mut state = self.state();
        state.attempt()?;

        let tour = Tour {
            id: state.issue_id("tour"),
            title: input.title.clone(),
            description: input.description.clone(),
            status: None,
            created_at: None,
            tour_steps: Vec::new(),
        };
        state.tours.insert(tour.id.clone(), tour.clone());
        state.guides.insert(tour.id.clone(), guide_id.into());
        state.calls.push(Call::CreateTour(input.clone()));

        Ok(tour)
    }

    async fn update_tour(
        &self,
        id: &str,
        input: &TourInput,
        _guide_id: &str,
    ) -> Result<Tour, Error> {
        let mut state = self.state();
        state.attempt()?;

        let tour = state.tours.get_mut(id).ok_or_else(invalid_input_error)?;
        tour.title = input.title.clone();
        tour.description = input.description.clone();
        let tour = tour.clone();
        state.calls.push(Call::UpdateTour {
            id: id.into(),
            input: input.clone(),
        });

        Ok(tour)
    }

    async fn remove_tour(&self, id: &str) -> Result<(), Error> {
        let mut state = self.state();
        state.attempt()?;

        state.tours.remove(id).ok_or_else(invalid_input_error)?;
        state.stops.remove(id);
        state.guides.remove(id);
        state.calls.push(Call::RemoveTour(id.into()));

        Ok(())
    }
}
