use crate::api::API;
use crate::editor::{RouteEditor, SaveSummary};
use crate::entities::{Tour, TourInput};
use crate::error::{invalid_input_error, Error};

/// A tour being created or edited: basic info plus its route.
#[derive(Debug, Default)]
pub struct TourDraft {
    id: Option<String>,
    pub info: TourInput,
    pub route: RouteEditor,
}

impl TourDraft {
    pub fn new(info: TourInput) -> Self {
        Self {
            id: None,
            info,
            route: RouteEditor::new(),
        }
    }

    pub fn from_tour(tour: Tour) -> Result<Self, Error> {
        Ok(Self {
            id: Some(tour.id),
            info: TourInput::new(tour.title, tour.description),
            route: RouteEditor::load(tour.tour_steps)?,
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Persists the tour info, then reconciles the route under the tour id.
    #[tracing::instrument(skip(self, api), fields(tour = ?self.id))]
    pub async fn save<A>(&mut self, api: &A, guide_id: &str) -> Result<(String, SaveSummary), Error>
    where
        A: API + ?Sized,
    {
        self.info.validate()?;
        if !self.route.is_publishable() {
            tracing::info!(stops = self.route.len(), "a tour needs at least two stops");
            return Err(invalid_input_error());
        }

        let tour_id = match &self.id {
            Some(id) => {
                api.update_tour(id, &self.info, guide_id).await?;
                id.clone()
            }
            None => {
                let tour = api.create_tour(&self.info, guide_id).await?;
                tracing::info!(id = %tour.id, "tour created");
                self.id = Some(tour.id.clone());
                tour.id
            }
        };

        let summary = self.route.save(api, &tour_id).await?;

        Ok((tour_id, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TourAPI;
    use crate::fake::{Call, FakeAPI};

    #[tokio::test]
    async fn new_tours_are_created_before_their_stops() {
        let api = FakeAPI::new();
        let mut draft = TourDraft::new(TourInput::new("Old town", "Walk the colonial quarter"));
        draft.route.add_at(-34.61, -58.37).unwrap();
        draft.route.add_at(-34.62, -58.38).unwrap();

        let (tour_id, summary) = draft.save(&api, "g-1").await.unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(draft.id(), Some(tour_id.as_str()));
        let calls = api.calls();
        assert!(matches!(calls[0], Call::CreateTour(_)));
        assert!(calls[1..].iter().all(|c| matches!(c, Call::Create { .. })));
    }

    #[tokio::test]
    async fn incomplete_drafts_are_rejected_without_calls() {
        let api = FakeAPI::new();
        let mut draft = TourDraft::new(TourInput::new("Old town", "Walk the colonial quarter"));
        draft.route.add_at(-34.61, -58.37).unwrap();

        assert_eq!(draft.save(&api, "g-1").await.unwrap_err().code, 101);

        draft.route.add_at(-34.62, -58.38).unwrap();
        draft.info.title.clear();
        assert!(draft.save(&api, "g-1").await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn a_failed_route_save_does_not_recreate_the_tour() {
        let api = FakeAPI::new();
        let mut draft = TourDraft::new(TourInput::new("Old town", "Walk the colonial quarter"));
        draft.route.add_at(-34.61, -58.37).unwrap();
        draft.route.add_at(-34.62, -58.38).unwrap();
        api.fail_on_call(3);

        assert!(draft.save(&api, "g-1").await.is_err());
        assert!(draft.id().is_some());

        draft.save(&api, "g-1").await.unwrap();
        let tours = api.find_tours_by_guide("g-1").await.unwrap();
        assert_eq!(tours.len(), 1);
        assert!(api.find_tours_by_guide("g-2").await.unwrap().is_empty());
        assert_eq!(tours[0].tour_steps.len(), 2);
    }

    #[tokio::test]
    async fn drafts_save_through_a_shared_api_handle() {
        let fake = std::sync::Arc::new(FakeAPI::new());
        let api = fake.clone() as crate::api::DynAPI;
        let mut draft = TourDraft::new(TourInput::new("Old town", "Walk the colonial quarter"));
        draft.route.add_at(-34.61, -58.37).unwrap();
        draft.route.add_at(-34.62, -58.38).unwrap();

        let (tour_id, summary) = draft.save(&*api, "g-1").await.unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(fake.stops(&tour_id).len(), 2);
    }
}
