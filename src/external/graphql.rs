use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::queries;
use crate::{
    api::{AuthAPI, StopAPI, TourAPI},
    auth::{Registration, Session, User},
    entities::{ServerId, StopInput, Tour, TourInput, TourStop},
    error::{graphql_error, invalid_input_error, upstream_error, Error},
};

#[derive(Clone, Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Clone, Debug, Deserialize)]
struct Response {
    data: Option<Map<String, Value>>,
    errors: Option<Vec<GraphQLError>>,
}

impl Response {
    /// Pulls `data.<field>` out of the envelope, surfacing the first GraphQL error.
    fn into_field<T: DeserializeOwned>(self, field: &str) -> Result<T, Error> {
        if let Some(err) = self.errors.and_then(|errors| errors.into_iter().next()) {
            return Err(graphql_error(err.message));
        }

        let value = self
            .data
            .and_then(|mut data| data.remove(field))
            .filter(|value| !value.is_null())
            .ok_or_else(upstream_error)?;

        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    access_token: String,
    refresh_token: Option<String>,
    user: User,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: ServerId,
}

#[derive(Debug, Deserialize)]
struct Removal {
    success: bool,
    message: Option<String>,
}

impl Removal {
    fn into_result(self) -> Result<(), Error> {
        if self.success {
            return Ok(());
        }

        Err(graphql_error(
            self.message.unwrap_or_else(|| "removal rejected".into()),
        ))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopVariables<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tour_id: Option<&'a str>,
    title: &'a str,
    description: &'a str,
    latitude: f64,
    longitude: f64,
    order: u32,
}

impl<'a> StopVariables<'a> {
    fn new(input: &'a StopInput) -> Self {
        Self {
            id: None,
            tour_id: None,
            title: &input.title,
            description: &input.description,
            latitude: input.coordinates.latitude(),
            longitude: input.coordinates.longitude(),
            order: input.order,
        }
    }
}

/// Maps the HTTP status of a GraphQL round trip. Anything other than 200 is a failure.
fn check_status(status_code: u16) -> Result<(), Error> {
    if (400..500).contains(&status_code) {
        tracing::warn!(status_code, "request rejected");
        return Err(invalid_input_error());
    } else if status_code != 200 {
        tracing::warn!(status_code, "upstream failure");
        return Err(upstream_error());
    }

    Ok(())
}

/// Client for the marketplace GraphQL endpoint.
#[derive(Clone)]
pub struct GraphQLClient {
    http: reqwest::Client,
    endpoint: String,
    session: Option<Session>,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            session: None,
        }
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    #[tracing::instrument(skip(self, query, variables), fields(endpoint = %self.endpoint))]
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        field: &str,
    ) -> Result<T, Error> {
        let mut req = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }));

        if let Some(session) = &self.session {
            req = req.header(AUTHORIZATION, session.bearer());
        }

        let res = req.send().await?;
        check_status(res.status().as_u16())?;

        let data: Response = res.json().await?;

        data.into_field(field)
    }
}

#[async_trait]
impl AuthAPI for GraphQLClient {
    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let payload: LoginPayload = self
            .execute(
                queries::LOGIN,
                json!({ "email": email, "password": password }),
                "login",
            )
            .await?;

        tracing::info!(user = %payload.user.username, "logged in");

        Ok(Session::new(
            payload.access_token,
            payload.refresh_token,
            payload.user,
        ))
    }

    #[tracing::instrument(skip(self, registration), fields(user = %registration.username))]
    async fn register(&self, registration: &Registration) -> Result<Session, Error> {
        registration.validate()?;

        let payload: LoginPayload = self
            .execute(
                queries::REGISTER,
                json!({ "input": registration }),
                "register",
            )
            .await?;

        tracing::info!(user = %payload.user.username, "registered");

        Ok(Session::new(
            payload.access_token,
            payload.refresh_token,
            payload.user,
        ))
    }
}

#[async_trait]
impl TourAPI for GraphQLClient {
    #[tracing::instrument(skip(self))]
    async fn find_tour(&self, id: &str) -> Result<Tour, Error> {
        self.execute(queries::GET_TOUR_BY_ID, json!({ "id": id }), "tour")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_tours_by_guide(&self, guide_id: &str) -> Result<Vec<Tour>, Error> {
        self.execute(
            queries::GET_TOURS_BY_GUIDE,
            json!({ "guideId": guide_id }),
            "toursByGuide",
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn create_tour(&self, input: &TourInput, guide_id: &str) -> Result<Tour, Error> {
        let variables = json!({
            "input": {
                "title": input.title,
                "description": input.description,
                "guideId": guide_id,
            }
        });

        self.execute(queries::CREATE_TOUR, variables, "createTour")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn update_tour(
        &self,
        id: &str,
        input: &TourInput,
        guide_id: &str,
    ) -> Result<Tour, Error> {
        let variables = json!({
            "input": {
                "id": id,
                "title": input.title,
                "description": input.description,
                "guideId": guide_id,
            }
        });

        self.execute(queries::UPDATE_TOUR, variables, "updateTour")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn remove_tour(&self, id: &str) -> Result<(), Error> {
        let removal: Removal = self
            .execute(queries::DELETE_TOUR, json!({ "id": id }), "removeTour")
            .await?;

        removal.into_result()
    }
}

#[async_trait]
impl StopAPI for GraphQLClient {
    #[tracing::instrument(skip(self))]
    async fn create_stop(&self, tour_id: &str, input: &StopInput) -> Result<ServerId, Error> {
        let variables = StopVariables {
            tour_id: Some(tour_id),
            ..StopVariables::new(input)
        };

        let created: Created = self
            .execute(
                queries::CREATE_TOUR_STEP,
                json!({ "input": variables }),
                "createTourStep",
            )
            .await?;

        Ok(created.id)
    }

    #[tracing::instrument(skip(self))]
    async fn update_stop(&self, id: &ServerId, input: &StopInput) -> Result<ServerId, Error> {
        let variables = StopVariables {
            id: Some(id.as_str()),
            ..StopVariables::new(input)
        };

        let updated: Created = self
            .execute(
                queries::UPDATE_TOUR_STEP,
                json!({ "input": variables }),
                "updateTourStep",
            )
            .await?;

        Ok(updated.id)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_stop(&self, id: &ServerId) -> Result<(), Error> {
        let removal: Removal = self
            .execute(
                queries::DELETE_TOUR_STEP,
                json!({ "id": id.as_str() }),
                "removeTourStep",
            )
            .await?;

        removal.into_result()
    }

    #[tracing::instrument(skip(self))]
    async fn find_stops(&self, tour_id: &str) -> Result<Vec<TourStop>, Error> {
        let tour = self.find_tour(tour_id).await?;

        Ok(tour.tour_steps)
    }
}
