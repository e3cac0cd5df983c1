use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{Registration, Session};
use crate::entities::{ServerId, StopInput, Tour, TourInput, TourStop};
use crate::error::Error;

#[async_trait]
pub trait AuthAPI {
    async fn login(&self, email: &str, password: &str) -> Result<Session, Error>;
    async fn register(&self, registration: &Registration) -> Result<Session, Error>;
}

#[async_trait]
pub trait TourAPI {
    async fn find_tour(&self, id: &str) -> Result<Tour, Error>;
    async fn find_tours_by_guide(&self, guide_id: &str) -> Result<Vec<Tour>, Error>;
    async fn create_tour(&self, input: &TourInput, guide_id: &str) -> Result<Tour, Error>;
    async fn update_tour(&self, id: &str, input: &TourInput, guide_id: &str)
        -> Result<Tour, Error>;
    async fn remove_tour(&self, id: &str) -> Result<(), Error>;
}

/// The stop operations a route save is reconciled through.
#[async_trait]
pub trait StopAPI {
    async fn create_stop(&self, tour_id: &str, input: &StopInput) -> Result<ServerId, Error>;
    async fn update_stop(&self, id: &ServerId, input: &StopInput) -> Result<ServerId, Error>;
    async fn delete_stop(&self, id: &ServerId) -> Result<(), Error>;
    async fn find_stops(&self, tour_id: &str) -> Result<Vec<TourStop>, Error>;
}

pub trait API: TourAPI + StopAPI {}

impl<T: TourAPI + StopAPI> API for T {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
