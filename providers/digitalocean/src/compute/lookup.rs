//! Adapters from [`ComputeApi`] to the polling traits.

use async_trait::async_trait;
use nimbus_id::{ActionId, DropletId};
use nimbus_poll::{ActionFetcher, ResourceLookup};

use super::ComputeApi;
use crate::domain::{Action, Droplet};
use crate::error::ApiError;

/// Fetches actions through a [`ComputeApi`].
pub struct Actions<'a, A: ?Sized>(pub &'a A);

#[async_trait]
impl<'a, A: ComputeApi + ?Sized> ActionFetcher for Actions<'a, A> {
    type Action = Action;
    type Error = ApiError;

    async fn fetch_action(&self, id: &ActionId) -> Result<Action, ApiError> {
        self.0.get_action(*id).await
    }
}

/// Looks droplets up by id through a [`ComputeApi`].
pub struct Droplets<'a, A: ?Sized>(pub &'a A);

#[async_trait]
impl<'a, A: ComputeApi + ?Sized> ResourceLookup for Droplets<'a, A> {
    type Id = DropletId;
    type Resource = Droplet;
    type Error = ApiError;

    async fn find(&self, id: &DropletId) -> Result<Option<Droplet>, ApiError> {
        self.0.get_droplet(*id).await
    }
}
