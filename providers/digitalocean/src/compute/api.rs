use async_trait::async_trait;
use nimbus_id::{ActionId, DropletId, ImageId};

use crate::client::DigitalOceanClient;
use crate::domain::{
    Action, Droplet, DropletActionRequest, DropletCreated, DropletSpec, Image, Key, Region, Size,
};
use crate::error::ApiError;

/// The DigitalOcean calls the compute adapter depends on.
///
/// Implemented by [`DigitalOceanClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    async fn create_droplet(&self, spec: &DropletSpec) -> Result<DropletCreated, ApiError>;

    /// `Ok(None)` if the droplet does not exist.
    async fn get_droplet(&self, id: DropletId) -> Result<Option<Droplet>, ApiError>;

    async fn list_droplets(&self) -> Result<Vec<Droplet>, ApiError>;

    async fn delete_droplet(&self, id: DropletId) -> Result<(), ApiError>;

    async fn droplet_action(
        &self,
        id: DropletId,
        request: &DropletActionRequest,
    ) -> Result<Action, ApiError>;

    async fn get_action(&self, id: ActionId) -> Result<Action, ApiError>;

    async fn list_images(&self) -> Result<Vec<Image>, ApiError>;

    async fn get_image_by_id(&self, id: ImageId) -> Result<Option<Image>, ApiError>;

    async fn get_image_by_slug(&self, slug: &str) -> Result<Option<Image>, ApiError>;

    async fn delete_image(&self, id: ImageId) -> Result<(), ApiError>;

    async fn list_sizes(&self) -> Result<Vec<Size>, ApiError>;

    async fn list_regions(&self) -> Result<Vec<Region>, ApiError>;

    async fn list_keys(&self) -> Result<Vec<Key>, ApiError>;
}

#[async_trait]
impl ComputeApi for DigitalOceanClient {
    async fn create_droplet(&self, spec: &DropletSpec) -> Result<DropletCreated, ApiError> {
        DigitalOceanClient::create_droplet(self, spec).await
    }

    async fn get_droplet(&self, id: DropletId) -> Result<Option<Droplet>, ApiError> {
        DigitalOceanClient::get_droplet(self, id).await
    }

    async fn list_droplets(&self) -> Result<Vec<Droplet>, ApiError> {
        DigitalOceanClient::list_droplets(self).await
    }

    async fn delete_droplet(&self, id: DropletId) -> Result<(), ApiError> {
        DigitalOceanClient::delete_droplet(self, id).await
    }

    async fn droplet_action(
        &self,
        id: DropletId,
        request: &DropletActionRequest,
    ) -> Result<Action, ApiError> {
        DigitalOceanClient::droplet_action(self, id, request).await
    }

    async fn get_action(&self, id: ActionId) -> Result<Action, ApiError> {
        DigitalOceanClient::get_action(self, id).await
    }

    async fn list_images(&self) -> Result<Vec<Image>, ApiError> {
        DigitalOceanClient::list_images(self).await
    }

    async fn get_image_by_id(&self, id: ImageId) -> Result<Option<Image>, ApiError> {
        DigitalOceanClient::get_image_by_id(self, id).await
    }

    async fn get_image_by_slug(&self, slug: &str) -> Result<Option<Image>, ApiError> {
        DigitalOceanClient::get_image_by_slug(self, slug).await
    }

    async fn delete_image(&self, id: ImageId) -> Result<(), ApiError> {
        DigitalOceanClient::delete_image(self, id).await
    }

    async fn list_sizes(&self) -> Result<Vec<Size>, ApiError> {
        DigitalOceanClient::list_sizes(self).await
    }

    async fn list_regions(&self) -> Result<Vec<Region>, ApiError> {
        DigitalOceanClient::list_regions(self).await
    }

    async fn list_keys(&self) -> Result<Vec<Key>, ApiError> {
        DigitalOceanClient::list_keys(self).await
    }
}
