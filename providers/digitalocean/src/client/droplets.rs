use nimbus_id::DropletId;

use super::DigitalOceanClient;
use crate::domain::{Action, Droplet, DropletActionRequest, DropletCreated, DropletSpec};
use crate::error::ApiError;

impl DigitalOceanClient {
    /// `POST /droplets`. Returns the new droplet and links to its create action.
    pub async fn create_droplet(&self, spec: &DropletSpec) -> Result<DropletCreated, ApiError> {
        self.post("/droplets", spec).await
    }

    /// `GET /droplets/{id}`, `None` if the droplet does not exist.
    pub async fn get_droplet(&self, id: DropletId) -> Result<Option<Droplet>, ApiError> {
        self.get_optional(&format!("/droplets/{id}"), "droplet")
            .await
    }

    /// `GET /droplets`, all pages.
    pub async fn list_droplets(&self) -> Result<Vec<Droplet>, ApiError> {
        self.list("/droplets", "droplets").await
    }

    /// `DELETE /droplets/{id}`
    pub async fn delete_droplet(&self, id: DropletId) -> Result<(), ApiError> {
        self.delete(&format!("/droplets/{id}")).await
    }

    /// `POST /droplets/{id}/actions`
    pub async fn droplet_action(
        &self,
        id: DropletId,
        request: &DropletActionRequest,
    ) -> Result<Action, ApiError> {
        self.post_for(&format!("/droplets/{id}/actions"), request, "action")
            .await
    }
}
