use nimbus_id::ActionId;

use super::DigitalOceanClient;
use crate::domain::Action;
use crate::error::ApiError;

impl DigitalOceanClient {
    /// `GET /actions/{id}`
    pub async fn get_action(&self, id: ActionId) -> Result<Action, ApiError> {
        self.get(&format!("/actions/{id}"), "action").await
    }
}
