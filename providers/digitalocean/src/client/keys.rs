use nimbus_id::KeyId;

use super::DigitalOceanClient;
use crate::domain::{Key, NewKey};
use crate::error::ApiError;

impl DigitalOceanClient {
    /// `GET /account/keys`
    pub async fn list_keys(&self) -> Result<Vec<Key>, ApiError> {
        self.list("/account/keys", "ssh_keys").await
    }

    /// `POST /account/keys`
    pub async fn create_key(&self, key: &NewKey) -> Result<Key, ApiError> {
        self.post_for("/account/keys", key, "ssh_key").await
    }

    /// `DELETE /account/keys/{id}`
    pub async fn delete_key(&self, id: KeyId) -> Result<(), ApiError> {
        self.delete(&format!("/account/keys/{id}")).await
    }
}
