use super::DigitalOceanClient;
use crate::domain::{Region, Size};
use crate::error::ApiError;

impl DigitalOceanClient {
    /// `GET /sizes`
    pub async fn list_sizes(&self) -> Result<Vec<Size>, ApiError> {
        self.list("/sizes", "sizes").await
    }

    /// `GET /regions`
    pub async fn list_regions(&self) -> Result<Vec<Region>, ApiError> {
        self.list("/regions", "regions").await
    }
}
