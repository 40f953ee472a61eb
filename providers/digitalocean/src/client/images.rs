use nimbus_id::ImageId;

use super::DigitalOceanClient;
use crate::domain::Image;
use crate::error::ApiError;

impl DigitalOceanClient {
    /// `GET /images`, all pages.
    pub async fn list_images(&self) -> Result<Vec<Image>, ApiError> {
        self.list("/images", "images").await
    }

    /// `GET /images/{id}`
    pub async fn get_image_by_id(&self, id: ImageId) -> Result<Option<Image>, ApiError> {
        self.get_optional(&format!("/images/{id}"), "image").await
    }

    /// `GET /images/{slug}`, with the slug percent-encoded.
    pub async fn get_image_by_slug(&self, slug: &str) -> Result<Option<Image>, ApiError> {
        let url = self.member_url("/images", slug)?;
        self.get_optional_at(url.to_string(), "image").await
    }

    /// `DELETE /images/{id}`
    pub async fn delete_image(&self, id: ImageId) -> Result<(), ApiError> {
        self.delete(&format!("/images/{id}")).await
    }
}
