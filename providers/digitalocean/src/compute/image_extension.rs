//! Creating images from droplets.

use chrono::{DateTime, Utc};
use nimbus_id::DropletId;
use nimbus_poll::{ActionRef, WaitKind};
use tracing::{info, warn};

use super::{ComputeAdapter, ComputeApi};
use crate::domain::{DropletActionRequest, Image};
use crate::error::{ComputeError, Operation};

/// What to snapshot and what to call the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTemplate {
    pub name: String,
    pub source: DropletId,
}

/// Snapshot operations, borrowed from a [`ComputeAdapter`].
pub struct ImageExtension<'a, A: ?Sized> {
    adapter: &'a ComputeAdapter<A>,
}

impl<'a, A: ComputeApi + ?Sized> ImageExtension<'a, A> {
    pub(crate) fn new(adapter: &'a ComputeAdapter<A>) -> Self {
        Self { adapter }
    }

    /// Describe an image to be taken from an existing droplet.
    pub async fn build_image_template(
        &self,
        name: &str,
        droplet_id: DropletId,
    ) -> Result<ImageTemplate, ComputeError> {
        let name = validate_name(name)?;

        if self.adapter.api().get_droplet(droplet_id).await?.is_none() {
            return Err(ComputeError::not_found(DropletId::KIND, droplet_id));
        }

        Ok(ImageTemplate {
            name: name.to_string(),
            source: droplet_id,
        })
    }

    /// Snapshot the template's droplet and return the resulting image.
    pub async fn create_image(&self, template: &ImageTemplate) -> Result<Image, ComputeError> {
        self.snapshot_and_await_image(template.source, &template.name)
            .await
    }

    /// Power the droplet off, snapshot it and wait for the image.
    ///
    /// The image is located by exact name once the snapshot action has
    /// completed. When the action reports its start time, images with that
    /// name created earlier are ignored. If no image qualifies the call
    /// fails with [`ComputeError::DataContract`]; a timeout never lists
    /// images.
    pub async fn snapshot_and_await_image(
        &self,
        droplet_id: DropletId,
        name: &str,
    ) -> Result<Image, ComputeError> {
        let name = validate_name(name)?;

        self.adapter
            .run_action(droplet_id, DropletActionRequest::PowerOff, Operation::PowerOff)
            .await?;

        let request = DropletActionRequest::Snapshot {
            name: Some(name.to_string()),
        };
        let action = self.adapter.api().droplet_action(droplet_id, &request).await?;
        info!(
            droplet_id = %droplet_id,
            action_id = %action.id,
            image_name = %name,
            "Snapshot started"
        );
        let issued_started_at = action.started_at;

        let completed = self
            .adapter
            .wait_for(
                Operation::Snapshot,
                WaitKind::ImageAvailable,
                ActionRef::Observed(action),
            )
            .await?;
        let started_at = completed.started_at.or(issued_started_at);

        let images = self.adapter.api().list_images().await?;
        match newest_snapshot(images, name, started_at) {
            Some(image) => {
                info!(image_id = %image.id, image_name = %name, "Snapshot image available");
                Ok(image)
            }
            None => {
                warn!(droplet_id = %droplet_id, image_name = %name, "Snapshot completed but image not listed");
                Err(ComputeError::DataContract(format!(
                    "snapshot {name:?} of droplet {droplet_id} completed but no image has that name"
                )))
            }
        }
    }
}

/// Newest image named `name`, not older than the snapshot action.
fn newest_snapshot(
    images: Vec<Image>,
    name: &str,
    started_at: Option<DateTime<Utc>>,
) -> Option<Image> {
    images
        .into_iter()
        .filter(|image| image.name == name)
        .filter(|image| match (started_at, image.created_at) {
            (Some(started), Some(created)) => created >= started,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .max_by_key(|image| image.created_at)
}

fn validate_name(name: &str) -> Result<&str, ComputeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ComputeError::InvalidArgument(
            "image name must not be empty".to_string(),
        ));
    }
    Ok(name)
}
