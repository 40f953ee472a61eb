use std::collections::HashSet;
use std::sync::Arc;

use nimbus_id::{DropletId, ImageId, ResourceRef};
use nimbus_poll::{await_action, await_termination, ActionRef, PollSettings, WaitKind};
use tracing::{debug, info};

use super::lookup::{Actions, Droplets};
use super::{ComputeApi, ImageExtension};
use crate::client::DigitalOceanClient;
use crate::config::Config;
use crate::domain::{Action, Droplet, DropletActionRequest, DropletSpec, Image, Key, Region, Size};
use crate::error::{ApiError, ComputeError, Operation};

/// Synchronous-looking compute operations over the DigitalOcean API.
///
/// Each call owns its action reference and copies its poll configuration,
/// so independent operations can run concurrently on one adapter.
pub struct ComputeAdapter<A: ?Sized = DigitalOceanClient> {
    api: Arc<A>,
    poll: PollSettings,
    await_termination_on_delete: bool,
}

impl<A: ?Sized> Clone for ComputeAdapter<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            poll: self.poll,
            await_termination_on_delete: self.await_termination_on_delete,
        }
    }
}

impl ComputeAdapter<DigitalOceanClient> {
    /// Build an adapter with a real HTTP client.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = DigitalOceanClient::new(config)?;
        Ok(Self::new(Arc::new(client), config.poll)
            .with_await_termination_on_delete(config.await_termination_on_delete))
    }
}

impl<A: ComputeApi + ?Sized> ComputeAdapter<A> {
    pub fn new(api: Arc<A>, poll: PollSettings) -> Self {
        Self {
            api,
            poll,
            await_termination_on_delete: true,
        }
    }

    /// Whether delete waits for the droplet to disappear (default `true`).
    pub fn with_await_termination_on_delete(mut self, enabled: bool) -> Self {
        self.await_termination_on_delete = enabled;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn poll_settings(&self) -> &PollSettings {
        &self.poll
    }

    /// Image operations built on this adapter.
    pub fn images(&self) -> ImageExtension<'_, A> {
        ImageExtension::new(self)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a droplet and wait for its create action to complete.
    pub async fn create_and_await_running(
        &self,
        spec: &DropletSpec,
    ) -> Result<Droplet, ComputeError> {
        let created = self.api.create_droplet(spec).await?;
        let droplet_id = created.droplet.id;

        let action_id = match created.links.actions.as_slice() {
            [link] => link.id,
            links => {
                return Err(ComputeError::DataContract(format!(
                    "create of droplet {droplet_id} returned {} action links, expected 1",
                    links.len()
                )))
            }
        };

        info!(
            droplet_id = %droplet_id,
            action_id = %action_id,
            name = %spec.name,
            "Droplet created, waiting for it to become active"
        );

        self.wait_for(Operation::Create, WaitKind::NodeRunning, ActionRef::Issued(action_id))
            .await?;
        self.refetch(droplet_id).await
    }

    /// Power a droplet off and wait until it is off.
    pub async fn power_off_and_await(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.run_action(id, DropletActionRequest::PowerOff, Operation::PowerOff)
            .await?;
        self.refetch(id).await
    }

    /// Power a droplet on and wait until it is running.
    pub async fn power_on_and_await(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.run_action(id, DropletActionRequest::PowerOn, Operation::PowerOn)
            .await?;
        self.refetch(id).await
    }

    /// Gracefully shut a droplet down and wait until it is off.
    pub async fn shutdown_and_await(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.run_action(id, DropletActionRequest::Shutdown, Operation::Shutdown)
            .await?;
        self.refetch(id).await
    }

    /// Hard-reset a droplet and wait until it is running again.
    pub async fn power_cycle_and_await(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.run_action(id, DropletActionRequest::PowerCycle, Operation::PowerCycle)
            .await?;
        self.refetch(id).await
    }

    /// Reboot a droplet and wait until it is running again.
    pub async fn reboot_and_await(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.run_action(id, DropletActionRequest::Reboot, Operation::Reboot)
            .await?;
        self.refetch(id).await
    }

    /// Delete a droplet and, if configured, wait until lookups stop finding it.
    pub async fn delete_and_await_termination(&self, id: DropletId) -> Result<(), ComputeError> {
        self.api.delete_droplet(id).await?;
        info!(droplet_id = %id, "Droplet delete accepted");

        if !self.await_termination_on_delete {
            return Ok(());
        }

        let config = self.poll.config_for(WaitKind::NodeTerminated);
        await_termination(&Droplets(self.api.as_ref()), &config, &id)
            .await
            .map_err(|e| ComputeError::from_wait(Operation::Delete, e))?;

        info!(droplet_id = %id, "Droplet terminated");
        Ok(())
    }

    /// Issue a droplet action and wait for it with the operation's timeout.
    pub(crate) async fn run_action(
        &self,
        id: DropletId,
        request: DropletActionRequest,
        operation: Operation,
    ) -> Result<Action, ComputeError> {
        let action = self.api.droplet_action(id, &request).await?;
        info!(
            droplet_id = %id,
            action_id = %action.id,
            operation = %operation,
            "Droplet action started"
        );

        self.wait_for(operation, wait_kind(operation), action.into())
            .await
    }

    pub(crate) async fn wait_for(
        &self,
        operation: Operation,
        kind: WaitKind,
        action: ActionRef<Action>,
    ) -> Result<Action, ComputeError> {
        let config = self.poll.config_for(kind);
        debug!(
            action_id = %action.id(),
            wait = %kind,
            timeout_ms = config.timeout().as_millis() as u64,
            "Waiting for action"
        );

        await_action(&Actions(self.api.as_ref()), &config, action)
            .await
            .map_err(|e| ComputeError::from_wait(operation, e))
    }

    /// Fetch the droplet's current state after a completed action.
    async fn refetch(&self, id: DropletId) -> Result<Droplet, ComputeError> {
        self.api
            .get_droplet(id)
            .await?
            .ok_or_else(|| ComputeError::not_found(DropletId::KIND, id))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_droplet(&self, id: DropletId) -> Result<Option<Droplet>, ComputeError> {
        Ok(self.api.get_droplet(id).await?)
    }

    pub async fn list_droplets(&self) -> Result<Vec<Droplet>, ComputeError> {
        Ok(self.api.list_droplets().await?)
    }

    /// Droplets whose id is in `ids`. Unknown ids are skipped.
    pub async fn list_droplets_by_ids(
        &self,
        ids: &[DropletId],
    ) -> Result<Vec<Droplet>, ComputeError> {
        let wanted: HashSet<DropletId> = ids.iter().copied().collect();
        let mut droplets = self.api.list_droplets().await?;
        droplets.retain(|d| wanted.contains(&d.id));
        Ok(droplets)
    }

    pub async fn list_images(&self) -> Result<Vec<Image>, ComputeError> {
        Ok(self.api.list_images().await?)
    }

    /// Look an image up by numeric id or by slug.
    ///
    /// Numeric input only ever hits the id endpoint.
    pub async fn get_image(&self, reference: &str) -> Result<Option<Image>, ComputeError> {
        let image = match parse_image_ref(reference)? {
            ResourceRef::Id(id) => self.api.get_image_by_id(id).await?,
            ResourceRef::Slug(slug) => self.api.get_image_by_slug(&slug).await?,
        };
        Ok(image)
    }

    /// Delete a private image. Slugs name public images and are rejected.
    pub async fn delete_image(&self, reference: &str) -> Result<(), ComputeError> {
        match parse_image_ref(reference)? {
            ResourceRef::Id(id) => {
                self.api.delete_image(id).await?;
                info!(image_id = %id, "Image deleted");
                Ok(())
            }
            ResourceRef::Slug(slug) => Err(ComputeError::InvalidArgument(format!(
                "image {slug:?} is public and cannot be deleted; use a numeric image id"
            ))),
        }
    }

    pub async fn list_sizes(&self) -> Result<Vec<Size>, ComputeError> {
        Ok(self.api.list_sizes().await?)
    }

    /// Regions currently accepting new droplets.
    pub async fn list_regions(&self) -> Result<Vec<Region>, ComputeError> {
        let mut regions = self.api.list_regions().await?;
        regions.retain(|r| r.available);
        Ok(regions)
    }

    pub async fn list_keys(&self) -> Result<Vec<Key>, ComputeError> {
        Ok(self.api.list_keys().await?)
    }
}

fn parse_image_ref(reference: &str) -> Result<ResourceRef<ImageId>, ComputeError> {
    ResourceRef::parse(reference.trim())
        .map_err(|e| ComputeError::InvalidArgument(format!("image reference: {e}")))
}

fn wait_kind(operation: Operation) -> WaitKind {
    match operation {
        Operation::Create | Operation::PowerOn | Operation::Reboot | Operation::PowerCycle => {
            WaitKind::NodeRunning
        }
        Operation::PowerOff | Operation::Shutdown => WaitKind::NodeSuspended,
        Operation::Delete => WaitKind::NodeTerminated,
        Operation::Snapshot => WaitKind::ImageAvailable,
    }
}
