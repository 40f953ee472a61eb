//! Compute adapter tests against a scripted in-memory API.
//!
//! Polling runs on a paused tokio clock, so waits finish instantly and call
//! counts are exact.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use nimbus_digitalocean::domain::{
    Action, ActionLink, CreateLinks, Droplet, DropletActionRequest, DropletCreated, DropletSpec,
    DropletStatus, Image, Key, Networks, Region, Size,
};
use nimbus_digitalocean::{ApiError, ComputeAdapter, ComputeApi, ComputeError, Operation};
use nimbus_id::{ActionId, DropletId, ImageId};
use nimbus_poll::{ActionStatus, PollPeriod, PollSettings, Timeouts};
use rstest::rstest;

const DROPLET: DropletId = DropletId::new(3164494);
const CREATE_ACTION: ActionId = ActionId::new(36805096);

#[derive(Default)]
struct Counters {
    create_droplet: AtomicU32,
    get_droplet: AtomicU32,
    delete_droplet: AtomicU32,
    get_action: AtomicU32,
    list_images: AtomicU32,
    get_image_by_id: AtomicU32,
    get_image_by_slug: AtomicU32,
    delete_image: AtomicU32,
}

fn count(counter: &AtomicU32) -> u32 {
    counter.load(Ordering::SeqCst)
}

/// A ComputeApi whose responses are scripted per test.
///
/// Action statuses are scripted per action id and repeat their last entry.
/// Droplet lookups likewise repeat the last scripted state.
#[derive(Default)]
struct FakeApi {
    create_links: Vec<ActionId>,
    actions: Mutex<HashMap<ActionId, VecDeque<ActionStatus>>>,
    lookups: Mutex<VecDeque<Option<DropletStatus>>>,
    images: Vec<Image>,
    regions: Vec<Region>,
    fail_action_fetch: bool,
    actions_started_at: Option<DateTime<Utc>>,
    requests: Mutex<Vec<DropletActionRequest>>,
    calls: Counters,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            create_links: vec![CREATE_ACTION],
            lookups: Mutex::new(VecDeque::from([Some(DropletStatus::Active)])),
            ..Self::default()
        }
    }

    fn script(self, id: ActionId, statuses: impl IntoIterator<Item = ActionStatus>) -> Self {
        self.actions
            .lock()
            .unwrap()
            .insert(id, statuses.into_iter().collect());
        self
    }

    fn lookups(self, states: impl IntoIterator<Item = Option<DropletStatus>>) -> Self {
        *self.lookups.lock().unwrap() = states.into_iter().collect();
        self
    }

    fn requests(&self) -> Vec<DropletActionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Id of the action a droplet action request starts.
fn action_id_for(request: &DropletActionRequest) -> ActionId {
    ActionId::new(match request {
        DropletActionRequest::PowerOff => 101,
        DropletActionRequest::PowerOn => 102,
        DropletActionRequest::Reboot => 103,
        DropletActionRequest::Snapshot { .. } => 104,
        DropletActionRequest::Shutdown => 105,
        DropletActionRequest::PowerCycle => 106,
    })
}

fn action(id: ActionId, status: ActionStatus) -> Action {
    Action {
        id,
        status,
        kind: "test".to_string(),
        started_at: None,
        completed_at: None,
        resource_id: Some(DROPLET.value()),
        resource_type: Some("droplet".to_string()),
        region_slug: Some("nyc3".to_string()),
    }
}

fn droplet(status: DropletStatus) -> Droplet {
    Droplet {
        id: DROPLET,
        name: "web-1".to_string(),
        memory: 1024,
        vcpus: 1,
        disk: 25,
        locked: false,
        status,
        created_at: None,
        features: Vec::new(),
        backup_ids: Vec::new(),
        snapshot_ids: Vec::new(),
        image: None,
        size_slug: Some("s-1vcpu-1gb".to_string()),
        size: None,
        region: None,
        networks: Networks::default(),
        tags: Vec::new(),
    }
}

fn image(id: u64, name: &str, created_day: u32) -> Image {
    Image {
        id: ImageId::new(id),
        name: name.to_string(),
        distribution: Some("Ubuntu".to_string()),
        slug: None,
        public: false,
        regions: vec!["nyc3".to_string()],
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, created_day, 0, 0, 0).unwrap()),
        kind: Some("snapshot".to_string()),
        min_disk_size: Some(25),
        size_gigabytes: Some(1.5),
    }
}

fn region(slug: &str, available: bool) -> Region {
    Region {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
        sizes: Vec::new(),
        available,
        features: Vec::new(),
    }
}

fn pop_or_repeat<T: Clone>(queue: &mut VecDeque<T>) -> Option<T> {
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

fn server_error() -> ApiError {
    ApiError::Api {
        status: 500,
        id: "server_error".to_string(),
        message: "Server was unable to give you a response.".to_string(),
    }
}

#[async_trait]
impl ComputeApi for FakeApi {
    async fn create_droplet(&self, _spec: &DropletSpec) -> Result<DropletCreated, ApiError> {
        self.calls.create_droplet.fetch_add(1, Ordering::SeqCst);
        Ok(DropletCreated {
            droplet: droplet(DropletStatus::New),
            links: CreateLinks {
                actions: self
                    .create_links
                    .iter()
                    .map(|id| ActionLink {
                        id: *id,
                        rel: "create".to_string(),
                        href: format!("https://api.digitalocean.com/v2/actions/{id}"),
                    })
                    .collect(),
            },
        })
    }

    async fn get_droplet(&self, _id: DropletId) -> Result<Option<Droplet>, ApiError> {
        self.calls.get_droplet.fetch_add(1, Ordering::SeqCst);
        let state = pop_or_repeat(&mut self.lookups.lock().unwrap()).flatten();
        Ok(state.map(droplet))
    }

    async fn list_droplets(&self) -> Result<Vec<Droplet>, ApiError> {
        let mut other = droplet(DropletStatus::Off);
        other.id = DropletId::new(1);
        Ok(vec![droplet(DropletStatus::Active), other])
    }

    async fn delete_droplet(&self, _id: DropletId) -> Result<(), ApiError> {
        self.calls.delete_droplet.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn droplet_action(
        &self,
        _id: DropletId,
        request: &DropletActionRequest,
    ) -> Result<Action, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Action {
            started_at: self.actions_started_at,
            ..action(action_id_for(request), ActionStatus::InProgress)
        })
    }

    async fn get_action(&self, id: ActionId) -> Result<Action, ApiError> {
        self.calls.get_action.fetch_add(1, Ordering::SeqCst);
        if self.fail_action_fetch {
            return Err(server_error());
        }
        let status = self
            .actions
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(pop_or_repeat)
            .unwrap_or(ActionStatus::Completed);
        Ok(Action {
            started_at: self.actions_started_at,
            ..action(id, status)
        })
    }

    async fn list_images(&self) -> Result<Vec<Image>, ApiError> {
        self.calls.list_images.fetch_add(1, Ordering::SeqCst);
        Ok(self.images.clone())
    }

    async fn get_image_by_id(&self, id: ImageId) -> Result<Option<Image>, ApiError> {
        self.calls.get_image_by_id.fetch_add(1, Ordering::SeqCst);
        Ok(self.images.iter().find(|i| i.id == id).cloned())
    }

    async fn get_image_by_slug(&self, slug: &str) -> Result<Option<Image>, ApiError> {
        self.calls.get_image_by_slug.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .images
            .iter()
            .find(|i| i.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn delete_image(&self, _id: ImageId) -> Result<(), ApiError> {
        self.calls.delete_image.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_sizes(&self) -> Result<Vec<Size>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_regions(&self) -> Result<Vec<Region>, ApiError> {
        Ok(self.regions.clone())
    }

    async fn list_keys(&self) -> Result<Vec<Key>, ApiError> {
        Ok(Vec::new())
    }
}

fn settings() -> PollSettings {
    PollSettings::new(
        Timeouts {
            node_running: Duration::from_secs(60),
            node_suspended: Duration::from_secs(20),
            node_terminated: Duration::from_secs(10),
            image_available: Duration::from_secs(30),
        },
        PollPeriod::new(Duration::from_millis(50), Duration::from_secs(1)).unwrap(),
    )
}

fn adapter(api: FakeApi) -> (ComputeAdapter<FakeApi>, Arc<FakeApi>) {
    let api = Arc::new(api);
    (ComputeAdapter::new(Arc::clone(&api), settings()), api)
}

fn spec() -> DropletSpec {
    DropletSpec::new(
        "web-1",
        "nyc3",
        "s-1vcpu-1gb",
        "ubuntu-24-04-x64".parse().unwrap(),
    )
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_create_waits_then_refetches_once() {
    let (compute, api) = adapter(FakeApi::new().script(
        CREATE_ACTION,
        [
            ActionStatus::InProgress,
            ActionStatus::InProgress,
            ActionStatus::Completed,
        ],
    ));

    let created = compute.create_and_await_running(&spec()).await.unwrap();

    assert_eq!(count(&api.calls.get_action), 3);
    assert_eq!(count(&api.calls.get_droplet), 1);
    // The create response said "new"; the result reflects the re-fetch.
    assert_eq!(created.status, DropletStatus::Active);
    assert_eq!(created.id, DROPLET);
}

#[rstest]
#[case(Vec::new())]
#[case(vec![ActionId::new(1), ActionId::new(2)])]
#[tokio::test(start_paused = true)]
async fn test_create_requires_exactly_one_action_link(#[case] links: Vec<ActionId>) {
    let mut fake = FakeApi::new();
    fake.create_links = links;
    let (compute, api) = adapter(fake);

    let err = compute.create_and_await_running(&spec()).await.unwrap_err();

    assert!(matches!(err, ComputeError::DataContract(_)));
    assert_eq!(count(&api.calls.create_droplet), 1);
    assert_eq!(count(&api.calls.get_action), 0);
    assert_eq!(count(&api.calls.get_droplet), 0);
}

#[tokio::test(start_paused = true)]
async fn test_create_errored_action_is_remote_failure() {
    let (compute, api) = adapter(
        FakeApi::new().script(CREATE_ACTION, [ActionStatus::InProgress, ActionStatus::Errored]),
    );

    let err = compute.create_and_await_running(&spec()).await.unwrap_err();

    match err {
        ComputeError::RemoteOperation {
            operation,
            action_id,
            status,
        } => {
            assert_eq!(operation, Operation::Create);
            assert_eq!(action_id, CREATE_ACTION.to_string());
            assert_eq!(status, ActionStatus::Errored);
        }
        other => panic!("expected RemoteOperation, got {other:?}"),
    }
    assert_eq!(count(&api.calls.get_droplet), 0);
}

#[tokio::test(start_paused = true)]
async fn test_create_action_fetch_failure_is_transport() {
    let mut fake = FakeApi::new();
    fake.fail_action_fetch = true;
    let (compute, api) = adapter(fake);

    let err = compute.create_and_await_running(&spec()).await.unwrap_err();

    assert!(matches!(
        err,
        ComputeError::Transport(ApiError::Api { status: 500, .. })
    ));
    assert_eq!(count(&api.calls.get_action), 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_timeout_surfaces_no_droplet() {
    let (compute, api) =
        adapter(FakeApi::new().script(CREATE_ACTION, [ActionStatus::InProgress]));

    let err = compute.create_and_await_running(&spec()).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(
        err,
        ComputeError::Timeout {
            operation: Operation::Create,
            ..
        }
    ));
    assert_eq!(count(&api.calls.get_droplet), 0);
}

// =============================================================================
// Power and reboot
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_power_off_returns_refetched_droplet() {
    let (compute, api) = adapter(
        FakeApi::new()
            .script(ActionId::new(101), [ActionStatus::InProgress, ActionStatus::Completed])
            .lookups([Some(DropletStatus::Off)]),
    );

    let droplet = compute.power_off_and_await(DROPLET).await.unwrap();

    assert_eq!(droplet.status, DropletStatus::Off);
    assert_eq!(api.requests(), vec![DropletActionRequest::PowerOff]);
    assert_eq!(count(&api.calls.get_action), 2);
}

#[rstest]
#[case::power_on(DropletActionRequest::PowerOn)]
#[case::reboot(DropletActionRequest::Reboot)]
#[case::power_cycle(DropletActionRequest::PowerCycle)]
#[tokio::test(start_paused = true)]
async fn test_running_actions(#[case] request: DropletActionRequest) {
    let (compute, api) = adapter(FakeApi::new());

    let droplet = match request {
        DropletActionRequest::PowerOn => compute.power_on_and_await(DROPLET).await,
        DropletActionRequest::PowerCycle => compute.power_cycle_and_await(DROPLET).await,
        _ => compute.reboot_and_await(DROPLET).await,
    }
    .unwrap();

    assert_eq!(droplet.status, DropletStatus::Active);
    assert_eq!(api.requests(), vec![request]);
    assert_eq!(count(&api.calls.get_droplet), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_returns_refetched_droplet() {
    let (compute, api) = adapter(
        FakeApi::new()
            .script(ActionId::new(105), [ActionStatus::InProgress, ActionStatus::Completed])
            .lookups([Some(DropletStatus::Off)]),
    );

    let droplet = compute.shutdown_and_await(DROPLET).await.unwrap();

    assert_eq!(droplet.status, DropletStatus::Off);
    assert_eq!(api.requests(), vec![DropletActionRequest::Shutdown]);
    assert_eq!(count(&api.calls.get_action), 2);
}

#[rstest]
#[case::power_off(ActionId::new(101))]
#[case::shutdown(ActionId::new(105))]
#[tokio::test(start_paused = true)]
async fn test_power_off_uses_node_suspended_timeout(#[case] action_id: ActionId) {
    let (compute, _api) =
        adapter(FakeApi::new().script(action_id, [ActionStatus::InProgress]));
    let start = tokio::time::Instant::now();

    let err = if action_id == ActionId::new(101) {
        compute.power_off_and_await(DROPLET).await.unwrap_err()
    } else {
        compute.shutdown_and_await(DROPLET).await.unwrap_err()
    };

    assert!(err.is_timeout());
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(20));
    assert!(elapsed < Duration::from_secs(21));
}

#[tokio::test(start_paused = true)]
async fn test_refetch_of_vanished_droplet_is_not_found() {
    let (compute, _api) = adapter(FakeApi::new().lookups([None]));

    let err = compute.power_on_and_await(DROPLET).await.unwrap_err();

    assert!(matches!(err, ComputeError::NotFound { kind: "droplet", .. }));
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_delete_waits_for_termination() {
    let (compute, api) =
        adapter(FakeApi::new().lookups([Some(DropletStatus::Active), None]));

    compute.delete_and_await_termination(DROPLET).await.unwrap();

    assert_eq!(count(&api.calls.delete_droplet), 1);
    assert_eq!(count(&api.calls.get_droplet), 2);
}

#[tokio::test(start_paused = true)]
async fn test_delete_without_waiting() {
    let api = Arc::new(FakeApi::new());
    let compute =
        ComputeAdapter::new(Arc::clone(&api), settings()).with_await_termination_on_delete(false);

    compute.delete_and_await_termination(DROPLET).await.unwrap();

    assert_eq!(count(&api.calls.delete_droplet), 1);
    assert_eq!(count(&api.calls.get_droplet), 0);
}

#[tokio::test(start_paused = true)]
async fn test_delete_times_out_when_droplet_lingers() {
    let (compute, _api) = adapter(FakeApi::new());

    let err = compute.delete_and_await_termination(DROPLET).await.unwrap_err();

    assert!(matches!(
        err,
        ComputeError::Timeout {
            operation: Operation::Delete,
            ..
        }
    ));
}

// =============================================================================
// Images
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_snapshot_returns_newest_image_with_name() {
    let mut fake = FakeApi::new()
        .script(ActionId::new(104), [ActionStatus::InProgress, ActionStatus::Completed]);
    fake.images = vec![
        image(1, "other", 1),
        image(2, "nightly", 2),
        image(3, "nightly", 5),
        image(4, "nightly-old", 9),
    ];
    let (compute, api) = adapter(fake);

    let image = compute
        .images()
        .snapshot_and_await_image(DROPLET, "nightly")
        .await
        .unwrap();

    assert_eq!(image.id, ImageId::new(3));
    assert_eq!(
        api.requests(),
        vec![
            DropletActionRequest::PowerOff,
            DropletActionRequest::Snapshot {
                name: Some("nightly".to_string())
            },
        ]
    );
    assert_eq!(count(&api.calls.list_images), 1);
}

#[rstest]
#[case(vec![image(2, "nightly", 2), image(3, "nightly", 3)], None)]
#[case(vec![image(2, "nightly", 2), image(5, "nightly", 4)], Some(5))]
#[case(vec![image(6, "nightly", 7), image(2, "nightly", 2)], Some(6))]
#[tokio::test(start_paused = true)]
async fn test_snapshot_ignores_images_older_than_action(
    #[case] images: Vec<Image>,
    #[case] expected: Option<u64>,
) {
    let mut fake = FakeApi::new().script(ActionId::new(104), [ActionStatus::Completed]);
    fake.actions_started_at = Some(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    fake.images = images;
    let (compute, api) = adapter(fake);

    let result = compute
        .images()
        .snapshot_and_await_image(DROPLET, "nightly")
        .await;

    match expected {
        Some(id) => assert_eq!(result.unwrap().id, ImageId::new(id)),
        None => assert!(matches!(result, Err(ComputeError::DataContract(_)))),
    }
    assert_eq!(count(&api.calls.list_images), 1);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_timeout_never_lists_images() {
    let (compute, api) =
        adapter(FakeApi::new().script(ActionId::new(104), [ActionStatus::InProgress]));

    let err = compute
        .images()
        .snapshot_and_await_image(DROPLET, "nightly")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ComputeError::Timeout {
            operation: Operation::Snapshot,
            ..
        }
    ));
    assert_eq!(count(&api.calls.list_images), 0);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_without_matching_image_is_data_contract() {
    let mut fake = FakeApi::new();
    fake.images = vec![image(1, "other", 1)];
    let (compute, api) = adapter(fake);

    let err = compute
        .images()
        .snapshot_and_await_image(DROPLET, "nightly")
        .await
        .unwrap_err();

    assert!(matches!(err, ComputeError::DataContract(_)));
    assert_eq!(count(&api.calls.list_images), 1);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_power_off_failure_skips_snapshot() {
    let (compute, api) =
        adapter(FakeApi::new().script(ActionId::new(101), [ActionStatus::Errored]));

    let err = compute
        .images()
        .snapshot_and_await_image(DROPLET, "nightly")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ComputeError::RemoteOperation {
            operation: Operation::PowerOff,
            ..
        }
    ));
    assert_eq!(api.requests(), vec![DropletActionRequest::PowerOff]);
}

#[tokio::test]
async fn test_build_image_template() {
    let (compute, _api) = adapter(FakeApi::new());

    let template = compute
        .images()
        .build_image_template(" nightly ", DROPLET)
        .await
        .unwrap();

    assert_eq!(template.name, "nightly");
    assert_eq!(template.source, DROPLET);
}

#[tokio::test]
async fn test_build_image_template_missing_droplet() {
    let (compute, _api) = adapter(FakeApi::new().lookups([None]));

    let err = compute
        .images()
        .build_image_template("nightly", DROPLET)
        .await
        .unwrap_err();

    assert!(matches!(err, ComputeError::NotFound { .. }));
}

#[tokio::test]
async fn test_empty_image_name_rejected() {
    let (compute, api) = adapter(FakeApi::new());

    let err = compute
        .images()
        .snapshot_and_await_image(DROPLET, "  ")
        .await
        .unwrap_err();

    assert!(matches!(err, ComputeError::InvalidArgument(_)));
    assert!(api.requests().is_empty());
}

#[rstest]
#[case("7555620", 1, 0)]
#[case("ubuntu-24-04-x64", 0, 1)]
#[tokio::test]
async fn test_get_image_hits_one_endpoint(
    #[case] reference: &str,
    #[case] by_id: u32,
    #[case] by_slug: u32,
) {
    let mut fake = FakeApi::new();
    let mut public = image(7555621, "24.04 (LTS) x64", 1);
    public.slug = Some("ubuntu-24-04-x64".to_string());
    fake.images = vec![image(7555620, "nightly", 1), public];
    let (compute, api) = adapter(fake);

    let found = compute.get_image(reference).await.unwrap();

    assert!(found.is_some());
    assert_eq!(count(&api.calls.get_image_by_id), by_id);
    assert_eq!(count(&api.calls.get_image_by_slug), by_slug);
}

#[tokio::test]
async fn test_delete_image_by_slug_rejected() {
    let (compute, api) = adapter(FakeApi::new());

    let err = compute.delete_image("ubuntu-24-04-x64").await.unwrap_err();

    assert!(matches!(err, ComputeError::InvalidArgument(_)));
    assert_eq!(count(&api.calls.delete_image), 0);

    compute.delete_image("7555620").await.unwrap();
    assert_eq!(count(&api.calls.delete_image), 1);
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_list_regions_only_available() {
    let mut fake = FakeApi::new();
    fake.regions = vec![region("nyc1", false), region("nyc3", true), region("ams3", true)];
    let (compute, _api) = adapter(fake);

    let slugs: Vec<String> = compute
        .list_regions()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.slug)
        .collect();

    assert_eq!(slugs, vec!["nyc3", "ams3"]);
}

#[tokio::test]
async fn test_list_droplets_by_ids() {
    let (compute, _api) = adapter(FakeApi::new());

    let droplets = compute
        .list_droplets_by_ids(&[DROPLET, DropletId::new(42)])
        .await
        .unwrap();

    assert_eq!(droplets.len(), 1);
    assert_eq!(droplets[0].id, DROPLET);
}
