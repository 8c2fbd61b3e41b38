// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end coordinator scenarios against a mock cloud.
//!
//! Timing-sensitive scenarios run with millisecond-scale coordinator
//! configuration and generous margins, so they stay robust on slow runners.

use std::sync::Arc;
use std::time::Duration;

use behome_lib::adapters::{AdapterContext, CoverAdapter, Entity, EntityInfo, SwitchAdapter};
use behome_lib::client::{CloudClient, CloudConfig};
use behome_lib::coordinator::{Coordinator, CoordinatorConfig};
use behome_lib::credentials::PrivateKey;
use behome_lib::discovery::EntityRegistry;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn switch_device(device_id: &str, on: bool) -> serde_json::Value {
    serde_json::json!({
        "deviceID": device_id,
        "topic": format!("{device_id}-topic"),
        "id": "switch",
        "type": 1,
        "name": device_id,
        "num": true,
        "msg": {"on": on},
        "state": if on { "on" } else { "off" }
    })
}

fn device_list(devices: &[serde_json::Value]) -> serde_json::Value {
    serde_json::json!({"code": 0, "data": {"array": devices}})
}

fn client_for(server: &MockServer) -> CloudClient {
    CloudConfig::new(PrivateKey::new("test-key").unwrap())
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(2))
        .into_client()
        .unwrap()
}

/// Millisecond-scale timing for tests.
fn fast_config() -> CoordinatorConfig {
    CoordinatorConfig {
        poll_interval: Duration::from_millis(100),
        command_refresh_delay: Duration::from_millis(50),
        manual_refresh_cooldown: Duration::from_millis(150),
        lock_duration: Duration::from_millis(300),
    }
}

async fn mount_device_list(server: &MockServer, devices: &[serde_json::Value]) {
    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list(devices)))
        .mount(server)
        .await;
}

async fn mount_control_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/postMassage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"code": 0})))
        .mount(server)
        .await;
}

async fn count_fetches(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/device")
        .count()
}

#[tokio::test]
async fn refresh_installs_snapshot_and_notifies() {
    let mock_server = MockServer::start().await;
    mount_device_list(&mock_server, &[switch_device("dev-1", true)]).await;

    let coordinator = Coordinator::new(client_for(&mock_server));
    let notified = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    coordinator.add_listener(move || {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });

    assert!(coordinator.snapshot().is_none());
    coordinator.refresh().await;

    let snapshot = coordinator.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    let device = snapshot.device(&"dev-1".into()).unwrap();
    assert_eq!(device.structured().unwrap().on, Some(true));
    assert_eq!(notified.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_snapshot() {
    let mock_server = MockServer::start().await;

    // One good response, then the cloud starts erroring
    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(device_list(&[switch_device("dev-1", true)])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let coordinator = Coordinator::new(client_for(&mock_server));
    let notified = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    coordinator.add_listener(move || {
        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });

    coordinator.refresh().await;
    coordinator.refresh().await;

    // The failed second fetch changed nothing and notified nobody
    let snapshot = coordinator.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.device(&"dev-1".into()).unwrap().online);
    assert_eq!(notified.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(count_fetches(&mock_server).await, 2);
}

#[tokio::test]
async fn optimistic_switch_survives_stale_polls_until_lock_expiry() {
    let mock_server = MockServer::start().await;
    // The cloud keeps reporting the switch as off the whole time
    mount_device_list(&mock_server, &[switch_device("dev-1", false)]).await;
    mount_control_ok(&mock_server).await;

    let client = Arc::new(client_for(&mock_server));
    let coordinator = Arc::new(Coordinator::with_config(
        client_for(&mock_server),
        fast_config(),
    ));
    coordinator.refresh().await;

    let record = coordinator
        .snapshot()
        .unwrap()
        .device(&"dev-1".into())
        .unwrap()
        .clone();
    let switch = SwitchAdapter::new(AdapterContext::new(
        Arc::clone(&coordinator),
        client,
        EntityInfo::from_record(&record),
    ));
    assert!(!switch.is_on());

    switch.turn_on().await;
    // Optimistic state reads back immediately
    assert!(switch.is_on());

    // The 50 ms verification refresh fetches the stale "off", but the lock
    // (300 ms) still pins "on"
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(switch.is_on());
    assert!(count_fetches(&mock_server).await >= 2);

    // Past lock expiry and cooldown the next poll surfaces cloud truth
    tokio::time::sleep(Duration::from_millis(450)).await;
    coordinator.refresh().await;
    assert!(!switch.is_on());
}

#[tokio::test]
async fn manual_refresh_cooldown_skips_scheduled_polls() {
    let mock_server = MockServer::start().await;
    mount_device_list(&mock_server, &[switch_device("dev-1", true)]).await;

    let coordinator = Arc::new(Coordinator::with_config(
        client_for(&mock_server),
        CoordinatorConfig {
            manual_refresh_cooldown: Duration::from_millis(300),
            command_refresh_delay: Duration::from_millis(10),
            ..fast_config()
        },
    ));

    coordinator.refresh().await;
    assert_eq!(count_fetches(&mock_server).await, 1);

    // User-initiated refresh lands after ~10 ms
    coordinator.refresh_after(Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count_fetches(&mock_server).await, 2);

    // A scheduled poll inside the cooldown window is skipped
    coordinator.refresh().await;
    assert_eq!(count_fetches(&mock_server).await, 2);

    // Once the cooldown has lapsed, scheduled polls resume
    tokio::time::sleep(Duration::from_millis(350)).await;
    coordinator.refresh().await;
    assert_eq!(count_fetches(&mock_server).await, 3);
}

#[tokio::test]
async fn poller_fetches_on_its_interval() {
    let mock_server = MockServer::start().await;
    mount_device_list(&mock_server, &[switch_device("dev-1", true)]).await;

    let coordinator = Arc::new(Coordinator::with_config(
        client_for(&mock_server),
        fast_config(),
    ));
    let poller = coordinator.spawn_poller();

    // 100 ms interval: expect several polls within half a second
    tokio::time::sleep(Duration::from_millis(450)).await;
    poller.abort();

    assert!(count_fetches(&mock_server).await >= 3);
    assert!(coordinator.snapshot().is_some());
}

#[tokio::test]
async fn discovery_is_idempotent_and_incremental() {
    let mock_server = MockServer::start().await;

    // First poll knows one device, later polls know two
    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(device_list(&[switch_device("dev-1", true)])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_device_list(
        &mock_server,
        &[switch_device("dev-1", true), switch_device("dev-2", false)],
    )
    .await;

    let client = Arc::new(client_for(&mock_server));
    let coordinator = Arc::new(Coordinator::new(client_for(&mock_server)));

    let discovered = Arc::new(parking_lot::Mutex::new(Vec::<String>::new()));
    let sink_log = Arc::clone(&discovered);
    let registry = Arc::new(EntityRegistry::new(
        Arc::clone(&coordinator),
        client,
        move |entities| {
            sink_log
                .lock()
                .extend(entities.iter().map(Entity::unique_id));
        },
    ));

    // Attaching before the first fetch discovers nothing yet
    registry.attach();
    assert!(discovered.lock().is_empty());

    coordinator.refresh().await;
    assert_eq!(discovered.lock().as_slice(), ["dev-1"]);

    // A second pass over the same snapshot yields nothing
    assert!(registry.discover().is_empty());
    assert_eq!(discovered.lock().len(), 1);

    // The next poll brings a new device; only that one is discovered
    coordinator.refresh().await;
    assert_eq!(discovered.lock().as_slice(), ["dev-1", "dev-2"]);
    assert_eq!(registry.seen_count(), 2);
}

#[tokio::test]
async fn cover_closed_state_requires_a_report() {
    let mock_server = MockServer::start().await;
    mount_device_list(
        &mock_server,
        &[
            // Reports neither a position nor a state string
            serde_json::json!({
                "deviceID": "cov-1",
                "topic": "curtain001",
                "id": "curtain",
                "type": 9,
                "num": true
            }),
            serde_json::json!({
                "deviceID": "cov-2",
                "topic": "curtain002",
                "id": "curtain",
                "type": 9,
                "num": true,
                "state": "off"
            }),
        ],
    )
    .await;

    let client = Arc::new(client_for(&mock_server));
    let coordinator = Arc::new(Coordinator::new(client_for(&mock_server)));

    let cover = |id: &str| {
        let record = coordinator
            .snapshot()
            .unwrap()
            .device(&id.into())
            .unwrap()
            .clone();
        CoverAdapter::new(AdapterContext::new(
            Arc::clone(&coordinator),
            Arc::clone(&client),
            EntityInfo::from_record(&record),
        ))
    };

    coordinator.refresh().await;

    assert_eq!(cover("cov-1").is_closed(), None);
    assert_eq!(cover("cov-2").is_closed(), Some(true));

    // Without any snapshot the answer is also unknown
    let orphan = CoverAdapter::new(AdapterContext::new(
        Arc::new(Coordinator::new(client_for(&mock_server))),
        Arc::clone(&client),
        cover("cov-2").info().clone(),
    ));
    assert_eq!(orphan.is_closed(), None);
}

#[tokio::test]
async fn sensor_devices_discover_one_entity_per_reading() {
    let mock_server = MockServer::start().await;
    mount_device_list(
        &mock_server,
        &[serde_json::json!({
            "deviceID": "env-1",
            "topic": "sensor001",
            "id": "sensor",
            "type": 7,
            "num": true,
            "msg": {"t": 21.5, "h": 60, "pm25": 12}
        })],
    )
    .await;

    let client = Arc::new(client_for(&mock_server));
    let coordinator = Arc::new(Coordinator::new(client_for(&mock_server)));
    coordinator.refresh().await;

    let registry = EntityRegistry::new(Arc::clone(&coordinator), client, |_| {});
    let mut ids: Vec<String> = registry.discover().iter().map(Entity::unique_id).collect();
    ids.sort();

    assert_eq!(ids, ["env-1_humidity", "env-1_pm25", "env-1_temperature"]);
}
