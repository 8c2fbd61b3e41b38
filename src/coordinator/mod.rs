// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State coordinator: polling, snapshots and the optimistic-lock protocol.
//!
//! The coordinator owns the single source of truth for device state. It
//! polls the cloud on a fixed interval, merges live overrides over the
//! fetched records, and fans the resulting immutable [`Snapshot`] out to
//! listeners. Readers clone an `Arc<Snapshot>` and never observe a partial
//! merge.
//!
//! Three timing rules shape its behavior:
//!
//! - a command path pins the expected state for `lock_duration` so polls
//!   do not flap the entity back to the stale cloud state;
//! - a command path schedules a verification refresh after
//!   `command_refresh_delay`;
//! - scheduled polls are skipped while a user-initiated refresh completed
//!   less than `manual_refresh_cooldown` ago.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use behome_lib::client::CloudConfig;
//! use behome_lib::coordinator::Coordinator;
//! use behome_lib::credentials::PrivateKey;
//!
//! # async fn example() -> behome_lib::Result<()> {
//! let key = PrivateKey::new("d6a3f8c2e917b0a4")?;
//! let client = CloudConfig::new(key).into_client()?;
//! let coordinator = Arc::new(Coordinator::new(client));
//!
//! coordinator.refresh().await;
//! if let Some(snapshot) = coordinator.snapshot() {
//!     for device in snapshot.devices() {
//!         println!("{} ({:?})", device.display_name(), device.category);
//!     }
//! }
//! coordinator.spawn_poller();
//! # Ok(())
//! # }
//! ```

mod listener;
mod overrides;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::CloudClient;
use crate::device::{DeviceId, DeviceRecord, StateUpdate};

pub use listener::{ListenerRegistry, SubscriptionId};
pub use overrides::{OverrideEntry, OverrideMap};

// ============================================================================
// CoordinatorConfig
// ============================================================================

/// Timing configuration for a [`Coordinator`].
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Interval between scheduled polls.
    pub poll_interval: Duration,
    /// Delay before the verification refresh that follows a command.
    pub command_refresh_delay: Duration,
    /// How long after a user-initiated refresh scheduled polls are skipped.
    pub manual_refresh_cooldown: Duration,
    /// How long an optimistic override pins device state.
    pub lock_duration: Duration,
}

impl CoordinatorConfig {
    /// Default scheduled poll interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
    /// Default post-command refresh delay.
    pub const DEFAULT_COMMAND_REFRESH_DELAY: Duration = Duration::from_secs(3);
    /// Default manual-refresh cooldown.
    pub const DEFAULT_MANUAL_REFRESH_COOLDOWN: Duration = Duration::from_secs(8);
    /// Default optimistic lock duration.
    pub const DEFAULT_LOCK_DURATION: Duration = Duration::from_secs(5);
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            command_refresh_delay: Self::DEFAULT_COMMAND_REFRESH_DELAY,
            manual_refresh_cooldown: Self::DEFAULT_MANUAL_REFRESH_COOLDOWN,
            lock_duration: Self::DEFAULT_LOCK_DURATION,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable view of the device list at one point in time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    devices: Vec<DeviceRecord>,
}

impl Snapshot {
    /// All devices in the snapshot.
    #[must_use]
    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    /// Looks up a device by its cloud id.
    #[must_use]
    pub fn device(&self, device_id: &DeviceId) -> Option<&DeviceRecord> {
        self.devices
            .iter()
            .find(|device| &device.device_id == device_id)
    }

    /// Looks up a device by its topic.
    #[must_use]
    pub fn device_by_topic(&self, topic: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|device| device.topic == topic)
    }

    /// Number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// True when the snapshot holds no devices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// State shared under the coordinator's lock. Never held across an await.
#[derive(Debug, Default)]
struct Inner {
    snapshot: Option<Arc<Snapshot>>,
    overrides: OverrideMap,
    last_manual_refresh: Option<Instant>,
}

/// The polling state coordinator.
pub struct Coordinator {
    client: CloudClient,
    config: CoordinatorConfig,
    inner: RwLock<Inner>,
    listeners: ListenerRegistry,
    /// Serializes fetch/merge cycles so overlapping refreshes queue instead
    /// of racing.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl Coordinator {
    /// Creates a coordinator with default timing.
    #[must_use]
    pub fn new(client: CloudClient) -> Self {
        Self::with_config(client, CoordinatorConfig::default())
    }

    /// Creates a coordinator with explicit timing.
    #[must_use]
    pub fn with_config(client: CloudClient, config: CoordinatorConfig) -> Self {
        Self {
            client,
            config,
            inner: RwLock::new(Inner::default()),
            listeners: ListenerRegistry::new(),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Returns the current snapshot, if a fetch has succeeded yet.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.read().snapshot.clone()
    }

    /// Returns the timing configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Registers an update listener.
    pub fn add_listener(&self, listener: impl Fn() + Send + Sync + 'static) -> SubscriptionId {
        self.listeners.add(listener)
    }

    /// Removes an update listener. Returns `false` for an unknown handle.
    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Runs one scheduled refresh cycle.
    ///
    /// Skipped entirely while the manual-refresh cooldown is active.
    /// Overlapping calls queue behind an internal gate; each queued call
    /// runs a full cycle in turn and sees a consistent merge.
    pub async fn refresh(&self) {
        self.refresh_cycle(false).await;
    }

    /// Schedules a user-initiated refresh after `delay`.
    ///
    /// Non-blocking; the spawned task stamps the manual-refresh time and
    /// runs a cycle that bypasses the cooldown check. In-flight cycles are
    /// never cancelled.
    pub fn refresh_after(self: &Arc<Self>, delay: Duration) {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.refresh_cycle(true).await;
        });
    }

    /// Spawns the scheduled poll loop. The first poll runs immediately.
    pub fn spawn_poller(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(coordinator.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                coordinator.refresh().await;
            }
        })
    }

    /// Pins the expected state of one device and publishes it immediately.
    ///
    /// Synchronous: inserts/replaces the override (restarting its clock),
    /// patches the device inside a copy-on-write snapshot replacement, and
    /// notifies listeners. A device absent from the current snapshot is a
    /// logged no-op; an override never fabricates a device.
    pub fn lock_and_apply(&self, device_id: &DeviceId, update: StateUpdate) {
        let published = {
            let mut inner = self.inner.write();
            let Some(snapshot) = inner.snapshot.as_deref() else {
                tracing::debug!(device_id = %device_id, "No snapshot yet, ignoring optimistic update");
                return;
            };
            let Some(position) = snapshot
                .devices
                .iter()
                .position(|device| &device.device_id == device_id)
            else {
                tracing::debug!(device_id = %device_id, "Device not in snapshot, ignoring optimistic update");
                return;
            };

            let mut devices = snapshot.devices.clone();
            devices[position].apply_update(&update);

            let expires_at = Instant::now() + self.config.lock_duration;
            inner.overrides.insert(device_id.clone(), update, expires_at);
            inner.snapshot = Some(Arc::new(Snapshot { devices }));
            true
        };

        if published {
            self.listeners.notify();
        }
    }

    /// One fetch/merge cycle. `user_initiated` bypasses the cooldown and
    /// stamps the manual-refresh time.
    async fn refresh_cycle(&self, user_initiated: bool) {
        let _gate = self.refresh_gate.lock().await;

        let now = Instant::now();
        if user_initiated {
            self.inner.write().last_manual_refresh = Some(now);
        } else {
            let in_cooldown = self
                .inner
                .read()
                .last_manual_refresh
                .is_some_and(|at| now.duration_since(at) < self.config.manual_refresh_cooldown);
            if in_cooldown {
                tracing::debug!("Scheduled poll skipped, manual refresh cooldown active");
                return;
            }
        }

        let mut fetched = self.client.fetch_devices().await;
        if fetched.is_empty() {
            tracing::debug!("Fetch returned nothing, keeping previous snapshot");
            return;
        }

        {
            let mut inner = self.inner.write();
            let now = Instant::now();
            let swept = inner.overrides.sweep_expired(now);
            if swept > 0 {
                tracing::debug!(swept, "Expired optimistic overrides dropped");
            }
            for device in &mut fetched {
                if let Some(entry) = inner.overrides.get(&device.device_id) {
                    device.apply_update(&entry.update);
                }
            }
            tracing::debug!(
                count = fetched.len(),
                overrides = inner.overrides.len(),
                "Snapshot installed"
            );
            inner.snapshot = Some(Arc::new(Snapshot { devices: fetched }));
        }

        self.listeners.notify();
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
