// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity discovery over coordinator snapshots.
//!
//! Discovery is a pure projection of the current snapshot: each pass walks
//! the device list, computes the unique id of every prospective entity, and
//! instantiates adapters only for ids it has not seen before. Running a pass
//! twice over the same snapshot therefore yields nothing the second time,
//! and devices appearing in a later poll are picked up incrementally.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use behome_lib::client::CloudConfig;
//! use behome_lib::coordinator::Coordinator;
//! use behome_lib::credentials::PrivateKey;
//! use behome_lib::discovery::EntityRegistry;
//!
//! # async fn example() -> behome_lib::Result<()> {
//! let key = PrivateKey::new("d6a3f8c2e917b0a4")?;
//! let client = Arc::new(CloudConfig::new(key.clone()).into_client()?);
//! let coordinator = Arc::new(Coordinator::new(
//!     CloudConfig::new(key).into_client()?,
//! ));
//!
//! let registry = Arc::new(EntityRegistry::new(
//!     Arc::clone(&coordinator),
//!     client,
//!     |entities| {
//!         for entity in entities {
//!             println!("discovered {}", entity.unique_id());
//!         }
//!     },
//! ));
//!
//! // Run on every coordinator update, starting now
//! registry.attach();
//! coordinator.refresh().await;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use unicode_normalization::UnicodeNormalization;

use crate::adapters::{
    AdapterContext, AirPurifierAdapter, ClimateAdapter, CoverAdapter, Entity, EntityInfo,
    FanAdapter, LightAdapter, MediaPlayerAdapter, SensorAdapter, SensorKind, SwitchAdapter,
    ThermostatAdapter, WaterHeaterAdapter,
};
use crate::client::CloudClient;
use crate::coordinator::{Coordinator, SubscriptionId};
use crate::device::{Category, DeviceRecord};

// ============================================================================
// AreaIndex
// ============================================================================

/// Case-insensitive room-name to area-id lookup.
///
/// Room names entered in the vendor app arrive with inconsistent width and
/// casing; both sides of the lookup are NFKC-normalized, trimmed and
/// lowercased.
#[derive(Debug, Default)]
pub struct AreaIndex {
    areas: HashMap<String, String>,
}

impl AreaIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(room: &str) -> String {
        room.nfkc().collect::<String>().trim().to_lowercase()
    }

    /// Registers an area under a room name.
    pub fn insert(&mut self, room: &str, area_id: impl Into<String>) {
        self.areas.insert(Self::normalize(room), area_id.into());
    }

    /// Looks up the area for a room name.
    #[must_use]
    pub fn area_for(&self, room: &str) -> Option<&str> {
        self.areas.get(&Self::normalize(room)).map(String::as_str)
    }

    /// Number of registered areas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// True when no areas are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

// ============================================================================
// EntityRegistry
// ============================================================================

type Sink = Box<dyn Fn(Vec<Entity>) + Send + Sync>;

/// Tracks discovered entities and feeds new ones to a sink callback.
pub struct EntityRegistry {
    coordinator: Arc<Coordinator>,
    client: Arc<CloudClient>,
    seen: RwLock<HashSet<String>>,
    sink: Sink,
}

impl EntityRegistry {
    /// Creates a registry delivering new entities to `sink`.
    pub fn new(
        coordinator: Arc<Coordinator>,
        client: Arc<CloudClient>,
        sink: impl Fn(Vec<Entity>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            coordinator,
            client,
            seen: RwLock::new(HashSet::new()),
            sink: Box::new(sink),
        }
    }

    /// Runs one discovery pass over the current snapshot.
    ///
    /// Idempotent: entities whose unique id has been seen before are
    /// skipped. New entities are handed to the sink and also returned.
    pub fn discover(&self) -> Vec<Entity> {
        let Some(snapshot) = self.coordinator.snapshot() else {
            return Vec::new();
        };

        let mut fresh = Vec::new();
        {
            let mut seen = self.seen.write();
            for record in snapshot.devices() {
                for entity in self.entities_for(record) {
                    if seen.insert(entity.unique_id()) {
                        fresh.push(entity);
                    }
                }
            }
        }

        if !fresh.is_empty() {
            tracing::info!(count = fresh.len(), "Discovered new entities");
            (self.sink)(fresh.clone());
        }
        fresh
    }

    /// Subscribes discovery to coordinator updates and runs a pass now.
    ///
    /// Returns the listener handle; removing it detaches discovery.
    pub fn attach(self: &Arc<Self>) -> SubscriptionId {
        let registry = Arc::clone(self);
        let id = self.coordinator.add_listener(move || {
            registry.discover();
        });
        self.discover();
        id
    }

    /// Number of unique ids seen so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.read().len()
    }

    fn context_for(&self, record: &DeviceRecord) -> AdapterContext {
        AdapterContext::new(
            Arc::clone(&self.coordinator),
            Arc::clone(&self.client),
            EntityInfo::from_record(record),
        )
    }

    /// Projects one device record onto its prospective entities.
    fn entities_for(&self, record: &DeviceRecord) -> Vec<Entity> {
        match record.category {
            Category::Socket | Category::Switch => {
                vec![Entity::Switch(SwitchAdapter::new(self.context_for(record)))]
            }
            Category::Light => {
                vec![Entity::Light(LightAdapter::new(self.context_for(record)))]
            }
            Category::Fan => {
                vec![Entity::Fan(FanAdapter::new(self.context_for(record)))]
            }
            Category::Cover => {
                vec![Entity::Cover(CoverAdapter::new(self.context_for(record)))]
            }
            Category::Climate => {
                vec![Entity::Climate(ClimateAdapter::new(
                    self.context_for(record),
                ))]
            }
            Category::Thermostat => {
                vec![Entity::Thermostat(ThermostatAdapter::new(
                    self.context_for(record),
                ))]
            }
            Category::WaterHeater => {
                vec![Entity::WaterHeater(WaterHeaterAdapter::new(
                    self.context_for(record),
                ))]
            }
            Category::MediaPlayer => {
                vec![Entity::MediaPlayer(MediaPlayerAdapter::new(
                    self.context_for(record),
                ))]
            }
            Category::AirPurifier => {
                vec![Entity::AirPurifier(AirPurifierAdapter::new(
                    self.context_for(record),
                ))]
            }
            Category::Sensor => self.sensor_entities_for(record),
            Category::Unknown => {
                tracing::debug!(
                    device_id = %record.device_id,
                    "Skipping device with unrecognized category"
                );
                Vec::new()
            }
        }
    }

    /// One entity per structured reading; a single text entity otherwise.
    fn sensor_entities_for(&self, record: &DeviceRecord) -> Vec<Entity> {
        if let Some(msg) = record.structured() {
            SensorKind::STRUCTURED
                .into_iter()
                .filter(|kind| kind.extract(msg).is_some())
                .map(|kind| Entity::Sensor(SensorAdapter::new(self.context_for(record), kind)))
                .collect()
        } else {
            vec![Entity::Sensor(SensorAdapter::new(
                self.context_for(record),
                SensorKind::State,
            ))]
        }
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("seen", &self.seen_count())
            .finish_non_exhaustive()
    }
}
