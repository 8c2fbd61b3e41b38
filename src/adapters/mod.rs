// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device adapters: per-category projections of raw device records.
//!
//! An adapter translates one [`DeviceRecord`](crate::device::DeviceRecord)
//! into the vocabulary of its home-automation domain (is the light on, how
//! fast is the fan) and translates domain operations back into commands.
//! Adapters never hold state of their own; every read goes through the
//! coordinator's current snapshot.
//!
//! All command paths follow the same three steps: pin the expected result
//! via `lock_and_apply`, send the command (the acknowledgement is ignored),
//! then schedule a verification refresh. None of them ever runs a blocking
//! refresh inline.

mod air_purifier;
mod climate;
mod cover;
mod fan;
mod light;
mod media_player;
mod sensor;
mod switch;
mod thermostat;
mod water_heater;

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::client::CloudClient;
use crate::command::Command;
use crate::coordinator::Coordinator;
use crate::device::{Category, DeviceId, DeviceRecord, StateUpdate};

pub use air_purifier::{AIR_PURIFIER_PRESETS, AirPurifierAdapter};
pub use climate::ClimateAdapter;
pub use cover::CoverAdapter;
pub use fan::FanAdapter;
pub use light::LightAdapter;
pub use media_player::MediaPlayerAdapter;
pub use sensor::{SensorAdapter, SensorKind};
pub use switch::SwitchAdapter;
pub use thermostat::ThermostatAdapter;
pub use water_heater::{WaterHeaterAdapter, WaterHeaterOperation};

// ============================================================================
// EntityInfo / AdapterContext
// ============================================================================

/// Static identity of one entity, captured at discovery time.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    /// Cloud device id.
    pub device_id: DeviceId,
    /// Control topic.
    pub topic: String,
    /// User-visible name; falls back to the topic.
    pub name: String,
    /// Room name, NFKC-normalized and trimmed.
    pub room: Option<String>,
    /// Device category.
    pub category: Category,
    /// Numeric category code for control requests.
    pub type_code: u32,
}

impl EntityInfo {
    /// Captures identity fields from a device record.
    #[must_use]
    pub fn from_record(record: &DeviceRecord) -> Self {
        let room = record
            .room
            .as_deref()
            .map(|room| room.nfkc().collect::<String>().trim().to_string())
            .filter(|room| !room.is_empty());
        Self {
            device_id: record.device_id.clone(),
            topic: record.topic.clone(),
            name: record.display_name().to_string(),
            room,
            category: record.category,
            type_code: record.type_code,
        }
    }
}

/// Everything an adapter needs: identity plus handles to the coordinator
/// and the cloud client.
#[derive(Debug, Clone)]
pub struct AdapterContext {
    /// The state coordinator.
    pub coordinator: Arc<Coordinator>,
    /// The stateless cloud client.
    pub client: Arc<CloudClient>,
    /// This entity's identity.
    pub info: EntityInfo,
}

impl AdapterContext {
    /// Creates a context for one entity.
    #[must_use]
    pub fn new(coordinator: Arc<Coordinator>, client: Arc<CloudClient>, info: EntityInfo) -> Self {
        Self {
            coordinator,
            client,
            info,
        }
    }

    /// Reads this entity's record from the current snapshot.
    pub(crate) fn with_record<T>(&self, read: impl FnOnce(&DeviceRecord) -> T) -> Option<T> {
        let snapshot = self.coordinator.snapshot()?;
        snapshot.device(&self.info.device_id).map(read)
    }

    /// True when the device is present and reports itself online.
    #[must_use]
    pub fn available(&self) -> bool {
        self.with_record(|record| record.online).unwrap_or(false)
    }

    /// The shared command path: optional optimistic pin, fire-and-forget
    /// send, delayed verification refresh.
    pub(crate) async fn dispatch(&self, update: Option<StateUpdate>, command: Command) {
        if let Some(update) = update {
            self.coordinator.lock_and_apply(&self.info.device_id, update);
        }
        // Acknowledgement deliberately ignored; the verification refresh is
        // the source of truth.
        let _acknowledged = self
            .client
            .send_command(&self.info.topic, &command, self.info.type_code)
            .await;
        self.coordinator
            .refresh_after(self.coordinator.config().command_refresh_delay);
    }
}

// ============================================================================
// Entity
// ============================================================================

/// One discovered entity, dispatching to its category adapter.
#[derive(Debug, Clone)]
pub enum Entity {
    /// Socket or wall switch.
    Switch(SwitchAdapter),
    /// Light.
    Light(LightAdapter),
    /// Fan.
    Fan(FanAdapter),
    /// Curtain / cover.
    Cover(CoverAdapter),
    /// Air conditioner.
    Climate(ClimateAdapter),
    /// Heating thermostat.
    Thermostat(ThermostatAdapter),
    /// Water heater.
    WaterHeater(WaterHeaterAdapter),
    /// Television.
    MediaPlayer(MediaPlayerAdapter),
    /// Air purifier.
    AirPurifier(AirPurifierAdapter),
    /// One sensor reading.
    Sensor(SensorAdapter),
}

impl Entity {
    /// The entity's identity.
    #[must_use]
    pub fn info(&self) -> &EntityInfo {
        match self {
            Self::Switch(adapter) => adapter.info(),
            Self::Light(adapter) => adapter.info(),
            Self::Fan(adapter) => adapter.info(),
            Self::Cover(adapter) => adapter.info(),
            Self::Climate(adapter) => adapter.info(),
            Self::Thermostat(adapter) => adapter.info(),
            Self::WaterHeater(adapter) => adapter.info(),
            Self::MediaPlayer(adapter) => adapter.info(),
            Self::AirPurifier(adapter) => adapter.info(),
            Self::Sensor(adapter) => adapter.info(),
        }
    }

    /// Stable unique id. Sensors append their reading kind so one device
    /// can surface several entities.
    #[must_use]
    pub fn unique_id(&self) -> String {
        match self {
            Self::Sensor(adapter) => adapter.unique_id(),
            _ => self.info().device_id.to_string(),
        }
    }

    /// User-visible name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// True when the backing device is present and online.
    #[must_use]
    pub fn available(&self) -> bool {
        match self {
            Self::Switch(adapter) => adapter.available(),
            Self::Light(adapter) => adapter.available(),
            Self::Fan(adapter) => adapter.available(),
            Self::Cover(adapter) => adapter.available(),
            Self::Climate(adapter) => adapter.available(),
            Self::Thermostat(adapter) => adapter.available(),
            Self::WaterHeater(adapter) => adapter.available(),
            Self::MediaPlayer(adapter) => adapter.available(),
            Self::AirPurifier(adapter) => adapter.available(),
            Self::Sensor(adapter) => adapter.available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_info_normalizes_room() {
        let record: DeviceRecord = serde_json::from_value(serde_json::json!({
            "deviceID": "d1",
            "topic": "light002",
            "id": "light",
            "type": 2,
            "room": " ｂｅｄｒｏｏｍ "
        }))
        .unwrap();
        let info = EntityInfo::from_record(&record);
        // Fullwidth letters collapse to ASCII under NFKC, whitespace trimmed
        assert_eq!(info.room.as_deref(), Some("bedroom"));
        assert_eq!(info.name, "light002");
    }

    #[test]
    fn entity_info_drops_blank_room() {
        let record: DeviceRecord = serde_json::from_value(serde_json::json!({
            "deviceID": "d1",
            "topic": "t",
            "id": "switch",
            "type": 1,
            "room": "   "
        }))
        .unwrap();
        assert_eq!(EntityInfo::from_record(&record).room, None);
    }
}
