// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device records as reported by the cloud device list.
//!
//! A [`DeviceRecord`] is one entry of the `data.array` the cloud returns.
//! Its `id` field carries a category suffix string (`outlet`, `light`, ...)
//! which maps onto [`Category`]; its `type` field is the numeric code echoed
//! back verbatim in control requests.

mod message;

use std::fmt;

use serde::{Deserialize, Deserializer};

pub use message::{DeviceMessage, StateUpdate, StructuredState};

/// Opaque cloud device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Device category, from the record's `id` suffix string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    /// Smart socket (`outlet`).
    Socket,
    /// Wall switch (`switch`).
    Switch,
    /// Light (`light`).
    Light,
    /// Fan (`fan`).
    Fan,
    /// Environmental sensor (`sensor`).
    Sensor,
    /// Air conditioner (`aircondition`).
    Climate,
    /// Heating thermostat (`thermostat`).
    Thermostat,
    /// Curtain / cover (`curtain`).
    Cover,
    /// Water heater (`waterheater`).
    WaterHeater,
    /// Television (`television`).
    MediaPlayer,
    /// Air purifier (`airpurifier`).
    AirPurifier,
    /// Unrecognized suffix; skipped by discovery.
    Unknown,
}

impl From<String> for Category {
    fn from(suffix: String) -> Self {
        match suffix.as_str() {
            "outlet" => Self::Socket,
            "switch" => Self::Switch,
            "light" => Self::Light,
            "fan" => Self::Fan,
            "sensor" => Self::Sensor,
            "aircondition" => Self::Climate,
            "thermostat" => Self::Thermostat,
            "curtain" => Self::Cover,
            "waterheater" => Self::WaterHeater,
            "television" => Self::MediaPlayer,
            "airpurifier" => Self::AirPurifier,
            _ => Self::Unknown,
        }
    }
}

/// One device entry from the cloud device list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceRecord {
    /// Cloud device identifier.
    #[serde(rename = "deviceID")]
    pub device_id: DeviceId,
    /// MQTT-style topic used to address the device in control requests.
    pub topic: String,
    /// Device category.
    #[serde(rename = "id")]
    pub category: Category,
    /// Numeric category code, echoed verbatim in control requests.
    #[serde(rename = "type")]
    pub type_code: u32,
    /// User-assigned name.
    #[serde(default)]
    pub name: Option<String>,
    /// Room name as entered in the vendor app.
    #[serde(default)]
    pub room: Option<String>,
    /// Online liveness flag; the wire sends a bool or 0/1.
    #[serde(rename = "num", default, deserialize_with = "lenient_bool")]
    pub online: bool,
    /// State payload, structured or legacy.
    #[serde(default)]
    pub msg: Option<DeviceMessage>,
    /// Positional state string.
    #[serde(default)]
    pub state: Option<String>,
    /// Brightness-capable flag for lights.
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub attr1: Option<bool>,
}

impl DeviceRecord {
    /// User-visible name, falling back to the topic.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.topic)
    }

    /// The structured message, if present.
    #[must_use]
    pub fn structured(&self) -> Option<&StructuredState> {
        self.msg.as_ref().and_then(DeviceMessage::structured)
    }

    /// The legacy string message, if present.
    #[must_use]
    pub fn legacy_msg(&self) -> Option<&str> {
        self.msg.as_ref().and_then(DeviceMessage::legacy)
    }

    /// The state string split at commas; empty when there is no state.
    #[must_use]
    pub fn state_parts(&self) -> Vec<&str> {
        self.state
            .as_deref()
            .map(|state| state.split(',').collect())
            .unwrap_or_default()
    }

    /// Applies a partial update, replacing exactly the fields it pins.
    pub fn apply_update(&mut self, update: &StateUpdate) {
        if let Some(msg) = &update.msg {
            self.msg = Some(DeviceMessage::Structured(msg.clone()));
        }
        if let Some(state) = &update.state {
            self.state = Some(state.clone());
        }
    }
}

/// Accepts a bool or a 0/1 integer.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientBool {
    Bool(bool),
    Int(i64),
}

impl LenientBool {
    const fn as_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
        }
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientBool>::deserialize(deserializer)?;
    Ok(value.is_some_and(|flag| flag.as_bool()))
}

fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientBool>::deserialize(deserializer)?;
    Ok(value.map(|flag| flag.as_bool()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> DeviceRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn full_record_parses() {
        let device = record(
            r#"{
                "deviceID": "dev-1",
                "topic": "light002",
                "id": "light",
                "type": 2,
                "name": "Desk lamp",
                "room": "Study",
                "num": true,
                "msg": {"on": true, "bri": 80},
                "state": "on",
                "attr1": true
            }"#,
        );
        assert_eq!(device.device_id.as_str(), "dev-1");
        assert_eq!(device.category, Category::Light);
        assert_eq!(device.type_code, 2);
        assert_eq!(device.display_name(), "Desk lamp");
        assert!(device.online);
        assert_eq!(device.structured().unwrap().bri, Some(80));
        assert_eq!(device.attr1, Some(true));
    }

    #[test]
    fn minimal_record_parses() {
        let device = record(
            r#"{"deviceID": "dev-2", "topic": "outlet001", "id": "outlet", "type": 1}"#,
        );
        assert_eq!(device.category, Category::Socket);
        assert_eq!(device.display_name(), "outlet001");
        assert!(!device.online);
        assert!(device.msg.is_none());
        assert!(device.state_parts().is_empty());
    }

    #[test]
    fn numeric_liveness_flag() {
        let device = record(
            r#"{"deviceID": "d", "topic": "t", "id": "fan", "type": 5, "num": 1}"#,
        );
        assert!(device.online);
        let device = record(
            r#"{"deviceID": "d", "topic": "t", "id": "fan", "type": 5, "num": 0}"#,
        );
        assert!(!device.online);
    }

    #[test]
    fn unknown_category_suffix() {
        let device = record(
            r#"{"deviceID": "d", "topic": "t", "id": "toaster", "type": 99}"#,
        );
        assert_eq!(device.category, Category::Unknown);
    }

    #[test]
    fn legacy_message_and_state_parts() {
        let device = record(
            r#"{
                "deviceID": "d", "topic": "t", "id": "waterheater", "type": 8,
                "msg": "on,45", "state": "on,45,eco"
            }"#,
        );
        assert_eq!(device.legacy_msg(), Some("on,45"));
        assert_eq!(device.state_parts(), vec!["on", "45", "eco"]);
    }

    #[test]
    fn apply_update_replaces_only_pinned_fields() {
        let mut device = record(
            r#"{
                "deviceID": "d", "topic": "t", "id": "light", "type": 2,
                "name": "Lamp", "msg": {"on": false}, "state": "off"
            }"#,
        );
        device.apply_update(&StateUpdate::message(
            StructuredState::default().with_on(true).with_bri(100),
        ));
        assert_eq!(device.structured().unwrap().on, Some(true));
        assert_eq!(device.state.as_deref(), Some("off"));
        assert_eq!(device.name.as_deref(), Some("Lamp"));

        device.apply_update(&StateUpdate::state("on"));
        assert_eq!(device.state.as_deref(), Some("on"));
        assert_eq!(device.structured().unwrap().bri, Some(100));
    }
}
