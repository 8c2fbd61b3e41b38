// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device message payloads.
//!
//! The `msg` field of a device record is either a structured JSON object or
//! a legacy comma-separated string, depending on the firmware generation.
//! [`DeviceMessage`] models the two explicitly so adapters never guess.
//!
//! Numeric fields inside structured messages are lenient: some firmwares
//! send `"bri": "80"` as a string. Values that fail to parse read as absent.

use serde::{Deserialize, Deserializer};

/// The `msg` payload of a device record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeviceMessage {
    /// Structured JSON object state.
    Structured(StructuredState),
    /// Legacy comma-separated string state.
    Legacy(String),
}

impl DeviceMessage {
    /// Returns the structured state, if this is a structured message.
    #[must_use]
    pub fn structured(&self) -> Option<&StructuredState> {
        match self {
            Self::Structured(state) => Some(state),
            Self::Legacy(_) => None,
        }
    }

    /// Returns the legacy string, if this is a legacy message.
    #[must_use]
    pub fn legacy(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Legacy(text) => Some(text),
        }
    }
}

/// Structured device state; every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StructuredState {
    /// Power state.
    #[serde(default)]
    pub on: Option<bool>,
    /// Light brightness, 0-100.
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub bri: Option<i64>,
    /// Fan speed level.
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub speed: Option<i64>,
    /// Generic value (cover position, water temperature, ...).
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub v: Option<i64>,
    /// Climate mode code.
    #[serde(default, deserialize_with = "lenient_opt_i64")]
    pub mode: Option<i64>,
    /// Temperature reading or target.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub t: Option<f64>,
    /// Relative humidity.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub h: Option<f64>,
    /// Air quality index.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub air: Option<f64>,
    /// PM2.5 concentration.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub pm25: Option<f64>,
    /// CO2 concentration.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub co2: Option<f64>,
    /// Atmospheric pressure.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub pa: Option<f64>,
}

impl StructuredState {
    /// Sets the power state.
    #[must_use]
    pub const fn with_on(mut self, on: bool) -> Self {
        self.on = Some(on);
        self
    }

    /// Sets the brightness.
    #[must_use]
    pub const fn with_bri(mut self, bri: i64) -> Self {
        self.bri = Some(bri);
        self
    }

    /// Sets the speed level.
    #[must_use]
    pub const fn with_speed(mut self, speed: i64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Sets the generic value.
    #[must_use]
    pub const fn with_v(mut self, v: i64) -> Self {
        self.v = Some(v);
        self
    }

    /// Sets the mode code.
    #[must_use]
    pub const fn with_mode(mut self, mode: i64) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub const fn with_t(mut self, t: f64) -> Self {
        self.t = Some(t);
        self
    }
}

/// Accepts an integer, a float, or a string-encoded number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(value) => Some(*value as i64),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|number| number.as_i64()))
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(value.and_then(|number| number.as_f64()))
}

/// A partial device-state replacement applied by the coordinator's
/// optimistic-lock path. Only the fields that are set replace the fetched
/// record's fields; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateUpdate {
    /// Replacement structured message.
    pub msg: Option<StructuredState>,
    /// Replacement state string.
    pub state: Option<String>,
}

impl StateUpdate {
    /// An update that replaces the structured message.
    #[must_use]
    pub const fn message(msg: StructuredState) -> Self {
        Self {
            msg: Some(msg),
            state: None,
        }
    }

    /// An update that replaces the state string.
    #[must_use]
    pub fn state(state: impl Into<String>) -> Self {
        Self {
            msg: None,
            state: Some(state.into()),
        }
    }

    /// Additionally replaces the state string.
    #[must_use]
    pub fn and_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// True when the update pins no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.msg.is_none() && self.state.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_message_parses() {
        let msg: DeviceMessage =
            serde_json::from_str(r#"{"on": true, "bri": 80, "t": 21.5}"#).unwrap();
        let state = msg.structured().unwrap();
        assert_eq!(state.on, Some(true));
        assert_eq!(state.bri, Some(80));
        assert_eq!(state.t, Some(21.5));
        assert_eq!(state.speed, None);
    }

    #[test]
    fn legacy_message_parses() {
        let msg: DeviceMessage = serde_json::from_str(r#""on,75""#).unwrap();
        assert_eq!(msg.legacy(), Some("on,75"));
        assert!(msg.structured().is_none());
    }

    #[test]
    fn string_encoded_numbers_are_tolerated() {
        let msg: DeviceMessage =
            serde_json::from_str(r#"{"bri": "80", "t": "21.5", "pm25": 12}"#).unwrap();
        let state = msg.structured().unwrap();
        assert_eq!(state.bri, Some(80));
        assert_eq!(state.t, Some(21.5));
        assert_eq!(state.pm25, Some(12.0));
    }

    #[test]
    fn unparseable_numbers_read_as_absent() {
        let msg: DeviceMessage = serde_json::from_str(r#"{"bri": "dim", "on": false}"#).unwrap();
        let state = msg.structured().unwrap();
        assert_eq!(state.bri, None);
        assert_eq!(state.on, Some(false));
    }

    #[test]
    fn state_update_builders() {
        let update = StateUpdate::message(StructuredState::default().with_on(true).with_bri(50));
        assert_eq!(update.msg.as_ref().unwrap().bri, Some(50));
        assert!(update.state.is_none());

        let update = StateUpdate::state("open").and_state("closed");
        assert_eq!(update.state.as_deref(), Some("closed"));
        assert!(!update.is_empty());
        assert!(StateUpdate::default().is_empty());
    }
}
