// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor adapter.
//!
//! A sensor device surfaces one entity per reading present in its
//! structured message. Devices that only report a plain state string get a
//! single text entity instead.

use crate::device::StructuredState;

use super::{AdapterContext, EntityInfo};

/// The reading one sensor entity projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Temperature (`t`).
    Temperature,
    /// Relative humidity (`h`).
    Humidity,
    /// Air quality index (`air`).
    AirQuality,
    /// PM2.5 concentration (`pm25`).
    Pm25,
    /// CO2 concentration (`co2`).
    Co2,
    /// Atmospheric pressure (`pa`).
    Pressure,
    /// Raw state string, for devices without structured readings.
    State,
}

impl SensorKind {
    /// Every structured reading kind, in discovery order.
    pub const STRUCTURED: [Self; 6] = [
        Self::Temperature,
        Self::Humidity,
        Self::AirQuality,
        Self::Pm25,
        Self::Co2,
        Self::Pressure,
    ];

    /// Unique-id suffix for this kind.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::AirQuality => "air_quality",
            Self::Pm25 => "pm25",
            Self::Co2 => "co2",
            Self::Pressure => "pressure",
            Self::State => "",
        }
    }

    /// Extracts this kind's reading from a structured message.
    #[must_use]
    pub fn extract(&self, msg: &StructuredState) -> Option<f64> {
        match self {
            Self::Temperature => msg.t,
            Self::Humidity => msg.h,
            Self::AirQuality => msg.air,
            Self::Pm25 => msg.pm25,
            Self::Co2 => msg.co2,
            Self::Pressure => msg.pa,
            Self::State => None,
        }
    }
}

/// Adapter for one sensor reading.
#[derive(Debug, Clone)]
pub struct SensorAdapter {
    ctx: AdapterContext,
    kind: SensorKind,
}

impl SensorAdapter {
    /// Creates the adapter for one reading kind.
    #[must_use]
    pub fn new(ctx: AdapterContext, kind: SensorKind) -> Self {
        Self { ctx, kind }
    }

    /// The entity's identity.
    #[must_use]
    pub fn info(&self) -> &EntityInfo {
        &self.ctx.info
    }

    /// The reading kind this entity projects.
    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Unique id: the device id, suffixed with the reading kind for
    /// structured readings.
    #[must_use]
    pub fn unique_id(&self) -> String {
        match self.kind {
            SensorKind::State => self.ctx.info.device_id.to_string(),
            kind => format!("{}_{}", self.ctx.info.device_id, kind.suffix()),
        }
    }

    /// True when the device is present and online.
    #[must_use]
    pub fn available(&self) -> bool {
        self.ctx.available()
    }

    /// Current numeric reading; `None` for text sensors or missing data.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.ctx
            .with_record(|record| record.structured().and_then(|msg| self.kind.extract(msg)))
            .flatten()
    }

    /// Current state string, for text sensors.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        if self.kind != SensorKind::State {
            return None;
        }
        self.ctx
            .with_record(|record| record.state.clone())
            .flatten()
    }
}
