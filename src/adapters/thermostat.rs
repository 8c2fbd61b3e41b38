// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating-thermostat adapter.
//!
//! Thermostats share the climate wire format but only ever heat: the mode
//! is off or heat, nothing else.

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};
use crate::types::HvacMode;

use super::{AdapterContext, EntityInfo};

/// Target temperature assumed when the device reports none.
const DEFAULT_TEMPERATURE: i32 = 25;

/// Adapter for heating thermostats.
#[derive(Debug, Clone)]
pub struct ThermostatAdapter {
    ctx: AdapterContext,
}

impl ThermostatAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// The entity's identity.
    #[must_use]
    pub fn info(&self) -> &EntityInfo {
        &self.ctx.info
    }

    /// True when the device is present and online.
    #[must_use]
    pub fn available(&self) -> bool {
        self.ctx.available()
    }

    fn structured(&self) -> Option<StructuredState> {
        self.ctx
            .with_record(|record| record.structured().cloned())
            .flatten()
    }

    /// Current mode: heat while on, otherwise off.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        match self.structured() {
            Some(msg) if msg.on == Some(true) => HvacMode::Heat,
            _ => HvacMode::Off,
        }
    }

    /// Target temperature; `None` when off or unreported.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        let msg = self.structured()?;
        if msg.on == Some(true) { msg.t } else { None }
    }

    /// Turns heating on at the current (or default) target temperature.
    pub async fn turn_on(&self) {
        let temperature = self.target_or_default();
        self.heat_to(temperature).await;
    }

    /// Turns the thermostat off.
    pub async fn turn_off(&self) {
        let update = StateUpdate::message(StructuredState::default().with_on(false));
        self.ctx.dispatch(Some(update), Command::Off).await;
    }

    /// Sets the target temperature; implies heating.
    #[allow(clippy::cast_possible_truncation)]
    pub async fn set_temperature(&self, temperature: f64) {
        self.heat_to(temperature as i32).await;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn target_or_default(&self) -> i32 {
        self.target_temperature()
            .map_or(DEFAULT_TEMPERATURE, |t| t as i32)
    }

    async fn heat_to(&self, temperature: i32) {
        let update = StateUpdate::message(
            StructuredState::default()
                .with_on(true)
                .with_t(f64::from(temperature))
                .with_mode(3),
        );
        let command = Command::SetClimate {
            temperature,
            mode: "heat",
        };
        self.ctx.dispatch(Some(update), command).await;
    }
}
