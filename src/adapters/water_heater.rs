// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Water-heater adapter.
//!
//! Water heaters report through the positional `state` string
//! `<on|off>,<temp>,<mode>` rather than a structured message. A missing
//! mode part reads as performance.

use crate::command::Command;
use crate::device::StateUpdate;

use super::{AdapterContext, EntityInfo};

/// Target temperature assumed when the device reports none.
const DEFAULT_TEMPERATURE: i32 = 55;

/// Operating state of a water heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaterHeaterOperation {
    /// Powered off.
    Off,
    /// Energy-saving heating (wire token `eco`).
    Eco,
    /// Full-power heating (wire token `perf`).
    Performance,
}

impl WaterHeaterOperation {
    /// Returns the wire token; `None` for off.
    #[must_use]
    pub const fn wire_token(&self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::Eco => Some("eco"),
            Self::Performance => Some("perf"),
        }
    }
}

/// Adapter for water heaters.
#[derive(Debug, Clone)]
pub struct WaterHeaterAdapter {
    ctx: AdapterContext,
}

impl WaterHeaterAdapter {
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

    fn state_parts(&self) -> Vec<String> {
        self.ctx
            .with_record(|record| {
                record
                    .state_parts()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Current operation mode.
    #[must_use]
    pub fn operation(&self) -> WaterHeaterOperation {
        let parts = self.state_parts();
        match parts.first().map(String::as_str) {
            None | Some("off" | "") => WaterHeaterOperation::Off,
            Some(_) => match parts.get(2).map(String::as_str) {
                Some("eco") => WaterHeaterOperation::Eco,
                _ => WaterHeaterOperation::Performance,
            },
        }
    }

    /// Target temperature; `None` when off or unreported.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        let parts = self.state_parts();
        if parts.first().map(String::as_str) == Some("off") {
            return None;
        }
        parts.get(1).and_then(|part| part.parse().ok())
    }

    /// Sets the target temperature, keeping the current mode (performance
    /// when off).
    #[allow(clippy::cast_possible_truncation)]
    pub async fn set_temperature(&self, temperature: f64) {
        let mode = match self.operation() {
            WaterHeaterOperation::Off => WaterHeaterOperation::Performance,
            mode => mode,
        };
        self.heat(temperature as i32, mode).await;
    }

    /// Sets the operation mode, keeping the current target temperature.
    pub async fn set_operation(&self, operation: WaterHeaterOperation) {
        if operation == WaterHeaterOperation::Off {
            self.ctx
                .dispatch(Some(StateUpdate::state("off")), Command::Off)
                .await;
            return;
        }
        let temperature = self.target_or_default();
        self.heat(temperature, operation).await;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn target_or_default(&self) -> i32 {
        self.target_temperature()
            .map_or(DEFAULT_TEMPERATURE, |t| t as i32)
    }

    async fn heat(&self, temperature: i32, operation: WaterHeaterOperation) {
        // Off is handled by the caller
        let token = operation.wire_token().unwrap_or("perf");
        let update = StateUpdate::state(format!("on,{temperature},{token}"));
        // Three-part set: encodes to the generic {"on":true,"v":<temp>} payload
        let command = Command::Raw(format!("set,{temperature},{token}"));
        self.ctx.dispatch(Some(update), command).await;
    }
}
