// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air-conditioner adapter.
//!
//! Mode codes 6 (sleep) and 7 (eco) are comfort presets: the HVAC mode then
//! reads as Auto and the preset is surfaced separately. Air conditioners
//! report no ambient temperature, so the current temperature mirrors the
//! target.

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};
use crate::types::{HvacMode, Preset};

use super::{AdapterContext, EntityInfo};

/// Target temperature assumed when the device reports none.
const DEFAULT_TEMPERATURE: i32 = 25;

/// Adapter for air conditioners.
#[derive(Debug, Clone)]
pub struct ClimateAdapter {
    ctx: AdapterContext,
}

impl ClimateAdapter {
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

    /// Current HVAC mode.
    #[must_use]
    pub fn hvac_mode(&self) -> HvacMode {
        let Some(msg) = self.structured() else {
            return HvacMode::Off;
        };
        if msg.on != Some(true) {
            return HvacMode::Off;
        }
        match msg.mode.and_then(|mode| u8::try_from(mode).ok()) {
            // Preset codes read as Auto; the preset is reported separately
            Some(code) => HvacMode::from_code(code),
            None => HvacMode::Auto,
        }
    }

    /// Active comfort preset, if any.
    #[must_use]
    pub fn preset(&self) -> Option<Preset> {
        self.structured()
            .and_then(|msg| msg.mode)
            .and_then(|mode| u8::try_from(mode).ok())
            .and_then(Preset::from_code)
    }

    /// Target temperature; `None` when off or unreported.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        let msg = self.structured()?;
        if msg.on == Some(true) { msg.t } else { None }
    }

    /// Current temperature. The device reports no ambient reading, so this
    /// mirrors the target.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.target_temperature()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn target_or_default(&self) -> i32 {
        self.target_temperature()
            .map_or(DEFAULT_TEMPERATURE, |t| t as i32)
    }

    /// Sets the HVAC mode, keeping the current target temperature.
    pub async fn set_hvac_mode(&self, mode: HvacMode) {
        let Some(code) = mode.code() else {
            let update = StateUpdate::message(StructuredState::default().with_on(false));
            self.ctx.dispatch(Some(update), Command::Off).await;
            return;
        };

        let temperature = self.target_or_default();
        let update = StateUpdate::message(
            StructuredState::default()
                .with_on(true)
                .with_t(f64::from(temperature))
                .with_mode(i64::from(code)),
        );
        let command = Command::SetClimate {
            temperature,
            // Off is ruled out above
            mode: mode.wire_token().unwrap_or("auto"),
        };
        self.ctx.dispatch(Some(update), command).await;
    }

    /// Sets the target temperature, keeping the current mode (cool when off).
    #[allow(clippy::cast_possible_truncation)]
    pub async fn set_temperature(&self, temperature: f64) {
        let temperature = temperature as i32;
        let mode = match self.hvac_mode() {
            HvacMode::Off => HvacMode::Cool,
            mode => mode,
        };
        let code = mode.code().unwrap_or(2);

        let update = StateUpdate::message(
            StructuredState::default()
                .with_on(true)
                .with_t(f64::from(temperature))
                .with_mode(i64::from(code)),
        );
        let command = Command::SetClimate {
            temperature,
            mode: mode.wire_token().unwrap_or("cool"),
        };
        self.ctx.dispatch(Some(update), command).await;
    }

    /// Activates a comfort preset, keeping the current target temperature.
    pub async fn set_preset(&self, preset: Preset) {
        let temperature = self.target_or_default();
        let update = StateUpdate::message(
            StructuredState::default()
                .with_on(true)
                .with_t(f64::from(temperature))
                .with_mode(i64::from(preset.code())),
        );
        let command = Command::SetClimate {
            temperature,
            mode: preset.wire_token(),
        };
        self.ctx.dispatch(Some(update), command).await;
    }
}
