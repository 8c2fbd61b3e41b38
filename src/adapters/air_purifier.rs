// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air-purifier adapter.
//!
//! Purifiers report through the positional `state` string `<on|off>,<preset>`.
//! Preset names are validated before anything is sent or pinned; an unknown
//! preset is a caller error, not a device condition.

use crate::command::Command;
use crate::device::StateUpdate;
use crate::error::ValueError;

use super::{AdapterContext, EntityInfo};

/// Preset modes supported by air purifiers.
pub const AIR_PURIFIER_PRESETS: [&str; 3] = ["auto", "sleep", "strong"];

/// Adapter for air purifiers.
#[derive(Debug, Clone)]
pub struct AirPurifierAdapter {
    ctx: AdapterContext,
}

impl AirPurifierAdapter {
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

    /// True when the purifier reports on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self.state_parts().first(), Some(part) if !part.is_empty() && part != "off")
    }

    /// Active preset; `None` when off or unreported.
    #[must_use]
    pub fn preset_mode(&self) -> Option<String> {
        if !self.is_on() {
            return None;
        }
        self.state_parts().get(1).cloned()
    }

    /// Turns the purifier on.
    pub async fn turn_on(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("on")), Command::On)
            .await;
    }

    /// Turns the purifier off.
    pub async fn turn_off(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("off")), Command::Off)
            .await;
    }

    /// Activates a preset mode.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidPresetMode` for an unknown preset, before
    /// any network call or local state change.
    pub async fn set_preset_mode(&self, preset: &str) -> Result<(), ValueError> {
        if !AIR_PURIFIER_PRESETS.contains(&preset) {
            return Err(ValueError::InvalidPresetMode(preset.to_string()));
        }

        let update = StateUpdate::state(format!("on,{preset}"));
        let command = Command::Raw(format!("set,{preset}"));
        self.ctx.dispatch(Some(update), command).await;
        Ok(())
    }
}
