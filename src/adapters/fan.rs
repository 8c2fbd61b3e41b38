// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan adapter.
//!
//! Fans expose three discrete speed levels on the wire; the adapter speaks
//! percentages (33/66/100). A fan that is on without a usable speed reading
//! reports 66 %.

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};
use crate::types::SpeedLevel;

use super::{AdapterContext, EntityInfo};

/// Percentage assumed when the fan is on but reports no speed.
const DEFAULT_PERCENTAGE: u8 = 66;

/// Adapter for fans.
#[derive(Debug, Clone)]
pub struct FanAdapter {
    ctx: AdapterContext,
}

impl FanAdapter {
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

    /// True when the fan reports on. Legacy firmwares report any string
    /// other than `"off"` as running.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx
            .with_record(|record| {
                if let Some(msg) = record.structured() {
                    return msg.on == Some(true);
                }
                record.legacy_msg().is_some_and(|msg| msg != "off")
            })
            .unwrap_or(false)
    }

    /// Current speed percentage; 0 when off.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        if !self.is_on() {
            return 0;
        }
        let level = self.ctx.with_record(|record| {
            if let Some(msg) = record.structured() {
                return msg.speed.and_then(|speed| u8::try_from(speed).ok());
            }
            // Legacy "speed,<n>" strings
            record
                .legacy_msg()
                .and_then(|msg| msg.strip_prefix("speed,"))
                .and_then(|rest| rest.parse::<u8>().ok())
        });
        match level.flatten() {
            Some(level) => SpeedLevel::clamped(level).to_percentage(),
            None => DEFAULT_PERCENTAGE,
        }
    }

    /// Sets the fan speed; 0 % turns it off.
    pub async fn set_percentage(&self, percentage: u8) {
        let Some(level) = SpeedLevel::from_percentage(percentage) else {
            self.turn_off().await;
            return;
        };

        let update = StateUpdate::message(
            StructuredState::default()
                .with_on(true)
                .with_speed(i64::from(level.value())),
        );
        self.ctx.dispatch(Some(update), Command::Speed(level)).await;
    }

    /// Turns the fan on, defaulting to medium speed.
    pub async fn turn_on(&self, percentage: Option<u8>) {
        self.set_percentage(percentage.unwrap_or(DEFAULT_PERCENTAGE))
            .await;
    }

    /// Turns the fan off.
    pub async fn turn_off(&self) {
        let update = StateUpdate::message(StructuredState::default().with_on(false));
        self.ctx.dispatch(Some(update), Command::Off).await;
    }
}
