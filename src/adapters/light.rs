// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light adapter.
//!
//! Brightness support is gated on the record's `attr1` flag. The wire uses
//! a 0-100 percentage; this adapter exposes the platform's 0-255 scale.

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};
use crate::types::Brightness;

use super::{AdapterContext, EntityInfo};

/// Adapter for lights, dimmable or plain.
#[derive(Debug, Clone)]
pub struct LightAdapter {
    ctx: AdapterContext,
}

impl LightAdapter {
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

    /// True when the record's `attr1` flag marks the light as dimmable.
    #[must_use]
    pub fn supports_brightness(&self) -> bool {
        self.ctx
            .with_record(|record| record.attr1 == Some(true))
            .unwrap_or(false)
    }

    /// True when the light reports on. Legacy firmwares report `"on"` or
    /// `"on,<bri>"` strings.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx
            .with_record(|record| {
                if let Some(msg) = record.structured() {
                    return msg.on == Some(true);
                }
                record
                    .legacy_msg()
                    .is_some_and(|msg| msg.split(',').next() == Some("on"))
            })
            .unwrap_or(false)
    }

    /// Current brightness on the platform's 0-255 scale.
    ///
    /// `None` when the light is not dimmable or reports no usable value;
    /// 0 when it is off.
    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        if !self.supports_brightness() {
            return None;
        }
        self.ctx.with_record(|record| {
            if let Some(msg) = record.structured() {
                if msg.on != Some(true) {
                    return Some(0);
                }
                if let Some(bri) = msg.bri {
                    return u8::try_from(bri)
                        .ok()
                        .map(|bri| Brightness::clamped(bri).to_scale_255());
                }
                // On without a brightness reading: full
                return Some(255);
            }
            match record.legacy_msg() {
                Some("on") => Some(255),
                Some(legacy) if legacy.starts_with("on,") => legacy
                    .split(',')
                    .nth(1)
                    .and_then(|part| part.parse::<u8>().ok())
                    .map(|bri| Brightness::clamped(bri).to_scale_255()),
                _ => None,
            }
        })?
    }

    /// Turns the light on, optionally at a 0-255 brightness.
    ///
    /// The brightness argument is ignored for non-dimmable lights.
    pub async fn turn_on(&self, brightness: Option<u8>) {
        if let (true, Some(level)) = (self.supports_brightness(), brightness) {
            let bri = Brightness::from_scale_255(level);
            let update = StateUpdate::message(
                StructuredState::default()
                    .with_on(true)
                    .with_bri(i64::from(bri.value())),
            );
            self.ctx
                .dispatch(Some(update), Command::SetBrightness(bri))
                .await;
            return;
        }

        let update = StateUpdate::message(StructuredState::default().with_on(true));
        self.ctx.dispatch(Some(update), Command::On).await;
    }

    /// Turns the light off.
    pub async fn turn_off(&self) {
        let mut msg = StructuredState::default().with_on(false);
        if self.supports_brightness() {
            msg = msg.with_bri(0);
        }
        self.ctx
            .dispatch(Some(StateUpdate::message(msg)), Command::Off)
            .await;
    }
}
