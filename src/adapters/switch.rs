// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Socket and wall-switch adapter.

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};

use super::{AdapterContext, EntityInfo};

/// Adapter for sockets and wall switches.
#[derive(Debug, Clone)]
pub struct SwitchAdapter {
    ctx: AdapterContext,
}

impl SwitchAdapter {
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

    /// True when the switch reports on. Legacy firmwares report the plain
    /// string `"on"` instead of a structured message.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx
            .with_record(|record| {
                if let Some(msg) = record.structured() {
                    return msg.on == Some(true);
                }
                record.legacy_msg() == Some("on")
            })
            .unwrap_or(false)
    }

    /// Turns the switch on.
    pub async fn turn_on(&self) {
        let update = StateUpdate::message(StructuredState::default().with_on(true));
        self.ctx.dispatch(Some(update), Command::On).await;
    }

    /// Turns the switch off.
    pub async fn turn_off(&self) {
        let update = StateUpdate::message(StructuredState::default().with_on(false));
        self.ctx.dispatch(Some(update), Command::Off).await;
    }
}
