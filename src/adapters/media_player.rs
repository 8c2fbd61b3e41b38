// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Television adapter.
//!
//! Transport commands (volume, channel) are stateless pass-throughs; only
//! the power commands pin an expected state.

use crate::command::Command;
use crate::device::StateUpdate;

use super::{AdapterContext, EntityInfo};

/// Adapter for televisions.
#[derive(Debug, Clone)]
pub struct MediaPlayerAdapter {
    ctx: AdapterContext,
}

impl MediaPlayerAdapter {
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

    /// True unless the state string reads `off` (or is missing).
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx
            .with_record(|record| record.state.clone())
            .flatten()
            .is_some_and(|state| state != "off")
    }

    /// Turns the television on.
    pub async fn turn_on(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("on")), Command::On)
            .await;
    }

    /// Turns the television off.
    pub async fn turn_off(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("off")), Command::Off)
            .await;
    }

    /// Steps the volume up.
    pub async fn volume_up(&self) {
        self.ctx.dispatch(None, Command::VolumeUp).await;
    }

    /// Steps the volume down.
    pub async fn volume_down(&self) {
        self.ctx.dispatch(None, Command::VolumeDown).await;
    }

    /// Next channel.
    pub async fn next_channel(&self) {
        self.ctx.dispatch(None, Command::ChannelUp).await;
    }

    /// Previous channel.
    pub async fn previous_channel(&self) {
        self.ctx.dispatch(None, Command::ChannelDown).await;
    }
}
