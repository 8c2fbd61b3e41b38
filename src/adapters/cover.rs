// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Curtain / cover adapter.
//!
//! Position comes from the structured `v` field (0 = closed, 100 = open).
//! Devices without position reporting fall back to the state string, where
//! `off` means closed. Transition states (`opening`, `closing`, `stop`) are
//! set optimistically by the command paths and confirmed by the follow-up
//! refresh.

use serde_json::json;

use crate::command::Command;
use crate::device::{StateUpdate, StructuredState};

use super::{AdapterContext, EntityInfo};

/// Adapter for curtains and covers.
#[derive(Debug, Clone)]
pub struct CoverAdapter {
    ctx: AdapterContext,
}

impl CoverAdapter {
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

    fn state_string(&self) -> String {
        self.ctx
            .with_record(|record| record.state.clone())
            .flatten()
            .unwrap_or_else(|| "closed".to_string())
    }

    /// Current position 0-100, if the device reports one.
    #[must_use]
    pub fn position(&self) -> Option<u8> {
        self.ctx
            .with_record(|record| {
                record
                    .structured()
                    .and_then(|msg| msg.v)
                    .and_then(|v| u8::try_from(v).ok())
            })
            .flatten()
    }

    /// Whether the cover is closed; `None` when the device reports neither
    /// a position nor a state string.
    #[must_use]
    pub fn is_closed(&self) -> Option<bool> {
        if let Some(position) = self.position() {
            return Some(position == 0);
        }
        self.ctx
            .with_record(|record| record.state.clone())
            .flatten()
            .map(|state| state == "off")
    }

    /// True while the cover reports an opening transition.
    #[must_use]
    pub fn is_opening(&self) -> bool {
        self.state_string() == "opening"
    }

    /// True while the cover reports a closing transition.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.state_string() == "closing"
    }

    /// Opens the cover.
    pub async fn open(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("opening")), Command::On)
            .await;
    }

    /// Closes the cover.
    pub async fn close(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("closing")), Command::Off)
            .await;
    }

    /// Stops the cover mid-travel.
    pub async fn stop(&self) {
        self.ctx
            .dispatch(Some(StateUpdate::state("stop")), Command::Stop)
            .await;
    }

    /// Moves the cover to a position (0-100, clamped).
    pub async fn set_position(&self, position: u8) {
        let position = position.min(100);
        let direction = if position > self.position().unwrap_or(0) {
            "opening"
        } else {
            "closing"
        };

        let update = StateUpdate::message(StructuredState::default().with_v(i64::from(position)))
            .and_state(direction);
        let command = Command::Json(json!({"on": true, "v": position}));
        self.ctx.dispatch(Some(update), command).await;
    }
}
