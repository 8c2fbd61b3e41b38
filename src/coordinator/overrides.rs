// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optimistic-lock overrides.
//!
//! After a command is sent, the cloud keeps reporting the stale state for a
//! few seconds. An override pins the expected fields of one device until a
//! deadline, so refreshes do not flap the entity back and forth. Expired
//! entries are swept lazily at refresh time; nothing runs a timer per entry.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::device::{DeviceId, StateUpdate};

/// One pinned-state entry.
#[derive(Debug, Clone)]
pub struct OverrideEntry {
    /// When the pin stops applying.
    pub expires_at: Instant,
    /// The fields it pins.
    pub update: StateUpdate,
}

/// Per-device overrides with lazy expiry.
#[derive(Debug, Default)]
pub struct OverrideMap {
    entries: HashMap<DeviceId, OverrideEntry>,
}

impl OverrideMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the override for a device.
    ///
    /// A second command within the lock window replaces the pin wholesale
    /// and restarts its clock.
    pub fn insert(&mut self, device_id: DeviceId, update: StateUpdate, expires_at: Instant) {
        self.entries
            .insert(device_id, OverrideEntry { expires_at, update });
    }

    /// Drops every entry whose deadline has passed. Returns the number swept.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    /// Returns the live entry for a device, if any.
    #[must_use]
    pub fn get(&self, device_id: &DeviceId) -> Option<&OverrideEntry> {
        self.entries.get(device_id)
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no overrides are pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::device::StructuredState;

    fn update() -> StateUpdate {
        StateUpdate::message(StructuredState::default().with_on(true))
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_respects_deadline() {
        let mut map = OverrideMap::new();
        let now = Instant::now();
        map.insert("dev-1".into(), update(), now + Duration::from_secs(5));

        // Still pinned right up to the deadline
        assert_eq!(map.sweep_expired(now + Duration::from_millis(4999)), 0);
        assert!(map.get(&"dev-1".into()).is_some());

        // Gone once the deadline has passed
        assert_eq!(map.sweep_expired(now + Duration::from_secs(5)), 1);
        assert!(map.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reinsert_restarts_the_clock() {
        let mut map = OverrideMap::new();
        let now = Instant::now();
        map.insert("dev-1".into(), update(), now + Duration::from_secs(5));
        map.insert(
            "dev-1".into(),
            StateUpdate::state("off"),
            now + Duration::from_secs(8),
        );

        assert_eq!(map.len(), 1);
        assert_eq!(map.sweep_expired(now + Duration::from_secs(6)), 0);
        let entry = map.get(&"dev-1".into()).unwrap();
        assert_eq!(entry.update.state.as_deref(), Some("off"));
    }
}
