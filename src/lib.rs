// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `BeHome` Lib - A Rust library to bridge BeHome (Bemfa cloud) smart-home
//! devices.
//!
//! The Bemfa cloud exposes no push channel to integrations, so this library
//! is built around a polling state coordinator: it fetches the account's
//! device list on a fixed interval, publishes immutable snapshots, and keeps
//! entities responsive between polls with an optimistic-lock protocol that
//! pins command results for a few seconds while the cloud catches up.
//!
//! # Supported Device Categories
//!
//! - **Switches and sockets**: on/off
//! - **Lights**: on/off, brightness where the device supports it
//! - **Fans**: three speed levels exposed as percentages
//! - **Covers**: open/close/stop and position
//! - **Climate**: air conditioners (modes, presets, target temperature) and
//!   heat-only thermostats
//! - **Water heaters**: target temperature, eco/performance operation
//! - **Televisions**: power, volume and channel stepping
//! - **Air purifiers**: power and preset modes
//! - **Sensors**: temperature, humidity, air quality, PM2.5, CO2, pressure
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use behome_lib::{CloudConfig, Coordinator, EntityRegistry, PrivateKey};
//!
//! #[tokio::main]
//! async fn main() -> behome_lib::Result<()> {
//!     let key = PrivateKey::new("d6a3f8c2e917b0a4")?;
//!     let client = Arc::new(CloudConfig::new(key.clone()).into_client()?);
//!     let coordinator = Arc::new(Coordinator::new(
//!         CloudConfig::new(key).into_client()?,
//!     ));
//!
//!     // Surface new entities as the coordinator learns about them
//!     let registry = Arc::new(EntityRegistry::new(
//!         Arc::clone(&coordinator),
//!         Arc::clone(&client),
//!         |entities| {
//!             for entity in &entities {
//!                 println!("discovered {} ({})", entity.name(), entity.unique_id());
//!             }
//!         },
//!     ));
//!     registry.attach();
//!
//!     // First fetch, then poll in the background
//!     coordinator.refresh().await;
//!     coordinator.spawn_poller();
//!     Ok(())
//! }
//! ```
//!
//! # Command Model
//!
//! Entity command paths never block on the cloud. They pin the expected
//! outcome locally (so reads reflect the command immediately), send the
//! command without waiting for the device to confirm, and schedule a
//! verification refresh a few seconds later:
//!
//! ```no_run
//! # use behome_lib::adapters::Entity;
//! # async fn example(entity: Entity) -> behome_lib::Result<()> {
//! if let Entity::Switch(switch) = entity {
//!     switch.turn_on().await;
//!     assert!(switch.is_on()); // reads back immediately
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # OAuth Tokens
//!
//! Accounts set up through the vendor's OAuth flow carry the private key
//! inside the access token, padded differently per integration generation:
//!
//! ```
//! use behome_lib::{PrivateKey, TokenScheme};
//!
//! let key = PrivateKey::from_access_token("xxxxd6a3f8c2e917b0a4yyyy", TokenScheme::V1)?;
//! assert_eq!(key.as_str(), "d6a3f8c2e917b0a4");
//! # Ok::<(), behome_lib::error::ValueError>(())
//! ```

pub mod adapters;
pub mod client;
pub mod command;
pub mod coordinator;
pub mod credentials;
pub mod device;
pub mod discovery;
pub mod error;
pub mod types;

pub use adapters::{AdapterContext, Entity, EntityInfo};
pub use client::{CloudClient, CloudConfig};
pub use command::Command;
pub use coordinator::{Coordinator, CoordinatorConfig, Snapshot, SubscriptionId};
pub use credentials::{PrivateKey, TokenScheme};
pub use device::{Category, DeviceId, DeviceMessage, DeviceRecord, StateUpdate, StructuredState};
pub use discovery::{AreaIndex, EntityRegistry};
pub use error::{Error, ProtocolError, Result, ValueError};
pub use types::{Brightness, HvacMode, Preset, SpeedLevel};
