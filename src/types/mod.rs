// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constrained value types shared across device adapters.

mod brightness;
mod hvac;
mod speed;

pub use brightness::Brightness;
pub use hvac::{HvacMode, Preset};
pub use speed::SpeedLevel;
