// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC modes and presets for climate devices.
//!
//! The Bemfa cloud reports the running mode of an air conditioner as a
//! numeric code in the structured state. Codes 1-5 map to regular HVAC
//! modes; codes 6 (sleep) and 7 (eco) are presets layered on top of
//! automatic operation.

use std::fmt;

/// Operating mode of a climate device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    /// Device is powered off.
    Off,
    /// Automatic heat/cool selection.
    Auto,
    /// Cooling.
    Cool,
    /// Heating.
    Heat,
    /// Fan circulation only.
    FanOnly,
    /// Dehumidification.
    Dry,
}

impl HvacMode {
    /// Maps a wire mode code to an HVAC mode.
    ///
    /// Preset codes (6, 7) and unknown codes report as [`HvacMode::Auto`];
    /// the preset itself is surfaced separately via [`Preset::from_code`].
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            2 => Self::Cool,
            3 => Self::Heat,
            4 => Self::FanOnly,
            5 => Self::Dry,
            _ => Self::Auto,
        }
    }

    /// Returns the numeric wire code, or `None` for [`HvacMode::Off`].
    #[must_use]
    pub const fn code(&self) -> Option<u8> {
        match self {
            Self::Off => None,
            Self::Auto => Some(1),
            Self::Cool => Some(2),
            Self::Heat => Some(3),
            Self::FanOnly => Some(4),
            Self::Dry => Some(5),
        }
    }

    /// Returns the wire token used in `set` commands.
    ///
    /// [`HvacMode::Off`] has no token; turning the device off uses the plain
    /// `off` command instead.
    #[must_use]
    pub const fn wire_token(&self) -> Option<&'static str> {
        match self {
            Self::Off => None,
            Self::Auto => Some("auto"),
            Self::Cool => Some("cool"),
            Self::Heat => Some("heat"),
            Self::FanOnly => Some("fan"),
            Self::Dry => Some("dry"),
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Auto => "auto",
            Self::Cool => "cool",
            Self::Heat => "heat",
            Self::FanOnly => "fan_only",
            Self::Dry => "dry",
        };
        f.write_str(name)
    }
}

/// Comfort preset of a climate device, reported alongside the HVAC mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Quiet night operation (wire code 6).
    Sleep,
    /// Energy-saving operation (wire code 7).
    Eco,
}

impl Preset {
    /// Maps a wire mode code to a preset, if the code denotes one.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            6 => Some(Self::Sleep),
            7 => Some(Self::Eco),
            _ => None,
        }
    }

    /// Returns the numeric wire code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Sleep => 6,
            Self::Eco => 7,
        }
    }

    /// Returns the wire token used in `set` commands.
    #[must_use]
    pub const fn wire_token(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Eco => "eco",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}
