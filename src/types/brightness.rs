// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for light control.
//!
//! The Bemfa cloud reports and accepts brightness as a percentage (0-100),
//! while home-automation platforms typically display 0-255. This module
//! provides a type-safe percentage value with conversions for both scales.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// # Examples
///
/// ```
/// use behome_lib::types::Brightness;
///
/// let bri = Brightness::new(80).unwrap();
/// assert_eq!(bri.value(), 80);
/// assert_eq!(bri.to_scale_255(), 204);
///
/// // Invalid values return error
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness (0%).
    pub const MIN: Self = Self(0);

    /// Maximum brightness (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidBrightness` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::InvalidBrightness(u16::from(value)));
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use behome_lib::types::Brightness;
    ///
    /// assert_eq!(Brightness::clamped(150).value(), 100);
    /// ```
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value > 100 { Self(100) } else { Self(value) }
    }

    /// Creates a brightness value from the platform's 0-255 scale.
    ///
    /// # Examples
    ///
    /// ```
    /// use behome_lib::types::Brightness;
    ///
    /// assert_eq!(Brightness::from_scale_255(255).value(), 100);
    /// assert_eq!(Brightness::from_scale_255(128).value(), 50);
    /// assert_eq!(Brightness::from_scale_255(0).value(), 0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_scale_255(value: u8) -> Self {
        Self((value as u16 * 100 / 255) as u8)
    }

    /// Converts to the platform's 0-255 scale.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_scale_255(self) -> u8 {
        (self.0 as u16 * 255 / 100) as u8
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        assert_eq!(Brightness::new(0).unwrap().value(), 0);
        assert_eq!(Brightness::new(100).unwrap().value(), 100);
    }

    #[test]
    fn new_out_of_range() {
        assert!(matches!(
            Brightness::new(101),
            Err(ValueError::InvalidBrightness(101))
        ));
    }

    #[test]
    fn clamped_caps_at_max() {
        assert_eq!(Brightness::clamped(200).value(), 100);
        assert_eq!(Brightness::clamped(42).value(), 42);
    }

    #[test]
    fn scale_255_round_trip() {
        assert_eq!(Brightness::from_scale_255(255), Brightness::MAX);
        assert_eq!(Brightness::from_scale_255(0), Brightness::MIN);
        assert_eq!(Brightness::MAX.to_scale_255(), 255);
        assert_eq!(Brightness::MIN.to_scale_255(), 0);
    }

    #[test]
    fn scale_255_matches_platform_rounding() {
        // 80% -> int(80 / 100 * 255) = 204
        assert_eq!(Brightness::new(80).unwrap().to_scale_255(), 204);
        // 128 -> int(128 / 255 * 100) = 50
        assert_eq!(Brightness::from_scale_255(128).value(), 50);
    }

    #[test]
    fn display() {
        assert_eq!(Brightness::new(75).unwrap().to_string(), "75%");
    }
}
