// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed level type.
//!
//! Bemfa fans expose three discrete speed levels (1-3) on the wire, while
//! home-automation platforms work with percentages. [`SpeedLevel`] converts
//! between the two ranges.

use std::fmt;

use crate::error::ValueError;

/// Discrete fan speed level (1-3).
///
/// # Examples
///
/// ```
/// use behome_lib::types::SpeedLevel;
///
/// let speed = SpeedLevel::new(2).unwrap();
/// assert_eq!(speed.to_percentage(), 66);
///
/// let from_pct = SpeedLevel::from_percentage(50).unwrap();
/// assert_eq!(from_pct.value(), 2);
///
/// // Percentage 0 means "off", not a level
/// assert!(SpeedLevel::from_percentage(0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    /// Lowest speed level.
    pub const MIN: Self = Self(1);

    /// Highest speed level.
    pub const MAX: Self = Self(3);

    /// Creates a new speed level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is not within 1-3.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if !(1..=3).contains(&value) {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: 3,
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a speed level, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < 1 {
            Self(1)
        } else if value > 3 {
            Self(3)
        } else {
            Self(value)
        }
    }

    /// Creates a speed level from a percentage (1-100).
    ///
    /// Returns `None` for 0%, which represents "off" rather than a level.
    /// The mapping divides the percentage range evenly across the three
    /// levels: 1-33 → 1, 34-66 → 2, 67-100 → 3.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_percentage(percentage: u8) -> Option<Self> {
        if percentage == 0 {
            return None;
        }
        let level = (percentage as u16 * 3).div_ceil(100) as u8;
        Some(Self::clamped(level))
    }

    /// Converts to a percentage (33, 66 or 100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_percentage(self) -> u8 {
        (self.0 as u16 * 100 / 3) as u8
    }

    /// Returns the raw level value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        assert_eq!(SpeedLevel::new(1).unwrap().value(), 1);
        assert_eq!(SpeedLevel::new(3).unwrap().value(), 3);
    }

    #[test]
    fn new_out_of_range() {
        assert!(matches!(
            SpeedLevel::new(0),
            Err(ValueError::OutOfRange { actual: 0, .. })
        ));
        assert!(matches!(
            SpeedLevel::new(4),
            Err(ValueError::OutOfRange { actual: 4, .. })
        ));
    }

    #[test]
    fn percentages() {
        assert_eq!(SpeedLevel::new(1).unwrap().to_percentage(), 33);
        assert_eq!(SpeedLevel::new(2).unwrap().to_percentage(), 66);
        assert_eq!(SpeedLevel::new(3).unwrap().to_percentage(), 100);
    }

    #[test]
    fn from_percentage_boundaries() {
        assert_eq!(SpeedLevel::from_percentage(0), None);
        assert_eq!(SpeedLevel::from_percentage(1).unwrap().value(), 1);
        assert_eq!(SpeedLevel::from_percentage(33).unwrap().value(), 1);
        assert_eq!(SpeedLevel::from_percentage(34).unwrap().value(), 2);
        assert_eq!(SpeedLevel::from_percentage(66).unwrap().value(), 2);
        assert_eq!(SpeedLevel::from_percentage(67).unwrap().value(), 3);
        assert_eq!(SpeedLevel::from_percentage(100).unwrap().value(), 3);
    }

    #[test]
    fn percentage_round_trips_through_level() {
        for level in 1..=3 {
            let speed = SpeedLevel::new(level).unwrap();
            let back = SpeedLevel::from_percentage(speed.to_percentage()).unwrap();
            assert_eq!(back, speed);
        }
    }
}
