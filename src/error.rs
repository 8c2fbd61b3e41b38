// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `BeHome` library.
//!
//! Network and parse failures on the cloud client's hot paths are
//! deliberately *not* represented here: `fetch_devices` collapses them to an
//! empty device list and `send_command` to `false`. These types cover
//! everything else: value validation, credential derivation, and client
//! construction.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while constructing or configuring the cloud client.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create constrained types
/// with invalid values, or when user input is rejected before any
/// network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A brightness value is outside the valid range (0-100).
    #[error("brightness value {0} is out of range [0, 100]")]
    InvalidBrightness(u16),

    /// A preset mode string is not supported by the device category.
    #[error("invalid preset mode: {0}")]
    InvalidPresetMode(String),

    /// The private key is empty.
    #[error("private key must not be empty")]
    EmptyPrivateKey,

    /// An OAuth access token is too short for the configured strip offsets.
    #[error("access token of {len} characters is too short to strip {strip}")]
    TokenTooShort {
        /// Length of the provided token, in characters.
        len: usize,
        /// Total number of padding characters the scheme removes.
        strip: usize,
    },
}

/// Errors related to cloud client construction.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid base URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 1,
            max: 3,
            actual: 5,
        };
        assert_eq!(err.to_string(), "value 5 is out of range [1, 3]");
    }

    #[test]
    fn error_from_value_error() {
        let value_err = ValueError::InvalidBrightness(150);
        let err: Error = value_err.into();
        assert!(matches!(
            err,
            Error::Value(ValueError::InvalidBrightness(150))
        ));
    }

    #[test]
    fn token_too_short_display() {
        let err = ValueError::TokenTooShort { len: 6, strip: 8 };
        assert_eq!(
            err.to_string(),
            "access token of 6 characters is too short to strip 8"
        );
    }

    #[test]
    fn invalid_preset_display() {
        let err = ValueError::InvalidPresetMode("turbo".to_string());
        assert_eq!(err.to_string(), "invalid preset mode: turbo");
    }
}
