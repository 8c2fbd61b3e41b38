// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cloud account credentials.
//!
//! The Bemfa cloud identifies an account by a private key. The key can be
//! entered directly or derived from an OAuth access token by stripping a
//! fixed number of padding characters from each end; the offsets differ
//! between integration generations, so the derivation is an explicit
//! [`TokenScheme`] rather than guesswork.
//!
//! On the wire the key travels base64-encoded as the `openID` parameter;
//! see [`PrivateKey::open_id`].

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::ValueError;

/// How a private key is derived from an OAuth access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScheme {
    /// The token *is* the private key.
    Direct,
    /// The key is the token with fixed padding stripped from both ends.
    StripPadding {
        /// Characters removed from the front.
        prefix: usize,
        /// Characters removed from the back.
        suffix: usize,
    },
}

impl TokenScheme {
    /// First-generation token padding: 4 characters on each end.
    pub const V1: Self = Self::StripPadding {
        prefix: 4,
        suffix: 4,
    };

    /// Second-generation token padding: 4 in front, 1 at the back.
    pub const V2: Self = Self::StripPadding {
        prefix: 4,
        suffix: 1,
    };
}

/// A Bemfa cloud private key.
///
/// # Examples
///
/// ```
/// use behome_lib::credentials::{PrivateKey, TokenScheme};
///
/// let key = PrivateKey::new("d6a3f8c2e917b0a4").unwrap();
/// assert_eq!(key.as_str(), "d6a3f8c2e917b0a4");
///
/// let derived =
///     PrivateKey::from_access_token("xxxxd6a3f8c2e917b0a4yyyy", TokenScheme::V1).unwrap();
/// assert_eq!(derived, key);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PrivateKey(String);

impl PrivateKey {
    /// Creates a private key from its literal value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::EmptyPrivateKey` if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ValueError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValueError::EmptyPrivateKey);
        }
        Ok(Self(key))
    }

    /// Derives a private key from an OAuth access token.
    ///
    /// Padding offsets count characters, not bytes, so tokens carrying
    /// multibyte text strip cleanly.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TokenTooShort` if the token does not leave at
    /// least one character after stripping, and `ValueError::EmptyPrivateKey`
    /// for an empty token under [`TokenScheme::Direct`].
    pub fn from_access_token(token: &str, scheme: TokenScheme) -> Result<Self, ValueError> {
        match scheme {
            TokenScheme::Direct => Self::new(token),
            TokenScheme::StripPadding { prefix, suffix } => {
                let strip = prefix + suffix;
                let len = token.chars().count();
                if len <= strip {
                    return Err(ValueError::TokenTooShort { len, strip });
                }
                let key: String = token.chars().skip(prefix).take(len - strip).collect();
                Self::new(key)
            }
        }
    }

    /// Returns the key in the base64 form the cloud expects as `openID`.
    #[must_use]
    pub fn open_id(&self) -> String {
        BASE64.encode(self.0.as_bytes())
    }

    /// Returns the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// The key is an account secret; keep it out of debug output.
impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}
