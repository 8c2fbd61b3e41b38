// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device command definitions and wire encoding.
//!
//! Commands travel in two layers. Adapters build a typed [`Command`], which
//! renders to a short logical message string (`on`, `set,80`, `speed,2`).
//! [`encode`] then arbitrates that string into the JSON object the control
//! endpoint expects. The arbitration is positional: the *shape* of the
//! string decides the payload, not the device category.
//!
//! # Examples
//!
//! ```
//! use behome_lib::command::{Command, encode};
//! use behome_lib::types::Brightness;
//!
//! let cmd = Command::SetBrightness(Brightness::new(80).unwrap());
//! assert_eq!(cmd.to_message(), "set,80");
//! assert_eq!(encode(&cmd.to_message()), serde_json::json!({"on": true, "bri": 80}));
//! ```

use serde_json::{Value, json};

use crate::types::{Brightness, SpeedLevel};

/// A typed command for a cloud device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Turn the device on.
    On,
    /// Turn the device off.
    Off,
    /// Set light brightness.
    SetBrightness(Brightness),
    /// Set climate target temperature and mode (`set,<t>,<mode>,auto`).
    SetClimate {
        /// Target temperature in degrees Celsius.
        temperature: i32,
        /// Wire mode token (`auto`, `cool`, `heat`, `fan`, `dry`, `sleep`, `eco`).
        mode: &'static str,
    },
    /// Set fan speed level.
    Speed(SpeedLevel),
    /// Stop a running cover.
    Stop,
    /// Media volume up.
    VolumeUp,
    /// Media volume down.
    VolumeDown,
    /// Media channel up.
    ChannelUp,
    /// Media channel down.
    ChannelDown,
    /// Pass a JSON payload through verbatim.
    Json(Value),
    /// An arbitrary logical message string.
    Raw(String),
}

impl Command {
    /// Renders the command to its logical message string.
    #[must_use]
    pub fn to_message(&self) -> String {
        match self {
            Self::On => "on".to_string(),
            Self::Off => "off".to_string(),
            Self::SetBrightness(bri) => format!("set,{}", bri.value()),
            Self::SetClimate { temperature, mode } => format!("set,{temperature},{mode},auto"),
            Self::Speed(level) => format!("speed,{}", level.value()),
            Self::Stop => "stop".to_string(),
            Self::VolumeUp => "volup".to_string(),
            Self::VolumeDown => "voldown".to_string(),
            Self::ChannelUp => "chup".to_string(),
            Self::ChannelDown => "chdown".to_string(),
            Self::Json(value) => value.to_string(),
            Self::Raw(message) => message.clone(),
        }
    }

    /// Returns the wire payload for this command.
    #[must_use]
    pub fn payload(&self) -> Value {
        encode(&self.to_message())
    }
}

/// Encodes a logical message string into the control endpoint's JSON payload.
///
/// Checks are ordered: `on`/`off`, `set,...`, `speed,...`, well-formed JSON,
/// special tokens, and finally the `{"on":true}` fallback. A `set` or `speed`
/// message whose numeric part does not parse also lands on the fallback;
/// encoding never fails.
#[must_use]
pub fn encode(message: &str) -> Value {
    if message == "on" {
        return json!({"on": true});
    }
    if message == "off" {
        return json!({"on": false});
    }
    if message.starts_with("set,") {
        let parts: Vec<&str> = message.split(',').collect();
        if let Ok(value) = parts[1].parse::<i64>() {
            return match parts.len() {
                // "set,80" -> light brightness
                2 => json!({"on": true, "bri": value}),
                // "set,25,cool,auto" -> climate temperature and mode
                4 => json!({"on": true, "t": value, "mode": mode_code(parts[2])}),
                // other arities carry a generic value
                _ => json!({"on": true, "v": value}),
            };
        }
        return json!({"on": true});
    }
    if let Some(rest) = message.strip_prefix("speed,") {
        let first = rest.split(',').next().unwrap_or_default();
        if let Ok(speed) = first.parse::<i64>() {
            return json!({"on": true, "v": speed});
        }
        return json!({"on": true});
    }
    if let Ok(value) = serde_json::from_str::<Value>(message) {
        return value;
    }
    match message {
        "stop" => json!({"pause": true}),
        "volup" | "voldown" | "chup" | "chdown" => json!({"command": message}),
        _ => json!({"on": true}),
    }
}

/// Maps a wire mode token to its numeric code. Unknown tokens default to auto.
fn mode_code(mode: &str) -> u8 {
    match mode {
        "cool" => 2,
        "heat" => 3,
        "fan" => 4,
        "dry" => 5,
        "sleep" => 6,
        "eco" => 7,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_commands() {
        assert_eq!(encode("on"), json!({"on": true}));
        assert_eq!(encode("off"), json!({"on": false}));
    }

    #[test]
    fn two_part_set_is_brightness() {
        assert_eq!(encode("set,80"), json!({"on": true, "bri": 80}));
    }

    #[test]
    fn four_part_set_is_climate() {
        assert_eq!(
            encode("set,25,cool,auto"),
            json!({"on": true, "t": 25, "mode": 2})
        );
        // Unknown mode token defaults to auto
        assert_eq!(
            encode("set,25,turbo,auto"),
            json!({"on": true, "t": 25, "mode": 1})
        );
    }

    #[test]
    fn three_part_set_carries_generic_value() {
        assert_eq!(encode("set,55,eco"), json!({"on": true, "v": 55}));
    }

    #[test]
    fn non_numeric_set_falls_back() {
        assert_eq!(encode("set,auto"), json!({"on": true}));
        assert_eq!(encode("set,"), json!({"on": true}));
    }

    #[test]
    fn speed_command() {
        assert_eq!(encode("speed,2"), json!({"on": true, "v": 2}));
        assert_eq!(encode("speed,fast"), json!({"on": true}));
    }

    #[test]
    fn json_passes_through_verbatim() {
        assert_eq!(
            encode(r#"{"on":true,"v":42}"#),
            json!({"on": true, "v": 42})
        );
    }

    #[test]
    fn cover_and_media_tokens() {
        assert_eq!(encode("stop"), json!({"pause": true}));
        assert_eq!(encode("volup"), json!({"command": "volup"}));
        assert_eq!(encode("chdown"), json!({"command": "chdown"}));
    }

    #[test]
    fn unknown_message_falls_back() {
        assert_eq!(encode("open sesame"), json!({"on": true}));
    }

    #[test]
    fn mode_code_table() {
        for (token, code) in [
            ("auto", 1),
            ("cool", 2),
            ("heat", 3),
            ("fan", 4),
            ("dry", 5),
            ("sleep", 6),
            ("eco", 7),
        ] {
            assert_eq!(mode_code(token), code);
        }
    }

    #[test]
    fn typed_commands_render_messages() {
        assert_eq!(Command::On.to_message(), "on");
        assert_eq!(
            Command::SetClimate {
                temperature: 25,
                mode: "cool"
            }
            .to_message(),
            "set,25,cool,auto"
        );
        assert_eq!(
            Command::Speed(SpeedLevel::new(3).unwrap()).to_message(),
            "speed,3"
        );
        assert_eq!(
            Command::Json(json!({"on": true, "v": 50})).payload(),
            json!({"on": true, "v": 50})
        );
    }
}
