//! Dispatch key resolution.
//!
//! A dispatch key is the canonical `"channel:event"` string used both to
//! match published events against declared subscriptions and to look up
//! handler functions in a handler table.
//!
//! ```text
//! ("system", "start")            ──► "system:start"
//! ("ui", "windowSizeChange")     ──► "ui:windowSizeChange"
//!                                ──► handleUiWindowSizeChange   (method name)
//! ```
//!
//! # Example
//!
//! ```
//! use specbus_types::{build_dispatch_key, build_handler_method_name};
//!
//! let key = build_dispatch_key("system", "start").unwrap();
//! assert_eq!(key.as_str(), "system:start");
//! assert_eq!(key.channel(), "system");
//! assert_eq!(key.event(), "start");
//!
//! let method = build_handler_method_name("ui", "windowSizeChange").unwrap();
//! assert_eq!(method, "handleUiWindowSizeChange");
//!
//! assert!(build_dispatch_key("", "start").is_err());
//! assert!(build_dispatch_key("a:b", "start").is_err());
//! ```

use crate::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between channel and event in a dispatch key.
pub const KEY_DELIMITER: char = ':';

/// Prefix of conventional handler method names.
pub const HANDLER_METHOD_PREFIX: &str = "handle";

/// Malformed channel or event name.
///
/// | Variant | Code |
/// |---------|------|
/// | `EmptyChannel` | `VALIDATION_EMPTY_CHANNEL` |
/// | `EmptyEvent` | `VALIDATION_EMPTY_EVENT` |
/// | `DelimiterInChannel` | `VALIDATION_DELIMITER_IN_CHANNEL` |
/// | `DelimiterInEvent` | `VALIDATION_DELIMITER_IN_EVENT` |
/// | `MalformedKey` | `VALIDATION_MALFORMED_KEY` |
///
/// None of these are recoverable: the caller has to fix the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ValidationError {
    /// Channel name is empty.
    #[error("channel name must not be empty")]
    EmptyChannel,

    /// Event name is empty.
    #[error("event name must not be empty")]
    EmptyEvent,

    /// Channel name contains the key delimiter.
    #[error("channel name '{0}' must not contain ':'")]
    DelimiterInChannel(String),

    /// Event name contains the key delimiter.
    #[error("event name '{0}' must not contain ':'")]
    DelimiterInEvent(String),

    /// A key string that is not exactly `channel:event`.
    #[error("malformed dispatch key: '{0}'")]
    MalformedKey(String),
}

impl ErrorCode for ValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyChannel => "VALIDATION_EMPTY_CHANNEL",
            Self::EmptyEvent => "VALIDATION_EMPTY_EVENT",
            Self::DelimiterInChannel(_) => "VALIDATION_DELIMITER_IN_CHANNEL",
            Self::DelimiterInEvent(_) => "VALIDATION_DELIMITER_IN_EVENT",
            Self::MalformedKey(_) => "VALIDATION_MALFORMED_KEY",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Validated `"channel:event"` key.
///
/// Construct with [`build_dispatch_key`] or [`DispatchKey::parse`]; a
/// `DispatchKey` value always holds a non-empty channel and event
/// without the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DispatchKey {
    key: String,
    split: usize,
}

impl DispatchKey {
    /// Parses a `"channel:event"` string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedKey`] when the string does not
    /// contain exactly one delimiter, or the empty-name variants when a
    /// side is empty.
    pub fn parse(key: &str) -> Result<Self, ValidationError> {
        let mut parts = key.split(KEY_DELIMITER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(channel), Some(event), None) => build_dispatch_key(channel, event),
            _ => Err(ValidationError::MalformedKey(key.to_string())),
        }
    }

    /// Returns the full key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the channel part.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.key[..self.split]
    }

    /// Returns the event part.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.key[self.split + KEY_DELIMITER.len_utf8()..]
    }

    /// Returns `true` if this key addresses `channel:event`.
    #[must_use]
    pub fn matches(&self, channel: &str, event: &str) -> bool {
        self.channel() == channel && self.event() == event
    }

    /// Returns the conventional handler method name for this key.
    #[must_use]
    pub fn method_name(&self) -> String {
        method_name_unchecked(self.channel(), self.event())
    }
}

impl std::fmt::Display for DispatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}

impl TryFrom<String> for DispatchKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DispatchKey> for String {
    fn from(key: DispatchKey) -> Self {
        key.key
    }
}

impl std::str::FromStr for DispatchKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validates a channel name on its own.
///
/// # Errors
///
/// Empty names and names containing `:` are rejected.
pub fn validate_channel(channel: &str) -> Result<(), ValidationError> {
    if channel.is_empty() {
        return Err(ValidationError::EmptyChannel);
    }
    if channel.contains(KEY_DELIMITER) {
        return Err(ValidationError::DelimiterInChannel(channel.to_string()));
    }
    Ok(())
}

/// Validates an event name on its own.
///
/// # Errors
///
/// Empty names and names containing `:` are rejected.
pub fn validate_event(event: &str) -> Result<(), ValidationError> {
    if event.is_empty() {
        return Err(ValidationError::EmptyEvent);
    }
    if event.contains(KEY_DELIMITER) {
        return Err(ValidationError::DelimiterInEvent(event.to_string()));
    }
    Ok(())
}

/// Builds the dispatch key `"{channel}:{event}"`.
///
/// # Errors
///
/// Returns [`ValidationError`] if either name is empty or contains the
/// delimiter.
pub fn build_dispatch_key(channel: &str, event: &str) -> Result<DispatchKey, ValidationError> {
    validate_channel(channel)?;
    validate_event(event)?;
    Ok(DispatchKey {
        key: format!("{channel}{KEY_DELIMITER}{event}"),
        split: channel.len(),
    })
}

/// Builds the conventional handler method name,
/// `handle` + PascalCase(channel) + PascalCase(event).
///
/// # Errors
///
/// Same validation as [`build_dispatch_key`].
pub fn build_handler_method_name(channel: &str, event: &str) -> Result<String, ValidationError> {
    validate_channel(channel)?;
    validate_event(event)?;
    Ok(method_name_unchecked(channel, event))
}

fn method_name_unchecked(channel: &str, event: &str) -> String {
    let mut name = String::from(HANDLER_METHOD_PREFIX);
    push_pascal_case(&mut name, channel);
    push_pascal_case(&mut name, event);
    name
}

/// Appends `input` in PascalCase.
///
/// Segments are split on `_`, `-`, `.` and whitespace; the first letter
/// of each segment is upper-cased and the rest kept as written, so
/// existing camelCase survives (`windowSizeChange` → `WindowSizeChange`).
fn push_pascal_case(out: &mut String, input: &str) {
    for segment in input
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
}
