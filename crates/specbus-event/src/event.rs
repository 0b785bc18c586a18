//! Delivered events.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use specbus_types::{build_dispatch_key, DispatchKey, ValidationError};

/// An event as delivered to a subscriber's `handle_event`.
///
/// Built by the mediator for each publish call and handed to every
/// matching subscriber by reference; never stored.
///
/// # Example
///
/// ```
/// use specbus_event::Event;
/// use serde_json::json;
///
/// let evt = Event::new("App", "APP1", "system", "start", json!({"ok": true}), 1_700_000_000_000);
/// assert_eq!(evt.key().unwrap().as_str(), "system:start");
///
/// let wire = serde_json::to_value(&evt).unwrap();
/// assert_eq!(wire["componentName"], "App");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Name of the publishing component.
    pub component_name: String,
    /// Code of the publishing component.
    pub component_code: String,
    /// Channel the event was published on.
    pub channel: String,
    /// Event name within the channel.
    pub event: String,
    /// Payload, passed through untouched.
    pub data: Value,
    /// Publisher-supplied timestamp in milliseconds.
    pub timestamp: i64,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(
        component_name: impl Into<String>,
        component_code: impl Into<String>,
        channel: impl Into<String>,
        event: impl Into<String>,
        data: Value,
        timestamp: i64,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            component_code: component_code.into(),
            channel: channel.into(),
            event: event.into(),
            data,
            timestamp,
        }
    }

    /// Returns the dispatch key of this event.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the channel or event name is malformed.
    pub fn key(&self) -> Result<DispatchKey, ValidationError> {
        build_dispatch_key(&self.channel, &self.event)
    }

    /// Returns `true` if this event is `channel:event`.
    #[must_use]
    pub fn is(&self, channel: &str, event: &str) -> bool {
        self.channel == channel && self.event == event
    }

    /// Deserializes the payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the payload does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}
