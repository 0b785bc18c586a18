//! Closed event sets.
//!
//! A component that knows its events at compile time declares them as an
//! enum and implements [`EventSet`]. The enum is the single source of
//! truth: its [`subscription_spec`](EventSet::subscription_spec) becomes
//! the component's base spec, and [`HandlerTable::typed`] routes every
//! declared key through [`decode`](EventSet::decode).
//!
//! [`HandlerTable::typed`]: crate::HandlerTable::typed
//!
//! # Example
//!
//! ```
//! use specbus_component::{decode_payload, ComponentError, EventSet, HandlerTable};
//! use specbus_event::{Event, SubscriptionSpec};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Size { width: u32, height: u32 }
//!
//! #[derive(Debug)]
//! enum ShellEvent {
//!     SystemStart,
//!     WindowSizeChange(Size),
//! }
//!
//! impl EventSet for ShellEvent {
//!     fn subscription_spec() -> SubscriptionSpec {
//!         SubscriptionSpec::new()
//!             .with_event("system", "start")
//!             .with_event("ui", "windowSizeChange")
//!     }
//!
//!     fn decode(event: &Event) -> Result<Option<Self>, ComponentError> {
//!         Ok(match (event.channel.as_str(), event.event.as_str()) {
//!             ("system", "start") => Some(Self::SystemStart),
//!             ("ui", "windowSizeChange") => Some(Self::WindowSizeChange(decode_payload(event)?)),
//!             _ => None,
//!         })
//!     }
//! }
//!
//! let table = HandlerTable::typed(|evt: ShellEvent, _raw| match evt {
//!     ShellEvent::SystemStart => Ok(()),
//!     ShellEvent::WindowSizeChange(size) if size.width > 0 => Ok(()),
//!     ShellEvent::WindowSizeChange(_) => Err(ComponentError::InvalidPayload("zero width".into())),
//! })
//! .unwrap();
//!
//! let resize = Event::new("App", "APP1", "ui", "windowSizeChange", json!({"width": 0, "height": 1}), 0);
//! assert!(table.dispatch(&resize).is_err());
//! ```

use crate::ComponentError;
use serde::de::DeserializeOwned;
use specbus_event::{Event, SubscriptionSpec};

/// A closed set of `(channel, event)` pairs a component handles.
pub trait EventSet: Sized {
    /// Returns the subscription spec declaring every member of the set.
    fn subscription_spec() -> SubscriptionSpec;

    /// Decodes a delivered event.
    ///
    /// Returns `Ok(None)` if the event is not a member of the set.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidPayload`] if the event is a member
    /// but its payload does not decode.
    fn decode(event: &Event) -> Result<Option<Self>, ComponentError>;
}

/// Deserializes an event payload, mapping failures to
/// [`ComponentError::InvalidPayload`].
///
/// # Errors
///
/// Returns [`ComponentError::InvalidPayload`] with the channel, event and
/// serde message.
pub fn decode_payload<T: DeserializeOwned>(event: &Event) -> Result<T, ComponentError> {
    event.data_as().map_err(|e| {
        ComponentError::InvalidPayload(format!("{}:{}: {}", event.channel, event.event, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerTable;
    use parking_lot::Mutex;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Size {
        width: u32,
        height: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum ToolbarEvent {
        SystemStart,
        SystemStop,
        WindowSizeChange(Size),
    }

    impl EventSet for ToolbarEvent {
        fn subscription_spec() -> SubscriptionSpec {
            SubscriptionSpec::new()
                .with_event("system", "start")
                .with_event("system", "stop")
                .with_event("ui", "windowSizeChange")
        }

        fn decode(event: &Event) -> Result<Option<Self>, ComponentError> {
            Ok(match (event.channel.as_str(), event.event.as_str()) {
                ("system", "start") => Some(Self::SystemStart),
                ("system", "stop") => Some(Self::SystemStop),
                ("ui", "windowSizeChange") => Some(Self::WindowSizeChange(decode_payload(event)?)),
                _ => None,
            })
        }
    }

    fn recording_table() -> (HandlerTable, Arc<Mutex<Vec<ToolbarEvent>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let table = HandlerTable::typed(move |evt: ToolbarEvent, _raw: &Event| {
            sink.lock().push(evt);
            Ok(())
        })
        .expect("valid event set");
        (table, log)
    }

    #[test]
    fn typed_table_covers_every_member() {
        let (table, _) = recording_table();
        assert_eq!(table.len(), 3);
        assert!(table.handles("system", "start"));
        assert!(table.handles("system", "stop"));
        assert!(table.handles("ui", "windowSizeChange"));
    }

    #[test]
    fn typed_dispatch_decodes() {
        let (table, log) = recording_table();

        let resize = Event::new(
            "Shell",
            "SH1",
            "ui",
            "windowSizeChange",
            json!({"width": 1024, "height": 768}),
            5,
        );
        table.dispatch(&resize).expect("decodes");
        table
            .dispatch(&Event::new("App", "APP1", "system", "stop", json!(null), 6))
            .expect("decodes");

        assert_eq!(
            *log.lock(),
            vec![
                ToolbarEvent::WindowSizeChange(Size {
                    width: 1024,
                    height: 768
                }),
                ToolbarEvent::SystemStop,
            ]
        );
    }

    #[test]
    fn bad_payload_is_invalid_payload() {
        let (table, log) = recording_table();
        let resize = Event::new("Shell", "SH1", "ui", "windowSizeChange", json!("wide"), 0);

        let err = table.dispatch(&resize).expect_err("payload mismatch");
        assert!(matches!(err, ComponentError::InvalidPayload(ref msg) if msg.contains("ui:windowSizeChange")));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn non_member_not_handled() {
        let (table, _) = recording_table();
        let evt = Event::new("App", "APP1", "ui", "focus", json!({}), 0);
        assert_eq!(table.dispatch(&evt), Ok(false));
    }
}
