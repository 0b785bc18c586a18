//! Event and spec types for specbus.
//!
//! This crate holds the data a component declares and receives:
//!
//! - [`Event`] - what a subscriber's `handle_event` is given
//! - [`SubscriptionSpec`] / [`PublicationSpec`] - what a component
//!   declares it receives / emits
//! - [`merge_subscription_specs`] / [`merge_publication_specs`] - the
//!   pure base + extension merge
//! - [`SpecError`] - merge and validation failures
//!
//! # Usage
//!
//! ```
//! use specbus_event::{merge_subscription_specs, Event, SubscriptionSpec};
//! use serde_json::json;
//!
//! let base = SubscriptionSpec::new().with_event("system", "start");
//! let ext = SubscriptionSpec::new().with_event("ui", "windowSizeChange");
//! let merged = merge_subscription_specs(&base, &ext).unwrap();
//!
//! let evt = Event::new("App", "APP1", "system", "start", json!({}), 0);
//! assert!(merged.subscribes_to(&evt.channel, &evt.event));
//! ```

mod error;
mod event;
pub mod spec;

pub use error::SpecError;
pub use event::Event;
pub use spec::{
    merge_publication_specs, merge_subscription_specs, ChannelSpec, EventSpec, PublicationEntry,
    PublicationSpec, SubscriptionSpec,
};

// Re-export from specbus_types for convenience
pub use specbus_types::{DispatchKey, ValidationError};
