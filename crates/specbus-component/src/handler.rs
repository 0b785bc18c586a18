//! Handler tables: adapt per-event functions to one `handle_event`.
//!
//! Three ways to fill a table, all resolved at construction time:
//!
//! | Strategy | Registered with | Looked up by |
//! |----------|-----------------|--------------|
//! | Dispatch key | [`HandlerTable::on`] | `"channel:event"` |
//! | Method name | [`HandlerTable::on_method`] | `handle<Channel><Event>` |
//! | Typed set | [`HandlerTable::typed`] | every key of an [`EventSet`] |
//!
//! Lookup tries the dispatch key first, then the conventional method
//! name. An event with no handler is ignored.
//!
//! # Example
//!
//! ```
//! use specbus_component::HandlerTable;
//! use specbus_event::Event;
//! use serde_json::json;
//!
//! let table = HandlerTable::new()
//!     .on("system", "start", |_evt| Ok(()))
//!     .unwrap()
//!     .on_method("handleSystemStop", |_evt| Ok(()));
//!
//! let stop = Event::new("App", "APP1", "system", "stop", json!({}), 0);
//! assert_eq!(table.dispatch(&stop), Ok(true));
//!
//! let other = Event::new("App", "APP1", "ui", "resize", json!({}), 0);
//! assert_eq!(table.dispatch(&other), Ok(false));
//! ```

use crate::{ComponentError, EventSet};
use specbus_event::Event;
use specbus_types::{build_dispatch_key, DispatchKey, ValidationError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Handler function stored in a [`HandlerTable`].
pub type HandlerFn = Arc<dyn Fn(&Event) -> Result<(), ComponentError> + Send + Sync>;

/// Map from dispatch key or method name to handler function.
///
/// Cheap to clone: handlers are reference counted, so one table can back
/// every instance a lifecycle adapter creates.
#[derive(Clone, Default)]
pub struct HandlerTable {
    by_key: HashMap<DispatchKey, HandlerFn>,
    by_method: HashMap<String, HandlerFn>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler for `channel:event`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the channel or event name is malformed.
    pub fn on<F>(mut self, channel: &str, event: &str, handler: F) -> Result<Self, ValidationError>
    where
        F: Fn(&Event) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        self.insert(channel, event, Arc::new(handler))?;
        Ok(self)
    }

    /// Adds a handler under a conventional method name such as
    /// `handleUiWindowSizeChange`.
    #[must_use]
    pub fn on_method<F>(mut self, method_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Event) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        self.by_method.insert(method_name.into(), Arc::new(handler));
        self
    }

    /// Builds a table from a closed [`EventSet`].
    ///
    /// One entry is added per declared key; each decodes the event into
    /// `E` before calling `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `E` declares a malformed name.
    pub fn typed<E, F>(handler: F) -> Result<Self, ValidationError>
    where
        E: EventSet + 'static,
        F: Fn(E, &Event) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let mut table = Self::new();

        for key in E::subscription_spec().dispatch_keys()? {
            let handler = Arc::clone(&handler);
            let entry: HandlerFn = Arc::new(move |event: &Event| match E::decode(event)? {
                Some(decoded) => handler(decoded, event),
                None => Err(ComponentError::NotSupported(format!(
                    "{}:{}",
                    event.channel, event.event
                ))),
            });
            table.by_key.insert(key, entry);
        }

        Ok(table)
    }

    /// Inserts a handler for `channel:event`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the channel or event name is malformed.
    pub fn insert(
        &mut self,
        channel: &str,
        event: &str,
        handler: HandlerFn,
    ) -> Result<(), ValidationError> {
        let key = build_dispatch_key(channel, event)?;
        self.by_key.insert(key, handler);
        Ok(())
    }

    /// Returns the handler for `event`, key first, then method name.
    #[must_use]
    pub fn resolve(&self, event: &Event) -> Option<&HandlerFn> {
        let key = match event.key() {
            Ok(key) => key,
            Err(e) => {
                trace!(channel = %event.channel, event = %event.event, error = %e, "Unresolvable event key");
                return None;
            }
        };

        self.by_key
            .get(&key)
            .or_else(|| self.by_method.get(&key.method_name()))
    }

    /// Runs the handler for `event`.
    ///
    /// Returns `Ok(false)` when no handler is registered.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    pub fn dispatch(&self, event: &Event) -> Result<bool, ComponentError> {
        match self.resolve(event) {
            Some(handler) => handler(event).map(|()| true),
            None => {
                trace!(channel = %event.channel, event = %event.event, "No handler registered");
                Ok(false)
            }
        }
    }

    /// Returns `true` if `channel:event` resolves to a handler.
    #[must_use]
    pub fn handles(&self, channel: &str, event: &str) -> bool {
        match build_dispatch_key(channel, event) {
            Ok(key) => {
                self.by_key.contains_key(&key) || self.by_method.contains_key(&key.method_name())
            }
            Err(_) => false,
        }
    }

    /// Returns the registered dispatch keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&DispatchKey> {
        let mut keys: Vec<&DispatchKey> = self.by_key.keys().collect();
        keys.sort();
        keys
    }

    /// Returns the number of entries, both strategies combined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len() + self.by_method.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<&String> = self.by_method.keys().collect();
        methods.sort();
        f.debug_struct("HandlerTable")
            .field("keys", &self.keys())
            .field("methods", &methods)
            .finish()
    }
}
