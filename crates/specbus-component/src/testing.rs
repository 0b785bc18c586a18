//! Test doubles for mediator and lifecycle tests.
//!
//! [`RecordingComponent`] is a [`Component`] that records every delivered
//! event and lifecycle call, and can be told to fail or panic.
//!
//! # Features
//!
//! - Delivery log with the exact [`Event`] values received
//! - Lifecycle log (`initialize` / `destroy` calls, in order)
//! - Configurable failure: `Err` from the handler, panic, failed init, or
//!   panicking destroy
//! - Delivery hook, e.g. to unregister from inside a handler
//!
//! # Example
//!
//! ```
//! use specbus_component::testing::{LifecycleCall, RecordingComponent};
//! use specbus_component::Component;
//! use specbus_event::Event;
//! use serde_json::json;
//!
//! let toolbar = RecordingComponent::new("Toolbar", "TB1").subscribe("system", "start");
//!
//! toolbar.initialize().unwrap();
//! toolbar
//!     .handle_event(&Event::new("App", "APP1", "system", "start", json!({}), 1))
//!     .unwrap();
//!
//! assert_eq!(toolbar.event_count(), 1);
//! assert_eq!(toolbar.lifecycle(), vec![LifecycleCall::Initialize]);
//! ```

use crate::{Component, ComponentError};
use parking_lot::Mutex;
use specbus_event::{Event, PublicationEntry, PublicationSpec, SubscriptionSpec};

/// A lifecycle call observed by a [`RecordingComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCall {
    /// `initialize()` was called.
    Initialize,
    /// `destroy()` was called.
    Destroy,
}

/// How [`RecordingComponent::handle_event`] behaves after recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerBehavior {
    /// Return `Ok(())`.
    Succeed,
    /// Return `ComponentError::ExecutionFailed` with this message.
    Fail(String),
    /// Panic with this message.
    Panic(String),
}

type DeliveryHook = Box<dyn Fn(&Event) + Send + Sync>;

/// Recording [`Component`] for tests.
pub struct RecordingComponent {
    name: String,
    code: String,
    description: String,
    subscriptions: SubscriptionSpec,
    publications: PublicationSpec,
    behavior: Mutex<HandlerBehavior>,
    init_error: Option<String>,
    destroy_panic: Option<String>,
    hook: Option<DeliveryHook>,
    events: Mutex<Vec<Event>>,
    lifecycle: Mutex<Vec<LifecycleCall>>,
}

impl RecordingComponent {
    /// Creates a component that subscribes to nothing.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: String::new(),
            subscriptions: SubscriptionSpec::new(),
            publications: PublicationSpec::new(),
            behavior: Mutex::new(HandlerBehavior::Succeed),
            init_error: None,
            destroy_panic: None,
            hook: None,
            events: Mutex::new(Vec::new()),
            lifecycle: Mutex::new(Vec::new()),
        }
    }

    /// Adds a `channel:event` subscription.
    #[must_use]
    pub fn subscribe(mut self, channel: &str, event: &str) -> Self {
        self.subscriptions = self.subscriptions.with_event(channel, event);
        self
    }

    /// Replaces the subscription spec.
    #[must_use]
    pub fn with_subscriptions(mut self, spec: SubscriptionSpec) -> Self {
        self.subscriptions = spec;
        self
    }

    /// Adds a `channel:event` publication.
    #[must_use]
    pub fn publish(mut self, channel: &str, event: &str) -> Self {
        self.publications = self
            .publications
            .with_entry(PublicationEntry::new(channel, event));
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Makes `handle_event` return `ExecutionFailed(message)`.
    #[must_use]
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.behavior.lock() = HandlerBehavior::Fail(message.into());
        self
    }

    /// Makes `handle_event` panic with `message`.
    #[must_use]
    pub fn panicking(self, message: impl Into<String>) -> Self {
        *self.behavior.lock() = HandlerBehavior::Panic(message.into());
        self
    }

    /// Makes `initialize` return `InitFailed(message)`.
    #[must_use]
    pub fn failing_init(mut self, message: impl Into<String>) -> Self {
        self.init_error = Some(message.into());
        self
    }

    /// Makes `destroy` panic with `message` after recording the call.
    #[must_use]
    pub fn panicking_destroy(mut self, message: impl Into<String>) -> Self {
        self.destroy_panic = Some(message.into());
        self
    }

    /// Runs `hook` after each delivery is recorded.
    #[must_use]
    pub fn on_delivery<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Changes handler behavior after construction.
    pub fn set_behavior(&self, behavior: HandlerBehavior) {
        *self.behavior.lock() = behavior;
    }

    /// Returns every delivered event, in delivery order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Returns the number of delivered events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns the lifecycle calls, in order.
    #[must_use]
    pub fn lifecycle(&self) -> Vec<LifecycleCall> {
        self.lifecycle.lock().clone()
    }

    /// Returns how many times `call` was observed.
    #[must_use]
    pub fn lifecycle_count(&self, call: LifecycleCall) -> usize {
        self.lifecycle.lock().iter().filter(|c| **c == call).count()
    }
}

impl Component for RecordingComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.code
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn subscription_spec(&self) -> &SubscriptionSpec {
        &self.subscriptions
    }

    fn publication_spec(&self) -> &PublicationSpec {
        &self.publications
    }

    fn handle_event(&self, event: &Event) -> Result<(), ComponentError> {
        self.events.lock().push(event.clone());

        if let Some(hook) = &self.hook {
            hook(event);
        }

        let behavior = self.behavior.lock().clone();
        match behavior {
            HandlerBehavior::Succeed => Ok(()),
            HandlerBehavior::Fail(message) => Err(ComponentError::ExecutionFailed(message)),
            HandlerBehavior::Panic(message) => panic!("{message}"),
        }
    }

    fn initialize(&self) -> Result<(), ComponentError> {
        self.lifecycle.lock().push(LifecycleCall::Initialize);
        match &self.init_error {
            Some(message) => Err(ComponentError::InitFailed(message.clone())),
            None => Ok(()),
        }
    }

    fn destroy(&self) {
        self.lifecycle.lock().push(LifecycleCall::Destroy);
        if let Some(message) = &self.destroy_panic {
            panic!("{message}");
        }
    }
}

impl std::fmt::Debug for RecordingComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingComponent")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("events", &self.event_count())
            .finish()
    }
}
