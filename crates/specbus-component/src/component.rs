//! Component trait for mediator participants.
//!
//! A component is anything that registers with the mediator: it carries a
//! unique name, a short code, its merged subscription/publication specs,
//! and a single `handle_event` entry point.
//!
//! # Lifecycle
//!
//! ```text
//! scope enter ──► Mediator::register ──► (visible in registry) ──► initialize()
//!                                                                     │
//!                    publish(channel, event) ──► handle_event(&Event) ◄┘  (0..n times)
//!                                                                     │
//! scope exit  ──► Mediator::unregister ──► destroy() ──► (removed from registry)
//! ```
//!
//! # Example
//!
//! ```
//! use specbus_component::{Component, ComponentError};
//! use specbus_event::{Event, PublicationSpec, SubscriptionSpec};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Counter {
//!     subscriptions: SubscriptionSpec,
//!     publications: PublicationSpec,
//!     seen: AtomicUsize,
//! }
//!
//! impl Component for Counter {
//!     fn name(&self) -> &str { "Counter" }
//!     fn code(&self) -> &str { "CNT1" }
//!     fn subscription_spec(&self) -> &SubscriptionSpec { &self.subscriptions }
//!     fn publication_spec(&self) -> &PublicationSpec { &self.publications }
//!
//!     fn handle_event(&self, _event: &Event) -> Result<(), ComponentError> {
//!         self.seen.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! let counter = Counter {
//!     subscriptions: SubscriptionSpec::new().with_event("system", "start"),
//!     publications: PublicationSpec::new(),
//!     seen: AtomicUsize::new(0),
//! };
//! assert!(counter.subscribes_to("system", "start"));
//! assert_eq!(counter.full_spec().name, "Counter");
//! ```

use crate::ComponentError;
use serde::{Deserialize, Serialize};
use specbus_event::{Event, PublicationSpec, SubscriptionSpec};

/// Component trait for mediator participants.
///
/// # Required Methods
///
/// | Method | Purpose |
/// |--------|---------|
/// | `name` | Unique registry key |
/// | `code` | Short code carried in published events |
/// | `subscription_spec` | Merged subscriptions (delivery filter) |
/// | `publication_spec` | Merged publications (documentation) |
/// | `handle_event` | Single delivery entry point |
///
/// # Thread Safety
///
/// Components are shared as `Arc<dyn Component>` between the registry
/// and in-flight dispatch snapshots, so every method takes `&self`.
/// Use interior mutability for state.
pub trait Component: Send + Sync {
    /// Returns the unique component name.
    fn name(&self) -> &str;

    /// Returns the component code.
    fn code(&self) -> &str;

    /// Returns a human-readable description.
    fn description(&self) -> &str {
        ""
    }

    /// Returns the merged subscription spec.
    ///
    /// The mediator delivers an event only if this spec declares its
    /// `channel:event` pair.
    fn subscription_spec(&self) -> &SubscriptionSpec;

    /// Returns the merged publication spec.
    fn publication_spec(&self) -> &PublicationSpec;

    /// Handles a delivered event.
    ///
    /// # Errors
    ///
    /// An `Err` is caught at the mediator's dispatch loop, logged with
    /// this component's identity, and never reaches the publisher.
    fn handle_event(&self, event: &Event) -> Result<(), ComponentError>;

    /// Called once, after the component is visible in the registry.
    ///
    /// # Errors
    ///
    /// On `Err` the mediator removes the component again.
    fn initialize(&self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Called once, before the component is removed from the registry.
    fn destroy(&self) {}

    /// Returns `true` if the subscription spec declares `channel:event`.
    fn subscribes_to(&self, channel: &str, event: &str) -> bool {
        self.subscription_spec().subscribes_to(channel, event)
    }

    /// Returns the full introspection document for this component.
    fn full_spec(&self) -> ComponentFullSpec {
        ComponentFullSpec {
            name: self.name().to_string(),
            code: self.code().to_string(),
            description: self.description().to_string(),
            subscription_spec: self.subscription_spec().clone(),
            publication_spec: self.publication_spec().clone(),
        }
    }
}

/// Serializable description of a component and both of its specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentFullSpec {
    /// Component name.
    pub name: String,
    /// Component code.
    pub code: String,
    /// Description.
    pub description: String,
    /// Merged subscription spec.
    pub subscription_spec: SubscriptionSpec,
    /// Merged publication spec.
    pub publication_spec: PublicationSpec,
}
