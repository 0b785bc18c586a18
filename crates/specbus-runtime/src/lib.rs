//! specbus runtime: registry, mediator and lifecycle adapter.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Component Layer                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  specbus-types     : DispatchKey, InstanceId, ErrorCode      │
//! │  specbus-event     : Event, SubscriptionSpec, merge          │
//! │  specbus-component : Component, HandlerTable, EventSet       │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  registry/  : ComponentRegistry                              │
//! │  mediator/  : Mediator, MediatorHandle, PublishReport        │
//! │  lifecycle/ : LifecycleAdapter, ScopedComponent              │
//! │  config/    : BusConfig, ConfigLoader                        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (specbus-cli)                                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`mediator`] - The bus
//!
//! - [`Mediator`]: register / unregister / publish, explicit shutdown
//! - [`MediatorHandle`]: weak handle passed to components and adapters
//! - [`PublishReport`]: matched / delivered / failed counts
//!
//! ## [`lifecycle`] - Scoped mounting
//!
//! - [`ComponentTemplate`]: base specs + handlers
//! - [`LifecycleAdapter`]: merges extension specs and registers per scope
//! - [`ScopedComponent`]: unregisters on `exit()` or drop
//!
//! ## [`config`] - Configuration Management
//!
//! Configuration priority: Environment > Project > Global > Default
//!
//! # Example
//!
//! ```
//! use specbus_component::HandlerTable;
//! use specbus_event::{PublicationSpec, SubscriptionSpec};
//! use specbus_runtime::{ComponentTemplate, LifecycleAdapter, Mediator};
//! use serde_json::json;
//!
//! let mediator = Mediator::with_defaults();
//!
//! let toolbar = ComponentTemplate::new("Toolbar", "TB1")
//!     .with_subscriptions(SubscriptionSpec::new().with_event("system", "start"))
//!     .with_handlers(HandlerTable::new().on_method("handleSystemStart", |_| Ok(())));
//! let adapter = LifecycleAdapter::new(mediator.handle(), toolbar);
//!
//! let scope = adapter
//!     .enter(&SubscriptionSpec::new().with_event("system", "stop"), &PublicationSpec::new())
//!     .unwrap();
//!
//! let report = mediator
//!     .publish("App", "APP1", "system", "stop", json!({}), 0)
//!     .unwrap();
//! assert_eq!(report.delivered, 1);
//!
//! scope.exit().unwrap();
//! assert_eq!(mediator.component_count(), 0);
//! ```

pub mod config;
pub mod lifecycle;
pub mod mediator;
pub mod registry;

pub use config::{BusConfig, ConfigError, ConfigLoader, DispatchConfig, LoggingConfig};
pub use lifecycle::{ComponentTemplate, HandlerComponent, LifecycleAdapter, ScopedComponent};
pub use mediator::{HandlerExecutionError, Mediator, MediatorError, MediatorHandle, PublishReport};
pub use registry::{ComponentRegistry, RegistryError};
