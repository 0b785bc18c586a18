//! Lifecycle adapter: mount components for the duration of a scope.
//!
//! A host (a view, a page, a plugin session) owns a
//! [`LifecycleAdapter`] built from a [`ComponentTemplate`]. Each time the
//! host's scope begins it calls [`LifecycleAdapter::enter`] with the
//! extension specs for that mount; the returned [`ScopedComponent`] keeps
//! the instance registered until it is exited or dropped.
//!
//! ```text
//! enter(ext_sub, ext_pub)
//!   ├─ merge(base, ext)           (SPEC_* on conflict, nothing registered)
//!   ├─ new HandlerComponent       (fresh InstanceId, merged specs by value)
//!   └─ Mediator::register ──► initialize()
//!
//! ScopedComponent::exit() / drop
//!   └─ Mediator::unregister_by_name ──► destroy() ──► removed
//! ```
//!
//! Teardown matches by name, so it still succeeds if the mediator's view
//! of the component changed while mounted. Exiting twice is a no-op.

mod adapter;
mod template;

pub use adapter::{LifecycleAdapter, ScopedComponent};
pub use template::{ComponentTemplate, DestroyHook, HandlerComponent, InitHook};
