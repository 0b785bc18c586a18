//! Non-owning access to a mediator.

use super::{Mediator, MediatorError, PublishReport};
use serde_json::Value;
use specbus_component::Component;
use std::sync::{Arc, Weak};

/// Weak handle to a [`Mediator`].
///
/// Components and lifecycle adapters hold this instead of the mediator
/// itself, so the owner decides when the bus goes away. Once the mediator
/// is dropped or shut down, every operation returns
/// [`MediatorError::Unavailable`].
#[derive(Clone, Default)]
pub struct MediatorHandle {
    inner: Weak<Mediator>,
}

impl MediatorHandle {
    pub(crate) fn new(inner: Weak<Mediator>) -> Self {
        Self { inner }
    }

    /// Returns a handle that was never attached to a mediator.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Returns the mediator if it still exists and is live.
    ///
    /// # Errors
    ///
    /// Returns [`MediatorError::Unavailable`] otherwise.
    pub fn upgrade(&self) -> Result<Arc<Mediator>, MediatorError> {
        match self.inner.upgrade() {
            Some(mediator) if mediator.is_live() => Ok(mediator),
            _ => Err(MediatorError::Unavailable),
        }
    }

    /// Returns `true` if the mediator exists and is live.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.upgrade().is_ok()
    }

    /// See [`Mediator::register`].
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`], or whatever the mediator returns.
    pub fn register(&self, component: Arc<dyn Component>) -> Result<(), MediatorError> {
        self.upgrade()?.register(component)
    }

    /// See [`Mediator::unregister`].
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`].
    pub fn unregister(&self, component: &dyn Component) -> Result<bool, MediatorError> {
        self.upgrade()?.unregister(component)
    }

    /// See [`Mediator::unregister_by_name`].
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`].
    pub fn unregister_by_name(&self, name: &str) -> Result<bool, MediatorError> {
        self.upgrade()?.unregister_by_name(name)
    }

    /// See [`Mediator::publish`].
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`], or [`MediatorError::Validation`] for
    /// a malformed channel or event name.
    pub fn publish(
        &self,
        source_name: &str,
        source_code: &str,
        channel: &str,
        event: &str,
        data: Value,
        timestamp: i64,
    ) -> Result<PublishReport, MediatorError> {
        self.upgrade()?
            .publish(source_name, source_code, channel, event, data, timestamp)
    }
}

impl std::fmt::Debug for MediatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
