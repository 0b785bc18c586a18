//! Scope-bound mounting of templates.

use super::{ComponentTemplate, HandlerComponent};
use crate::mediator::{MediatorError, MediatorHandle};
use specbus_component::Component;
use specbus_event::{merge_publication_specs, merge_subscription_specs, PublicationSpec, SubscriptionSpec};
use specbus_types::InstanceId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Mounts instances of one [`ComponentTemplate`] on a mediator.
#[derive(Debug, Clone)]
pub struct LifecycleAdapter {
    mediator: MediatorHandle,
    template: ComponentTemplate,
}

impl LifecycleAdapter {
    /// Creates an adapter for `template`.
    #[must_use]
    pub fn new(mediator: MediatorHandle, template: ComponentTemplate) -> Self {
        Self { mediator, template }
    }

    /// Returns the template.
    #[must_use]
    pub fn template(&self) -> &ComponentTemplate {
        &self.template
    }

    /// Enters a scope: merges the extension specs onto the template's
    /// base specs, builds a new instance and registers it.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::Spec`] if an extension redeclares a base pair
    /// - [`MediatorError::DuplicateComponent`] if the name is still mounted
    /// - [`MediatorError::InitFailed`] if `initialize` fails
    /// - [`MediatorError::Unavailable`] if the mediator is gone
    pub fn enter(
        &self,
        extension_subscriptions: &SubscriptionSpec,
        extension_publications: &PublicationSpec,
    ) -> Result<ScopedComponent, MediatorError> {
        let subscriptions =
            merge_subscription_specs(self.template.subscriptions(), extension_subscriptions)?;
        let publications =
            merge_publication_specs(self.template.publications(), extension_publications)?;

        let component = Arc::new(self.template.instantiate(subscriptions, publications));
        self.mediator
            .register(Arc::clone(&component) as Arc<dyn Component>)?;

        debug!(
            component = %component.name(),
            instance = %component.instance_id(),
            "Scope entered"
        );
        Ok(ScopedComponent {
            mediator: self.mediator.clone(),
            component,
            active: true,
        })
    }

    /// Enters a scope with no extension specs.
    ///
    /// # Errors
    ///
    /// See [`enter`](Self::enter).
    pub fn enter_base(&self) -> Result<ScopedComponent, MediatorError> {
        self.enter(&SubscriptionSpec::new(), &PublicationSpec::new())
    }
}

/// A registered instance, unregistered when the scope ends.
///
/// End the scope with [`exit`](Self::exit) to observe errors; dropping a
/// still-active scope exits too and logs any error.
#[must_use = "dropping a ScopedComponent unregisters it"]
pub struct ScopedComponent {
    mediator: MediatorHandle,
    component: Arc<HandlerComponent>,
    active: bool,
}

impl ScopedComponent {
    /// Returns the mounted component.
    #[must_use]
    pub fn component(&self) -> &Arc<HandlerComponent> {
        &self.component
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.component.name()
    }

    /// Returns the instance id of this mount.
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.component.instance_id()
    }

    /// Returns `true` until the scope has been exited.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Exits the scope, unregistering by name.
    ///
    /// Returns `Ok(false)` if the component was already gone.
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`] if the mediator is gone.
    pub fn exit(mut self) -> Result<bool, MediatorError> {
        self.leave()
    }

    fn leave(&mut self) -> Result<bool, MediatorError> {
        if !self.active {
            return Ok(false);
        }
        self.active = false;

        let removed = self.mediator.unregister_by_name(self.component.name())?;
        debug!(
            component = %self.component.name(),
            instance = %self.component.instance_id(),
            removed,
            "Scope exited"
        );
        Ok(removed)
    }
}

impl Drop for ScopedComponent {
    fn drop(&mut self) {
        match self.leave() {
            Ok(_) => {}
            Err(MediatorError::Unavailable) => {
                debug!(component = %self.component.name(), "Scope dropped after mediator shutdown");
            }
            Err(e) => {
                warn!(component = %self.component.name(), error = %e, "Scope exit failed");
            }
        }
    }
}

impl std::fmt::Debug for ScopedComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedComponent")
            .field("component", &self.component)
            .field("active", &self.active)
            .finish()
    }
}
