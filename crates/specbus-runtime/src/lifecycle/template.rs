//! Component templates and the components they produce.

use specbus_component::{Component, ComponentError, EventSet, HandlerTable};
use specbus_event::{Event, PublicationSpec, SubscriptionSpec};
use specbus_types::{InstanceId, ValidationError};
use std::sync::Arc;
use tracing::debug;

/// Initialize hook.
pub type InitHook = Arc<dyn Fn() -> Result<(), ComponentError> + Send + Sync>;

/// Destroy hook.
pub type DestroyHook = Arc<dyn Fn() + Send + Sync>;

/// Everything about a component that stays the same across mounts.
///
/// Subscriptions and publications here are the *base* specs; each mount
/// merges its extension specs on top.
#[derive(Clone)]
pub struct ComponentTemplate {
    name: String,
    code: String,
    description: String,
    subscriptions: SubscriptionSpec,
    publications: PublicationSpec,
    handlers: HandlerTable,
    on_initialize: Option<InitHook>,
    on_destroy: Option<DestroyHook>,
}

impl ComponentTemplate {
    /// Creates a template with empty base specs and no handlers.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: String::new(),
            subscriptions: SubscriptionSpec::new(),
            publications: PublicationSpec::new(),
            handlers: HandlerTable::new(),
            on_initialize: None,
            on_destroy: None,
        }
    }

    /// Creates a template whose base subscriptions and handlers come from
    /// the closed event set `E`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `E` declares a malformed name.
    pub fn typed<E, F>(
        name: impl Into<String>,
        code: impl Into<String>,
        handler: F,
    ) -> Result<Self, ValidationError>
    where
        E: EventSet + 'static,
        F: Fn(E, &Event) -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        Ok(Self::new(name, code)
            .with_subscriptions(E::subscription_spec())
            .with_handlers(HandlerTable::typed(handler)?))
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the base subscription spec.
    #[must_use]
    pub fn with_subscriptions(mut self, spec: SubscriptionSpec) -> Self {
        self.subscriptions = spec;
        self
    }

    /// Sets the base publication spec.
    #[must_use]
    pub fn with_publications(mut self, spec: PublicationSpec) -> Self {
        self.publications = spec;
        self
    }

    /// Sets the handler table.
    #[must_use]
    pub fn with_handlers(mut self, handlers: HandlerTable) -> Self {
        self.handlers = handlers;
        self
    }

    /// Runs `hook` from every instance's `initialize`.
    #[must_use]
    pub fn on_initialize<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), ComponentError> + Send + Sync + 'static,
    {
        self.on_initialize = Some(Arc::new(hook));
        self
    }

    /// Runs `hook` from every instance's `destroy`.
    #[must_use]
    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_destroy = Some(Arc::new(hook));
        self
    }

    /// Returns the component name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the component code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the base subscription spec.
    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionSpec {
        &self.subscriptions
    }

    /// Returns the base publication spec.
    #[must_use]
    pub fn publications(&self) -> &PublicationSpec {
        &self.publications
    }

    /// Builds one instance with already-merged specs.
    pub(crate) fn instantiate(
        &self,
        subscriptions: SubscriptionSpec,
        publications: PublicationSpec,
    ) -> HandlerComponent {
        HandlerComponent {
            instance: InstanceId::new(),
            name: self.name.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
            subscriptions,
            publications,
            handlers: self.handlers.clone(),
            on_initialize: self.on_initialize.clone(),
            on_destroy: self.on_destroy.clone(),
        }
    }
}

impl std::fmt::Debug for ComponentTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTemplate")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

/// A mounted instance of a [`ComponentTemplate`].
///
/// Owns its merged specs by value; nothing about it changes after
/// construction.
pub struct HandlerComponent {
    instance: InstanceId,
    name: String,
    code: String,
    description: String,
    subscriptions: SubscriptionSpec,
    publications: PublicationSpec,
    handlers: HandlerTable,
    on_initialize: Option<InitHook>,
    on_destroy: Option<DestroyHook>,
}

impl HandlerComponent {
    /// Returns the id of this mount.
    #[must_use]
    pub fn instance_id(&self) -> InstanceId {
        self.instance
    }
}

impl Component for HandlerComponent {
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
        if !self.handlers.dispatch(event)? {
            debug!(component = %self.name, channel = %event.channel, event = %event.event, "Subscribed event has no handler");
        }
        Ok(())
    }

    fn initialize(&self) -> Result<(), ComponentError> {
        debug!(component = %self.name, instance = %self.instance, "Initialize");
        match &self.on_initialize {
            Some(hook) => hook(),
            None => Ok(()),
        }
    }

    fn destroy(&self) {
        debug!(component = %self.name, instance = %self.instance, "Destroy");
        if let Some(hook) = &self.on_destroy {
            hook();
        }
    }
}

impl std::fmt::Debug for HandlerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerComponent")
            .field("instance", &self.instance)
            .field("name", &self.name)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}
