//! Component registry.
//!
//! Holds the currently registered components, keyed by name, in
//! registration order. The mediator owns exactly one registry and only
//! ever reads it through [`ComponentRegistry::list`], which hands out an
//! independent snapshot.
//!
//! ```text
//! register(Toolbar) ──► [Toolbar]
//! register(Grid)    ──► [Toolbar, Grid]
//! list()            ──► snapshot [Toolbar, Grid]   (unaffected by later changes)
//! unregister(Toolbar) ► [Grid]
//! ```

use specbus_component::Component;
use specbus_types::ErrorCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Registry error.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `Duplicate` | `REGISTRY_DUPLICATE_COMPONENT` | No |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A component with this name is already registered.
    #[error("component already registered: {0}")]
    Duplicate(String),
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "REGISTRY_DUPLICATE_COMPONENT",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

/// Name-keyed, insertion-ordered set of registered components.
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<Arc<dyn Component>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the name is taken; the
    /// registry is left unchanged.
    pub fn register(&mut self, component: Arc<dyn Component>) -> Result<(), RegistryError> {
        if self.contains(component.name()) {
            return Err(RegistryError::Duplicate(component.name().to_string()));
        }

        debug!(component = %component.name(), code = %component.code(), "Registry insert");
        self.entries.push(component);
        Ok(())
    }

    /// Removes the component named `name`.
    ///
    /// Absence is not an error: repeated teardown is expected, so it is
    /// logged and `None` returned.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn Component>> {
        match self.position(name) {
            Some(idx) => {
                debug!(component = %name, "Registry remove");
                Some(self.entries.remove(idx))
            }
            None => {
                debug!(component = %name, "Registry remove skipped: not registered");
                None
            }
        }
    }

    /// Returns an independent snapshot in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<Arc<dyn Component>> {
        self.entries.clone()
    }

    /// Returns the component named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.position(name).map(|idx| Arc::clone(&self.entries[idx]))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns the registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|c| c.name().to_string()).collect()
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes and returns every component, most recently registered first.
    pub fn drain_reverse(&mut self) -> Vec<Arc<dyn Component>> {
        let mut drained: Vec<Arc<dyn Component>> = self.entries.drain(..).collect();
        drained.reverse();
        drained
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|c| c.name() == name)
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("names", &self.names())
            .finish()
    }
}
