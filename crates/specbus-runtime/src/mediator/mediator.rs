//! The mediator: registration, teardown and publish/dispatch.

use super::{HandlerExecutionError, MediatorError, MediatorHandle, PublishReport};
use crate::config::DispatchConfig;
use crate::registry::ComponentRegistry;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use specbus_component::{Component, ComponentFullSpec};
use specbus_event::Event;
use specbus_types::{build_dispatch_key, ErrorCode};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Central pub/sub bus.
///
/// Owns the [`ComponentRegistry`]. Created with [`Mediator::new`] and
/// shared as `Arc<Mediator>`; components reach it through a
/// [`MediatorHandle`].
///
/// The registry lock is held only to snapshot, insert or remove. It is
/// never held while `initialize`, `destroy` or `handle_event` run, so
/// any of those may call back into the mediator.
///
/// Dropping the last `Arc` shuts the mediator down.
pub struct Mediator {
    registry: RwLock<ComponentRegistry>,
    /// Names whose `destroy` is currently running.
    tearing_down: Mutex<HashSet<String>>,
    live: AtomicBool,
    config: DispatchConfig,
    this: Weak<Mediator>,
}

impl Mediator {
    /// Creates a live mediator with an empty registry.
    #[must_use]
    pub fn new(config: DispatchConfig) -> Arc<Self> {
        debug!(
            catch_panics = config.catch_panics,
            slow_handler_warn_ms = config.slow_handler_warn_ms,
            "Mediator created"
        );
        Arc::new_cyclic(|this| Self {
            registry: RwLock::new(ComponentRegistry::new()),
            tearing_down: Mutex::new(HashSet::new()),
            live: AtomicBool::new(true),
            config,
            this: this.clone(),
        })
    }

    /// Creates a mediator with default dispatch settings.
    #[must_use]
    pub fn with_defaults() -> Arc<Self> {
        Self::new(DispatchConfig::default())
    }

    /// Returns a weak handle for components and adapters.
    #[must_use]
    pub fn handle(&self) -> MediatorHandle {
        MediatorHandle::new(self.this.clone())
    }

    /// Returns the dispatch configuration.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Returns `false` once [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Registers a component, then calls its `initialize` once.
    ///
    /// The component is already visible in the registry while
    /// `initialize` runs. If `initialize` fails it is removed again
    /// without a `destroy` call.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::Unavailable`] after shutdown
    /// - [`MediatorError::DuplicateComponent`] if the name is taken
    /// - [`MediatorError::InitFailed`] if `initialize` fails
    pub fn register(&self, component: Arc<dyn Component>) -> Result<(), MediatorError> {
        self.ensure_live()?;

        let name = component.name().to_string();
        self.registry.write().register(Arc::clone(&component))?;

        if let Err(e) = component.initialize() {
            warn!(component = %name, code = %component.code(), error = %e, "Initialize failed, removing component");
            let mut registry = self.registry.write();
            if registry
                .get(&name)
                .is_some_and(|current| Arc::ptr_eq(&current, &component))
            {
                registry.unregister(&name);
            }
            return Err(MediatorError::init_failed(name, e));
        }

        info!(component = %name, code = %component.code(), "Component registered");
        Ok(())
    }

    /// Unregisters the registered component that has `component`'s name.
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`] after shutdown.
    pub fn unregister(&self, component: &dyn Component) -> Result<bool, MediatorError> {
        self.unregister_by_name(component.name())
    }

    /// Calls `destroy` on the component named `name`, then removes it.
    ///
    /// Returns `Ok(false)` if nothing is registered under `name`, or if
    /// its teardown is already in progress (e.g. `destroy` unregistering
    /// itself again). `destroy` therefore runs exactly once.
    ///
    /// The component is removed even if `destroy` panics. The panic is
    /// caught and logged when [`DispatchConfig::catch_panics`] is set and
    /// resumes after removal otherwise.
    ///
    /// # Errors
    ///
    /// [`MediatorError::Unavailable`] after shutdown.
    pub fn unregister_by_name(&self, name: &str) -> Result<bool, MediatorError> {
        self.ensure_live()?;

        let Some(component) = self.registry.read().get(name) else {
            warn!(component = %name, "Unregister skipped: not registered");
            return Ok(false);
        };

        if !self.tearing_down.lock().insert(name.to_string()) {
            debug!(component = %name, "Unregister skipped: teardown in progress");
            return Ok(false);
        }

        {
            // Removes the component even if `destroy` unwinds.
            let _guard = TeardownGuard {
                mediator: self,
                name,
                component: &component,
            };
            self.run_destroy(component.as_ref());
        }

        info!(component = %name, code = %component.code(), "Component unregistered");
        Ok(true)
    }

    /// Publishes an event to every subscribed component.
    ///
    /// The recipients are a snapshot of the registry taken before the
    /// first delivery; registrations made by handlers during this call do
    /// not affect it. Each component whose subscription spec declares
    /// `channel:event` receives the event once, in registration order.
    ///
    /// A handler that returns `Err` (or panics, when
    /// [`DispatchConfig::catch_panics`] is set) is logged as a
    /// [`HandlerExecutionError`] and counted in the report; delivery to the
    /// remaining recipients continues. With `catch_panics` off, a handler
    /// panic unwinds out of `publish` and the remaining recipients are
    /// skipped.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::Unavailable`] after shutdown
    /// - [`MediatorError::Validation`] for a malformed channel or event
    pub fn publish(
        &self,
        source_name: &str,
        source_code: &str,
        channel: &str,
        event: &str,
        data: Value,
        timestamp: i64,
    ) -> Result<PublishReport, MediatorError> {
        self.ensure_live()?;

        let key = build_dispatch_key(channel, event)?;
        let event = Event::new(source_name, source_code, channel, event, data, timestamp);
        let snapshot = self.registry.read().list();
        let mut report = PublishReport::new(key);

        for component in &snapshot {
            if !component.subscribes_to(&event.channel, &event.event) {
                continue;
            }
            report.matched += 1;

            match self.deliver(component.as_ref(), &event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    warn!(
                        component = %err.component(),
                        code = %component.code(),
                        key = %report.key,
                        error_code = %err.code(),
                        "{err}"
                    );
                }
            }
        }

        debug!(
            key = %report.key,
            source = %source_name,
            matched = report.matched,
            delivered = report.delivered,
            failed = report.failed,
            "Published"
        );
        Ok(report)
    }

    /// Destroys every component, most recently registered first, and
    /// closes the mediator. Idempotent.
    pub fn shutdown(&self) {
        if !self.live.swap(false, Ordering::AcqRel) {
            return;
        }

        let drained = self.registry.write().drain_reverse();
        let in_progress = self.tearing_down.lock().clone();

        for component in &drained {
            if in_progress.contains(component.name()) {
                continue;
            }
            debug!(component = %component.name(), "Destroying on shutdown");
            self.run_destroy(component.as_ref());
        }

        info!(destroyed = drained.len(), "Mediator shut down");
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.registry.read().len()
    }

    /// Returns `true` if a component named `name` is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    /// Returns registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Returns the full spec of every registered component.
    #[must_use]
    pub fn full_specs(&self) -> Vec<ComponentFullSpec> {
        self.registry
            .read()
            .list()
            .iter()
            .map(|c| c.full_spec())
            .collect()
    }

    fn ensure_live(&self) -> Result<(), MediatorError> {
        if self.is_live() {
            Ok(())
        } else {
            Err(MediatorError::Unavailable)
        }
    }

    fn deliver(&self, component: &dyn Component, event: &Event) -> Result<(), HandlerExecutionError> {
        if self.config.trace_deliveries {
            debug!(component = %component.name(), channel = %event.channel, event = %event.event, "Deliver");
        } else {
            trace!(component = %component.name(), channel = %event.channel, event = %event.event, "Deliver");
        }

        let started = Instant::now();
        let outcome = if self.config.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| component.handle_event(event)))
        } else {
            Ok(component.handle_event(event))
        };
        self.warn_if_slow(component, event, started.elapsed());

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(HandlerExecutionError::Failed {
                component: component.name().to_string(),
                code: component.code().to_string(),
                channel: event.channel.clone(),
                event: event.event.clone(),
                source,
            }),
            Err(payload) => Err(HandlerExecutionError::Panicked {
                component: component.name().to_string(),
                code: component.code().to_string(),
                channel: event.channel.clone(),
                event: event.event.clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Calls `destroy`, catching a panic when `catch_panics` is set.
    fn run_destroy(&self, component: &dyn Component) {
        if !self.config.catch_panics {
            component.destroy();
            return;
        }

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| component.destroy())) {
            warn!(
                component = %component.name(),
                code = %component.code(),
                message = %panic_message(payload.as_ref()),
                "Destroy panicked"
            );
        }
    }

    fn warn_if_slow(&self, component: &dyn Component, event: &Event, elapsed: Duration) {
        let threshold = self.config.slow_handler_warn_ms;
        if threshold > 0 && elapsed >= Duration::from_millis(threshold) {
            warn!(
                component = %component.name(),
                channel = %event.channel,
                event = %event.event,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold,
                "Slow handler"
            );
        }
    }
}

/// Finishes an unregister: drops the registry entry and the
/// teardown-in-progress mark, also while unwinding.
struct TeardownGuard<'a> {
    mediator: &'a Mediator,
    name: &'a str,
    component: &'a Arc<dyn Component>,
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        let mut registry = self.mediator.registry.write();
        if registry
            .get(self.name)
            .is_some_and(|current| Arc::ptr_eq(&current, self.component))
        {
            registry.unregister(self.name);
        }
        drop(registry);
        self.mediator.tearing_down.lock().remove(self.name);
    }
}

impl Drop for Mediator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("live", &self.is_live())
            .field("components", &self.names())
            .field("config", &self.config)
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
