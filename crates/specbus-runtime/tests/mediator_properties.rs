//! Behavioural tests for the mediator and lifecycle adapter.

use parking_lot::Mutex;
use serde_json::json;
use specbus_component::testing::{LifecycleCall, RecordingComponent};
use specbus_component::Component;
use specbus_event::{Event, PublicationSpec, SubscriptionSpec};
use specbus_runtime::{
    ComponentTemplate, DispatchConfig, LifecycleAdapter, Mediator, MediatorError,
};
use std::sync::Arc;

fn recording(name: &str, code: &str, channel: &str, event: &str) -> Arc<RecordingComponent> {
    Arc::new(RecordingComponent::new(name, code).subscribe(channel, event))
}

// =============================================================================
// Delivery
// =============================================================================

mod delivery {
    use super::*;

    #[test]
    fn toolbar_grid_scenario() {
        let mediator = Mediator::with_defaults();
        let toolbar = recording("Toolbar", "TB1", "system", "start");
        let grid = recording("Grid", "GR1", "ui", "windowSizeChange");
        mediator.register(toolbar.clone()).expect("toolbar");
        mediator.register(grid.clone()).expect("grid");

        let report = mediator
            .publish(
                "App",
                "APP1",
                "system",
                "start",
                json!({"timestamp": "2024-01-01T00:00:00Z"}),
                1_700_000_000_000,
            )
            .expect("publish");

        assert_eq!(report.matched, 1);
        assert_eq!(
            toolbar.events(),
            vec![Event::new(
                "App",
                "APP1",
                "system",
                "start",
                json!({"timestamp": "2024-01-01T00:00:00Z"}),
                1_700_000_000_000,
            )]
        );
        assert_eq!(grid.event_count(), 0);

        let wire = serde_json::to_value(&toolbar.events()[0]).expect("serialize");
        assert_eq!(
            wire,
            json!({
                "componentName": "App",
                "componentCode": "APP1",
                "channel": "system",
                "event": "start",
                "data": {"timestamp": "2024-01-01T00:00:00Z"},
                "timestamp": 1_700_000_000_000_i64,
            })
        );
    }

    #[test]
    fn no_subscribers_is_silent_success() {
        let mediator = Mediator::with_defaults();
        let toolbar = recording("Toolbar", "TB1", "system", "start");
        mediator.register(toolbar.clone()).expect("toolbar");

        let report = mediator
            .publish("App", "APP1", "ui", "focus", json!({}), 0)
            .expect("no subscribers is not an error");

        assert!(report.is_unheard());
        assert_eq!(toolbar.event_count(), 0);
    }

    #[test]
    fn only_matching_subscriber_invoked() {
        let mediator = Mediator::with_defaults();
        let a = recording("A", "A1", "system", "start");
        let b = recording("B", "B1", "system", "stop");
        mediator.register(a.clone()).expect("a");
        mediator.register(b.clone()).expect("b");

        mediator
            .publish("App", "APP1", "system", "start", json!([1, 2]), 42)
            .expect("publish");

        assert_eq!(a.event_count(), 1);
        assert_eq!(a.events()[0].data, json!([1, 2]));
        assert_eq!(a.events()[0].timestamp, 42);
        assert_eq!(b.event_count(), 0);
    }

    #[test]
    fn every_subscriber_receives_in_registration_order() {
        let mediator = Mediator::with_defaults();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["First", "Second", "Third"] {
            let sink = Arc::clone(&order);
            let comp = RecordingComponent::new(name, "X")
                .subscribe("system", "start")
                .on_delivery(move |_| sink.lock().push(name));
            mediator.register(Arc::new(comp)).expect("register");
        }

        mediator
            .publish("App", "APP1", "system", "start", json!(null), 0)
            .expect("publish");

        assert_eq!(*order.lock(), vec!["First", "Second", "Third"]);
    }

    #[test]
    fn unregistered_component_no_longer_receives() {
        let mediator = Mediator::with_defaults();
        let a = recording("A", "A1", "system", "start");
        mediator.register(a.clone()).expect("a");

        mediator
            .publish("App", "APP1", "system", "start", json!(null), 0)
            .expect("first");
        mediator.unregister(a.as_ref()).expect("unregister");
        mediator
            .publish("App", "APP1", "system", "start", json!(null), 1)
            .expect("second");

        assert_eq!(a.event_count(), 1);
        assert_eq!(a.lifecycle(), vec![LifecycleCall::Initialize, LifecycleCall::Destroy]);
    }
}

// =============================================================================
// Failure isolation
// =============================================================================

mod isolation {
    use super::*;

    #[test]
    fn failing_subscriber_does_not_block_later_ones() {
        let mediator = Mediator::with_defaults();
        let a = Arc::new(
            RecordingComponent::new("A", "A1")
                .subscribe("system", "start")
                .failing("A is broken"),
        );
        let b = recording("B", "B1", "system", "start");
        mediator.register(a.clone()).expect("a");
        mediator.register(b.clone()).expect("b");

        let report = mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("handler errors never reach the publisher");

        assert_eq!(report.failed, 1);
        assert_eq!(report.delivered, 1);
        assert_eq!(b.event_count(), 1);
    }

    #[test]
    fn panicking_subscriber_does_not_block_later_ones() {
        let mediator = Mediator::with_defaults();
        let a = Arc::new(
            RecordingComponent::new("A", "A1")
                .subscribe("system", "start")
                .panicking("A exploded"),
        );
        let b = recording("B", "B1", "system", "start");
        mediator.register(a).expect("a");
        mediator.register(b.clone()).expect("b");

        let report = mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("panics are caught");

        assert_eq!(report.failed, 1);
        assert_eq!(b.event_count(), 1);
        assert!(mediator.is_live());
    }

    #[test]
    fn handler_errors_isolated_without_panic_catching() {
        let mediator = Mediator::new(DispatchConfig {
            catch_panics: false,
            ..DispatchConfig::default()
        });
        let a = Arc::new(
            RecordingComponent::new("A", "A1")
                .subscribe("system", "start")
                .failing("A is broken"),
        );
        let b = recording("B", "B1", "system", "start");
        mediator.register(a).expect("a");
        mediator.register(b.clone()).expect("b");

        let report = mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("errors stay isolated");

        assert_eq!((report.delivered, report.failed), (1, 1));
        assert_eq!(b.event_count(), 1);
    }

    #[test]
    fn uncaught_panic_skips_remaining_recipients() {
        let mediator = Mediator::new(DispatchConfig {
            catch_panics: false,
            ..DispatchConfig::default()
        });
        let a = Arc::new(
            RecordingComponent::new("A", "A1")
                .subscribe("system", "start")
                .panicking("A exploded"),
        );
        let b = recording("B", "B1", "system", "start");
        mediator.register(a).expect("a");
        mediator.register(b.clone()).expect("b");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            mediator.publish("App", "APP1", "system", "start", json!({}), 0)
        }));

        assert!(outcome.is_err());
        assert_eq!(b.event_count(), 0);
        assert!(mediator.is_live());
    }

    #[test]
    #[should_panic(expected = "A exploded")]
    fn panics_propagate_when_catching_disabled() {
        let mediator = Mediator::new(DispatchConfig {
            catch_panics: false,
            ..DispatchConfig::default()
        });
        let a = Arc::new(
            RecordingComponent::new("A", "A1")
                .subscribe("system", "start")
                .panicking("A exploded"),
        );
        mediator.register(a).expect("a");

        let _ = mediator.publish("App", "APP1", "system", "start", json!({}), 0);
    }
}

// =============================================================================
// Re-entrancy
// =============================================================================

mod reentrancy {
    use super::*;

    #[test]
    fn self_unregister_inside_handler() {
        let mediator = Mediator::with_defaults();
        let handle = mediator.handle();
        let outcome = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&outcome);
        let quitter = Arc::new(
            RecordingComponent::new("Quitter", "QT1")
                .subscribe("system", "start")
                .on_delivery(move |_| {
                    *sink.lock() = Some(handle.unregister_by_name("Quitter"));
                }),
        );
        let before = recording("Before", "BF1", "system", "start");
        let after = recording("After", "AF1", "system", "start");

        mediator.register(before.clone()).expect("before");
        mediator.register(quitter.clone()).expect("quitter");
        mediator.register(after.clone()).expect("after");

        let report = mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("publish");

        assert_eq!(*outcome.lock(), Some(Ok(true)));
        assert_eq!(report.matched, 3);
        assert_eq!(before.event_count(), 1);
        assert_eq!(quitter.event_count(), 1);
        assert_eq!(after.event_count(), 1);
        assert_eq!(quitter.lifecycle_count(LifecycleCall::Destroy), 1);
        assert!(!mediator.is_registered("Quitter"));

        mediator
            .publish("App", "APP1", "system", "start", json!({}), 1)
            .expect("second publish");
        assert_eq!(quitter.event_count(), 1);
        assert_eq!(before.event_count(), 2);
        assert_eq!(after.event_count(), 2);
    }

    #[test]
    fn registration_during_dispatch_waits_for_next_publish() {
        let mediator = Mediator::with_defaults();
        let handle = mediator.handle();
        let late = recording("Late", "LT1", "system", "start");

        let to_add = Arc::clone(&late);
        let spawner = RecordingComponent::new("Spawner", "SP1")
            .subscribe("system", "start")
            .on_delivery(move |_| {
                let _ = handle.register(to_add.clone());
            });
        mediator.register(Arc::new(spawner)).expect("spawner");

        let first = mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("publish");
        assert_eq!(first.matched, 1);
        assert_eq!(late.event_count(), 0);
        assert!(mediator.is_registered("Late"));

        mediator
            .publish("App", "APP1", "system", "start", json!({}), 1)
            .expect("publish");
        assert_eq!(late.event_count(), 1);
    }

    #[test]
    fn publish_from_inside_handler() {
        let mediator = Mediator::with_defaults();
        let handle = mediator.handle();
        let grid = recording("Grid", "GR1", "grid", "refresh");

        let toolbar = RecordingComponent::new("Toolbar", "TB1")
            .subscribe("system", "start")
            .publish("grid", "refresh")
            .on_delivery(move |_| {
                let _ = handle.publish("Toolbar", "TB1", "grid", "refresh", json!({}), 5);
            });
        mediator.register(Arc::new(toolbar)).expect("toolbar");
        mediator.register(grid.clone()).expect("grid");

        mediator
            .publish("App", "APP1", "system", "start", json!({}), 0)
            .expect("publish");

        assert_eq!(grid.event_count(), 1);
        assert_eq!(grid.events()[0].component_name, "Toolbar");
    }
}

// =============================================================================
// Lifecycle adapter
// =============================================================================

mod lifecycle {
    use super::*;
    use serde::Deserialize;
    use specbus_component::{decode_payload, ComponentError, EventSet, HandlerTable};

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Size {
        width: u32,
        height: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum GridEvent {
        WindowSizeChange(Size),
        SystemStop,
    }

    impl EventSet for GridEvent {
        fn subscription_spec() -> SubscriptionSpec {
            SubscriptionSpec::new()
                .with_event("ui", "windowSizeChange")
                .with_event("system", "stop")
        }

        fn decode(event: &Event) -> Result<Option<Self>, ComponentError> {
            Ok(match (event.channel.as_str(), event.event.as_str()) {
                ("ui", "windowSizeChange") => Some(Self::WindowSizeChange(decode_payload(event)?)),
                ("system", "stop") => Some(Self::SystemStop),
                _ => None,
            })
        }
    }

    #[test]
    fn typed_template_mounts_and_decodes() {
        let mediator = Mediator::with_defaults();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let template = ComponentTemplate::typed("Grid", "GR1", move |evt: GridEvent, _raw| {
            sink.lock().push(evt);
            Ok(())
        })
        .expect("valid event set");
        let adapter = LifecycleAdapter::new(mediator.handle(), template);
        let _scope = adapter.enter_base().expect("enter");

        mediator
            .publish("Shell", "SH1", "ui", "windowSizeChange", json!({"width": 800, "height": 600}), 0)
            .expect("publish");
        let bad = mediator
            .publish("Shell", "SH1", "ui", "windowSizeChange", json!("oops"), 1)
            .expect("publish");

        assert_eq!(bad.failed, 1);
        assert_eq!(
            *seen.lock(),
            vec![GridEvent::WindowSizeChange(Size {
                width: 800,
                height: 600
            })]
        );
    }

    #[test]
    fn extension_subscription_routes_to_method_handler() {
        let mediator = Mediator::with_defaults();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);

        let template = ComponentTemplate::new("Toolbar", "TB1")
            .with_subscriptions(SubscriptionSpec::new().with_event("system", "start"))
            .with_handlers(HandlerTable::new().on_method("handleUiWindowSizeChange", move |_| {
                *counter.lock() += 1;
                Ok(())
            }));
        let adapter = LifecycleAdapter::new(mediator.handle(), template);

        {
            let _base_only = adapter.enter_base().expect("enter");
            mediator
                .publish("Shell", "SH1", "ui", "windowSizeChange", json!({}), 0)
                .expect("publish");
            assert_eq!(*hits.lock(), 0);
        }

        let _extended = adapter
            .enter(
                &SubscriptionSpec::new().with_event("ui", "windowSizeChange"),
                &PublicationSpec::new(),
            )
            .expect("enter with extension");
        mediator
            .publish("Shell", "SH1", "ui", "windowSizeChange", json!({}), 1)
            .expect("publish");
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn enter_exit_pairs_lifecycle_hooks() {
        let mediator = Mediator::with_defaults();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let on_init = Arc::clone(&calls);
        let on_destroy = Arc::clone(&calls);

        let template = ComponentTemplate::new("Tabs", "TS1")
            .on_initialize(move || {
                on_init.lock().push("init");
                Ok(())
            })
            .on_destroy(move || on_destroy.lock().push("destroy"));
        let adapter = LifecycleAdapter::new(mediator.handle(), template);

        for _ in 0..3 {
            let scope = adapter.enter_base().expect("enter");
            assert!(scope.is_active());
            assert_eq!(scope.exit(), Ok(true));
        }

        assert_eq!(
            *calls.lock(),
            vec!["init", "destroy", "init", "destroy", "init", "destroy"]
        );
    }

    #[test]
    fn failed_initialize_leaves_nothing_mounted() {
        let mediator = Mediator::with_defaults();
        let template = ComponentTemplate::new("Tabs", "TS1")
            .on_initialize(|| Err(ComponentError::InitFailed("no tabs".into())));
        let adapter = LifecycleAdapter::new(mediator.handle(), template);

        let err = adapter.enter_base().map(|s| s.instance_id()).expect_err("init fails");
        assert!(matches!(err, MediatorError::InitFailed { .. }));
        assert_eq!(mediator.component_count(), 0);
    }

    #[test]
    fn exit_after_external_unregister_is_false() {
        let mediator = Mediator::with_defaults();
        let adapter = LifecycleAdapter::new(mediator.handle(), ComponentTemplate::new("Form", "FM1"));

        let scope = adapter.enter_base().expect("enter");
        assert_eq!(mediator.unregister(scope.component().as_ref()), Ok(true));
        assert_eq!(scope.exit(), Ok(false));
    }

    #[test]
    fn shutdown_destroys_mounted_scopes() {
        let mediator = Mediator::with_defaults();
        let destroyed = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&destroyed);

        let template =
            ComponentTemplate::new("Form", "FM1").on_destroy(move || *counter.lock() += 1);
        let adapter = LifecycleAdapter::new(mediator.handle(), template);
        let scope = adapter.enter_base().expect("enter");

        mediator.shutdown();
        drop(scope);

        assert_eq!(*destroyed.lock(), 1);
        assert!(!mediator.is_registered("Form"));
    }

    #[test]
    fn full_spec_reflects_merged_specs() {
        let mediator = Mediator::with_defaults();
        let adapter = LifecycleAdapter::new(
            mediator.handle(),
            ComponentTemplate::new("Toolbar", "TB1")
                .with_description("Main toolbar")
                .with_subscriptions(SubscriptionSpec::new().with_event("system", "start")),
        );
        let scope = adapter
            .enter(
                &SubscriptionSpec::new().with_event("system", "stop"),
                &PublicationSpec::new(),
            )
            .expect("enter");

        let spec = scope.component().full_spec();
        assert_eq!(spec.description, "Main toolbar");
        let pairs: Vec<(&str, &str)> = spec.subscription_spec.pairs().collect();
        assert_eq!(pairs, vec![("system", "start"), ("system", "stop")]);
        assert_eq!(mediator.full_specs(), vec![spec]);
    }
}
