//! Subscription specs: which channel:event pairs a component wants delivered.

use crate::SpecError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use specbus_types::{build_dispatch_key, validate_channel, validate_event, DispatchKey, ValidationError};

/// One subscribable event on a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    /// Event name, unique within its channel.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Shape description of the event payload.
    #[serde(default)]
    pub data_format: Value,
}

impl EventSpec {
    /// Creates an event spec with an empty description and data format.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data_format: Value::Null,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the payload shape description.
    #[must_use]
    pub fn with_data_format(mut self, data_format: Value) -> Self {
        self.data_format = data_format;
        self
    }
}

/// Events a component subscribes to on one channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    /// Channel name.
    pub channel: String,
    /// Subscribed events, unique by name.
    #[serde(default)]
    pub events: Vec<EventSpec>,
}

impl ChannelSpec {
    /// Creates a channel spec with no events.
    #[must_use]
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            events: Vec::new(),
        }
    }

    /// Appends an event.
    #[must_use]
    pub fn with_event(mut self, event: EventSpec) -> Self {
        self.events.push(event);
        self
    }

    /// Returns the event named `name`, if declared.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&EventSpec> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Returns `true` if an event named `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.event(name).is_some()
    }
}

/// A component's subscription declaration.
///
/// An empty spec is valid and subscribes to nothing.
///
/// # Example
///
/// ```
/// use specbus_event::{ChannelSpec, EventSpec, SubscriptionSpec};
///
/// let spec = SubscriptionSpec::new()
///     .with_channel(ChannelSpec::new("system").with_event(EventSpec::new("start")));
///
/// assert!(spec.subscribes_to("system", "start"));
/// assert!(!spec.subscribes_to("system", "stop"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSpec {
    /// Channel entries in declaration order.
    #[serde(default)]
    pub subscriptions: Vec<ChannelSpec>,
}

impl SubscriptionSpec {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a channel entry.
    ///
    /// Events for a channel that is already present are appended to its
    /// existing entry, so each channel appears once.
    #[must_use]
    pub fn with_channel(mut self, channel: ChannelSpec) -> Self {
        match self
            .subscriptions
            .iter_mut()
            .find(|c| c.channel == channel.channel)
        {
            Some(existing) => existing.events.extend(channel.events),
            None => self.subscriptions.push(channel),
        }
        self
    }

    /// Shorthand for a single `channel:event` subscription with no docs.
    #[must_use]
    pub fn with_event(self, channel: impl Into<String>, event: impl Into<String>) -> Self {
        self.with_channel(ChannelSpec::new(channel).with_event(EventSpec::new(event)))
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.iter().all(|c| c.events.is_empty())
    }

    /// Returns the entry for `channel`, if any.
    #[must_use]
    pub fn channel(&self, channel: &str) -> Option<&ChannelSpec> {
        self.subscriptions.iter().find(|c| c.channel == channel)
    }

    /// Returns `true` if an event named `event` is declared under `channel`.
    #[must_use]
    pub fn subscribes_to(&self, channel: &str, event: &str) -> bool {
        self.subscriptions
            .iter()
            .any(|c| c.channel == channel && c.contains(event))
    }

    /// Iterates every declared `(channel, event)` pair in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subscriptions.iter().flat_map(|c| {
            c.events
                .iter()
                .map(move |e| (c.channel.as_str(), e.name.as_str()))
        })
    }

    /// Returns the dispatch key of every declared pair.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn dispatch_keys(&self) -> Result<Vec<DispatchKey>, ValidationError> {
        self.pairs()
            .map(|(channel, event)| build_dispatch_key(channel, event))
            .collect()
    }

    /// Checks names and uniqueness.
    ///
    /// # Errors
    ///
    /// Same errors as [`merge_subscription_specs`].
    pub fn validate(&self) -> Result<(), SpecError> {
        Self::default().absorb(self)
    }

    /// Folds `other` into `self`, unioning events per channel.
    fn absorb(&mut self, other: &Self) -> Result<(), SpecError> {
        for incoming in &other.subscriptions {
            validate_channel(&incoming.channel)?;

            let idx = match self
                .subscriptions
                .iter()
                .position(|c| c.channel == incoming.channel)
            {
                Some(idx) => idx,
                None => {
                    self.subscriptions.push(ChannelSpec::new(incoming.channel.clone()));
                    self.subscriptions.len() - 1
                }
            };
            let target = &mut self.subscriptions[idx];

            for event in &incoming.events {
                validate_event(&event.name)?;
                if target.contains(&event.name) {
                    return Err(SpecError::SubscriptionConflict {
                        channel: incoming.channel.clone(),
                        event: event.name.clone(),
                    });
                }
                target.events.push(event.clone());
            }
        }
        Ok(())
    }
}

/// Merges a base subscription spec with an extension spec.
///
/// Channels accumulate in order, base first. A channel present on both
/// sides gets the union of its events; the same event name on the same
/// channel in both inputs is a [`SpecError::SubscriptionConflict`]
/// rather than a silent overwrite. Inputs are only borrowed.
///
/// # Errors
///
/// - [`SpecError::SubscriptionConflict`] on a duplicate event
/// - [`SpecError::Validation`] on an empty or delimiter-containing name
///
/// # Example
///
/// ```
/// use specbus_event::{merge_subscription_specs, SubscriptionSpec};
///
/// let base = SubscriptionSpec::new().with_event("system", "start");
/// let ext = SubscriptionSpec::new().with_event("system", "stop");
///
/// let merged = merge_subscription_specs(&base, &ext).unwrap();
/// assert_eq!(merged.subscriptions.len(), 1);
/// assert!(merged.subscribes_to("system", "start"));
/// assert!(merged.subscribes_to("system", "stop"));
///
/// assert!(merge_subscription_specs(&merged, &ext).is_err());
/// ```
pub fn merge_subscription_specs(
    base: &SubscriptionSpec,
    extension: &SubscriptionSpec,
) -> Result<SubscriptionSpec, SpecError> {
    let mut merged = SubscriptionSpec::default();
    merged.absorb(base)?;
    merged.absorb(extension)?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn system_start() -> SubscriptionSpec {
        SubscriptionSpec::new().with_channel(
            ChannelSpec::new("system").with_event(
                EventSpec::new("start")
                    .with_description("application started")
                    .with_data_format(json!({"timestamp": "string"})),
            ),
        )
    }

    fn ui_resize() -> SubscriptionSpec {
        SubscriptionSpec::new().with_channel(
            ChannelSpec::new("ui").with_event(
                EventSpec::new("windowSizeChange")
                    .with_data_format(json!({"width": "number", "height": "number"})),
            ),
        )
    }

    #[test]
    fn disjoint_channels_union() {
        let base = system_start();
        let ext = ui_resize();

        let merged = merge_subscription_specs(&base, &ext).expect("disjoint specs merge");

        assert_eq!(merged.subscriptions.len(), 2);
        assert_eq!(merged.subscriptions[0], base.subscriptions[0]);
        assert_eq!(merged.subscriptions[1], ext.subscriptions[0]);
    }

    #[test]
    fn shared_channel_unions_events() {
        let base = system_start();
        let ext = SubscriptionSpec::new().with_event("system", "stop");

        let merged = merge_subscription_specs(&base, &ext).expect("disjoint events merge");

        assert_eq!(merged.subscriptions.len(), 1);
        let names: Vec<&str> = merged.subscriptions[0]
            .events
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["start", "stop"]);
    }

    #[test]
    fn inputs_not_mutated() {
        let base = system_start().with_event("ui", "focus");
        let ext = ui_resize();
        let base_before = base.clone();
        let ext_before = ext.clone();

        let _ = merge_subscription_specs(&base, &ext).expect("merge");
        let _ = merge_subscription_specs(&base, &base);

        assert_eq!(base, base_before);
        assert_eq!(ext, ext_before);
    }

    #[test]
    fn duplicate_event_conflicts_in_both_orders() {
        let base = system_start();
        let ext = SubscriptionSpec::new().with_event("system", "start");

        let forward = merge_subscription_specs(&base, &ext).expect_err("conflict");
        let backward = merge_subscription_specs(&ext, &base).expect_err("conflict");

        let expected = SpecError::SubscriptionConflict {
            channel: "system".into(),
            event: "start".into(),
        };
        assert_eq!(forward, expected);
        assert_eq!(backward, expected);
    }

    #[test]
    fn empty_extension_returns_base() {
        let base = system_start().with_channel(ChannelSpec::new("idle"));
        let merged =
            merge_subscription_specs(&base, &SubscriptionSpec::new()).expect("empty extension");
        assert_eq!(merged, base);
    }

    #[test]
    fn empty_extension_keeps_multi_event_channel() {
        let base = SubscriptionSpec::new()
            .with_event("system", "start")
            .with_event("system", "stop")
            .with_event("ui", "windowSizeChange");
        assert_eq!(base.subscriptions.len(), 2);

        let merged =
            merge_subscription_specs(&base, &SubscriptionSpec::new()).expect("empty extension");
        assert_eq!(merged, base);
    }

    #[test]
    fn builder_folds_same_channel() {
        let spec = SubscriptionSpec::new()
            .with_channel(ChannelSpec::new("system").with_event(EventSpec::new("start")))
            .with_event("ui", "focus")
            .with_channel(ChannelSpec::new("system").with_event(EventSpec::new("stop")));

        let channels: Vec<&str> = spec.subscriptions.iter().map(|c| c.channel.as_str()).collect();
        assert_eq!(channels, vec!["system", "ui"]);
        let pairs: Vec<(&str, &str)> = spec.pairs().collect();
        assert_eq!(
            pairs,
            vec![("system", "start"), ("system", "stop"), ("ui", "focus")]
        );
    }

    #[test]
    fn empty_specs_are_valid() {
        let merged = merge_subscription_specs(&SubscriptionSpec::new(), &SubscriptionSpec::new())
            .expect("empty merge");
        assert!(merged.is_empty());
        assert!(merged.subscriptions.is_empty());
    }

    #[test]
    fn invalid_names_rejected() {
        let bad = SubscriptionSpec::new().with_event("sys:tem", "start");
        let err = merge_subscription_specs(&SubscriptionSpec::new(), &bad).expect_err("invalid");
        assert!(matches!(
            err,
            SpecError::Validation(ValidationError::DelimiterInChannel(_))
        ));

        let bad = SubscriptionSpec::new().with_event("system", "");
        assert!(bad.validate().is_err());
    }

    #[test]
    fn lookup_helpers() {
        let spec = merge_subscription_specs(&system_start(), &ui_resize()).expect("merge");

        assert!(spec.subscribes_to("ui", "windowSizeChange"));
        assert!(!spec.subscribes_to("ui", "start"));
        assert!(spec.channel("system").is_some_and(|c| c.contains("start")));

        let keys: Vec<String> = spec
            .dispatch_keys()
            .expect("valid keys")
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys, vec!["system:start", "ui:windowSizeChange"]);
    }

    #[test]
    fn deserializes_external_shape() {
        let json = json!({
            "subscriptions": [{
                "channel": "system",
                "events": [{
                    "name": "start",
                    "description": "app start",
                    "dataFormat": {"timestamp": "string"}
                }]
            }]
        });

        let spec: SubscriptionSpec = serde_json::from_value(json).expect("deserialize");
        let event = spec
            .channel("system")
            .and_then(|c| c.event("start"))
            .expect("declared event");
        assert_eq!(event.description, "app start");
        assert_eq!(event.data_format, json!({"timestamp": "string"}));

        let back = serde_json::to_value(&spec).expect("serialize");
        assert!(back["subscriptions"][0]["events"][0].get("dataFormat").is_some());
    }
}
