//! Publication specs: which channel:event pairs a component may emit.
//!
//! Publications are flat `(channel, event)` entries rather than nested
//! event lists, so the merge key is the pair itself.

use crate::SpecError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use specbus_types::{validate_channel, validate_event};

/// One event a component may publish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationEntry {
    /// Channel name.
    pub channel: String,
    /// Event name.
    pub event: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// When the component emits this event.
    #[serde(default)]
    pub condition: String,
    /// Shape description of the payload.
    #[serde(default)]
    pub data_format: Value,
    /// Example payload.
    #[serde(default)]
    pub example_data: Value,
}

impl PublicationEntry {
    /// Creates an entry with empty documentation fields.
    #[must_use]
    pub fn new(channel: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            event: event.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the emission condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    /// Sets the payload shape description.
    #[must_use]
    pub fn with_data_format(mut self, data_format: Value) -> Self {
        self.data_format = data_format;
        self
    }

    /// Sets the example payload.
    #[must_use]
    pub fn with_example_data(mut self, example_data: Value) -> Self {
        self.example_data = example_data;
        self
    }

    fn same_key(&self, other: &Self) -> bool {
        self.channel == other.channel && self.event == other.event
    }
}

/// A component's publication declaration.
///
/// # Example
///
/// ```
/// use specbus_event::{PublicationEntry, PublicationSpec};
///
/// let spec = PublicationSpec::new()
///     .with_entry(PublicationEntry::new("grid", "rowSelected").with_condition("on click"));
/// assert!(spec.publishes("grid", "rowSelected"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationSpec {
    /// Entries in declaration order.
    #[serde(default)]
    pub publications: Vec<PublicationEntry>,
}

impl PublicationSpec {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    #[must_use]
    pub fn with_entry(mut self, entry: PublicationEntry) -> Self {
        self.publications.push(entry);
        self
    }

    /// Returns `true` if nothing is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    /// Returns `true` if `channel:event` is declared.
    #[must_use]
    pub fn publishes(&self, channel: &str, event: &str) -> bool {
        self.entry(channel, event).is_some()
    }

    /// Returns the entry for `channel:event`, if declared.
    #[must_use]
    pub fn entry(&self, channel: &str, event: &str) -> Option<&PublicationEntry> {
        self.publications
            .iter()
            .find(|p| p.channel == channel && p.event == event)
    }

    /// Checks names and uniqueness.
    ///
    /// # Errors
    ///
    /// Same errors as [`merge_publication_specs`].
    pub fn validate(&self) -> Result<(), SpecError> {
        Self::default().absorb(self)
    }

    fn absorb(&mut self, other: &Self) -> Result<(), SpecError> {
        for entry in &other.publications {
            validate_channel(&entry.channel)?;
            validate_event(&entry.event)?;
            if self.publications.iter().any(|p| p.same_key(entry)) {
                return Err(SpecError::PublicationConflict {
                    channel: entry.channel.clone(),
                    event: entry.event.clone(),
                });
            }
            self.publications.push(entry.clone());
        }
        Ok(())
    }
}

/// Merges a base publication spec with an extension spec.
///
/// Same algorithm as
/// [`merge_subscription_specs`](crate::merge_subscription_specs), keyed by
/// the `(channel, event)` pair.
///
/// # Errors
///
/// - [`SpecError::PublicationConflict`] on a duplicate pair
/// - [`SpecError::Validation`] on an empty or delimiter-containing name
pub fn merge_publication_specs(
    base: &PublicationSpec,
    extension: &PublicationSpec,
) -> Result<PublicationSpec, SpecError> {
    let mut merged = PublicationSpec::default();
    merged.absorb(base)?;
    merged.absorb(extension)?;
    Ok(merged)
}
