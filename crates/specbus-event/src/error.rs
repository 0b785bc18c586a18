//! Spec layer errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`SpecError::SubscriptionConflict`] | `SPEC_SUBSCRIPTION_CONFLICT` | No |
//! | [`SpecError::PublicationConflict`] | `SPEC_PUBLICATION_CONFLICT` | No |
//! | [`SpecError::Validation`] | `SPEC_INVALID_NAME` | No |
//!
//! Every spec error is a configuration mistake between a component and
//! whatever embeds it, so none are recoverable.

use serde::{Deserialize, Serialize};
use specbus_types::{ErrorCode, ValidationError};
use thiserror::Error;

/// Error raised while merging or validating specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum SpecError {
    /// Two merge inputs declare the same event on the same channel.
    #[error("subscription conflict: event '{event}' declared twice on channel '{channel}'")]
    SubscriptionConflict {
        /// Channel carrying the duplicate.
        channel: String,
        /// Duplicated event name.
        event: String,
    },

    /// Two merge inputs declare the same channel:event publication.
    #[error("publication conflict: '{channel}:{event}' declared twice")]
    PublicationConflict {
        /// Channel carrying the duplicate.
        channel: String,
        /// Duplicated event name.
        event: String,
    },

    /// A channel or event name failed key validation.
    #[error("invalid spec name: {0}")]
    Validation(#[from] ValidationError),
}

impl SpecError {
    /// Returns `true` for either conflict variant.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SubscriptionConflict { .. } | Self::PublicationConflict { .. }
        )
    }
}

impl ErrorCode for SpecError {
    fn code(&self) -> &'static str {
        match self {
            Self::SubscriptionConflict { .. } => "SPEC_SUBSCRIPTION_CONFLICT",
            Self::PublicationConflict { .. } => "SPEC_PUBLICATION_CONFLICT",
            Self::Validation(_) => "SPEC_INVALID_NAME",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
