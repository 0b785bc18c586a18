//! Mediator errors.

use crate::registry::RegistryError;
use specbus_component::ComponentError;
use specbus_event::SpecError;
use specbus_types::{ErrorCode, ValidationError};
use thiserror::Error;

/// Error returned by mediator operations.
///
/// `Validation` and `Spec` pass the wrapped error's code through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediatorError {
    /// The mediator was dropped or shut down.
    #[error("mediator unavailable")]
    Unavailable,

    /// A component with this name is already registered.
    #[error("component already registered: {0}")]
    DuplicateComponent(String),

    /// Malformed channel or event name.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Spec merge failed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// `initialize` failed; the component was removed again.
    #[error("component {name} failed to initialize: {source}")]
    InitFailed {
        name: String,
        #[source]
        source: ComponentError,
    },
}

impl MediatorError {
    /// Creates an init failure error.
    pub fn init_failed(name: impl Into<String>, source: ComponentError) -> Self {
        Self::InitFailed {
            name: name.into(),
            source,
        }
    }
}

impl From<RegistryError> for MediatorError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Duplicate(name) => Self::DuplicateComponent(name),
        }
    }
}

impl ErrorCode for MediatorError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "MEDIATOR_UNAVAILABLE",
            Self::DuplicateComponent(_) => "MEDIATOR_DUPLICATE_COMPONENT",
            Self::Validation(e) => e.code(),
            Self::Spec(e) => e.code(),
            Self::InitFailed { .. } => "MEDIATOR_INIT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Unavailable | Self::DuplicateComponent(_) => false,
            Self::Validation(e) => e.is_recoverable(),
            Self::Spec(e) => e.is_recoverable(),
            Self::InitFailed { source, .. } => source.is_recoverable(),
        }
    }
}

/// A subscriber failed while handling a delivered event.
///
/// Built inside the dispatch loop and logged; never returned from
/// `publish`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerExecutionError {
    /// The handler returned `Err`.
    #[error("{component} ({code}) failed on {channel}:{event}: {source}")]
    Failed {
        component: String,
        code: String,
        channel: String,
        event: String,
        #[source]
        source: ComponentError,
    },

    /// The handler panicked.
    #[error("{component} ({code}) panicked on {channel}:{event}: {message}")]
    Panicked {
        component: String,
        code: String,
        channel: String,
        event: String,
        message: String,
    },
}

impl HandlerExecutionError {
    /// Returns the failing component's name.
    #[must_use]
    pub fn component(&self) -> &str {
        match self {
            Self::Failed { component, .. } | Self::Panicked { component, .. } => component,
        }
    }

    /// Returns `true` for a caught panic.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked { .. })
    }
}

impl ErrorCode for HandlerExecutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Failed { .. } => "HANDLER_FAILED",
            Self::Panicked { .. } => "HANDLER_PANICKED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Failed { source, .. } => source.is_recoverable(),
            Self::Panicked { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specbus_types::assert_error_codes;

    fn failed() -> HandlerExecutionError {
        HandlerExecutionError::Failed {
            component: "Grid".into(),
            code: "GR1".into(),
            channel: "ui".into(),
            event: "windowSizeChange".into(),
            source: ComponentError::ExecutionFailed("layout".into()),
        }
    }

    fn panicked() -> HandlerExecutionError {
        HandlerExecutionError::Panicked {
            component: "Grid".into(),
            code: "GR1".into(),
            channel: "ui".into(),
            event: "windowSizeChange".into(),
            message: "index out of bounds".into(),
        }
    }

    #[test]
    fn mediator_codes_valid() {
        assert_error_codes(
            &[
                MediatorError::Unavailable,
                MediatorError::DuplicateComponent("Toolbar".into()),
                MediatorError::init_failed("Toolbar", ComponentError::InitFailed("x".into())),
            ],
            "MEDIATOR_",
        );
    }

    #[test]
    fn handler_codes_valid() {
        assert_error_codes(&[failed(), panicked()], "HANDLER_");
    }

    #[test]
    fn wrapped_codes_pass_through() {
        let err = MediatorError::from(ValidationError::EmptyChannel);
        assert_eq!(err.code(), ValidationError::EmptyChannel.code());

        let spec = SpecError::SubscriptionConflict {
            channel: "system".into(),
            event: "start".into(),
        };
        assert_eq!(MediatorError::from(spec.clone()).code(), spec.code());
    }

    #[test]
    fn registry_duplicate_maps() {
        let err = MediatorError::from(RegistryError::Duplicate("Grid".into()));
        assert_eq!(err, MediatorError::DuplicateComponent("Grid".into()));
    }

    #[test]
    fn handler_error_identity_in_message() {
        let msg = failed().to_string();
        assert!(msg.contains("Grid"));
        assert!(msg.contains("GR1"));
        assert!(msg.contains("ui:windowSizeChange"));
        assert_eq!(failed().component(), "Grid");
        assert!(panicked().is_panic());
        assert!(!panicked().is_recoverable());
        assert!(failed().is_recoverable());
    }
}
