//! Component layer errors.
//!
//! Errors a component returns from `handle_event` or `initialize`.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NotSupported`](ComponentError::NotSupported) | `COMPONENT_NOT_SUPPORTED` | No |
//! | [`ExecutionFailed`](ComponentError::ExecutionFailed) | `COMPONENT_EXECUTION_FAILED` | Yes |
//! | [`InvalidPayload`](ComponentError::InvalidPayload) | `COMPONENT_INVALID_PAYLOAD` | No |
//! | [`InitFailed`](ComponentError::InitFailed) | `COMPONENT_INIT_FAILED` | Yes |
//!
//! # Example
//!
//! ```
//! use specbus_component::ComponentError;
//! use specbus_types::ErrorCode;
//!
//! let err = ComponentError::NotSupported("grid:sort".into());
//! assert_eq!(err.code(), "COMPONENT_NOT_SUPPORTED");
//! assert!(!err.is_recoverable());
//! ```

use serde::{Deserialize, Serialize};
use specbus_types::ErrorCode;
use thiserror::Error;

/// Component layer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ComponentError {
    /// The delivered event is not handled by this component.
    #[error("event not supported: {0}")]
    NotSupported(String),

    /// The handler ran and failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The event payload does not have the declared shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// `initialize` failed; the component is not kept registered.
    #[error("initialization failed: {0}")]
    InitFailed(String),
}

impl ErrorCode for ComponentError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotSupported(_) => "COMPONENT_NOT_SUPPORTED",
            Self::ExecutionFailed(_) => "COMPONENT_EXECUTION_FAILED",
            Self::InvalidPayload(_) => "COMPONENT_INVALID_PAYLOAD",
            Self::InitFailed(_) => "COMPONENT_INIT_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::ExecutionFailed(_) => true,
            Self::InitFailed(_) => true,
            Self::NotSupported(_) => false,
            Self::InvalidPayload(_) => false,
        }
    }
}
