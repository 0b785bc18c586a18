//! Core types for specbus.
//!
//! This crate sits at the bottom of the workspace and carries only what
//! every other layer needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  specbus-types     : DispatchKey, InstanceId, ErrorCode ◄── │
//! │  specbus-event     : Event, SubscriptionSpec, merge         │
//! │  specbus-component : Component trait, HandlerTable          │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  specbus-runtime   : Registry, Mediator, LifecycleAdapter   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │  specbus-cli       : `specbus` binary                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use specbus_types::{build_dispatch_key, ErrorCode, ValidationError};
//!
//! let key = build_dispatch_key("system", "start").unwrap();
//! assert_eq!(key.to_string(), "system:start");
//!
//! let err = build_dispatch_key("system", "").unwrap_err();
//! assert_eq!(err, ValidationError::EmptyEvent);
//! assert_eq!(err.code(), "VALIDATION_EMPTY_EVENT");
//! ```

mod error;
mod id;
mod key;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::InstanceId;
pub use key::{
    build_dispatch_key, build_handler_method_name, validate_channel, validate_event, DispatchKey,
    ValidationError, HANDLER_METHOD_PREFIX, KEY_DELIMITER,
};
