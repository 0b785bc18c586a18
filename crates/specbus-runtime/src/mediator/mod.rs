//! Mediator: the component bus.
//!
//! Components never reference each other. They register with a
//! [`Mediator`] and publish `(channel, event, data)`; the mediator delivers
//! to every registered component whose merged subscription spec declares
//! the pair.
//!
//! ```text
//!   Toolbar ──publish("system","start")──┐
//!                                        ▼
//!                               ┌─────────────────┐
//!                               │    Mediator     │
//!                               │  ┌───────────┐  │  snapshot,
//!                               │  │ Registry  │──┼─ filter by subscription
//!                               │  └───────────┘  │
//!                               └────────┬────────┘
//!                     ┌──────────────────┼──────────────────┐
//!                     ▼                  ▼                  ▼
//!                ┌─────────┐        ┌─────────┐        ┌─────────┐
//!                │ Toolbar │        │  Grid   │        │  Form   │
//!                │  (yes)  │        │  (no)   │        │  (yes)  │
//!                └─────────┘        └─────────┘        └─────────┘
//! ```
//!
//! # Failure isolation
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Malformed channel/event | `publish` returns a `VALIDATION_*` error |
//! | Handler returns `Err` | Logged as `HANDLER_FAILED`, delivery continues |
//! | Handler panics | Logged as `HANDLER_PANICKED`, delivery continues |
//! | Handler panics, `catch_panics = false` | Panic unwinds out of `publish` |
//! | `destroy` panics | Component removed anyway; panic logged (or resumed) |
//! | No subscriber | Report with `matched == 0` |
//! | Mediator gone | `MEDIATOR_UNAVAILABLE` through every handle |

mod error;
mod handle;
#[allow(clippy::module_inception)]
mod mediator;
mod report;

pub use error::{HandlerExecutionError, MediatorError};
pub use handle::MediatorHandle;
pub use mediator::Mediator;
pub use report::PublishReport;
