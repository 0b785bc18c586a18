//! Component system for specbus.
//!
//! Components are the in-process units that register with the mediator:
//! a toolbar, a data grid, a tab strip. Each one declares what it wants
//! delivered and what it may emit, and exposes one `handle_event` entry
//! point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Mediator                            │
//! │   register / unregister / publish                            │
//! └──────────────────────────────────────────────────────────────┘
//!        │ handle_event(&Event)  (filtered by subscription spec)
//!        ├──────────────┬──────────────┬──────────────┐
//!        ▼              ▼              ▼              ▼
//!  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//!  │ Toolbar  │   │   Grid   │   │   Form   │   │   Tabs   │
//!  └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Crate Structure
//!
//! - [`Component`] - mediator participant trait
//! - [`ComponentFullSpec`] - introspection document
//! - [`HandlerTable`] - key / method-name / typed handler lookup
//! - [`EventSet`] - closed enum of handled events
//! - [`ComponentError`] - handler and initialize failures
//! - [`testing`] - [`RecordingComponent`](testing::RecordingComponent)
//!
//! # Example
//!
//! ```
//! use specbus_component::HandlerTable;
//! use specbus_event::Event;
//! use serde_json::json;
//!
//! let table = HandlerTable::new()
//!     .on("system", "start", |evt| {
//!         assert_eq!(evt.component_name, "App");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let evt = Event::new("App", "APP1", "system", "start", json!({}), 0);
//! assert_eq!(table.dispatch(&evt), Ok(true));
//! ```

mod component;
mod error;
mod handler;
pub mod testing;
mod typed;

pub use component::{Component, ComponentFullSpec};
pub use error::ComponentError;
pub use handler::{HandlerFn, HandlerTable};
pub use typed::{decode_payload, EventSet};
