//! Subscription and publication specs.
//!
//! A component declares two specs:
//!
//! | Spec | Meaning | Merge key |
//! |------|---------|-----------|
//! | [`SubscriptionSpec`] | channel:event pairs it wants delivered | channel, then event name |
//! | [`PublicationSpec`] | channel:event pairs it may emit | (channel, event) |
//!
//! A *base* spec is fixed per component type; embedding callers add an
//! *extension* spec. The two are merged once, when the component enters
//! scope, and the merged subscription spec is what the mediator filters
//! deliveries by.
//!
//! ```text
//! base:      system:[start]            ext:  system:[stop]  ui:[resize]
//!                     │                           │
//!                     └────────── merge ──────────┘
//!                                   ▼
//!              merged: system:[start, stop]  ui:[resize]
//! ```

mod publication;
mod subscription;

pub use publication::{merge_publication_specs, PublicationEntry, PublicationSpec};
pub use subscription::{merge_subscription_specs, ChannelSpec, EventSpec, SubscriptionSpec};
