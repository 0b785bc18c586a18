//! Identifier types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one component value.
///
/// Component *names* are reused across scope re-entries; each entry
/// builds a new component value with a fresh [`InstanceId`], so log
/// lines can tell a torn-down instance from its replacement.
///
/// # Example
///
/// ```
/// use specbus_types::InstanceId;
///
/// let first = InstanceId::new();
/// let second = InstanceId::new();
/// assert_ne!(first, second);
/// assert!(first.to_string().starts_with("inst:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Creates a new [`InstanceId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inst:{}", self.0)
    }
}
