//! Publish outcome.

use specbus_types::DispatchKey;

/// Outcome of one [`Mediator::publish`](super::Mediator::publish) call.
///
/// `matched == delivered + failed` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Dispatch key of the published event.
    pub key: DispatchKey,
    /// Components whose subscription spec declared the key.
    pub matched: usize,
    /// Handlers that returned `Ok`.
    pub delivered: usize,
    /// Handlers that returned `Err` or panicked.
    pub failed: usize,
}

impl PublishReport {
    pub(crate) fn new(key: DispatchKey) -> Self {
        Self {
            key,
            matched: 0,
            delivered: 0,
            failed: 0,
        }
    }

    /// Returns `true` if no subscriber matched.
    #[must_use]
    pub fn is_unheard(&self) -> bool {
        self.matched == 0
    }

    /// Returns `true` if every matched handler succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for PublishReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: matched={} delivered={} failed={}",
            self.key, self.matched, self.delivered, self.failed
        )
    }
}
