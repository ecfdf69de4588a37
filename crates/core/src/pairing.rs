use crate::event::Event;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A buffered event waiting for its complementary half.
#[derive(Debug, Clone)]
pub struct Pending {
    pub event: Event,
    pub seen_at: DateTime<Utc>,
}

/// Matches tool calls to tool results arriving in either order.
///
/// Per identifier: unseen, then call-pending or result-pending, then
/// resolved. An identifier lives in at most one of the two maps; when
/// the complementary event arrives the stored half is removed and
/// returned so both halves can be rendered together exactly once.
/// Entries that never resolve stay buffered for the rest of the run.
#[derive(Debug, Default)]
pub struct PairingBuffer {
    calls: HashMap<String, Pending>,
    results: HashMap<String, Pending>,
}

impl PairingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an incoming tool call. Returns the buffered result if
    /// one already arrived for this id; otherwise the call is stored.
    pub fn offer_call(&mut self, id: &str, event: Event, seen_at: DateTime<Utc>) -> Option<Pending> {
        if let Some(result) = self.results.remove(id) {
            return Some(result);
        }
        self.calls.insert(id.to_string(), Pending { event, seen_at });
        None
    }

    /// Register an incoming tool result. Returns the buffered call if
    /// one already arrived for this id; otherwise the result is stored.
    pub fn offer_result(
        &mut self,
        id: &str,
        event: Event,
        seen_at: DateTime<Utc>,
    ) -> Option<Pending> {
        if let Some(call) = self.calls.remove(id) {
            return Some(call);
        }
        self.results.insert(id.to_string(), Pending { event, seen_at });
        None
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn pending_results(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.results.is_empty()
    }
}
