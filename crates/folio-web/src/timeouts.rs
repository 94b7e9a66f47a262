#![forbid(unsafe_code)]

//! Bookkeeping for browser timeout handles.
//!
//! The tour arms timers by [`TimerId`]; the browser hands back an integer
//! handle. An entry lives from `setTimeout` until the timer either fires or
//! is cleared, whichever comes first.

use std::collections::BTreeMap;

use folio_core::TimerId;

/// Pending `setTimeout` handles keyed by tour timer id.
#[derive(Debug, Default)]
pub struct TimeoutHandles {
    pending: BTreeMap<TimerId, i32>,
}

impl TimeoutHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handle for a freshly armed timer.
    pub fn armed(&mut self, id: TimerId, handle: i32) {
        self.pending.insert(id, handle);
    }

    /// Forget a timer whose callback just ran.
    pub fn fired(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }

    /// Take the handle to pass to `clearTimeout`. `None` once the timer has
    /// fired or was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<i32> {
        self.pending.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
