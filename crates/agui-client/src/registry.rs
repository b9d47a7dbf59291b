//! Per-thread reducers.
//!
//! Each thread owns an independent [`Reducer`]; events for one thread never
//! touch another.

use std::collections::HashMap;

use agui_core::{Event, ThreadId};
use tracing::debug;

use crate::reducer::{ProtocolViolation, Reducer};

/// Reducers keyed by thread id.
#[derive(Debug, Clone, Default)]
pub struct ThreadRegistry {
    threads: HashMap<ThreadId, Reducer>,
    current: Option<ThreadId>,
}

impl ThreadRegistry {
    /// Creates a registry with no threads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event` to the reducer of `thread`, creating it on first use.
    pub fn apply(&mut self, thread: &ThreadId, event: &Event) -> Result<(), ProtocolViolation> {
        self.threads.entry(thread.clone()).or_default().apply(event)
    }

    /// Routes an event from a single recorded stream.
    ///
    /// Run lifecycle events carrying a thread id switch the current thread;
    /// everything else goes to the current thread, or to `fallback` before
    /// any run has been seen.
    ///
    /// Routing follows the latest `RUN_STARTED` / `RUN_FINISHED` only, so
    /// runs whose events interleave on one stream are mixed together.
    /// `RUN_ERROR` carries no thread id and lands in the current thread.
    /// Concurrent runs should be kept on separate streams and fed through
    /// [`ThreadRegistry::apply`] with their own thread id.
    pub fn ingest(&mut self, event: &Event, fallback: &ThreadId) -> Result<(), ProtocolViolation> {
        let routed = match event {
            Event::RunStarted(e) => Some(e.thread_id.clone()),
            Event::RunFinished(e) => Some(e.thread_id.clone()),
            _ => None,
        };
        if let Some(thread) = routed {
            if self.current.as_ref() != Some(&thread) {
                debug!(thread_id = %thread, "switching thread");
            }
            self.current = Some(thread);
        }
        let thread = self.current.clone().unwrap_or_else(|| fallback.clone());
        self.apply(&thread, event)
    }

    /// The reducer for `thread`, if any event has reached it.
    pub fn reducer(&self, thread: &ThreadId) -> Option<&Reducer> {
        self.threads.get(thread)
    }

    /// Mutable access to the reducer for `thread`.
    pub fn reducer_mut(&mut self, thread: &ThreadId) -> Option<&mut Reducer> {
        self.threads.get_mut(thread)
    }

    /// Closes trailing chunks in every thread. See [`Reducer::end_chunks`].
    pub fn end_chunks(&mut self) {
        for reducer in self.threads.values_mut() {
            reducer.end_chunks();
        }
    }

    /// Thread ids in sorted order.
    pub fn threads(&self) -> Vec<&ThreadId> {
        let mut ids: Vec<_> = self.threads.keys().collect();
        ids.sort();
        ids
    }

    /// Drops a thread and everything it accumulated.
    pub fn remove(&mut self, thread: &ThreadId) -> Option<Reducer> {
        if self.current.as_ref() == Some(thread) {
            self.current = None;
        }
        self.threads.remove(thread)
    }

    /// Number of threads seen so far.
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// True before any event has been applied.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
