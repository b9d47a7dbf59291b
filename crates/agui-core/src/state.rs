//! Producer-side state tracking.
//!
//! A client learns state in two ways: a `STATE_SNAPSHOT` replaces whatever
//! it held, a `STATE_DELTA` patches it. [`StateManager`] remembers what was
//! last sent and hands back the event that moves the client to a new state.
//!
//! # Example
//!
//! ```rust
//! use agui_core::state::StateManager;
//! use serde_json::json;
//!
//! let mut manager = StateManager::new(json!({"count": 0}));
//! let first = manager.snapshot_event();
//! assert_eq!(first.snapshot, json!({"count": 0}));
//!
//! let delta = manager.update(json!({"count": 1})).unwrap().unwrap();
//! assert_eq!(delta.delta.len(), 1);
//! assert_eq!(manager.current()["count"], 1);
//! ```

use crate::event::{StateDeltaEvent, StateSnapshotEvent};
use crate::patch::{create_patch, patch_to_vec, Patch, PatchError};
use serde_json::Value as JsonValue;

/// Computes the difference between two JSON states as a JSON Patch.
///
/// Returns `None` if the states are identical.
pub fn diff_states(old: &JsonValue, new: &JsonValue) -> Option<Patch> {
    let patch = create_patch(old, new);
    if patch.0.is_empty() {
        None
    } else {
        Some(patch)
    }
}

/// Tracks the state last published to clients.
#[derive(Debug, Clone)]
pub struct StateManager {
    current: JsonValue,
    version: u64,
}

impl StateManager {
    /// Creates a manager whose clients are assumed to hold `initial`.
    pub fn new(initial: JsonValue) -> Self {
        Self {
            current: initial,
            version: 0,
        }
    }

    /// Returns a reference to the current state.
    pub fn current(&self) -> &JsonValue {
        &self.current
    }

    /// Number of changes published so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// A snapshot event carrying the current state.
    pub fn snapshot_event(&self) -> StateSnapshotEvent {
        StateSnapshotEvent::new(self.current.clone())
    }

    /// Moves to `new_state` and returns the delta event, or `None` when
    /// nothing changed. The state is kept as it was if the delta cannot be
    /// built.
    pub fn update(&mut self, new_state: JsonValue) -> Result<Option<StateDeltaEvent>, PatchError> {
        let Some(patch) = diff_states(&self.current, &new_state) else {
            return Ok(None);
        };
        let delta = patch_to_vec(&patch)?;
        self.current = new_state;
        self.version += 1;
        Ok(Some(StateDeltaEvent::new(delta)))
    }

    /// Mutates the state in place and returns the resulting delta event.
    ///
    /// ```rust
    /// use agui_core::state::StateManager;
    /// use serde_json::json;
    ///
    /// let mut manager = StateManager::new(json!({"items": []}));
    /// let delta = manager.update_with(|state| {
    ///     state["items"] = json!(["a"]);
    /// });
    /// assert!(delta.unwrap().is_some());
    /// ```
    pub fn update_with<F>(&mut self, f: F) -> Result<Option<StateDeltaEvent>, PatchError>
    where
        F: FnOnce(&mut JsonValue),
    {
        let mut next = self.current.clone();
        f(&mut next);
        self.update(next)
    }

    /// Replaces the state wholesale and returns the snapshot event to send.
    pub fn reset(&mut self, new_state: JsonValue) -> StateSnapshotEvent {
        self.current = new_state;
        self.version += 1;
        self.snapshot_event()
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(JsonValue::Object(serde_json::Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::apply_delta;
    use serde_json::json;

    #[test]
    fn test_diff_states_with_changes() {
        let patch = diff_states(&json!({"count": 0}), &json!({"count": 5})).unwrap();
        assert_eq!(patch.0.len(), 1);
    }

    #[test]
    fn test_diff_states_no_changes() {
        let state = json!({"count": 0});
        assert!(diff_states(&state, &state).is_none());
    }

    #[test]
    fn test_update_emits_applicable_delta() {
        let before = json!({"user": {"name": "Ann"}, "items": [1]});
        let after = json!({"user": {"name": "Bob"}, "items": [1, 2], "flag": true});
        let mut manager = StateManager::new(before.clone());

        let event = manager.update(after.clone()).unwrap().unwrap();
        assert_eq!(apply_delta(&before, &event.delta).unwrap(), after);
        assert_eq!(manager.version(), 1);
    }

    #[test]
    fn test_update_without_change_returns_none() {
        let mut manager = StateManager::new(json!({"count": 1}));
        assert!(manager.update(json!({"count": 1})).unwrap().is_none());
        assert_eq!(manager.version(), 0);
    }

    #[test]
    fn test_update_with_closure() {
        let mut manager = StateManager::default();
        let event = manager.update_with(|state| state["count"] = json!(10)).unwrap().unwrap();
        assert_eq!(event.delta[0]["op"], "add");
        assert_eq!(manager.current()["count"], 10);

        assert!(manager.update_with(|_| {}).unwrap().is_none());
    }

    #[test]
    fn test_reset_returns_snapshot() {
        let mut manager = StateManager::new(json!({"old": true}));
        let event = manager.reset(json!({"new": true}));
        assert_eq!(event.snapshot, json!({"new": true}));
        assert_eq!(manager.current(), &json!({"new": true}));
        assert_eq!(manager.version(), 1);
    }
}
