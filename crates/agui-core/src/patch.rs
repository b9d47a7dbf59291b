//! JSON Patch (RFC 6902) helpers for state deltas.
//!
//! `STATE_DELTA` events carry their operations as raw JSON values. This
//! module turns those into typed `json_patch` operations, applies them
//! without touching the original document on failure, and computes deltas
//! between two states on the producer side.
//!
//! # Example
//!
//! ```rust
//! use agui_core::patch::apply_delta;
//! use serde_json::json;
//!
//! let state = json!({"a": 1});
//! let delta = vec![
//!     json!({"op": "add", "path": "/b", "value": 2}),
//!     json!({"op": "remove", "path": "/a"}),
//! ];
//!
//! assert_eq!(apply_delta(&state, &delta).unwrap(), json!({"b": 2}));
//! ```

use serde_json::Value as JsonValue;
use thiserror::Error;

pub use json_patch::{
    AddOperation, CopyOperation, MoveOperation, Patch, PatchOperation, RemoveOperation,
    ReplaceOperation, TestOperation,
};
use jsonptr::PointerBuf;

/// Errors raised while parsing or applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The operations are not a valid RFC 6902 document.
    #[error("Invalid patch format: {0}")]
    InvalidFormat(String),
    /// A JSON pointer in a builder call could not be parsed.
    #[error("Invalid JSON pointer {path:?}: {reason}")]
    InvalidPointer { path: String, reason: String },
    /// An operation failed against the target document.
    #[error("Patch application failed: {0}")]
    Apply(String),
    /// An operation could not be converted back to raw JSON.
    #[error("Patch serialization failed: {0}")]
    Serialization(String),
}

impl From<json_patch::PatchError> for PatchError {
    fn from(err: json_patch::PatchError) -> Self {
        Self::Apply(err.to_string())
    }
}

/// Parses a list of raw JSON operations into a typed patch.
pub fn parse_patch(ops: &[JsonValue]) -> Result<Patch, PatchError> {
    let ops = ops
        .iter()
        .map(|op| serde_json::from_value::<PatchOperation>(op.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| PatchError::InvalidFormat(e.to_string()))?;
    Ok(Patch(ops))
}

/// Applies a typed patch in place.
///
/// `json_patch::patch` reverts partially applied operations on failure, so
/// `target` is unchanged when this returns an error.
pub fn apply_patch(target: &mut JsonValue, patch: &Patch) -> Result<(), PatchError> {
    json_patch::patch(target, &patch.0).map_err(PatchError::from)
}

/// Applies raw delta operations, in array order, to a copy of `state`.
///
/// Returns the patched document; `state` itself is never modified.
pub fn apply_delta(state: &JsonValue, ops: &[JsonValue]) -> Result<JsonValue, PatchError> {
    let patch = parse_patch(ops)?;
    let mut next = state.clone();
    apply_patch(&mut next, &patch)?;
    Ok(next)
}

/// Computes the patch that turns `from` into `to`.
///
/// ```rust
/// use agui_core::patch::create_patch;
/// use serde_json::json;
///
/// let patch = create_patch(&json!({"age": 30}), &json!({"age": 31}));
/// assert_eq!(patch.0.len(), 1);
/// ```
pub fn create_patch(from: &JsonValue, to: &JsonValue) -> Patch {
    json_patch::diff(from, to)
}

/// Converts a patch to the raw operation list carried by `StateDeltaEvent`.
///
/// Fails on the first operation that does not serialize; operations are
/// never dropped.
pub fn patch_to_vec(patch: &Patch) -> Result<Vec<JsonValue>, PatchError> {
    patch
        .0
        .iter()
        .map(|op| serde_json::to_value(op).map_err(|e| PatchError::Serialization(e.to_string())))
        .collect()
}

/// Builds patches programmatically.
///
/// Pointer syntax errors are collected and reported by [`PatchBuilder::build`].
///
/// ```rust
/// use agui_core::patch::PatchBuilder;
/// use serde_json::json;
///
/// let patch = PatchBuilder::new()
///     .add("/name", json!("Alice"))
///     .replace("/age", json!(31))
///     .remove("/temp")
///     .build()
///     .unwrap();
///
/// assert_eq!(patch.0.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PatchBuilder {
    operations: Vec<PatchOperation>,
    error: Option<PatchError>,
}

impl PatchBuilder {
    /// Creates a new empty patch builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn pointer(&mut self, path: &str) -> PointerBuf {
        match PointerBuf::parse(path) {
            Ok(pointer) => pointer,
            Err(e) => {
                self.error.get_or_insert(PatchError::InvalidPointer {
                    path: path.to_string(),
                    reason: e.to_string(),
                });
                PointerBuf::default()
            }
        }
    }

    /// Adds an "add" operation.
    pub fn add(mut self, path: impl AsRef<str>, value: JsonValue) -> Self {
        let path = self.pointer(path.as_ref());
        self.operations.push(PatchOperation::Add(AddOperation { path, value }));
        self
    }

    /// Adds a "remove" operation.
    pub fn remove(mut self, path: impl AsRef<str>) -> Self {
        let path = self.pointer(path.as_ref());
        self.operations.push(PatchOperation::Remove(RemoveOperation { path }));
        self
    }

    /// Adds a "replace" operation.
    pub fn replace(mut self, path: impl AsRef<str>, value: JsonValue) -> Self {
        let path = self.pointer(path.as_ref());
        self.operations
            .push(PatchOperation::Replace(ReplaceOperation { path, value }));
        self
    }

    /// Adds a "move" operation.
    pub fn move_value(mut self, from: impl AsRef<str>, path: impl AsRef<str>) -> Self {
        let from = self.pointer(from.as_ref());
        let path = self.pointer(path.as_ref());
        self.operations.push(PatchOperation::Move(MoveOperation { from, path }));
        self
    }

    /// Adds a "copy" operation.
    pub fn copy(mut self, from: impl AsRef<str>, path: impl AsRef<str>) -> Self {
        let from = self.pointer(from.as_ref());
        let path = self.pointer(path.as_ref());
        self.operations.push(PatchOperation::Copy(CopyOperation { from, path }));
        self
    }

    /// Adds a "test" operation. A failing test aborts the whole patch.
    pub fn test(mut self, path: impl AsRef<str>, value: JsonValue) -> Self {
        let path = self.pointer(path.as_ref());
        self.operations.push(PatchOperation::Test(TestOperation { path, value }));
        self
    }

    /// Builds the patch, failing if any pointer was malformed.
    pub fn build(self) -> Result<Patch, PatchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Patch(self.operations)),
        }
    }

    /// Builds the patch as the raw operation list used by `StateDeltaEvent`.
    pub fn build_vec(self) -> Result<Vec<JsonValue>, PatchError> {
        patch_to_vec(&self.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_delta_in_array_order() {
        let state = json!({"a": 1});
        let delta = vec![
            json!({"op": "add", "path": "/b", "value": 2}),
            json!({"op": "remove", "path": "/a"}),
        ];

        assert_eq!(apply_delta(&state, &delta).unwrap(), json!({"b": 2}));
        assert_eq!(state, json!({"a": 1}));
    }

    #[test]
    fn test_apply_delta_order_matters() {
        let state = json!({"list": []});
        let delta = vec![
            json!({"op": "add", "path": "/list/-", "value": "x"}),
            json!({"op": "add", "path": "/list/0", "value": "y"}),
        ];
        assert_eq!(apply_delta(&state, &delta).unwrap(), json!({"list": ["y", "x"]}));
    }

    #[test]
    fn test_apply_delta_failure_reports_apply_error() {
        let state = json!({"a": 1});
        let delta = vec![
            json!({"op": "add", "path": "/b", "value": 2}),
            json!({"op": "remove", "path": "/missing"}),
        ];

        let err = apply_delta(&state, &delta).unwrap_err();
        assert!(matches!(err, PatchError::Apply(_)));
    }

    #[test]
    fn test_apply_patch_reverts_on_failure() {
        let mut state = json!({"a": 1});
        let patch = PatchBuilder::new()
            .add("/b", json!(2))
            .remove("/missing")
            .build()
            .unwrap();

        assert!(apply_patch(&mut state, &patch).is_err());
        assert_eq!(state, json!({"a": 1}));
    }

    #[test]
    fn test_parse_patch_rejects_unknown_op() {
        let err = parse_patch(&[json!({"op": "frobnicate", "path": "/a"})]).unwrap_err();
        assert!(matches!(err, PatchError::InvalidFormat(_)));
    }

    #[test]
    fn test_create_patch_round_trip() {
        let from = json!({"user": {"settings": {"theme": "light"}}, "items": ["a"]});
        let to = json!({"user": {"settings": {"theme": "dark", "beta": true}}, "items": ["a", "b"]});

        let ops = patch_to_vec(&create_patch(&from, &to)).unwrap();
        assert_eq!(apply_delta(&from, &ops).unwrap(), to);
    }

    #[test]
    fn test_identical_states_produce_empty_patch() {
        let state = json!({"count": 0});
        assert!(create_patch(&state, &state).0.is_empty());
    }

    #[test]
    fn test_builder_operations() {
        let ops = PatchBuilder::new()
            .test("/count", json!(0))
            .replace("/count", json!(1))
            .copy("/count", "/copy")
            .move_value("/old", "/new")
            .build_vec()
            .unwrap();

        let state = json!({"count": 0, "old": "v"});
        assert_eq!(
            apply_delta(&state, &ops).unwrap(),
            json!({"count": 1, "copy": 1, "new": "v"})
        );
    }

    #[test]
    fn test_builder_reports_bad_pointer() {
        let err = PatchBuilder::new().add("no-leading-slash", json!(1)).build().unwrap_err();
        assert!(matches!(err, PatchError::InvalidPointer { .. }));
    }

    #[test]
    fn test_patch_to_vec_keeps_every_operation() {
        let patch = PatchBuilder::new()
            .add("/a", json!(1))
            .remove("/b")
            .replace("/c", json!(null))
            .move_value("/d", "/e")
            .copy("/e", "/f")
            .test("/g", json!([1, 2]))
            .build()
            .unwrap();

        let ops = patch_to_vec(&patch).unwrap();
        let kinds: Vec<_> = ops.iter().map(|op| op["op"].as_str().unwrap()).collect();
        assert_eq!(kinds, ["add", "remove", "replace", "move", "copy", "test"]);
        assert_eq!(ops[2], json!({"op": "replace", "path": "/c", "value": null}));
        assert_eq!(parse_patch(&ops).unwrap(), patch);
    }
}
