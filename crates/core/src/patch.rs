//! JSON Patch (RFC 6902) application onto typed update shapes.
//!
//! A [`PatchDocument`] is an ordered list of typed operations. [`apply_to`]
//! runs them one at a time against the JSON form of a value. An operation
//! that fails, or that leaves the document in a form that no longer
//! deserializes into the target type, is rolled back and recorded in a
//! [`ValidationResult`] keyed by the first segment of its path. Later
//! operations still run.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::ValidationResult;

/// A single patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    /// Target pointer of the operation.
    pub fn path(&self) -> &str {
        match self {
            Self::Add { path, .. }
            | Self::Remove { path }
            | Self::Replace { path, .. }
            | Self::Move { path, .. }
            | Self::Copy { path, .. }
            | Self::Test { path, .. } => path,
        }
    }
}

/// Ordered list of patch operations, serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

impl PatchDocument {
    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("invalidPath|The path '{0}' is not a valid JSON pointer.")]
    InvalidPointer(String),

    #[error("invalidPath|The target location '{0}' was not found.")]
    PathNotFound(String),

    #[error("invalidPath|The index in '{0}' is out of bounds.")]
    IndexOutOfBounds(String),

    #[error("invalidPath|The root document cannot be removed.")]
    RemoveRoot,

    #[error("invalidPath|'{from}' cannot be moved into its own child '{path}'.")]
    MoveIntoChild { from: String, path: String },

    #[error("testFailed|The value at '{0}' does not match the expected value.")]
    TestFailed(String),

    #[error("invalidValue|The value at '{path}' is not valid: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("The patch target could not be represented as JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of applying a patch document to a typed value.
#[derive(Debug)]
pub struct Patched<T> {
    /// The value after every successful operation.
    pub value: T,
    /// Errors of the operations that were rolled back.
    pub errors: ValidationResult,
}

/// Apply `document` to a copy of `target`.
///
/// Errors for operations whose path has no field segment (e.g. the root)
/// are keyed by `object_key`. Only a failure to convert `target` itself to
/// or from JSON is returned as `Err`.
pub fn apply_to<T>(
    target: &T,
    document: &PatchDocument,
    object_key: &str,
) -> Result<Patched<T>, PatchError>
where
    T: Serialize + DeserializeOwned,
{
    let mut doc = serde_json::to_value(target)?;
    let mut errors = ValidationResult::new();

    for operation in document.operations() {
        let mut candidate = doc.clone();
        let outcome = apply_operation(&mut candidate, operation).and_then(|()| {
            serde_json::from_value::<T>(candidate.clone())
                .map(|_| ())
                .map_err(|err| PatchError::InvalidValue {
                    path: operation.path().to_string(),
                    reason: err.to_string(),
                })
        });

        match outcome {
            Ok(()) => doc = candidate,
            Err(err) => {
                let key = field_key(operation.path()).unwrap_or_else(|| object_key.to_string());
                errors.add_message(&key, &err.to_string());
            }
        }
    }

    let value = serde_json::from_value(doc)?;
    Ok(Patched { value, errors })
}

/// Apply one operation to `doc` in place.
///
/// On error `doc` may be partially modified; callers that need atomicity
/// work on a copy.
pub fn apply_operation(doc: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOperation::Replace { path, value } => {
            let target = lookup_mut(doc, path)?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            if from == path {
                return lookup(doc, from).map(|_| ());
            }
            if path.starts_with(&format!("{from}/")) {
                return Err(PatchError::MoveIntoChild {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = lookup(doc, from)?.clone();
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            if lookup(doc, path)? == value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, token) = split_pointer(path)?;
    match lookup_mut(doc, parent)? {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(&token, items.len(), true, path)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    if path.is_empty() {
        return Err(PatchError::RemoveRoot);
    }
    let (parent, token) = split_pointer(path)?;
    match lookup_mut(doc, parent)? {
        Value::Object(map) => map
            .remove(&token)
            .ok_or_else(|| PatchError::PathNotFound(path.to_string())),
        Value::Array(items) => {
            let index = array_index(&token, items.len(), false, path)?;
            Ok(items.remove(index))
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn lookup<'v>(doc: &'v Value, path: &str) -> Result<&'v Value, PatchError> {
    check_pointer(path)?;
    doc.pointer(path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))
}

fn lookup_mut<'v>(doc: &'v mut Value, path: &str) -> Result<&'v mut Value, PatchError> {
    check_pointer(path)?;
    doc.pointer_mut(path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))
}

/// A pointer is empty (the whole document) or starts with `/`, and every
/// `~` is followed by `0` or `1`.
fn check_pointer(path: &str) -> Result<(), PatchError> {
    if !path.is_empty() && !path.starts_with('/') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return Err(PatchError::InvalidPointer(path.to_string()));
        }
    }
    Ok(())
}

/// Split a non-empty pointer into its parent pointer and unescaped last token.
fn split_pointer(path: &str) -> Result<(&str, String), PatchError> {
    check_pointer(path)?;
    let (parent, last) = path
        .rsplit_once('/')
        .ok_or_else(|| PatchError::InvalidPointer(path.to_string()))?;
    Ok((parent, unescape(last)))
}

fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn array_index(token: &str, len: usize, allow_end: bool, path: &str) -> Result<usize, PatchError> {
    if token == "-" {
        return if allow_end {
            Ok(len)
        } else {
            Err(PatchError::IndexOutOfBounds(path.to_string()))
        };
    }
    let leading_zero = token.len() > 1 && token.starts_with('0');
    let index = token
        .parse::<usize>()
        .ok()
        .filter(|_| !leading_zero && token.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| PatchError::InvalidPointer(path.to_string()))?;

    let limit = if allow_end { len } else { len.saturating_sub(1) };
    if index > limit || (!allow_end && len == 0) {
        return Err(PatchError::IndexOutOfBounds(path.to_string()));
    }
    Ok(index)
}

/// Field an operation's errors are reported under: its first path segment.
fn field_key(path: &str) -> Option<String> {
    path.strip_prefix('/')
        .map(|rest| rest.split('/').next().unwrap_or_default())
        .filter(|segment| !segment.is_empty())
        .map(unescape)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn op(value: Value) -> PatchOperation {
        serde_json::from_value(value).unwrap()
    }

    fn apply(doc: Value, operation: Value) -> Result<Value, PatchError> {
        let mut doc = doc;
        apply_operation(&mut doc, &op(operation))?;
        Ok(doc)
    }

    #[test]
    fn deserializes_typed_operations() {
        let document: PatchDocument = serde_json::from_value(json!([
            { "op": "replace", "path": "/name", "value": "Rust Tour" },
            { "op": "remove", "path": "/description" },
            { "op": "move", "from": "/a", "path": "/b" },
        ]))
        .unwrap();

        assert_eq!(document.operations().len(), 3);
        assert_eq!(
            document.operations()[0],
            PatchOperation::Replace {
                path: "/name".into(),
                value: json!("Rust Tour")
            }
        );
        assert_eq!(document.operations()[2].path(), "/b");
    }

    #[test]
    fn unknown_op_is_rejected() {
        let result: Result<PatchDocument, _> =
            serde_json::from_value(json!([{ "op": "merge", "path": "/a" }]));
        assert!(result.is_err());
    }

    #[test]
    fn add_inserts_member_and_array_items() {
        let doc = json!({ "tags": ["a", "c"] });
        let doc = apply(doc, json!({ "op": "add", "path": "/name", "value": "x" })).unwrap();
        let doc = apply(doc, json!({ "op": "add", "path": "/tags/1", "value": "b" })).unwrap();
        let doc = apply(doc, json!({ "op": "add", "path": "/tags/-", "value": "d" })).unwrap();
        assert_eq!(doc, json!({ "name": "x", "tags": ["a", "b", "c", "d"] }));
    }

    #[test]
    fn add_past_array_end_fails() {
        let result = apply(
            json!({ "tags": [] }),
            json!({ "op": "add", "path": "/tags/2", "value": 1 }),
        );
        assert_matches!(result, Err(PatchError::IndexOutOfBounds(_)));
    }

    #[test]
    fn remove_and_replace_require_existing_target() {
        let doc = json!({ "name": "x" });
        assert_matches!(
            apply(doc.clone(), json!({ "op": "remove", "path": "/missing" })),
            Err(PatchError::PathNotFound(_))
        );
        assert_matches!(
            apply(doc.clone(), json!({ "op": "replace", "path": "/missing", "value": 1 })),
            Err(PatchError::PathNotFound(_))
        );
        assert_eq!(
            apply(doc, json!({ "op": "replace", "path": "/name", "value": "y" })).unwrap(),
            json!({ "name": "y" })
        );
    }

    #[test]
    fn remove_root_fails() {
        assert_matches!(
            apply(json!({}), json!({ "op": "remove", "path": "" })),
            Err(PatchError::RemoveRoot)
        );
    }

    #[test]
    fn move_and_copy() {
        let doc = json!({ "a": 1, "nested": {} });
        let doc = apply(doc, json!({ "op": "copy", "from": "/a", "path": "/nested/a" })).unwrap();
        let doc = apply(doc, json!({ "op": "move", "from": "/a", "path": "/b" })).unwrap();
        assert_eq!(doc, json!({ "b": 1, "nested": { "a": 1 } }));
    }

    #[test]
    fn move_into_own_child_fails() {
        assert_matches!(
            apply(
                json!({ "a": { "b": 1 } }),
                json!({ "op": "move", "from": "/a", "path": "/a/c" })
            ),
            Err(PatchError::MoveIntoChild { .. })
        );
    }

    #[test]
    fn test_operation_compares_values() {
        let doc = json!({ "name": "x" });
        assert!(apply(doc.clone(), json!({ "op": "test", "path": "/name", "value": "x" })).is_ok());
        assert_matches!(
            apply(doc, json!({ "op": "test", "path": "/name", "value": "y" })),
            Err(PatchError::TestFailed(_))
        );
    }

    #[test]
    fn escaped_tokens_are_resolved() {
        let doc = json!({ "a/b": 1, "m~n": 2 });
        let doc = apply(doc, json!({ "op": "replace", "path": "/a~1b", "value": 10 })).unwrap();
        let doc = apply(doc, json!({ "op": "remove", "path": "/m~0n" })).unwrap();
        assert_eq!(doc, json!({ "a/b": 10 }));
    }

    #[test]
    fn malformed_pointer_fails() {
        assert_matches!(
            apply(json!({}), json!({ "op": "add", "path": "name", "value": 1 })),
            Err(PatchError::InvalidPointer(_))
        );
        assert_matches!(
            apply(json!({}), json!({ "op": "add", "path": "/a~2", "value": 1 })),
            Err(PatchError::InvalidPointer(_))
        );
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Shape {
        name: Option<String>,
        size: u32,
    }

    fn patch(ops: Value) -> PatchDocument {
        serde_json::from_value(ops).unwrap()
    }

    #[test]
    fn apply_to_returns_patched_value() {
        let shape = Shape { name: Some("a".into()), size: 1 };
        let patched = apply_to(
            &shape,
            &patch(json!([
                { "op": "replace", "path": "/name", "value": "b" },
                { "op": "replace", "path": "/size", "value": 2 },
            ])),
            "shape",
        )
        .unwrap();

        assert!(patched.errors.is_empty());
        assert_eq!(patched.value, Shape { name: Some("b".into()), size: 2 });
    }

    #[test]
    fn apply_to_rolls_back_failed_operations_and_continues() {
        let shape = Shape { name: Some("a".into()), size: 1 };
        let patched = apply_to(
            &shape,
            &patch(json!([
                { "op": "replace", "path": "/size", "value": "big" },
                { "op": "add", "path": "/colour", "value": "red" },
                { "op": "replace", "path": "/name", "value": "b" },
            ])),
            "shape",
        )
        .unwrap();

        assert_eq!(patched.value, Shape { name: Some("b".into()), size: 1 });
        let size = patched.errors.get("size").unwrap();
        assert_eq!(size[0].validator_key.as_deref(), Some("invalidValue"));
        assert!(patched.errors.contains_key("colour"));
        assert!(!patched.errors.contains_key("name"));
    }

    #[test]
    fn root_errors_use_object_key() {
        let shape = Shape { name: None, size: 1 };
        let patched = apply_to(
            &shape,
            &patch(json!([{ "op": "remove", "path": "" }])),
            "shape",
        )
        .unwrap();

        let errors = patched.errors.get("shape").unwrap();
        assert_eq!(errors[0].message, "The root document cannot be removed.");
    }

    #[test]
    fn remove_of_optional_field_is_rolled_back_when_shape_requires_it() {
        let shape = Shape { name: Some("a".into()), size: 1 };
        let patched = apply_to(
            &shape,
            &patch(json!([{ "op": "remove", "path": "/size" }])),
            "shape",
        )
        .unwrap();
        assert_eq!(patched.value.size, 1);
        assert!(patched.errors.contains_key("size"));
    }
}
