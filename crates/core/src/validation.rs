//! Field-keyed validation results returned with `422 Unprocessable Entity`.
//!
//! Validation messages may carry a validator key in front of the text,
//! separated by [`VALIDATOR_KEY_DELIMITER`]:
//!
//! ```text
//! "required|A tour name is required."  -> key "required", message "A tour name is required."
//! "A tour name is required."           -> no key,         message unchanged
//! ```
//!
//! Field keys compare case-insensitively; the casing of the first insertion
//! is the one serialized.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use validator::{ValidationErrors, ValidationErrorsKind};

/// Separates the validator key from the human-readable text.
pub const VALIDATOR_KEY_DELIMITER: char = '|';

/// Key used by `validator` for struct-level (schema) errors.
const SCHEMA_ERRORS_KEY: &str = "__all__";

/// One shaped validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_key: Option<String>,
    pub message: String,
}

impl ValidationErrorItem {
    /// Shape a raw message, splitting off the validator key at the first `|`.
    pub fn from_message(raw: &str) -> Self {
        match raw.split_once(VALIDATOR_KEY_DELIMITER) {
            Some((key, message)) => Self {
                validator_key: Some(key.to_string()),
                message: message.to_string(),
            },
            None => Self {
                validator_key: None,
                message: raw.to_string(),
            },
        }
    }
}

/// Ordered, case-insensitive map from field key to its errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    // Lowercased key -> (display key, errors).
    fields: IndexMap<String, (String, Vec<ValidationErrorItem>)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape `validator` errors. Struct-level errors are keyed by `object_key`.
    ///
    /// `validator` stores errors in a hash map, so field keys are visited in
    /// sorted order to keep the output deterministic.
    pub fn from_validation_errors(errors: &ValidationErrors, object_key: &str) -> Self {
        let mut result = Self::new();
        result.collect(errors, None, object_key);
        result
    }

    fn collect(&mut self, errors: &ValidationErrors, prefix: Option<&str>, object_key: &str) {
        let mut entries: Vec<_> = errors.errors().iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (field, kind) in entries {
            let field: &str = field.as_ref();
            let path = match (prefix, field) {
                (None, SCHEMA_ERRORS_KEY) => object_key.to_string(),
                (Some(prefix), SCHEMA_ERRORS_KEY) => prefix.to_string(),
                (None, field) => field.to_string(),
                (Some(prefix), field) => format!("{prefix}.{field}"),
            };

            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let item = match &error.message {
                            Some(message) => ValidationErrorItem::from_message(message),
                            None => ValidationErrorItem {
                                validator_key: Some(error.code.to_string()),
                                message: format!("The value of '{path}' is invalid."),
                            },
                        };
                        self.push(&path, item);
                    }
                }
                ValidationErrorsKind::Struct(nested) => {
                    self.collect(nested, Some(&path), object_key);
                }
                ValidationErrorsKind::List(items) => {
                    for (index, nested) in items {
                        let item_path = format!("{path}[{index}]");
                        self.collect(nested, Some(&item_path), object_key);
                    }
                }
            }
        }
    }

    /// Append an error under `field`, merging case-insensitively.
    pub fn push(&mut self, field: &str, item: ValidationErrorItem) {
        self.fields
            .entry(field.to_lowercase())
            .or_insert_with(|| (field.to_string(), Vec::new()))
            .1
            .push(item);
    }

    /// Append a raw `code|text` message under `field`.
    pub fn add_message(&mut self, field: &str, raw: &str) {
        self.push(field, ValidationErrorItem::from_message(raw));
    }

    /// Move every error of `other` into `self`, preserving order.
    pub fn merge(&mut self, other: ValidationResult) {
        for (_, (field, items)) in other.fields {
            for item in items {
                self.push(&field, item);
            }
        }
    }

    pub fn get(&self, field: &str) -> Option<&[ValidationErrorItem]> {
        self.fields
            .get(&field.to_lowercase())
            .map(|(_, items)| items.as_slice())
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains_key(&field.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field keys in insertion order, with their original casing.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|(field, _)| field.as_str())
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, items) in self.fields.values() {
            map.serialize_entry(field, items)?;
        }
        map.end()
    }
}
