//! Upload request model
//!
//! [`UploadRequest`] is the validated form of the command-line options. The
//! multipart fields are derived from it with [`UploadRequest::payload`], which
//! builds a new [`Payload`] and leaves the request untouched.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::config::defaults::{CHANGELOG_FIELD, PRODUCT_ID_FIELD, UPDATE_TYPE_FIELD};
use crate::error::{CliError, Result};

/// Classification of the published change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateType {
    /// Minor update of an existing listing
    #[default]
    UpdateMin,
    /// Major update of an existing listing
    UpdateMaj,
    /// New listing
    New,
}

impl UpdateType {
    /// All accepted values, in display order
    pub const ALL: [Self; 3] = [Self::UpdateMin, Self::UpdateMaj, Self::New];

    /// Name used on the command line and on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpdateMin => "updatemin",
            Self::UpdateMaj => "updatemaj",
            Self::New => "new",
        }
    }

    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateType {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CliError::InvalidUpdateType {
                value: s.to_string(),
                allowed: Self::allowed(),
            })
    }
}

/// Product description loaded from the metadata JSON file
///
/// Always a non-empty object whose values are scalars. Key order follows the
/// file.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Parse and check the metadata file content
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidMetadataJson`] if the text is not JSON, is not
    /// an object, is empty, or holds an array or object value.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| CliError::InvalidMetadataJson(format!("JSON syntax error: {e}")))?;

        let Value::Object(map) = value else {
            return Err(CliError::InvalidMetadataJson(
                "expected a JSON object".to_string(),
            ));
        };
        if map.is_empty() {
            return Err(CliError::InvalidMetadataJson(
                "the object has no fields".to_string(),
            ));
        }
        if let Some((key, _)) = map
            .iter()
            .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
        {
            return Err(CliError::InvalidMetadataJson(format!(
                "field \"{key}\" must be a string, number or boolean"
            )));
        }

        Ok(Self(map))
    }

    /// Value of a metadata field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no fields; never true once parsed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields in file order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Render a scalar JSON value the way form fields carry it
///
/// Strings are sent raw, `true` as `1`, `false` and `null` as an empty string.
#[must_use]
pub fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Form fields sent alongside the archive, in order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Payload {
    fields: Vec<(String, String)>,
}

impl Payload {
    /// Fields in the order they are sent
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Copy of this payload with `key` set; an existing key keeps its position
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key.to_string(), value)),
        }
        self
    }
}

/// A validated upload, ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Product description
    pub metadata: Metadata,
    /// Changelog text of the uploaded version
    pub changelog: String,
    /// Kind of change
    pub update_type: UpdateType,
    /// Archive to upload; existed and was readable at validation time
    pub archive_path: PathBuf,
}

impl UploadRequest {
    /// Build the form fields: metadata, then update type, then changelog
    #[must_use]
    pub fn payload(&self) -> Payload {
        let base = Payload {
            fields: self
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), form_value(v)))
                .collect(),
        };
        base.with(UPDATE_TYPE_FIELD, self.update_type.as_str())
            .with(CHANGELOG_FIELD, self.changelog.clone())
    }

    /// Product number from the `id_product` metadata field
    #[must_use]
    pub fn product_id(&self) -> Option<u64> {
        match self.metadata.get(PRODUCT_ID_FIELD)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
