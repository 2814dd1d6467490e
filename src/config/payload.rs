use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
use url::form_urlencoded;

use crate::error::{AppError, AppResult, ConfigError};

/// Key/value request payload, form-encoded into each request body.
///
/// Keys are kept sorted so the encoded body is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: BTreeMap<String, String>,
}

impl FormPayload {
    #[must_use]
    pub const fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Encodes the payload as `application/x-www-form-urlencoded`, with
    /// `sequence_field` (when set) carrying the request index.
    #[must_use]
    pub fn encode_with_sequence(&self, sequence_field: Option<&str>, index: u64) -> String {
        match sequence_field {
            None => encode_pairs(&self.fields),
            Some(field) => {
                let mut fields = self.fields.clone();
                fields.insert(field.to_owned(), index.to_string());
                encode_pairs(&fields)
            }
        }
    }
}

fn encode_pairs(fields: &BTreeMap<String, String>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter())
        .finish()
}

/// Reads a JSON object template and flattens its scalar values into a payload.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not a JSON object, or
/// contains nested or null values.
pub fn load_payload(path: &Path) -> AppResult<FormPayload> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadPayload {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|err| {
        AppError::config(ConfigError::ParsePayload {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let Value::Object(object) = value else {
        return Err(AppError::config(ConfigError::PayloadNotObject {
            path: path.to_path_buf(),
        }));
    };

    let mut fields = BTreeMap::new();
    for (key, value) in object {
        let text = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                return Err(AppError::config(ConfigError::PayloadFieldNotScalar {
                    field: key,
                }));
            }
        };
        fields.insert(key, text);
    }
    Ok(FormPayload::new(fields))
}
