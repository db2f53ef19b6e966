// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Validation of JSON input against the shapes the converters expect.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{path}: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: &'static str },
    #[error("{path}: unknown field `{field}`")]
    UnknownField { path: String, field: String },
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Join a JSON path and a key, using `$` for the document root.
pub fn join_path(path: &str, key: &str) -> String {
    if path == "$" {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| ValidationError::WrongType {
        path: path.to_string(),
        expected: "an object",
        found: type_name(value),
    })
}

pub fn expect_string(value: &Value, path: &str) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        _ => Err(ValidationError::WrongType {
            path: path.to_string(),
            expected: "a string",
            found: type_name(value),
        }),
    }
}

pub fn required_string(
    object: &Map<String, Value>,
    path: &str,
    field: &'static str,
) -> Result<String> {
    let value = object.get(field).ok_or_else(|| ValidationError::MissingField {
        path: path.to_string(),
        field,
    })?;
    expect_string(value, &join_path(path, field))
}

pub fn optional_string(
    object: &Map<String, Value>,
    path: &str,
    field: &'static str,
) -> Result<Option<String>> {
    object
        .get(field)
        .map(|value| expect_string(value, &join_path(path, field)))
        .transpose()
}

/// Reject any field of `object` not listed in `allowed`.
pub fn deny_unknown_fields(
    object: &Map<String, Value>,
    path: &str,
    allowed: &[&str],
) -> Result<()> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(field) => Err(ValidationError::UnknownField {
            path: path.to_string(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}
