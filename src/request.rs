// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! The invocation payload: which object to fetch and which fields to mask.

use crate::error::{ObfuscateError, Result};
use crate::obfuscator::format::kind_of;
use serde::Deserialize;
use serde_json::Value;

const FILE_KEY: &str = "file_to_obfuscate";
const FIELDS_KEY: &str = "pii_fields";
const KEYS: [&str; 2] = [FILE_KEY, FIELDS_KEY];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObfuscationRequest {
    pub file_to_obfuscate: String,
    pub pii_fields: Vec<String>,
}

impl ObfuscationRequest {
    #[cfg(test)]
    pub fn new(file_to_obfuscate: impl Into<String>, pii_fields: Vec<String>) -> Self {
        Self {
            file_to_obfuscate: file_to_obfuscate.into(),
            pii_fields,
        }
    }

    /// Validate the payload shape in one pass, reporting every violation.
    pub fn from_value(value: &Value) -> Result<Self> {
        let violations = violations(value);
        if !violations.is_empty() {
            return Err(ObfuscateError::InvalidRequest(violations));
        }
        serde_json::from_value(value.clone())
            .map_err(|err| ObfuscateError::InvalidRequest(vec![err.to_string()]))
    }
}

fn violations(value: &Value) -> Vec<String> {
    let Value::Object(map) = value else {
        return vec![format!("request must be an object, found {}", kind_of(value))];
    };

    let mut problems = Vec::new();
    for key in KEYS {
        if !map.contains_key(key) {
            problems.push(format!("missing key '{key}'"));
        }
    }
    for key in map.keys() {
        if !KEYS.contains(&key.as_str()) {
            problems.push(format!("unexpected key '{key}'"));
        }
    }

    if let Some(file) = map.get(FILE_KEY)
        && !file.is_string()
    {
        problems.push(format!("'{FILE_KEY}' must be a string, found {}", kind_of(file)));
    }

    match map.get(FIELDS_KEY) {
        None => {}
        Some(Value::Array(fields)) => {
            for (idx, field) in fields.iter().enumerate() {
                if !field.is_string() {
                    problems.push(format!(
                        "'{FIELDS_KEY}[{idx}]' must be a string, found {}",
                        kind_of(field)
                    ));
                }
            }
        }
        Some(other) => problems.push(format!(
            "'{FIELDS_KEY}' must be a list of strings, found {}",
            kind_of(other)
        )),
    }

    problems
}
