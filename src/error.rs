// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! Error taxonomy shared by the dispatcher, the address resolver and the
//! format obfuscators.  Every failure is fatal to one invocation and is
//! handed back to the caller untouched.

use crate::storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ObfuscateError>;

#[derive(Error, Debug)]
pub enum ObfuscateError {
    /// The invocation payload has the wrong shape.  Carries every violated
    /// constraint, in the order they were checked.
    #[error("Invalid request: {}", .0.join("; "))]
    InvalidRequest(Vec<String>),

    #[error("Invalid S3 URI: {0}")]
    InvalidAddress(String),

    #[error("S3 URI must include bucket and key: {0}")]
    MalformedAddress(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Sensitive fields that could not be located.  Delimited data reports
    /// every unmatched header at once; record data reports the first miss.
    #[error("{}", unknown_field_message(.0))]
    UnknownField(Vec<String>),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl ObfuscateError {
    /// Convenience for the per-record check, which always names one field.
    pub fn unknown_field(name: &str) -> Self {
        ObfuscateError::UnknownField(vec![name.to_string()])
    }
}

fn unknown_field_message(fields: &[String]) -> String {
    match fields {
        [single] => format!("The pii_field '{single}' not found in headers."),
        many => format!("The pii_fields '{}' not found in headers.", many.join(", ")),
    }
}

impl From<serde_json::Error> for ObfuscateError {
    fn from(err: serde_json::Error) -> Self {
        ObfuscateError::MalformedDocument(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ObfuscateError {
    fn from(err: std::str::Utf8Error) -> Self {
        ObfuscateError::MalformedDocument(format!("input is not valid UTF-8: {err}"))
    }
}
