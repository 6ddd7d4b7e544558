// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

use crate::error::{ObfuscateError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

const SCHEME: &str = "s3://";

/// Bucket is everything up to the first `/`; the key keeps any further `/`.
static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^s3://(?P<bucket>[^/]*)(?:/(?P<key>.*))?$").expect("valid regex"));

/// A resolved object location.  Both parts are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageAddress {
    pub bucket: String,
    pub key: String,
}

/// Split an `s3://bucket/key` URI into its bucket and key.
pub fn resolve(uri: &str) -> Result<StorageAddress> {
    if !uri.starts_with(SCHEME) {
        return Err(ObfuscateError::InvalidAddress(uri.to_string()));
    }

    let malformed = || ObfuscateError::MalformedAddress(uri.to_string());
    let caps = ADDRESS_RE.captures(uri).ok_or_else(malformed)?;
    let bucket = caps.name("bucket").map(|m| m.as_str()).unwrap_or_default();
    let key = caps.name("key").map(|m| m.as_str()).unwrap_or_default();
    if bucket.is_empty() || key.is_empty() {
        return Err(malformed());
    }

    Ok(StorageAddress {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}
