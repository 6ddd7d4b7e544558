// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

use super::MASK_TOKEN;
use crate::error::{ObfuscateError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Replace the value at each index with the mask token.  Indices come from
/// the header of the same file; the caller rejects rows too short for them.
pub fn mask_row(mut row: Vec<String>, indices: &BTreeSet<usize>) -> Vec<String> {
    for &idx in indices {
        if let Some(value) = row.get_mut(idx) {
            *value = MASK_TOKEN.to_string();
        }
    }
    row
}

/// Mask every sensitive key of one record.  Records share no header, so a
/// key missing from this record fails the whole run, naming that key.
pub fn mask_record<S: AsRef<str>>(record: &mut Map<String, Value>, sensitive: &[S]) -> Result<()> {
    for field in sensitive {
        let field = field.as_ref();
        let value = record
            .get_mut(field)
            .ok_or_else(|| ObfuscateError::unknown_field(field))?;
        *value = Value::String(MASK_TOKEN.to_string());
    }
    Ok(())
}
