// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

use crate::error::{ObfuscateError, Result};
use std::collections::{BTreeSet, HashSet};

/// Map sensitive field names to their column positions in `header`.
///
/// A name repeated in the header contributes every position it occupies.
/// Fails with `UnknownField` listing every requested name the header lacks,
/// in request order, so nothing is masked unless all fields resolve.
pub fn resolve_indices<S: AsRef<str>>(header: &[S], sensitive: &[S]) -> Result<BTreeSet<usize>> {
    let wanted: HashSet<&str> = sensitive.iter().map(AsRef::as_ref).collect();
    let mut found: HashSet<&str> = HashSet::with_capacity(wanted.len());
    let mut indices = BTreeSet::new();

    for (idx, name) in header.iter().enumerate() {
        let name = name.as_ref();
        if wanted.contains(name) {
            indices.insert(idx);
            found.insert(name);
        }
    }

    let mut seen = HashSet::new();
    let missing: Vec<String> = sensitive
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !found.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(ObfuscateError::UnknownField(missing))
    }
}
