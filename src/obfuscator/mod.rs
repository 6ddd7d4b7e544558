// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

pub mod delimited;
pub mod fields;
pub mod format;
pub mod masker;

pub use format::Format;

/// Replacement written over every sensitive value, whatever its original type.
pub const MASK_TOKEN: &str = "***";

/// Comma-separated list of the suffixes we know how to obfuscate.
pub fn supported_formats() -> String {
    Format::all()
        .map(|format| format!("{} ({format})", format.suffix()))
        .collect::<Vec<_>>()
        .join(", ")
}
