// SPDX-License-Identifier: AGPL-3.0-only
// SPDX-FileCopyrightText: 2025 Steve Clarke <stephenlclarke@mac.com> - https://xyzzy.tools

//! Comma-delimited row codec.  There is no quoting or escaping: a comma
//! inside a value is indistinguishable from a field boundary.

const DELIMITER: char = ',';
const TERMINATOR: char = '\n';

/// Drop one trailing line terminator (`\n` or `\r\n`), if present.
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix(TERMINATOR))
        .unwrap_or(line)
}

/// Split one line into its ordered field values.
pub fn parse_row(line: &str) -> Vec<String> {
    strip_terminator(line)
        .split(DELIMITER)
        .map(str::to_string)
        .collect()
}

/// The terminator `line` ends with: `\r\n`, `\n`, or empty for a final
/// unterminated line.
pub fn terminator_of(line: &str) -> &str {
    &line[strip_terminator(line).len()..]
}

/// Join values with commas and append exactly one terminator.
pub fn format_row<S: AsRef<str>>(values: &[S]) -> String {
    format_row_with(values, "\n")
}

/// Like `format_row`, but ends the row with `terminator`.
pub fn format_row_with<S: AsRef<str>>(values: &[S], terminator: &str) -> String {
    let mut out = String::new();
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            out.push(DELIMITER);
        }
        out.push_str(value.as_ref());
    }
    out.push_str(terminator);
    out
}
