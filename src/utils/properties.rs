//! Reading and writing `key=value` properties files
//!
//! The format follows the usual Java-style properties conventions: `#` and `!`
//! start comment lines, a key ends at the first unescaped `=`, `:` or
//! whitespace, and backslash escapes protect separators, comment markers,
//! leading spaces and control characters. Files are written as UTF-8.

use crate::error::{PropwizardError, Result};
use std::collections::BTreeMap;
use std::path::Path;

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn escape(text: &str, escape_all_spaces: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if escape_all_spaces || i == 0 => escaped.push_str("\\ "),
            '\\' => escaped.push_str("\\\\"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\x0c' => escaped.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape a key so it survives a round trip through [`parse_properties`]
pub fn escape_key(key: &str) -> String {
    escape(key, true)
}

/// Escape a value so it survives a round trip through [`parse_properties`]
pub fn escape_value(value: &str) -> String {
    escape(value, false)
}

/// Render entries as a properties document
///
/// Each header line becomes a `#` comment at the top of the document.
pub fn render_properties<'a, I>(entries: I, header: &[String]) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut out = String::new();
    for line in header.iter().flat_map(|h| h.lines()) {
        out.push('#');
        out.push_str(line);
        out.push('\n');
    }

    for (key, value) in entries {
        out.push_str(&escape_key(key));
        out.push('=');
        out.push_str(&escape_value(value));
        out.push('\n');
    }
    out
}

/// Timestamp comment in the conventional properties-file style
pub fn header_timestamp() -> String {
    chrono::Utc::now()
        .format("%a %b %d %H:%M:%S UTC %Y")
        .to_string()
}

fn unescape(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        PropwizardError::serialization(format!(
                            "Malformed \\uXXXX encoding: \\u{hex}"
                        ))
                    })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Whether `line` ends in a continuation backslash (an odd run of them)
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split one logical line into its raw (still escaped) key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' {
            key_end = i;
            value_start = i + c.len_utf8();
            has_separator = true;
            break;
        } else if is_whitespace(c) {
            key_end = i;
            value_start = i + c.len_utf8();
            break;
        }
    }

    let rest = &line[value_start..];
    let mut skip = rest.len();
    for (i, c) in rest.char_indices() {
        if is_whitespace(c) {
            continue;
        }
        if !has_separator && (c == '=' || c == ':') {
            has_separator = true;
            continue;
        }
        skip = i;
        break;
    }

    (&line[..key_end], &rest[skip..])
}

/// Parse a properties document into key/value pairs
///
/// Later duplicates of a key replace earlier ones.
pub fn parse_properties(content: &str) -> Result<BTreeMap<String, String>> {
    let mut entries = BTreeMap::new();
    let mut lines = content.lines();

    while let Some(physical) = lines.next() {
        let line = physical.trim_start_matches(is_whitespace);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start_matches(is_whitespace)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key)?, unescape(value)?);
    }

    Ok(entries)
}

/// Read and parse a properties file
pub fn read_properties(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path)?;
    parse_properties(&content)
}
