//! `{KEY}` placeholders filled from `KEY=VALUE` env files, as used by scaffolding templates.

use std::collections::BTreeMap;

use regex::{NoExpand, Regex};

use crate::error::EditError;

/// File name that holds the values and is never rewritten itself.
pub const ENV_FILE: &str = ".env";

/// Parses `KEY=VALUE` lines.
///
/// Each line is split at its first `=`, so values may contain `=`. Key and value are trimmed.
/// Blank lines and lines starting with `#` are skipped. An empty value is kept as is.
/// A line without `=` or with an empty key fails with [`EditError::InvalidEnvLine`].
pub fn parse_env(text: &str) -> Result<BTreeMap<String, String>, EditError> {
    let mut vars = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => (key.trim(), value.trim()),
            _ => {
                return Err(EditError::InvalidEnvLine {
                    line: index + 1,
                    text: line.to_string(),
                });
            }
        };
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

/// Replaces every `{KEY}` in `content` with its value.
///
/// Keys are matched literally (regex metacharacters in a key are escaped) and values are
/// inserted verbatim. Keys are applied in sorted order.
pub fn fill(content: &str, vars: &BTreeMap<String, String>) -> Result<String, EditError> {
    let mut result = content.to_string();
    for (key, value) in vars {
        let regex = Regex::new(&format!(r"\{{{}\}}", regex::escape(key)))?;
        if regex.is_match(&result) {
            result = regex.replace_all(&result, NoExpand(value)).into_owned();
        }
    }
    Ok(result)
}
