//! Pure text splicing: locate a target inside a text blob and build a new blob with text
//! inserted around it, or with the target replaced.
//!
//! Every function takes the whole content and returns a new `String`; nothing here touches a
//! filesystem. Insert operations only ever use the first occurrence of their target.

use std::borrow::Cow;

use log::warn;

use crate::error::EditError;
use crate::target::{Location, MatchTarget};

/// Offset and length of the first occurrence of `target` in `content`.
///
/// An empty literal matches at offset 0.
pub fn locate(content: &str, target: &MatchTarget) -> Option<Location> {
    target.find(content)
}

fn splice_at(content: &str, offset: usize, text: &str) -> String {
    let mut result = String::with_capacity(content.len() + text.len());
    result.push_str(&content[..offset]);
    result.push_str(text);
    result.push_str(&content[offset..]);
    result
}

fn locate_or_fail(content: &str, target: &MatchTarget) -> Result<Location, EditError> {
    locate(content, target).ok_or_else(|| EditError::MatchNotFound {
        target: target.to_string(),
    })
}

/// Inserts `text` immediately before the first occurrence of `target`.
///
/// Fails with [`EditError::MatchNotFound`] if `target` does not occur.
pub fn insert_before(content: &str, text: &str, target: &MatchTarget) -> Result<String, EditError> {
    let location = locate_or_fail(content, target)?;
    Ok(splice_at(content, location.offset, text))
}

/// Inserts `text` immediately after the end of the first occurrence of `target`.
///
/// Fails with [`EditError::MatchNotFound`] if `target` does not occur.
pub fn insert_after(content: &str, text: &str, target: &MatchTarget) -> Result<String, EditError> {
    let location = locate_or_fail(content, target)?;
    Ok(splice_at(content, location.end(), text))
}

/// Puts `text` at the start of `content`, or right after `anchor` when one is given and found.
///
/// Unlike [`insert_after`], a missing anchor is not an error: the text silently goes to the
/// start of the content.
pub fn prepend(content: &str, text: &str, anchor: Option<&str>) -> String {
    let offset = match anchor {
        None => 0,
        Some(anchor) => match content.find(anchor) {
            Some(offset) => offset + anchor.len(),
            None => {
                warn!("anchor {:?} not found, prepending at the start", anchor);
                0
            }
        },
    };
    splice_at(content, offset, text)
}

/// Puts `text` at the very end of `content`.
pub fn append(content: &str, text: &str) -> String {
    let mut result = String::with_capacity(content.len() + text.len());
    result.push_str(content);
    result.push_str(text);
    result
}

/// Rewrites a `$`-template for the `regex` crate.
///
/// `$1x` is group 1 followed by `x` (the `regex` crate would read a group named `1x`), `$&` is
/// the whole match, `$$` and any other `$` stay a literal dollar. `${name}` is passed through.
fn pattern_template(replacement: &str) -> Cow<'_, str> {
    if !replacement.contains('$') {
        return Cow::Borrowed(replacement);
    }
    let mut chars = replacement.chars().peekable();
    let mut template = String::with_capacity(replacement.len() + 8);

    while let Some(ch) = chars.next() {
        if ch != '$' {
            template.push(ch);
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
                template.push_str("${0}");
            }
            Some('{') => template.push('$'),
            Some(next) if next.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&digit) = chars.peek() {
                    if !digit.is_ascii_digit() {
                        break;
                    }
                    digits.push(digit);
                    chars.next();
                }
                template.push_str("${");
                template.push_str(&digits);
                template.push('}');
            }
            Some('$') => {
                chars.next();
                template.push_str("$$");
            }
            _ => template.push_str("$$"),
        }
    }
    Cow::Owned(template)
}

/// Expands `$$`, `$&`, `` $` `` and `$'` in a replacement for a literal match at `location`.
/// Any other `$` is kept as is.
fn literal_template(replacement: &str, content: &str, location: Location) -> String {
    let mut chars = replacement.chars().peekable();
    let mut result = String::with_capacity(replacement.len());

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }
        let expansion = match chars.peek() {
            Some('$') => "$",
            Some('&') => &content[location.offset..location.end()],
            Some('`') => &content[..location.offset],
            Some('\'') => &content[location.end()..],
            _ => {
                result.push('$');
                continue;
            }
        };
        chars.next();
        result.push_str(expansion);
    }
    result
}

/// Replaces occurrences of `target` with `replacement`.
///
/// * literal target - only the first occurrence.
/// * pattern target - the first occurrence, or all non-overlapping ones when the pattern was
///   built with `all`.
///
/// `replacement` follows JavaScript `String.prototype.replace` templates: `$$` is a dollar,
/// `$&` the matched text, and for literals `` $` `` / `$'` the text before / after the match.
/// Patterns also take `$1` (so `$1x` is group 1 then `x`) and `${name}`.
///
/// Content without an occurrence is returned unchanged.
pub fn replace(content: &str, target: &MatchTarget, replacement: &str) -> String {
    match target {
        MatchTarget::Literal(_) => match locate(content, target) {
            Some(location) => {
                let text = literal_template(replacement, content, location);
                let mut result = String::with_capacity(content.len() + text.len());
                result.push_str(&content[..location.offset]);
                result.push_str(&text);
                result.push_str(&content[location.end()..]);
                result
            }
            None => content.to_string(),
        },
        MatchTarget::Pattern { regex, all: true } => regex
            .replace_all(content, pattern_template(replacement).as_ref())
            .into_owned(),
        MatchTarget::Pattern { regex, all: false } => regex
            .replace(content, pattern_template(replacement).as_ref())
            .into_owned(),
    }
}

/// Whether `target` occurs anywhere in `content`.
pub fn contains_match(content: &str, target: &MatchTarget) -> bool {
    target.is_match(content)
}
