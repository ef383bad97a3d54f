//! What to look for inside a file: a literal substring or a regular expression.

use std::fmt;

use regex::Regex;

use crate::error::EditError;

/// A search target.
///
/// `Pattern::all` only matters for replacement: insert operations always use the first
/// occurrence of any target.
#[derive(Debug, Clone)]
pub enum MatchTarget {
    Literal(String),
    Pattern { regex: Regex, all: bool },
}

/// Position of a match: byte offset into the text and byte length of the matched text.
/// Both always fall on character boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub len: usize,
}

impl Location {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

impl MatchTarget {
    pub fn literal<S: Into<String>>(text: S) -> Self {
        MatchTarget::Literal(text.into())
    }

    /// Compiles `src` as a pattern that replaces only its first occurrence.
    pub fn pattern(src: &str) -> Result<Self, EditError> {
        Ok(MatchTarget::Pattern {
            regex: Regex::new(src)?,
            all: false,
        })
    }

    /// Compiles `src` as a pattern that replaces every occurrence.
    pub fn pattern_all(src: &str) -> Result<Self, EditError> {
        Ok(MatchTarget::Pattern {
            regex: Regex::new(src)?,
            all: true,
        })
    }

    /// First occurrence of the target in `content`.
    pub fn find(&self, content: &str) -> Option<Location> {
        match self {
            MatchTarget::Literal(text) => content.find(text.as_str()).map(|offset| Location {
                offset,
                len: text.len(),
            }),
            MatchTarget::Pattern { regex, .. } => regex.find(content).map(|m| Location {
                offset: m.start(),
                len: m.len(),
            }),
        }
    }

    pub fn is_match(&self, content: &str) -> bool {
        match self {
            MatchTarget::Literal(text) => content.contains(text.as_str()),
            MatchTarget::Pattern { regex, .. } => regex.is_match(content),
        }
    }
}

impl From<&str> for MatchTarget {
    fn from(text: &str) -> Self {
        MatchTarget::literal(text)
    }
}

impl From<String> for MatchTarget {
    fn from(text: String) -> Self {
        MatchTarget::Literal(text)
    }
}

impl From<Regex> for MatchTarget {
    fn from(regex: Regex) -> Self {
        MatchTarget::Pattern { regex, all: false }
    }
}

impl fmt::Display for MatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTarget::Literal(text) => write!(f, "{:?}", text),
            MatchTarget::Pattern { regex, all: false } => write!(f, "/{}/", regex.as_str()),
            MatchTarget::Pattern { regex, all: true } => write!(f, "/{}/g", regex.as_str()),
        }
    }
}
