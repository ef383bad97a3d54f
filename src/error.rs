use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the text editing layer.
///
/// File-level operations return them wrapped in `anyhow::Error`; use
/// `err.downcast_ref::<EditError>()` to inspect them.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("match not found: {target}")]
    MatchNotFound { target: String },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("{} is not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },

    #[error("line {line}: expected KEY=VALUE, got {text:?}")]
    InvalidEnvLine { line: usize, text: String },
}
