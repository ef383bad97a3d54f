//! Small synchronous helpers for scripting and scaffolding code: whole-file reads and writes,
//! search-and-replace, and text insertion relative to a located match.
//!
//! ### Overview
//!
//! `fsedit-kit` splits the work into two layers:
//! - **Splicing** (`splice`): pure functions over `&str` that locate a [`MatchTarget`] (a literal
//!   substring or a regular expression) and insert text around it or replace it.
//! - **Files** ([`FileEditor`]): reads a whole file through an [`FsBackend`], splices it and
//!   writes it back, plus one-call helpers for copying, moving, creating, deleting and listing.
//! - **Templates** (`placeholders`): `KEY=VALUE` env files and `{KEY}` substitution across a
//!   directory tree.
//!
//! **Key ideas**:
//! - **Injection**: the filesystem is a parameter. [`DirFS`] works on a real directory,
//!   [`MapFS`] keeps everything in memory for tests and dry runs.
//! - **Whole files**: content is read entirely and written back entirely; nothing is streamed.
//! - **Loud failures**: inserting around a missing target is an error ([`EditError::MatchNotFound`])
//!   and the file is left untouched. Host I/O errors are propagated unchanged.
//!
//! There is no locking: a concurrent writer between the read and the write of an edit can lose
//! its update.

mod core;
mod editor;
mod error;
mod target;
mod vfs;

pub mod placeholders;
pub mod splice;

pub use crate::core::{DirOptions, FsBackend, Result};
pub use editor::FileEditor;
pub use error::EditError;
pub use target::{Location, MatchTarget};
pub use vfs::{DirFS, Entry, EntryType, MapFS};
