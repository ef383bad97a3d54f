use std::path::{Path, PathBuf};

pub mod utils;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Options for directory creation.
///
/// * `recursive` - create missing parents too; an already existing directory is
///   not an error in this mode.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DirOptions {
    pub recursive: bool,
}

impl DirOptions {
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

/// The filesystem collaborator used by [`crate::FileEditor`].
///
/// Paths are *inner* paths: absolute ones are resolved against the backend root,
/// relative ones against `/`. Every method is a single step with no atomicity
/// guarantees beyond what the storage itself provides.
pub trait FsBackend {
    /// Returns the root path of the backend.
    fn root(&self) -> &Path;

    /// Maps an inner path onto the backend root.
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf>;

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool;

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool>;

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool>;

    /// Reads the entire contents of a file.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>>;

    /// Replaces the entire contents of a file, creating it if needed.
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()>;

    /// Appends bytes to the end of a file, creating it if needed.
    fn append<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()>;

    fn mkdir<P: AsRef<Path>>(&mut self, path: P, options: DirOptions) -> Result<()>;

    /// Creates a file (truncating an existing one). The parent must exist.
    fn mkfile<P: AsRef<Path>>(&mut self, path: P, content: Option<&[u8]>) -> Result<()>;

    /// Copies a single file, overwriting `dest`.
    fn copy<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, src: P, dest: Q) -> Result<()>;

    fn rename<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, from: P, to: Q) -> Result<()>;

    /// Removes a file, or a directory with all of its contents.
    fn rm<P: AsRef<Path>>(&mut self, path: P) -> Result<()>;

    /// Returns the size of a file in bytes. Directories are an error.
    fn size<P: AsRef<Path>>(&self, path: P) -> Result<u64>;

    /// Names of the regular files directly inside `dir`, sorted.
    fn ls_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>>;

    /// Names of the directories directly inside `dir`, sorted.
    fn ls_dirs<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>>;
}
