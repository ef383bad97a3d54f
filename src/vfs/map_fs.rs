//! This module provides a filesystem backend that keeps every file and directory in memory.
//! It mirrors the host error behavior closely enough to stand in for [`crate::DirFS`] in tests
//! and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;

use crate::core::{DirOptions, FsBackend, Result, utils};
use crate::{Entry, EntryType};

/// An in-memory filesystem backend.
///
/// ### Internal state
///
/// * `root` - A nominal absolute host path. It has no effect on the backend itself and is only
///   used by `to_host()` to show where the tree would live on disk. Defaults to `/`.
///
/// * `entries` - All files and directories.
///   - Key: inner absolute normalized path (always starts with `/`).
///   - Value: `Entry` with the type and, for files, the content.
///   - `BTreeMap` keeps the iteration deterministic, so listings come out sorted.
///
/// ### Invariants
///
/// 1. **Root existence**: `/` is always present and is a directory.
/// 2. **Path normalization**: all keys are normalized (no `.`, `..` or trailing `/`).
/// 3. **Parent consistency**: for any entry at `/a/b/c` there is a directory entry `/a/b`.
///
/// ### Thread Safety
///
/// Not thread-safe. Wrap it in a `Mutex` at the application level if needed.
///
/// ### Example
///
/// ```
/// use fsedit_kit::{DirOptions, FsBackend, MapFS};
///
/// let mut fs = MapFS::new();
/// fs.mkdir("/docs", DirOptions::default()).unwrap();
/// fs.write("/docs/note.txt", b"Hello").unwrap();
///
/// assert_eq!(fs.read("/docs/note.txt").unwrap(), b"Hello");
/// assert_eq!(fs.ls_files("/docs").unwrap(), vec!["note.txt"]);
/// ```
pub struct MapFS {
    root: PathBuf,                     // host-related absolute path
    entries: BTreeMap<PathBuf, Entry>, // inner absolute normalized paths
}

impl MapFS {
    /// Creates an empty tree containing only the root directory.
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(PathBuf::from("/"), Entry::new(EntryType::Directory));

        Self {
            root: PathBuf::from("/"),
            entries,
        }
    }

    /// Changes the nominal host root.
    /// * `path` must be absolute.
    pub fn set_root<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(anyhow!("root path must be an absolute"));
        }
        self.root = utils::normalize(path);
        Ok(())
    }

    fn entry(&self, inner: &Path) -> Result<&Entry> {
        self.entries
            .get(inner)
            .ok_or_else(|| anyhow!("{} does not exist", inner.display()))
    }

    /// Checks that the parent of `inner` exists and is a directory.
    fn check_parent(&self, inner: &Path) -> Result<()> {
        if let Some(parent) = inner.parent() {
            match self.entries.get(parent) {
                None => return Err(anyhow!("{} does not exist", parent.display())),
                Some(entry) if !entry.is_dir() => {
                    return Err(anyhow!("{} is not a directory", parent.display()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Entries exactly one level below `dir`, filtered by type.
    fn children(&self, dir: &Path, entry_type: EntryType) -> Result<Vec<String>> {
        let inner = utils::to_inner(dir);
        if !self.entry(&inner)?.is_dir() {
            return Err(anyhow!("{} is not a directory", inner.display()));
        }
        Ok(self
            .entries
            .iter()
            .filter(|(path, entry)| {
                entry.entry_type() == entry_type && path.parent() == Some(inner.as_path())
            })
            .filter_map(|(path, _)| utils::file_name(path))
            .collect())
    }

    fn subtree(&self, inner: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|path| path.starts_with(inner))
            .cloned()
            .collect()
    }
}

impl Default for MapFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FsBackend for MapFS {
    fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns a hypothetical host path joining `root` and `inner_path`.
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf> {
        let inner = utils::to_inner(inner_path);
        Ok(self.root.join(inner.strip_prefix("/")?))
    }

    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.entries.contains_key(&utils::to_inner(path))
    }

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(&utils::to_inner(path))?.is_dir())
    }

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        Ok(self.entry(&utils::to_inner(path))?.is_file())
    }

    /// Reads the entire contents of a file.
    ///
    /// Errors if the file does not exist or is a directory.
    /// Returns an empty vector for empty files.
    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let inner = utils::to_inner(path);
        let entry = self.entry(&inner)?;
        if entry.is_dir() {
            return Err(anyhow!("{} is a directory", inner.display()));
        }
        Ok(entry.content().cloned().unwrap_or_default())
    }

    /// Replaces the entire contents of a file. A missing file is created, but its parent
    /// directory must exist.
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        let inner = utils::to_inner(path);
        match self.entries.get_mut(&inner) {
            Some(entry) if entry.is_dir() => {
                Err(anyhow!("{} is a directory", inner.display()))
            }
            Some(entry) => {
                entry.set_content(content);
                Ok(())
            }
            None => {
                self.check_parent(&inner)?;
                self.entries.insert(inner, Entry::file(content));
                Ok(())
            }
        }
    }

    /// Appends bytes to the end of a file. A missing file is created.
    fn append<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        let inner = utils::to_inner(path);
        match self.entries.get_mut(&inner) {
            Some(entry) if entry.is_dir() => {
                Err(anyhow!("{} is a directory", inner.display()))
            }
            Some(entry) => {
                entry.append_content(content);
                Ok(())
            }
            None => {
                self.check_parent(&inner)?;
                self.entries.insert(inner, Entry::file(content));
                Ok(())
            }
        }
    }

    /// Creates a directory.
    ///
    /// Without `recursive` the parent must exist and the directory must not.
    /// With `recursive` all missing parents are created and an existing directory is fine.
    fn mkdir<P: AsRef<Path>>(&mut self, path: P, options: DirOptions) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }
        let inner = utils::to_inner(path);

        if !options.recursive {
            if self.entries.contains_key(&inner) {
                return Err(anyhow!("path already exists: {}", inner.display()));
            }
            self.check_parent(&inner)?;
            self.entries.insert(inner, Entry::new(EntryType::Directory));
            return Ok(());
        }

        let mut built = PathBuf::new();
        for component in inner.components() {
            built.push(component);
            match self.entries.get(&built) {
                Some(entry) if !entry.is_dir() => {
                    return Err(anyhow!("{} is not a directory", built.display()));
                }
                Some(_) => {}
                None => {
                    self.entries
                        .insert(built.clone(), Entry::new(EntryType::Directory));
                }
            }
        }
        Ok(())
    }

    fn mkfile<P: AsRef<Path>>(&mut self, path: P, content: Option<&[u8]>) -> Result<()> {
        self.write(path, content.unwrap_or_default())
    }

    fn copy<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, src: P, dest: Q) -> Result<()> {
        let content = self.read(src)?;
        self.write(dest, &content)
    }

    /// Moves a file or a directory with all of its contents.
    ///
    /// An existing file at `to` is replaced; an existing directory at `to` is replaced only
    /// when it is empty.
    fn rename<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, from: P, to: Q) -> Result<()> {
        let from = utils::to_inner(from);
        let to = utils::to_inner(to);
        if utils::is_virtual_root(&from) || utils::is_virtual_root(&to) {
            return Err(anyhow!("invalid path: the root cannot be renamed"));
        }
        let is_dir = self.entry(&from)?.is_dir();
        if from == to {
            return Ok(());
        }
        if is_dir && to.starts_with(&from) {
            return Err(anyhow!(
                "cannot move {} into itself",
                from.display()
            ));
        }
        self.check_parent(&to)?;

        if let Some(existing) = self.entries.get(&to) {
            match (is_dir, existing.is_dir()) {
                (false, true) => return Err(anyhow!("{} is a directory", to.display())),
                (true, false) => return Err(anyhow!("{} is not a directory", to.display())),
                (true, true) if self.subtree(&to).len() > 1 => {
                    return Err(anyhow!("directory not empty: {}", to.display()));
                }
                _ => {}
            }
            self.entries.remove(&to);
        }

        for old in self.subtree(&from) {
            if let Some(entry) = self.entries.remove(&old) {
                let new = to.join(old.strip_prefix(&from)?);
                self.entries.insert(utils::normalize(new), entry);
            }
        }
        Ok(())
    }

    /// Removes a file or a directory with all of its contents.
    /// Errors if the path does not exist or is the root.
    fn rm<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }
        let inner = utils::to_inner(path);
        if utils::is_virtual_root(&inner) {
            return Err(anyhow!("invalid path: the root cannot be removed"));
        }
        if !self.entries.contains_key(&inner) {
            return Err(anyhow!("{} does not exist", inner.display()));
        }

        for p in self.subtree(&inner) {
            self.entries.remove(&p);
        }
        Ok(())
    }

    /// Size of a file in bytes. Errors for directories, like `DirFS`.
    fn size<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let inner = utils::to_inner(path);
        let entry = self.entry(&inner)?;
        if entry.is_dir() {
            return Err(anyhow!("{} is a directory", inner.display()));
        }
        Ok(entry.len() as u64)
    }

    fn ls_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.children(dir.as_ref(), EntryType::File)
    }

    fn ls_dirs<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.children(dir.as_ref(), EntryType::Directory)
    }
}
