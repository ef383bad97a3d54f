//! This module provides a filesystem backend that maps to a real directory on the host system.
//!
//! ### Key Features:
//! - **Rooted**: inner paths are resolved against a designated root directory (self.root).
//! - **Path normalization**: `.` and `..` components are resolved and trailing slashes removed;
//!   `..` never climbs above the root.
//! - **Thin**: every operation is a single `std::fs` call; host errors are returned unchanged.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use log::trace;

use crate::core::{DirOptions, FsBackend, Result, utils};

/// A filesystem backend that maps to a real directory on the host system.
///
/// `DirFS` resolves every inner path against `root` and hands it straight to `std::fs`.
/// It keeps no state besides the root, so changes made by other processes are visible
/// immediately.
///
/// ### Usage notes:
/// - `rm()` does not follow symlinks; it removes the link, not the target.
/// - Permissions are not adjusted; ensure `root` is writable.
/// - Errors are returned via `anyhow::Result`; I/O failures stay downcastable to
///   `std::io::Error`.
///
/// ### Example:
/// ```
/// use fsedit_kit::{DirFS, DirOptions, FsBackend};
///
/// let root = std::env::temp_dir().join("fsedit_dirfs_doc");
///
/// let mut fs = DirFS::new(&root).unwrap();
/// fs.mkdir("/docs", DirOptions::recursive()).unwrap();
/// fs.write("/docs/note.txt", b"Hello").unwrap();
/// assert!(fs.exists("/docs/note.txt"));
///
/// fs.rm("/docs").unwrap();
/// ```
pub struct DirFS {
    root: PathBuf, // host-related absolute normalized path
}

impl DirFS {
    /// Creates a new DirFS instance with the root directory at `root`.
    /// * `root` is an absolute host path. If it does not exist it is created with all parents.
    ///
    /// Errors if `root` is empty, relative or points to something other than a directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if root.as_os_str().is_empty() {
            return Err(anyhow!("invalid root path: empty"));
        }
        if root.is_relative() {
            return Err(anyhow!("the root path must be absolute"));
        }
        if root.exists() && !root.is_dir() {
            return Err(anyhow!("{:?} is not a directory", root));
        }

        let root = utils::normalize(root);
        if !std::fs::exists(&root)? {
            std::fs::create_dir_all(&root)?;
        }

        Ok(Self { root })
    }

    /// Returns the host path for `path`, logging the call.
    fn host(&self, op: &str, path: &Path) -> Result<PathBuf> {
        let host = self.to_host(path)?;
        trace!("{} {}", op, host.display());
        Ok(host)
    }

    fn children<F>(&self, dir: &Path, keep: F) -> Result<Vec<String>>
    where
        F: Fn(&std::fs::FileType) -> bool,
    {
        let host = self.host("ls", dir)?;
        let mut names = Vec::new();
        for entry in std::fs::read_dir(host)? {
            let entry = entry?;
            if keep(&entry.file_type()?) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl FsBackend for DirFS {
    /// Returns root path related to the host file system.
    fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Returns the path on the host system that matches the specified inner path.
    fn to_host<P: AsRef<Path>>(&self, inner_path: P) -> Result<PathBuf> {
        let inner = utils::to_inner(inner_path);
        Ok(self.root.join(inner.strip_prefix("/")?))
    }

    /// Checks if a `path` exists on the host. Any error while checking counts as "no".
    fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.to_host(path)
            .map(|host| std::fs::exists(host).unwrap_or(false))
            .unwrap_or(false)
    }

    fn is_dir<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let host = self.to_host(path)?;
        Ok(std::fs::metadata(host)?.is_dir())
    }

    fn is_file<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let host = self.to_host(path)?;
        Ok(std::fs::metadata(host)?.is_file())
    }

    fn read<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        let host = self.host("read", path.as_ref())?;
        Ok(std::fs::read(host)?)
    }

    /// Writes `content` to the file, creating it if needed and truncating it otherwise.
    fn write<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        let host = self.host("write", path.as_ref())?;
        std::fs::write(host, content)?;
        Ok(())
    }

    fn append<P: AsRef<Path>>(&mut self, path: P, content: &[u8]) -> Result<()> {
        let host = self.host("append", path.as_ref())?;
        let mut file = OpenOptions::new().create(true).append(true).open(host)?;
        file.write_all(content)?;
        Ok(())
    }

    fn mkdir<P: AsRef<Path>>(&mut self, path: P, options: DirOptions) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }
        let host = self.host("mkdir", path.as_ref())?;
        if options.recursive {
            std::fs::create_dir_all(host)?;
        } else {
            std::fs::create_dir(host)?;
        }
        Ok(())
    }

    fn mkfile<P: AsRef<Path>>(&mut self, path: P, content: Option<&[u8]>) -> Result<()> {
        let host = self.host("mkfile", path.as_ref())?;
        std::fs::write(host, content.unwrap_or_default())?;
        Ok(())
    }

    fn copy<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, src: P, dest: Q) -> Result<()> {
        let src = self.host("copy", src.as_ref())?;
        let dest = self.to_host(dest)?;
        std::fs::copy(src, dest)?;
        Ok(())
    }

    fn rename<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, from: P, to: Q) -> Result<()> {
        let from = self.host("rename", from.as_ref())?;
        let to = self.to_host(to)?;
        std::fs::rename(from, to)?;
        Ok(())
    }

    /// Removes a file or a directory at the specified path.
    /// Directories are removed with all their contents; the root itself cannot be removed.
    fn rm<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if path.as_ref().as_os_str().is_empty() {
            return Err(anyhow!("invalid path: empty"));
        }
        if utils::is_virtual_root(utils::to_inner(&path)) {
            return Err(anyhow!("invalid path: the root cannot be removed"));
        }
        let host = self.host("rm", path.as_ref())?;
        utils::rm_on_host(host)?;
        Ok(())
    }

    /// Size of a file in bytes. Errors for directories.
    fn size<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let host = self.to_host(path)?;
        let metadata = std::fs::metadata(&host)?;
        if metadata.is_dir() {
            return Err(anyhow!("{} is a directory", host.display()));
        }
        Ok(metadata.len())
    }

    fn ls_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.children(dir.as_ref(), |ft| ft.is_file())
    }

    fn ls_dirs<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.children(dir.as_ref(), |ft| ft.is_dir())
    }
}
