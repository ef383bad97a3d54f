use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components and drops trailing separators.
/// `..` never climbs above the first component.
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(parent) = result.parent() {
                    result = parent.to_path_buf();
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Turns an inner path (absolute or relative) into an absolute normalized inner path.
pub fn to_inner<P: AsRef<Path>>(path: P) -> PathBuf {
    normalize(Path::new("/").join(path))
}

pub fn is_virtual_root<P: AsRef<Path>>(path: P) -> bool {
    let components: Vec<_> = path.as_ref().components().collect();
    components.len() == 1 && components[0] == Component::RootDir
}

/// Returns the last component of `path` as an owned string.
pub fn file_name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Removes a file or a directory tree on the host.
pub fn rm_on_host<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    let path = path.as_ref();
    if std::fs::symlink_metadata(path)?.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}
