//! File-level helpers on top of a [`FsBackend`].
//!
//! Content edits read the whole file, splice it in memory and write the whole result back.
//! A failed edit never writes. The read and the write are two separate backend calls, so a
//! concurrent writer in between loses its update; no locking is attempted.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::core::{DirOptions, FsBackend, Result};
use crate::error::EditError;
use crate::placeholders::{self, ENV_FILE};
use crate::splice;
use crate::target::MatchTarget;

/// Text editing and housekeeping operations over an injected filesystem backend.
///
/// ### Example
/// ```
/// use fsedit_kit::{FileEditor, MapFS, MatchTarget};
///
/// let mut editor = FileEditor::new(MapFS::new());
/// editor.write_str("/lib.rs", "mod a;\n").unwrap();
/// editor.insert_after("/lib.rs", "mod b;\n", &MatchTarget::from("mod a;\n")).unwrap();
///
/// assert_eq!(editor.read_to_string("/lib.rs").unwrap(), "mod a;\nmod b;\n");
/// ```
pub struct FileEditor<B: FsBackend> {
    backend: B,
}

impl<B: FsBackend> FileEditor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Reads the whole file as UTF-8 text.
    pub fn read_to_string<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = self.backend.read(path)?;
        String::from_utf8(bytes).map_err(|_| {
            EditError::NotUtf8 {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    /// Replaces the whole file with `text`, creating the file if needed.
    pub fn write_str<P: AsRef<Path>>(&mut self, path: P, text: &str) -> Result<()> {
        self.backend.write(path, text.as_bytes())
    }

    /// Read, transform, write. Nothing is written when `edit` fails.
    fn modify<P, F>(&mut self, path: P, edit: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnOnce(&str) -> std::result::Result<String, EditError>,
    {
        let path = path.as_ref();
        let content = self.read_to_string(path)?;
        let updated = edit(&content)?;
        self.write_str(path, &updated)
    }

    /// Inserts `text` right before the first occurrence of `target`.
    /// Fails with [`EditError::MatchNotFound`] and leaves the file untouched if there is none.
    pub fn insert_before<P: AsRef<Path>>(
        &mut self,
        path: P,
        text: &str,
        target: &MatchTarget,
    ) -> Result<()> {
        debug!("insert before {} in {}", target, path.as_ref().display());
        self.modify(path, |content| splice::insert_before(content, text, target))
    }

    /// Inserts `text` right after the first occurrence of `target`.
    /// Fails with [`EditError::MatchNotFound`] and leaves the file untouched if there is none.
    pub fn insert_after<P: AsRef<Path>>(
        &mut self,
        path: P,
        text: &str,
        target: &MatchTarget,
    ) -> Result<()> {
        debug!("insert after {} in {}", target, path.as_ref().display());
        self.modify(path, |content| splice::insert_after(content, text, target))
    }

    /// Puts `text` at the start of the file, or right after `anchor` if it is given and found.
    /// A missing anchor falls back to the start of the file.
    pub fn prepend<P: AsRef<Path>>(
        &mut self,
        path: P,
        text: &str,
        anchor: Option<&str>,
    ) -> Result<()> {
        debug!("prepend to {}", path.as_ref().display());
        self.modify(path, |content| Ok(splice::prepend(content, text, anchor)))
    }

    /// Appends `text` to the end of the file, creating the file if it does not exist.
    pub fn append<P: AsRef<Path>>(&mut self, path: P, text: &str) -> Result<()> {
        debug!("append to {}", path.as_ref().display());
        self.backend.append(path, text.as_bytes())
    }

    /// Replaces `target` in the file: the first occurrence for literals and plain patterns,
    /// every occurrence for patterns built with `MatchTarget::pattern_all`.
    pub fn replace<P: AsRef<Path>>(
        &mut self,
        path: P,
        target: &MatchTarget,
        replacement: &str,
    ) -> Result<()> {
        let path = path.as_ref();
        debug!("replace {} in {}", target, path.display());
        self.modify(path, |content| {
            if !splice::contains_match(content, target) {
                warn!("{} not found in {}, nothing replaced", target, path.display());
            }
            Ok(splice::replace(content, target, replacement))
        })
    }

    /// Compiles `pattern` and replaces every occurrence of it in the file.
    /// `$1x` in `replacement` is group 1 followed by `x`; see [`splice::replace`].
    pub fn replace_regex<P: AsRef<Path>>(
        &mut self,
        path: P,
        pattern: &str,
        replacement: &str,
    ) -> Result<()> {
        let target = MatchTarget::pattern_all(pattern)?;
        self.replace(path, &target, replacement)
    }

    /// Whether `target` occurs in the file. Read errors are propagated.
    pub fn contains<P: AsRef<Path>>(&self, path: P, target: &MatchTarget) -> Result<bool> {
        let content = self.read_to_string(path)?;
        Ok(splice::contains_match(&content, target))
    }

    pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, src: P, dest: Q) -> Result<()> {
        self.backend.copy(src, dest)
    }

    pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(&mut self, src: P, dest: Q) -> Result<()> {
        self.backend.rename(src, dest)
    }

    pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        old_path: P,
        new_path: Q,
    ) -> Result<()> {
        self.backend.rename(old_path, new_path)
    }

    /// Removes a file or a whole directory tree. A missing path is not an error.
    pub fn delete_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        if !self.backend.exists(&path) {
            return Ok(());
        }
        debug!("delete {}", path.as_ref().display());
        self.backend.rm(path)
    }

    pub fn create_dir<P: AsRef<Path>>(&mut self, path: P, options: DirOptions) -> Result<()> {
        self.backend.mkdir(path, options)
    }

    /// Creates an empty file, truncating an existing one.
    pub fn create_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.backend.mkfile(path, None)
    }

    pub fn exists<P: AsRef<Path>>(&self, path: P) -> bool {
        self.backend.exists(path)
    }

    pub fn file_size<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        self.backend.size(path)
    }

    pub fn list_files<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.backend.ls_files(dir)
    }

    pub fn list_dirs<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<String>> {
        self.backend.ls_dirs(dir)
    }

    /// Reads a `KEY=VALUE` env file.
    pub fn load_env<P: AsRef<Path>>(&self, path: P) -> Result<BTreeMap<String, String>> {
        let text = self.read_to_string(path)?;
        Ok(placeholders::parse_env(&text)?)
    }

    /// Replaces every `{KEY}` with its value in all files under `dir`, recursively.
    /// Files named `.env` are left alone. Returns the number of files rewritten.
    pub fn replace_placeholders<P: AsRef<Path>>(
        &mut self,
        dir: P,
        vars: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let dir = dir.as_ref();
        let mut rewritten = 0;

        for name in self.list_files(dir)? {
            if name == ENV_FILE {
                continue;
            }
            let path = dir.join(&name);
            debug!("fill placeholders in {}", path.display());
            self.modify(&path, |content| placeholders::fill(content, vars))?;
            rewritten += 1;
        }
        for name in self.list_dirs(dir)? {
            rewritten += self.replace_placeholders(dir.join(&name), vars)?;
        }
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirFS, MapFS};
    use tempdir::TempDir;

    fn setup_editor() -> FileEditor<MapFS> {
        let mut editor = FileEditor::new(MapFS::new());
        editor.create_dir("/src", DirOptions::default()).unwrap();
        editor
            .write_str("/src/lib.rs", "mod a;\nmod b;\n")
            .unwrap();
        editor
            .write_str("/notes.txt", "line1\nline2\n")
            .unwrap();
        editor
    }

    mod read_write {
        use super::*;

        #[test]
        fn test_round_trip() -> Result<()> {
            let mut editor = setup_editor();
            for text in ["", "one line", "multi\nline\n", "юникод ✓"] {
                editor.write_str("/round.txt", text)?;
                assert_eq!(editor.read_to_string("/round.txt")?, text);
            }
            Ok(())
        }

        #[test]
        fn test_non_utf8_content() -> Result<()> {
            let mut editor = setup_editor();
            editor.backend_mut().write("/blob.bin", &[0xff, 0xfe, 0x00])?;

            let err = editor.read_to_string("/blob.bin").unwrap_err();
            assert!(matches!(
                err.downcast_ref::<EditError>(),
                Some(EditError::NotUtf8 { .. })
            ));
            Ok(())
        }

        #[test]
        fn test_read_missing_file() {
            let editor = setup_editor();
            assert!(editor.read_to_string("/missing.txt").is_err());
        }
    }

    mod insert {
        use super::*;

        #[test]
        fn test_insert_after() -> Result<()> {
            let mut editor = setup_editor();
            editor.insert_after("/notes.txt", "NEW\n", &MatchTarget::from("line1\n"))?;
            assert_eq!(editor.read_to_string("/notes.txt")?, "line1\nNEW\nline2\n");
            Ok(())
        }

        #[test]
        fn test_insert_before_with_pattern() -> Result<()> {
            let mut editor = setup_editor();
            let target = MatchTarget::pattern(r"mod b;")?;
            editor.insert_before("/src/lib.rs", "mod ab;\n", &target)?;
            assert_eq!(
                editor.read_to_string("/src/lib.rs")?,
                "mod a;\nmod ab;\nmod b;\n"
            );
            Ok(())
        }

        #[test]
        fn test_missing_target_leaves_file_untouched() -> Result<()> {
            let mut editor = setup_editor();
            let target = MatchTarget::from("mod z;");

            let err = editor
                .insert_before("/src/lib.rs", "x", &target)
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<EditError>(),
                Some(EditError::MatchNotFound { .. })
            ));
            let err = editor.insert_after("/src/lib.rs", "x", &target).unwrap_err();
            assert_eq!(err.to_string(), "match not found: \"mod z;\"");

            assert_eq!(editor.read_to_string("/src/lib.rs")?, "mod a;\nmod b;\n");
            Ok(())
        }

        #[test]
        fn test_insert_into_missing_file() {
            let mut editor = setup_editor();
            let result = editor.insert_after("/nope.rs", "x", &MatchTarget::from("a"));
            assert!(result.is_err());
            assert!(!editor.exists("/nope.rs"));
        }
    }

    mod prepend_append {
        use super::*;

        #[test]
        fn test_prepend() -> Result<()> {
            let mut editor = setup_editor();
            editor.prepend("/notes.txt", "title\n", None)?;
            assert_eq!(editor.read_to_string("/notes.txt")?, "title\nline1\nline2\n");
            Ok(())
        }

        #[test]
        fn test_prepend_with_anchor() -> Result<()> {
            let mut editor = setup_editor();
            editor.prepend("/notes.txt", "after1\n", Some("line1\n"))?;
            assert_eq!(editor.read_to_string("/notes.txt")?, "line1\nafter1\nline2\n");

            editor.prepend("/notes.txt", "top\n", Some("START:"))?;
            assert_eq!(
                editor.read_to_string("/notes.txt")?,
                "top\nline1\nafter1\nline2\n"
            );
            Ok(())
        }

        #[test]
        fn test_append() -> Result<()> {
            let mut editor = setup_editor();
            editor.append("/notes.txt", "line3\n")?;
            assert_eq!(editor.read_to_string("/notes.txt")?, "line1\nline2\nline3\n");

            editor.append("/new.txt", "created")?;
            assert_eq!(editor.read_to_string("/new.txt")?, "created");
            Ok(())
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn test_literal_first_only() -> Result<()> {
            let mut editor = setup_editor();
            editor.write_str("/x.txt", "abcabc")?;
            editor.replace("/x.txt", &MatchTarget::from("abc"), "X")?;
            assert_eq!(editor.read_to_string("/x.txt")?, "Xabc");
            Ok(())
        }

        #[test]
        fn test_replace_regex_all() -> Result<()> {
            let mut editor = setup_editor();
            editor.write_str("/x.txt", "abcabc")?;
            editor.replace_regex("/x.txt", "abc", "X")?;
            assert_eq!(editor.read_to_string("/x.txt")?, "XX");
            Ok(())
        }

        #[test]
        fn test_replace_placeholders() -> Result<()> {
            let mut editor = setup_editor();
            editor.write_str("/Cargo.toml", "name = \"{NAME}\"\n# {NAME}\n")?;
            editor.replace_regex("/Cargo.toml", r"\{NAME\}", "demo")?;
            assert_eq!(
                editor.read_to_string("/Cargo.toml")?,
                "name = \"demo\"\n# demo\n"
            );
            Ok(())
        }

        #[test]
        fn test_replace_regex_group_then_text() -> Result<()> {
            let mut editor = setup_editor();
            editor.write_str("/x.txt", "a= b=")?;
            editor.replace_regex("/x.txt", r"(\w+)=", "$1x=")?;
            assert_eq!(editor.read_to_string("/x.txt")?, "ax= bx=");
            Ok(())
        }

        #[test]
        fn test_replace_literal_whole_match_ref() -> Result<()> {
            let mut editor = setup_editor();
            editor.write_str("/x.txt", "abc")?;
            editor.replace("/x.txt", &MatchTarget::from("b"), "[$&]")?;
            assert_eq!(editor.read_to_string("/x.txt")?, "a[b]c");
            Ok(())
        }

        #[test]
        fn test_replace_regex_invalid_pattern() -> Result<()> {
            let mut editor = setup_editor();
            let err = editor.replace_regex("/notes.txt", "(", "X").unwrap_err();
            assert!(matches!(
                err.downcast_ref::<EditError>(),
                Some(EditError::InvalidPattern(_))
            ));
            assert_eq!(editor.read_to_string("/notes.txt")?, "line1\nline2\n");
            Ok(())
        }

        #[test]
        fn test_contains() -> Result<()> {
            let editor = setup_editor();
            assert!(editor.contains("/src/lib.rs", &MatchTarget::from("mod b;"))?);
            assert!(!editor.contains("/src/lib.rs", &MatchTarget::pattern(r"mod \d")?)?);
            assert!(editor.contains("/missing", &MatchTarget::from("x")).is_err());
            Ok(())
        }
    }

    mod template_tree {
        use super::*;

        fn setup_template() -> FileEditor<MapFS> {
            let mut editor = FileEditor::new(MapFS::new());
            editor
                .create_dir("/tpl/src/bin", DirOptions::recursive())
                .unwrap();
            editor
                .write_str("/tpl/.env", "NAME=demo\nPORT=8080\n")
                .unwrap();
            editor
                .write_str("/tpl/Cargo.toml", "name = \"{NAME}\"\n")
                .unwrap();
            editor
                .write_str("/tpl/src/main.rs", "// {NAME} on {PORT}\n")
                .unwrap();
            editor
                .write_str("/tpl/src/bin/tool.rs", "const PORT: u16 = {PORT};\n")
                .unwrap();
            editor
        }

        #[test]
        fn test_load_env() -> Result<()> {
            let editor = setup_template();
            let vars = editor.load_env("/tpl/.env")?;
            assert_eq!(vars.get("NAME").map(String::as_str), Some("demo"));
            assert_eq!(vars.get("PORT").map(String::as_str), Some("8080"));
            Ok(())
        }

        #[test]
        fn test_load_env_invalid_line() -> Result<()> {
            let mut editor = setup_template();
            editor.write_str("/bad.env", "A=1\nbroken\n")?;
            let err = editor.load_env("/bad.env").unwrap_err();
            assert!(matches!(
                err.downcast_ref::<EditError>(),
                Some(EditError::InvalidEnvLine { line: 2, .. })
            ));
            Ok(())
        }

        #[test]
        fn test_replace_in_nested_tree() -> Result<()> {
            let mut editor = setup_template();
            let vars = editor.load_env("/tpl/.env")?;

            let rewritten = editor.replace_placeholders("/tpl", &vars)?;
            assert_eq!(rewritten, 3);
            assert_eq!(editor.read_to_string("/tpl/Cargo.toml")?, "name = \"demo\"\n");
            assert_eq!(editor.read_to_string("/tpl/src/main.rs")?, "// demo on 8080\n");
            assert_eq!(
                editor.read_to_string("/tpl/src/bin/tool.rs")?,
                "const PORT: u16 = 8080;\n"
            );
            Ok(())
        }

        #[test]
        fn test_env_file_is_skipped() -> Result<()> {
            let mut editor = setup_template();
            editor.write_str("/tpl/.env", "NAME=demo\n# {NAME}\n")?;
            editor.write_str("/tpl/src/.env", "{NAME}")?;
            let vars = editor.load_env("/tpl/.env")?;

            editor.replace_placeholders("/tpl", &vars)?;
            assert_eq!(editor.read_to_string("/tpl/.env")?, "NAME=demo\n# {NAME}\n");
            assert_eq!(editor.read_to_string("/tpl/src/.env")?, "{NAME}");
            assert_eq!(editor.read_to_string("/tpl/Cargo.toml")?, "name = \"demo\"\n");
            Ok(())
        }

        #[test]
        fn test_missing_dir() {
            let mut editor = setup_template();
            let result = editor.replace_placeholders("/nope", &BTreeMap::new());
            assert!(result.is_err());
        }
    }

    mod housekeeping {
        use super::*;

        #[test]
        fn test_copy_move_rename() -> Result<()> {
            let mut editor = setup_editor();

            editor.copy_file("/notes.txt", "/copy.txt")?;
            assert_eq!(editor.read_to_string("/copy.txt")?, "line1\nline2\n");

            editor.move_file("/copy.txt", "/src/moved.txt")?;
            assert!(!editor.exists("/copy.txt"));
            assert!(editor.exists("/src/moved.txt"));

            editor.rename("/src", "/lib")?;
            assert_eq!(editor.list_files("/lib")?, vec!["lib.rs", "moved.txt"]);
            Ok(())
        }

        #[test]
        fn test_create_and_delete() -> Result<()> {
            let mut editor = setup_editor();

            editor.create_dir("/a/b", DirOptions::recursive())?;
            editor.create_file("/a/b/empty.txt")?;
            assert_eq!(editor.file_size("/a/b/empty.txt")?, 0);
            assert_eq!(editor.list_dirs("/")?, vec!["a", "src"]);

            editor.delete_path("/a")?;
            assert!(!editor.exists("/a/b/empty.txt"));
            assert!(!editor.exists("/a"));

            editor.delete_path("/a")?;
            Ok(())
        }

        #[test]
        fn test_create_dir_without_recursive() {
            let mut editor = setup_editor();
            assert!(editor.create_dir("/x/y", DirOptions::default()).is_err());
        }

        #[test]
        fn test_file_size() -> Result<()> {
            let editor = setup_editor();
            assert_eq!(editor.file_size("/notes.txt")?, 12);
            Ok(())
        }
    }

    mod on_host {
        use super::*;

        #[test]
        fn test_edit_real_file() -> Result<()> {
            let temp_dir = TempDir::new("editor_test")?;
            let mut editor = FileEditor::new(DirFS::new(temp_dir.path())?);

            editor.write_str("/main.rs", "fn main() {\n}\n")?;
            editor.insert_after(
                "/main.rs",
                "    println!(\"hi\");\n",
                &MatchTarget::from("fn main() {\n"),
            )?;
            assert_eq!(
                std::fs::read_to_string(temp_dir.path().join("main.rs"))?,
                "fn main() {\n    println!(\"hi\");\n}\n"
            );
            Ok(())
        }

        #[test]
        fn test_io_error_is_propagated() -> Result<()> {
            let temp_dir = TempDir::new("editor_test")?;
            let mut editor = FileEditor::new(DirFS::new(temp_dir.path())?);

            let err = editor.prepend("/missing.txt", "x", None).unwrap_err();
            let io = err.downcast_ref::<std::io::Error>().unwrap();
            assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
            assert!(!editor.exists("/missing.txt"));
            Ok(())
        }

        #[test]
        fn test_delete_missing_path_is_noop() -> Result<()> {
            let temp_dir = TempDir::new("editor_test")?;
            let mut editor = FileEditor::new(DirFS::new(temp_dir.path())?);
            editor.delete_path("/never/existed")?;
            Ok(())
        }
    }
}
