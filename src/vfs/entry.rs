#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EntryType {
    File,
    Directory,
}

/// A node of the in-memory tree kept by [`crate::MapFS`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    entry_type: EntryType,
    content: Option<Vec<u8>>,
}

impl Entry {
    pub fn new(entry_type: EntryType) -> Self {
        Self {
            entry_type,
            content: None,
        }
    }

    pub fn file(content: &[u8]) -> Self {
        let mut entry = Self::new(EntryType::File);
        entry.set_content(content);
        entry
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == EntryType::Directory
    }

    pub fn content(&self) -> Option<&Vec<u8>> {
        self.content.as_ref()
    }

    /// Size of the content in bytes; zero for directories and empty files.
    pub fn len(&self) -> usize {
        self.content.as_ref().map_or(0, |c| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_content(&mut self, content: &[u8]) {
        if self.is_file() {
            self.content = Some(content.to_vec());
        }
    }

    pub fn append_content(&mut self, content: &[u8]) {
        if self.is_file() {
            self.content
                .get_or_insert_with(Vec::new)
                .extend_from_slice(content);
        }
    }
}
