use crate::model::path::RelativePath;

/// One row of a library directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlashcardSetListEntry {
    /// A card-set file.
    File(RelativePath),
    /// A subdirectory.
    Dir(RelativePath),
    /// Link to the parent directory.
    Up(RelativePath),
}

impl FlashcardSetListEntry {
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::File(path) | Self::Dir(path) | Self::Up(path) => path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File(path) | Self::Dir(path) => path.file_name(),
            Self::Up(_) => "..",
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

#[cfg(test)]
mod tests {
    use super::FlashcardSetListEntry;
    use crate::model::path::RelativePath;

    #[test]
    fn up_entry_is_named_dot_dot() {
        let entry = FlashcardSetListEntry::Up(RelativePath::parse("a"));
        assert_eq!(entry.name(), "..");
        assert_eq!(entry.path(), &RelativePath::parse("a"));
    }

    #[test]
    fn file_and_dir_use_last_segment() {
        assert_eq!(
            FlashcardSetListEntry::File(RelativePath::parse("a/b.txt")).name(),
            "b.txt"
        );
        assert_eq!(FlashcardSetListEntry::Dir(RelativePath::parse("a/c")).name(), "c");
    }
}
