//! Directory navigation over one active library.

use crate::library::card_library::Library;
use crate::model::entry::FlashcardSetListEntry;
use crate::model::path::{FullPath, RelativePath};
use crate::storage::{FlashcardStorage, StorageError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Navigation and create-action failures.
#[derive(Debug)]
pub enum ManagerError {
    NoLibrary,
    NoPath,
    Storage(StorageError),
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLibrary => write!(f, "No library selected"),
            Self::NoPath => write!(f, "No path selected"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NoLibrary | Self::NoPath => None,
        }
    }
}

impl From<StorageError> for ManagerError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Tracks the active library, the current directory and its listing.
#[derive(Debug)]
pub struct CardManager<S> {
    library: Option<Library<S>>,
    path: Option<FullPath>,
    entries: Vec<FlashcardSetListEntry>,
}

impl<S> Default for CardManager<S> {
    fn default() -> Self {
        Self {
            library: None,
            path: None,
            entries: Vec::new(),
        }
    }
}

impl<S: FlashcardStorage> CardManager<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library(&self) -> Option<&Library<S>> {
        self.library.as_ref()
    }

    pub fn path(&self) -> Option<&FullPath> {
        self.path.as_ref()
    }

    pub fn entries(&self) -> &[FlashcardSetListEntry] {
        &self.entries
    }

    /// Switches to `library` and enters its root.
    ///
    /// Entering the library that is already active is a no-op.
    pub fn enter_library(&mut self, library: Library<S>) -> ManagerResult<()> {
        if self
            .library
            .as_ref()
            .is_some_and(|current| current.is_same_library(&library))
        {
            return Ok(());
        }
        info!(
            "event=library_enter module=manager status=start library={}",
            library.name()
        );
        self.library = Some(library);
        self.enter(&RelativePath::root())
    }

    /// Lists `dir` of the active library and makes it current.
    pub fn enter(&mut self, dir: &RelativePath) -> ManagerResult<()> {
        let library = self.library.as_ref().ok_or(ManagerError::NoLibrary)?;
        match library.list_entries(dir) {
            Ok(entries) => {
                self.entries = entries;
                self.path = Some(library.full_path(dir.clone()));
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=dir_enter module=manager status=error error_code={} error={}",
                    err.code(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Creates a subdirectory `name` in the current directory.
    pub fn create_dir(&mut self, name: &str) -> ManagerResult<()> {
        self.run_create_action(name, |library, path| library.create_dir(path))
    }

    /// Creates an empty card-set file `name` in the current directory.
    pub fn create_file(&mut self, name: &str) -> ManagerResult<()> {
        self.run_create_action(name, |library, path| library.create_file(path))
    }

    fn run_create_action<F>(&mut self, name: &str, create: F) -> ManagerResult<()>
    where
        F: FnOnce(&Library<S>, &RelativePath) -> Result<(), StorageError>,
    {
        let library = self.library.as_ref().ok_or(ManagerError::NoLibrary)?;
        let current = self.path.as_ref().ok_or(ManagerError::NoPath)?;
        let new_path = current.join(name);
        create(library, &new_path.relative_path)?;
        self.entries = library.list_entries(&current.relative_path)?;
        Ok(())
    }
}
