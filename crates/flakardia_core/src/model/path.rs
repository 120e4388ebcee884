//! Library-relative paths.
//!
//! # Invariants
//! - A `RelativePath` never contains empty, `.` or `..` segments, so it
//!   cannot point outside its library.
//! - The empty path is the library root.

use std::fmt::{Display, Formatter};

/// Path of a file or directory inside a library, split into segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath {
    elements: Vec<String>,
}

impl RelativePath {
    /// The library root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from segments, dropping empty, `.` and `..` ones.
    pub fn new<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: elements
                .into_iter()
                .map(Into::into)
                .filter(|element: &String| is_plain_segment(element))
                .collect(),
        }
    }

    /// Parses a `/`-separated path.
    pub fn parse(value: &str) -> Self {
        Self::new(value.split('/'))
    }

    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// Parent path; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.elements.split_last()?;
        Some(Self {
            elements: init.to_vec(),
        })
    }

    /// Last segment; empty for the root.
    pub fn file_name(&self) -> &str {
        self.elements.last().map(String::as_str).unwrap_or("")
    }

    pub fn join(&self, name: &str) -> Self {
        let mut elements = self.elements.clone();
        elements.extend(
            name.split('/')
                .filter(|segment| is_plain_segment(segment))
                .map(str::to_string),
        );
        Self { elements }
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.elements.join("/"))
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

/// A relative path qualified with the library it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullPath {
    pub library_name: String,
    pub relative_path: RelativePath,
}

impl FullPath {
    pub fn new(library_name: impl Into<String>, relative_path: RelativePath) -> Self {
        Self {
            library_name: library_name.into(),
            relative_path,
        }
    }

    pub fn join(&self, name: &str) -> Self {
        Self {
            library_name: self.library_name.clone(),
            relative_path: self.relative_path.join(name),
        }
    }
}

impl Display for FullPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.relative_path.is_root() {
            f.write_str(&self.library_name)
        } else {
            write!(f, "{}/{}", self.library_name, self.relative_path)
        }
    }
}
