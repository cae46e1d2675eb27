//! The snapshot data model.
//!
//! Every stored object is JSON, internally tagged by a `type` field:
//!
//! ```json
//! {"type":"file","contentType":"text/plain","body":"<hash>"}
//! {"type":"directory","children":{"a.txt":"<hash>"}}
//! {"type":"symlink","target":"../elsewhere"}
//! {"type":"wrapper","directory":"<hash>","selected":"note.txt"}
//! ```
//!
//! [`Entry`] covers the three tree nodes; [`Object`] is anything the codec
//! may find behind a hash, which adds [`Wrapper`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::ContentHash;

/// Content type used when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A leaf: raw bytes in the blob store plus the content type to serve them as.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub content_type: String,
    pub body: ContentHash,
}

impl FileEntry {
    pub fn new(content_type: impl Into<String>, body: ContentHash) -> Self {
        Self {
            content_type: content_type.into(),
            body,
        }
    }
}

/// A directory: unique child names mapped to the hashes of stored entries.
///
/// Children are kept in a `BTreeMap` so the encoded bytes, and therefore the
/// hash, do not depend on the order the children were discovered in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub children: BTreeMap<String, ContentHash>,
}

impl DirectoryEntry {
    pub fn new(children: BTreeMap<String, ContentHash>) -> Self {
        Self { children }
    }

    /// A directory holding exactly one child.
    pub fn single(name: impl Into<String>, child: ContentHash) -> Self {
        let mut children = BTreeMap::new();
        children.insert(name.into(), child);
        Self { children }
    }

    pub fn get(&self, name: &str) -> Option<&ContentHash> {
        self.children.get(name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A symbolic link, kept as its literal target string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymlinkEntry {
    pub target: String,
}

impl SymlinkEntry {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// One node of a snapshotted tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    File(FileEntry),
    Directory(DirectoryEntry),
    Symlink(SymlinkEntry),
}

impl Entry {
    /// The `type` tag this entry is stored under.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Directory(_) => "directory",
            Self::Symlink(_) => "symlink",
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&DirectoryEntry> {
        match self {
            Self::Directory(dir) => Some(dir),
            _ => None,
        }
    }
}

/// Addresses a directory root, optionally already "inside" one of its
/// children.
///
/// A lone file is snapshotted as the only child of a synthetic directory, so
/// resolution never has to special-case single files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrapper {
    pub directory: ContentHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl Wrapper {
    pub fn new(directory: ContentHash) -> Self {
        Self {
            directory,
            selected: None,
        }
    }

    pub fn selecting(directory: ContentHash, selected: impl Into<String>) -> Self {
        Self {
            directory,
            selected: Some(selected.into()),
        }
    }
}

/// Anything the object codec can find behind a hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Object {
    File(FileEntry),
    Directory(DirectoryEntry),
    Symlink(SymlinkEntry),
    Wrapper(Wrapper),
}

impl Object {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Directory(_) => "directory",
            Self::Symlink(_) => "symlink",
            Self::Wrapper(_) => "wrapper",
        }
    }
}

impl From<Entry> for Object {
    fn from(entry: Entry) -> Self {
        match entry {
            Entry::File(file) => Self::File(file),
            Entry::Directory(dir) => Self::Directory(dir),
            Entry::Symlink(link) => Self::Symlink(link),
        }
    }
}

impl From<Wrapper> for Object {
    fn from(wrapper: Wrapper) -> Self {
        Self::Wrapper(wrapper)
    }
}

impl TryFrom<Object> for Entry {
    type Error = TypeError;

    fn try_from(object: Object) -> Result<Self, Self::Error> {
        match object {
            Object::File(file) => Ok(Self::File(file)),
            Object::Directory(dir) => Ok(Self::Directory(dir)),
            Object::Symlink(link) => Ok(Self::Symlink(link)),
            Object::Wrapper(_) => Err(TypeError::UnexpectedObject {
                expected: "entry",
                found: "wrapper",
            }),
        }
    }
}
