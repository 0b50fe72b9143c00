//! Remote entries
//!
//! A [`RemoteEntry`] is one folder or file record as reported by the remote
//! store. Names are not unique within a parent; the id is the identity.

use serde::{Deserialize, Serialize};

use super::newtypes::RemoteId;

/// Content type the store assigns to folders
pub const FOLDER_CONTENT_TYPE: &str = "application/vnd.google-apps.folder";

/// Whether an entry is a folder or a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

impl EntryKind {
    /// Derives the kind from the store-reported content type
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type == FOLDER_CONTENT_TYPE {
            Self::Folder
        } else {
            Self::File
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

/// A folder or file record in the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Store-assigned identifier
    pub id: RemoteId,
    /// Display name, unique only by convention
    pub name: String,
    /// Folder or file
    pub kind: EntryKind,
    /// MIME type reported by the store
    pub content_type: String,
}

impl RemoteEntry {
    /// Builds a folder entry
    pub fn folder(id: RemoteId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::Folder,
            content_type: FOLDER_CONTENT_TYPE.to_string(),
        }
    }

    /// Builds a file entry
    pub fn file(id: RemoteId, name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntryKind::File,
            content_type: content_type.into(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Lower-cased extension of the entry name, without the dot
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Lower-cased extension of `name`, without the dot
///
/// Hidden files such as `.env` have no extension.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Returns true if `name` can be used as a single local path component
///
/// Remote names may contain characters that would escape the local mirror
/// root (`/`, `..`) or that the local filesystem rejects (NUL).
pub fn is_safe_local_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
