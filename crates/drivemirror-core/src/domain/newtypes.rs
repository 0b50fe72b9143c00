//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for remote identifiers and
//! folder paths. Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RemoteId
// ============================================================================

/// Opaque identifier of an entry in the remote store
///
/// The store assigns ids; the client never derives meaning from them. Ids are
/// embedded in query expressions, so quotes, backslashes and whitespace are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a new RemoteId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters that cannot
    /// appear in a store-issued id
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "Remote ID cannot be empty".to_string(),
            ));
        }

        if id
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '"' || c == '\\' || c == '/')
        {
            return Err(DomainError::InvalidRemoteId(format!(
                "Remote ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> Self {
        id.0
    }
}

// ============================================================================
// ParentRef
// ============================================================================

/// The container a lookup or create is scoped to
///
/// `Root` addresses the store's top-level container (the user's "My Drive"),
/// used when no parent folder id is configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The store's top-level container
    Root,
    /// A specific folder
    Folder(RemoteId),
}

impl ParentRef {
    /// Returns the folder id, or `None` for the top-level container
    #[must_use]
    pub fn folder_id(&self) -> Option<&RemoteId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id),
        }
    }
}

impl From<RemoteId> for ParentRef {
    fn from(id: RemoteId) -> Self {
        Self::Folder(id)
    }
}

impl From<&RemoteId> for ParentRef {
    fn from(id: &RemoteId) -> Self {
        Self::Folder(id.clone())
    }
}

impl From<Option<RemoteId>> for ParentRef {
    fn from(id: Option<RemoteId>) -> Self {
        id.map_or(Self::Root, Self::Folder)
    }
}

impl Display for ParentRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}

// ============================================================================
// RemotePath
// ============================================================================

/// Ordered folder names leading from a configured root to a target folder
///
/// Parsed from slash-separated text (`"Datos_YOLO/Emotions"`). Leading and
/// trailing slashes are ignored; empty segments in the middle are rejected.
/// An empty path designates the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemotePath(Vec<String>);

impl RemotePath {
    /// Create a RemotePath from individual segments
    ///
    /// # Errors
    /// Returns error if any segment is empty or contains a slash
    pub fn from_segments<I, S>(segments: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            if segment.trim().is_empty() {
                return Err(DomainError::InvalidRemotePath(
                    "Path segments cannot be empty".to_string(),
                ));
            }
            if segment.contains('/') {
                return Err(DomainError::InvalidRemotePath(format!(
                    "Path segment contains a slash: {segment}"
                )));
            }
        }
        Ok(Self(segments))
    }

    /// Folder names in resolution order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns true if the path designates the root itself
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new path with `name` appended
    ///
    /// # Errors
    /// Returns error if `name` is not a valid segment
    pub fn join(&self, name: &str) -> Result<Self, DomainError> {
        Self::from_segments(self.0.iter().cloned().chain(std::iter::once(name.to_string())))
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

impl FromStr for RemotePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Self::from_segments(trimmed.split('/'))
    }
}

impl TryFrom<String> for RemotePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RemotePath> for String {
    fn from(path: RemotePath) -> Self {
        path.0.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_id_rejects_empty() {
        assert!(RemoteId::new(String::new()).is_err());
    }

    #[test]
    fn remote_id_rejects_query_breaking_characters() {
        assert!(RemoteId::new("abc'def".to_string()).is_err());
        assert!(RemoteId::new("abc def".to_string()).is_err());
        assert!(RemoteId::new("abc\\def".to_string()).is_err());
    }

    #[test]
    fn remote_id_accepts_drive_style_ids() {
        let id = RemoteId::new("1zOahTD-ClWB1fYSCUorBrnmFoXWT9-O7".to_string()).unwrap();
        assert_eq!(id.as_str(), "1zOahTD-ClWB1fYSCUorBrnmFoXWT9-O7");
        assert_eq!(id.to_string(), "1zOahTD-ClWB1fYSCUorBrnmFoXWT9-O7");
    }

    #[test]
    fn remote_id_serde_validates() {
        let ok: RemoteId = serde_json::from_str("\"folder_1\"").unwrap();
        assert_eq!(ok.as_str(), "folder_1");
        assert!(serde_json::from_str::<RemoteId>("\"\"").is_err());
    }

    #[test]
    fn parent_ref_display_and_conversion() {
        assert_eq!(ParentRef::Root.to_string(), "root");
        let id = RemoteId::new("F1".to_string()).unwrap();
        let parent: ParentRef = id.clone().into();
        assert_eq!(parent.folder_id(), Some(&id));
        assert_eq!(ParentRef::from(None::<RemoteId>), ParentRef::Root);
    }

    #[test]
    fn remote_path_parses_slash_separated() {
        let path: RemotePath = "/Datos_YOLO/Emotions/".parse().unwrap();
        assert_eq!(path.segments(), &["Datos_YOLO", "Emotions"]);
        assert_eq!(path.to_string(), "/Datos_YOLO/Emotions");
    }

    #[test]
    fn remote_path_empty_is_root() {
        let path: RemotePath = "/".parse().unwrap();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "/");
    }

    #[test]
    fn remote_path_rejects_empty_segments() {
        assert!("a//b".parse::<RemotePath>().is_err());
        assert!(RemotePath::from_segments(["a", " "]).is_err());
        assert!(RemotePath::from_segments(["a/b"]).is_err());
    }

    #[test]
    fn remote_path_join() {
        let path: RemotePath = "a".parse().unwrap();
        assert_eq!(path.join("b").unwrap().segments(), &["a", "b"]);
    }
}
