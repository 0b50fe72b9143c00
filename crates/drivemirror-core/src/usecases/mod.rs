//! Use cases
//!
//! Each use case owns the ports it needs as `Arc<dyn Port + Send + Sync>`
//! and maps port failures into [`SyncError`](crate::domain::SyncError).

pub mod content_type;
pub mod directory_index;
pub mod locks;
pub mod mirror_tree;
pub mod publish_file;
pub mod resolve_folder;
pub mod upsert_file;

pub use content_type::{infer_content_type, DEFAULT_CONTENT_TYPE};
pub use directory_index::DirectoryIndex;
pub use locks::KeyedLocks;
pub use mirror_tree::{ExtensionAllowlist, TreeMirror, DEFAULT_MIRROR_EXTENSIONS};
pub use publish_file::TreePublisher;
pub use resolve_folder::FolderResolver;
pub use upsert_file::{FileUpsert, UpsertAction, UpsertedFile};
