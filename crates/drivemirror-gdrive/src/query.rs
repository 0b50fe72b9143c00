//! Drive search expressions
//!
//! Renders an [`EntryQuery`] into the `q` parameter of `files.list`. String
//! literals are single-quoted; quotes and backslashes inside them are escaped
//! with a backslash.

use drivemirror_core::domain::{EntryKind, ParentRef, FOLDER_CONTENT_TYPE};
use drivemirror_core::ports::EntryQuery;

/// Parent alias Drive accepts for the top-level container
pub const ROOT_ALIAS: &str = "root";

/// Escapes a value for use inside a single-quoted Drive query literal
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Id used for `parent` in queries and in `parents` on create
pub fn parent_id(parent: &ParentRef) -> &str {
    match parent {
        ParentRef::Root => ROOT_ALIAS,
        ParentRef::Folder(id) => id.as_str(),
    }
}

/// Builds the `q` expression for `query`
///
/// Trashed entries are always excluded.
pub fn build_query(query: &EntryQuery) -> String {
    let mut q = format!(
        "'{}' in parents and trashed=false",
        escape_literal(parent_id(&query.parent))
    );
    if let Some(name) = &query.name {
        q.push_str(&format!(" and name='{}'", escape_literal(name)));
    }
    match query.kind {
        Some(EntryKind::Folder) => q.push_str(&format!(" and mimeType='{FOLDER_CONTENT_TYPE}'")),
        Some(EntryKind::File) => q.push_str(&format!(" and mimeType!='{FOLDER_CONTENT_TYPE}'")),
        None => {}
    }
    q
}

#[cfg(test)]
mod tests {
    use drivemirror_core::domain::RemoteId;

    use super::*;

    #[test]
    fn root_children() {
        let q = build_query(&EntryQuery::children_of(ParentRef::Root));
        assert_eq!(q, "'root' in parents and trashed=false");
    }

    #[test]
    fn named_folder_under_parent() {
        let parent = RemoteId::new("1AbC".into()).unwrap();
        let q = build_query(&EntryQuery::named(parent, "Datos_YOLO").of_kind(EntryKind::Folder));
        assert_eq!(
            q,
            "'1AbC' in parents and trashed=false and name='Datos_YOLO' \
             and mimeType='application/vnd.google-apps.folder'"
        );
    }

    #[test]
    fn file_filter_and_escaping() {
        let q = build_query(
            &EntryQuery::named(ParentRef::Root, r"it's a\b.txt").of_kind(EntryKind::File),
        );
        assert_eq!(
            q,
            r"'root' in parents and trashed=false and name='it\'s a\\b.txt' and mimeType!='application/vnd.google-apps.folder'"
        );
    }
}
