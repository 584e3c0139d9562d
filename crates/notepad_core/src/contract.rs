//! External contract of the notes store.
//!
//! # Responsibility
//! - Name every externally visible identifier: authority, paths, columns,
//!   MIME types and the default sort order.
//!
//! # Invariants
//! - External column names are stable even if storage layout changes.
//! - Values here are part of the public contract; renaming one is a breaking
//!   change for every caller.

/// Default authority used when the host does not configure one.
pub const DEFAULT_AUTHORITY: &str = "com.google.provider.NotePad";

/// URI scheme accepted by the router.
pub const SCHEME: &str = "content";

/// Physical table name.
pub const TABLE_NAME: &str = "notes";

/// Path of the notes collection.
pub const PATH_NOTES: &str = "notes";

/// Path of the live folder view over the collection.
pub const PATH_LIVE_FOLDER_NOTES: &str = "live_folders/notes";

/// Note columns, in storage order.
pub mod columns {
    pub const ID: &str = "_id";
    pub const TITLE: &str = "title";
    pub const NOTE: &str = "note";
    pub const CREATED: &str = "created";
    pub const MODIFIED: &str = "modified";
    pub const BACKGROUND_COLOR: &str = "background_color";

    pub const ALL: [&str; 6] = [ID, TITLE, NOTE, CREATED, MODIFIED, BACKGROUND_COLOR];
}

/// Columns exposed by the live folder view.
pub mod live_folder_columns {
    pub const ID: &str = "_id";
    pub const NAME: &str = "name";
}

/// MIME type of a note collection (and of the live folder view).
pub const CONTENT_TYPE: &str = "vnd.android.cursor.dir/vnd.google.note";

/// MIME type of a single note.
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/vnd.google.note";

/// The only stream type a single note can be exported as.
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// Applied whenever a query leaves the sort order blank.
pub const DEFAULT_SORT_ORDER: &str = "modified DESC";

/// Alphabetical order offered by the list screen.
pub const TITLE_SORT_ORDER: &str = "title ASC";

/// Background color stamped on notes created without one.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
