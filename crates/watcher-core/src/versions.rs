//! Reserved document version values shared with the storage layer.

/// Accept whatever version is currently stored.
pub const MATCH_ANY: i64 = -3;

/// Only match a document that has been deleted.
pub const MATCH_DELETED: i64 = -4;

/// The document does not exist.
pub const NOT_FOUND: i64 = -1;
