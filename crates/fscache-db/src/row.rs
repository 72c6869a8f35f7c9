// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use diesel::sql_types::{Bool, Double, Nullable, Text};
use diesel::QueryableByName;

/// One row of the `fsentries` table, shaped the way `buildUserFSTree`
/// queries it. Optional columns come back `None`
/// when the source of record has them null; the metadata builder
/// (`crate::metadata`) fills in the synthesized keys the service always
/// attaches regardless of what the row itself carries.
#[derive(Debug, QueryableByName)]
pub struct FsEntryRow {
    #[diesel(sql_type = Text)]
    pub uuid: String,
    #[diesel(sql_type = Text)]
    pub name: String,
    #[diesel(sql_type = Bool)]
    pub is_dir: bool,
    #[diesel(sql_type = Nullable<diesel::sql_types::BigInt>)]
    pub size: Option<i64>,
    #[diesel(sql_type = Double)]
    pub created: f64,
    #[diesel(sql_type = Double)]
    pub modified: f64,
    #[diesel(sql_type = Nullable<Double>)]
    pub accessed: Option<f64>,
    #[diesel(sql_type = Text)]
    pub path: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub parent_uid: Option<String>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub is_public: Option<bool>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub is_shortcut: Option<bool>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub is_symlink: Option<bool>,
    #[diesel(sql_type = Nullable<Text>)]
    pub symlink_path: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub sort_by: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub sort_order: Option<String>,
    #[diesel(sql_type = Nullable<Bool>)]
    pub immutable: Option<bool>,
    #[diesel(sql_type = Nullable<Text>)]
    pub metadata: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub associated_app_id: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub public_token: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub file_request_token: Option<String>,
}

/// The query shape the loader issues against either backend. Column order
/// matches `FsEntryRow`'s field order, which diesel's `QueryableByName`
/// derive requires.
pub const FS_ENTRIES_QUERY: &str = "
    SELECT uuid, name, is_dir, size, created, modified, accessed, path, parent_uid,
           is_public, is_shortcut, is_symlink, symlink_path, sort_by, sort_order,
           immutable, metadata, associated_app_id, public_token, file_request_token
    FROM fsentries
    WHERE user_id = ?
";
