// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::row::FsEntryRow;
use fscache_types::{FsEntry, UserId};
use serde_json::{json, Map, Value};

/// Builds a node's metadata mapping from a source-of-record row, the way
/// the original service's `buildMetadata` did: the recognized keys of
/// §3/§6 plus the synthesized keys (`is_empty`, `dirname`/`dirpath`,
/// `owner.user_id`, and empty placeholder collections) that are not
/// columns but computed fields the original always attached.
pub fn build_metadata(row: &FsEntryRow, user_id: UserId) -> FsEntry {
    let parent_uid = row.parent_uid.clone().unwrap_or_default();
    let dirpath = dirname(&row.path);
    let is_empty = if row.is_dir {
        row.size.unwrap_or(0) == 0
    } else {
        false
    };

    let mut map: Map<String, Value> = Map::new();
    map.insert("is_empty".into(), json!(is_empty));
    map.insert("id".into(), json!(row.uuid));
    map.insert("uid".into(), json!(row.uuid));
    map.insert("associated_app_id".into(), opt_str(&row.associated_app_id));
    map.insert("public_token".into(), opt_str(&row.public_token));
    map.insert("file_request_token".into(), opt_str(&row.file_request_token));
    map.insert("parent_uid".into(), json!(parent_uid));
    map.insert("parent_id".into(), json!(row.parent_uid.clone().unwrap_or_default()));
    map.insert("is_dir".into(), json!(row.is_dir));
    map.insert("is_public".into(), opt_bool(&row.is_public));
    map.insert("is_shortcut".into(), json!(bool_to_int(row.is_shortcut)));
    map.insert("is_symlink".into(), json!(bool_to_int(row.is_symlink)));
    map.insert("symlink_path".into(), opt_str(&row.symlink_path));
    map.insert("sort_by".into(), opt_str(&row.sort_by));
    map.insert("sort_order".into(), opt_str(&row.sort_order));
    map.insert("immutable".into(), json!(bool_to_int(row.immutable)));
    map.insert("name".into(), json!(row.name));
    map.insert("metadata".into(), opt_str(&row.metadata));
    map.insert("modified".into(), json!(row.modified as i64));
    map.insert("created".into(), json!(row.created as i64));
    map.insert("accessed".into(), json!(row.accessed.unwrap_or(row.created) as i64));
    map.insert("size".into(), opt_i64(&row.size));
    map.insert("layout".into(), Value::Null);
    map.insert("path".into(), json!(row.path));
    map.insert("owner".into(), json!({ "user_id": user_id }));
    map.insert("type".into(), Value::Null);
    map.insert("subdomains".into(), json!([]));
    map.insert(
        "shares".into(),
        json!({ "users": Vec::<Value>::new(), "apps": Vec::<Value>::new() }),
    );
    map.insert("versions".into(), json!([]));
    map.insert("dirname".into(), json!(dirpath));
    map.insert("dirpath".into(), json!(dirpath));
    map.insert("writable".into(), json!(true));

    FsEntry::new(map)
}

fn opt_str(v: &Option<String>) -> Value {
    match v {
        Some(s) => json!(s),
        None => Value::Null,
    }
}

fn opt_bool(v: &Option<bool>) -> Value {
    match v {
        Some(b) => json!(b),
        None => Value::Null,
    }
}

fn opt_i64(v: &Option<i64>) -> Value {
    match v {
        Some(n) => json!(n),
        None => Value::Null,
    }
}

fn bool_to_int(v: Option<bool>) -> i64 {
    if v.unwrap_or(false) {
        1
    } else {
        0
    }
}

/// Mirrors Go's `filepath.Dir`: the parent of an absolute, `/`-separated
/// path. `dirname("/a/b") == "/a"`, `dirname("/a") == "/"`, `dirname("/") ==
/// "/"`.
fn dirname(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
        None => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> FsEntryRow {
        FsEntryRow {
            uuid: "n1".into(),
            name: "n1".into(),
            is_dir: false,
            size: Some(10),
            created: 1000.0,
            modified: 2000.0,
            accessed: None,
            path: "/a/n1".into(),
            parent_uid: Some("a".into()),
            is_public: None,
            is_shortcut: None,
            is_symlink: None,
            symlink_path: None,
            sort_by: None,
            sort_order: None,
            immutable: None,
            metadata: None,
            associated_app_id: None,
            public_token: None,
            file_request_token: None,
        }
    }

    #[test]
    fn dirname_matches_go_filepath_dir_semantics() {
        assert_eq!(dirname("/a/b"), "/a");
        assert_eq!(dirname("/a"), "/");
        assert_eq!(dirname("/"), "/");
    }

    #[test]
    fn builds_recognized_keys() {
        let entry = build_metadata(&row(), 42);
        assert_eq!(entry.uid(), Some("n1"));
        assert_eq!(entry.parent_uid(), Some("a"));
        assert_eq!(entry.path(), Some("/a/n1"));
        assert_eq!(entry.dirpath(), Some("/a"));
        assert_eq!(entry.name(), Some("n1"));
    }

    #[test]
    fn synthesizes_owner_and_placeholder_collections() {
        let entry = build_metadata(&row(), 42);
        assert_eq!(entry.metadata.get("owner").unwrap()["user_id"], json!(42));
        assert_eq!(entry.metadata.get("subdomains").unwrap(), &json!([]));
        assert_eq!(entry.metadata.get("versions").unwrap(), &json!([]));
    }

    #[test]
    fn empty_directory_with_zero_size_is_is_empty() {
        let mut r = row();
        r.is_dir = true;
        r.size = Some(0);
        let entry = build_metadata(&r, 1);
        assert_eq!(entry.metadata.get("is_empty").unwrap(), &json!(true));
    }

    #[test]
    fn non_empty_directory_is_not_is_empty() {
        let mut r = row();
        r.is_dir = true;
        r.size = Some(4096);
        let entry = build_metadata(&r, 1);
        assert_eq!(entry.metadata.get("is_empty").unwrap(), &json!(false));
    }
}
