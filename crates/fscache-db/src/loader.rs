// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use crate::metadata::build_metadata;
use crate::pool::DbPool;
use crate::row::{FsEntryRow, FS_ENTRIES_QUERY};
use diesel::{sql_query, RunQueryDsl};
use fscache_store::Loader;
use fscache_types::{CacheError, CacheResult, Node, Tree, UserId};
use std::collections::HashMap;

/// Materializes a tenant's tree from the relational source of record.
/// Mirrors `buildUserFSTree`: query every row
/// owned by `user_id`, group children by `parent_uid`, identify the root as
/// the entry whose path has exactly one `/`, then hand the assembled tree
/// to the bottom-up hasher.
pub struct DbLoader {
    pool: DbPool,
}

impl DbLoader {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn fetch_rows(&self, user_id: UserId) -> anyhow::Result<Vec<FsEntryRow>> {
        match &self.pool {
            DbPool::Sqlite(pool) => {
                let mut conn = pool.get()?;
                Ok(sql_query(FS_ENTRIES_QUERY).bind::<diesel::sql_types::BigInt, _>(user_id).load(&mut conn)?)
            }
            DbPool::MySql(pool) => {
                let mut conn = pool.get()?;
                Ok(sql_query(FS_ENTRIES_QUERY).bind::<diesel::sql_types::BigInt, _>(user_id).load(&mut conn)?)
            }
        }
    }
}

impl Loader for DbLoader {
    fn load(&self, user_id: UserId) -> CacheResult<Tree> {
        let rows = self.fetch_rows(user_id).map_err(CacheError::Unavailable)?;

        let mut nodes: HashMap<String, Node> = HashMap::with_capacity(rows.len());
        let mut parent_children: HashMap<String, Vec<String>> = HashMap::new();
        let mut root_uuid: Option<String> = None;

        for row in &rows {
            let parent_uid = row.parent_uid.clone().unwrap_or_default();
            let fs_entry = build_metadata(row, user_id);
            let node = Node::new_leaf(row.uuid.clone(), parent_uid.clone(), fs_entry);

            if !parent_uid.is_empty() {
                parent_children.entry(parent_uid).or_default().push(row.uuid.clone());
            }

            if row.path.matches('/').count() == 1 {
                if root_uuid.is_some() {
                    return Err(CacheError::Unavailable(anyhow::anyhow!(
                        "multiple root candidates for user {user_id}: {} and {}",
                        root_uuid.unwrap(),
                        row.uuid
                    )));
                }
                root_uuid = Some(row.uuid.clone());
            }

            nodes.insert(row.uuid.clone(), node);
        }

        for (parent_uid, children) in parent_children {
            if let Some(parent) = nodes.get_mut(&parent_uid) {
                parent.children.extend(children);
            }
        }

        let root_uuid = root_uuid.ok_or_else(|| {
            CacheError::Unavailable(anyhow::anyhow!(
                "no root directory found for user {user_id} (expected exactly one path with a single '/')"
            ))
        })?;

        let mut tree = Tree::new(root_uuid, nodes);
        fscache_merkle::full_bottom_up_hash(&mut tree)?;
        Ok(tree)
    }
}
