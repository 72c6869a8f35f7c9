// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recognized metadata keys. Any other key present in `FsEntry::metadata` is
/// preserved verbatim but never interpreted by the cache.
pub const KEY_UID: &str = "uid";
pub const KEY_PARENT_UID: &str = "parent_uid";
pub const KEY_PATH: &str = "path";
pub const KEY_DIRPATH: &str = "dirpath";
pub const KEY_NAME: &str = "name";

/// Opaque payload describing one filesystem entry. The metadata mapping is
/// schema-flexible by design: the upstream producer controls the vocabulary,
/// so the cache must not prune unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FsEntry {
    pub metadata: Map<String, Value>,
}

impl FsEntry {
    pub fn new(metadata: Map<String, Value>) -> Self {
        Self { metadata }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key)?.as_str()
    }

    pub fn uid(&self) -> Option<&str> {
        self.str_field(KEY_UID)
    }

    pub fn parent_uid(&self) -> Option<&str> {
        self.str_field(KEY_PARENT_UID)
    }

    pub fn path(&self) -> Option<&str> {
        self.str_field(KEY_PATH)
    }

    pub fn dirpath(&self) -> Option<&str> {
        self.str_field(KEY_DIRPATH)
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field(KEY_NAME)
    }
}
