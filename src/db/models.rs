//! Database models.

use diesel::prelude::*;

use crate::db::schema;

/// Row written to the key-value table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::kv_store)]
pub struct KvEntry<'a> {
    key: &'a str,
    value: &'a str,
}

impl<'a> KvEntry<'a> {
    /// Creates a row for `key` holding `value`.
    pub fn new(key: &'a str, value: &'a str) -> Self {
        Self { key, value }
    }
}
