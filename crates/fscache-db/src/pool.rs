// Copyright (c) Kanari Network
// SPDX-License-Identifier: Apache-2.0

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{MysqlConnection, SqliteConnection};

/// The two source-of-record backends the loader supports. Mirrors the
/// `database.driver` switch between `sqlite3`
/// and `mysql`, realized here as connection pools rather than a single
/// `database/sql` handle, since diesel keeps each backend's connection type
/// distinct.
#[derive(Clone)]
pub enum DbPool {
    Sqlite(Pool<ConnectionManager<SqliteConnection>>),
    MySql(Pool<ConnectionManager<MysqlConnection>>),
}

impl DbPool {
    pub fn sqlite(database_url: &str) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| anyhow::anyhow!("failed to build sqlite connection pool: {e}"))?;
        Ok(DbPool::Sqlite(pool))
    }

    pub fn mysql(database_url: &str) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<MysqlConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| anyhow::anyhow!("failed to build mysql connection pool: {e}"))?;
        Ok(DbPool::MySql(pool))
    }
}
