pub mod db;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod repo;

use crate::error::Result;
use logomark_core::cache::DEFAULT_TTL_MILLIS;
use rusqlite::Connection;
use std::path::Path;

pub use repo::CacheRepo;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Logo cache with the given TTL and optional size bound.
    pub fn cache(&self, ttl_millis: i64, max_entries: Option<usize>) -> CacheRepo<'_> {
        CacheRepo::new(&self.conn, ttl_millis, max_entries)
    }

    pub fn default_cache(&self) -> CacheRepo<'_> {
        self.cache(DEFAULT_TTL_MILLIS, None)
    }
}
