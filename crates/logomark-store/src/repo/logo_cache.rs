use crate::error::{Result, StoreError};
use logomark_core::{CacheEntry, LogoCache, NormalizedKey};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

/// SQLite-backed [`LogoCache`], shared by every process using the same file.
///
/// The `try_*` methods surface SQL errors; the [`LogoCache`] impl logs them
/// and degrades to a miss or a skipped write.
pub struct CacheRepo<'a> {
    conn: &'a Connection,
    ttl_millis: i64,
    max_entries: Option<usize>,
}

impl<'a> CacheRepo<'a> {
    pub fn new(conn: &'a Connection, ttl_millis: i64, max_entries: Option<usize>) -> Self {
        Self {
            conn,
            ttl_millis: ttl_millis.max(1),
            max_entries: max_entries.map(|max| max.max(1)),
        }
    }

    pub fn try_peek(&self, key: &NormalizedKey) -> Result<Option<CacheEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT url, timestamp FROM logo_cache WHERE key = ?1;",
                [key.as_str()],
                |row| Ok(CacheEntry::new(row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(entry)
    }

    pub fn try_set_at(&self, key: &NormalizedKey, url: Option<&str>, now: i64) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey);
        }
        let tx = self.conn.unchecked_transaction()?;
        if let Some(max) = self.max_entries {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT 1 FROM logo_cache WHERE key = ?1;",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            let count: i64 =
                tx.query_row("SELECT COUNT(*) FROM logo_cache;", [], |row| row.get(0))?;
            if exists.is_none() && count >= max as i64 {
                tx.execute(
                    "DELETE FROM logo_cache
                     WHERE key = (SELECT key FROM logo_cache ORDER BY timestamp ASC, key ASC LIMIT 1);",
                    [],
                )?;
            }
        }
        tx.execute(
            "INSERT INTO logo_cache (key, url, timestamp) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET url = excluded.url, timestamp = excluded.timestamp;",
            params![key.as_str(), url, now],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn try_entries(&self) -> Result<Vec<(NormalizedKey, CacheEntry)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, url, timestamp FROM logo_cache ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get(0)?;
            let entry = CacheEntry::new(row.get(1)?, row.get(2)?);
            items.push((NormalizedKey::new(&key), entry));
        }
        Ok(items)
    }

    pub fn try_remove(&self, key: &NormalizedKey) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM logo_cache WHERE key = ?1;", [key.as_str()])?;
        Ok(removed > 0)
    }

    pub fn try_clear(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM logo_cache;", [])?)
    }

    pub fn try_prune_expired(&self, now: i64) -> Result<usize> {
        let cutoff = now.saturating_sub(self.ttl_millis);
        Ok(self.conn.execute(
            "DELETE FROM logo_cache WHERE timestamp <= ?1;",
            [cutoff],
        )?)
    }
}

impl LogoCache for CacheRepo<'_> {
    fn ttl_millis(&self) -> i64 {
        self.ttl_millis
    }

    fn peek(&self, key: &NormalizedKey) -> Option<CacheEntry> {
        self.try_peek(key).unwrap_or_else(|err| {
            warn!(key = %key, error = %err, "logo cache read failed");
            None
        })
    }

    fn set_at(&self, key: &NormalizedKey, url: Option<&str>, now: i64) {
        if key.is_empty() {
            return;
        }
        if let Err(err) = self.try_set_at(key, url, now) {
            warn!(key = %key, error = %err, "logo cache write failed");
        }
    }

    fn entries(&self) -> Vec<(NormalizedKey, CacheEntry)> {
        self.try_entries().unwrap_or_else(|err| {
            warn!(error = %err, "logo cache listing failed");
            Vec::new()
        })
    }

    fn remove(&self, key: &NormalizedKey) -> bool {
        self.try_remove(key).unwrap_or_else(|err| {
            warn!(key = %key, error = %err, "logo cache delete failed");
            false
        })
    }

    fn clear(&self) -> usize {
        self.try_clear().unwrap_or_else(|err| {
            warn!(error = %err, "logo cache clear failed");
            0
        })
    }

    fn prune_expired(&self, now: i64) -> usize {
        self.try_prune_expired(now).unwrap_or_else(|err| {
            warn!(error = %err, "logo cache prune failed");
            0
        })
    }
}
