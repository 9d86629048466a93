use anyhow::Result;
use log::info;

use super::connection::{DbPool, create_memory_pool, create_pool, get_connection};
use super::models::StoredRanking;
use super::{history, rankings, setup};
use crate::rating::EntityId;
use crate::services::publication::{HistoryEntry, RankingSnapshot, RankingStore};

/// SQLite-backed ranking store: `rankings` holds the current snapshot,
/// `ranking_history` the append-only log.
pub struct SqliteRankingStore {
    pool: DbPool,
}

impl SqliteRankingStore {
    pub fn open(database_path: &str) -> Result<Self> {
        Self::with_pool(create_pool(database_path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_pool(create_memory_pool()?)
    }

    fn with_pool(pool: DbPool) -> Result<Self> {
        let mut conn = get_connection(&pool)?;
        setup::ensure_schema(&mut conn)?;
        drop(conn);
        Ok(Self { pool })
    }

    pub fn current(&self, limit: Option<usize>) -> Result<Vec<StoredRanking>> {
        let mut conn = get_connection(&self.pool)?;
        rankings::list_current(&mut conn, limit)
    }

    pub fn history_for(&self, entity_id: &EntityId) -> Result<Vec<StoredRanking>> {
        let mut conn = get_connection(&self.pool)?;
        history::list_for_entity(&mut conn, entity_id)
    }

    pub fn run_count(&self) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        history::count_runs(&mut conn)
    }
}

impl RankingStore for SqliteRankingStore {
    fn replace_snapshot(&mut self, snapshot: &RankingSnapshot) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let written = rankings::replace_current(&mut conn, &snapshot.rows, snapshot.updated_at)?;
        info!("  → Replaced current rankings with {} rows", written);
        Ok(())
    }

    fn append_history(&mut self, entry: &HistoryEntry) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let written = history::append_run(&mut conn, &entry.rows, entry.run_at)?;
        info!("  → Appended {} rows to ranking history", written);
        Ok(())
    }
}
