use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use super::connection::DbConn;
use super::models::{StoredRanking, encode_entity, parse_stored_row};
use crate::errors::with_storage_context;
use crate::rating::{EntityId, RankingRow};

/// Appends one run's rows. Existing history is never touched.
pub fn append_run(conn: &mut DbConn, rows: &[RankingRow], run_at: NaiveDateTime) -> Result<usize> {
    let tx = conn.transaction().context("Failed to start history transaction")?;

    {
        let sql = "INSERT INTO ranking_history (entity_id, rank, strength, win_probability, run_at) VALUES (?1, ?2, ?3, ?4, ?5)";
        let mut stmt = tx.prepare(sql)?;
        for row in rows {
            let result = stmt.execute(params![
                encode_entity(&row.entity_id),
                row.rank as i64,
                row.strength,
                row.win_probability_vs_average,
                run_at
            ]);
            with_storage_context(result, "append to", "ranking_history")?;
        }
    }

    tx.commit().context("Failed to commit ranking history")?;
    Ok(rows.len())
}

pub fn list_for_entity(conn: &mut DbConn, entity_id: &EntityId) -> Result<Vec<StoredRanking>> {
    let sql = "SELECT entity_id, rank, strength, win_probability, run_at FROM ranking_history WHERE entity_id = ?1 ORDER BY run_at DESC, id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![encode_entity(entity_id)], parse_stored_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_runs(conn: &mut DbConn) -> Result<usize> {
    let sql = "SELECT COUNT(DISTINCT run_at) FROM ranking_history";
    let count: i64 = conn
        .query_row(sql, [], |row| row.get(0))
        .context("Failed to count ranking runs")?;
    Ok(count as usize)
}
