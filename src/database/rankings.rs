use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;

use super::connection::DbConn;
use super::models::{StoredRanking, encode_entity, parse_stored_row};
use crate::errors::with_storage_context;
use crate::rating::RankingRow;

/// Replaces the whole current snapshot inside one transaction.
pub fn replace_current(conn: &mut DbConn, rows: &[RankingRow], updated_at: NaiveDateTime) -> Result<usize> {
    let tx = conn.transaction().context("Failed to start snapshot transaction")?;
    with_storage_context(tx.execute("DELETE FROM rankings", []), "clear", "rankings")?;

    {
        let sql = "INSERT INTO rankings (entity_id, rank, strength, win_probability, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)";
        let mut stmt = tx.prepare(sql)?;
        for row in rows {
            let result = stmt.execute(params![
                encode_entity(&row.entity_id),
                row.rank as i64,
                row.strength,
                row.win_probability_vs_average,
                updated_at
            ]);
            with_storage_context(result, "insert into", "rankings")?;
        }
    }

    tx.commit().context("Failed to commit ranking snapshot")?;
    Ok(rows.len())
}

pub fn list_current(conn: &mut DbConn, limit: Option<usize>) -> Result<Vec<StoredRanking>> {
    let sql = "SELECT entity_id, rank, strength, win_probability, updated_at FROM rankings ORDER BY rank ASC LIMIT ?1";
    let limit = limit.map(|l| l as i64).unwrap_or(-1);

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![limit], parse_stored_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
