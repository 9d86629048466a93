use anyhow::{Context, Result, ensure};
use rusqlite::Transaction;

use super::connection::DbConn;

const SCHEMA: &str = include_str!("schema.sql");
const REQUIRED_TABLES: [&str; 2] = ["rankings", "ranking_history"];

/// Creates any missing ranking tables. Existing rows are left alone.
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    let tx = conn.transaction().context("Failed to start schema transaction")?;

    for (idx, statement) in schema_statements(SCHEMA).enumerate() {
        apply_statement(&tx, statement)
            .with_context(|| format!("Failed to apply schema statement {}", idx + 1))?;
    }

    for table in REQUIRED_TABLES {
        ensure!(table_exists(&tx, table)?, "Schema is missing table: {}", table);
    }

    tx.commit().context("Failed to commit schema")?;
    log::debug!("Ranking schema is in place");
    Ok(())
}

fn schema_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}

fn apply_statement(tx: &Transaction, sql: &str) -> Result<()> {
    tx.execute(sql, []).context("Failed to execute SQL statement")?;
    Ok(())
}

fn table_exists(tx: &Transaction, table: &str) -> Result<bool> {
    let count: i64 = tx
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to look up table: {}", table))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::{create_memory_pool, get_connection};

    #[test]
    fn test_statements_skip_blank_chunks() {
        let statements: Vec<&str> = schema_statements("CREATE TABLE a (x INT);\n\n;CREATE TABLE b (y INT);").collect();
        assert_eq!(statements, vec!["CREATE TABLE a (x INT)", "CREATE TABLE b (y INT)"]);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();

        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();

        let tx = conn.transaction().unwrap();
        assert!(table_exists(&tx, "ranking_history").unwrap());
        assert!(!table_exists(&tx, "games").unwrap());
    }
}
