use chrono::NaiveDateTime;
use rusqlite::types::Type;

use crate::rating::EntityId;

/// A ranking row as read back from either the snapshot or the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRanking {
    pub entity_id: EntityId,
    pub rank: usize,
    pub strength: f64,
    pub win_probability_vs_average: f64,
    pub recorded_at: NaiveDateTime,
}

/// Entity ids are stored as their JSON form so integer and text ids round-trip.
pub fn encode_entity(id: &EntityId) -> String {
    match id {
        EntityId::Int(id) => id.to_string(),
        EntityId::Text(id) => serde_json::Value::String(id.clone()).to_string(),
    }
}

pub fn decode_entity(column: usize, raw: &str) -> rusqlite::Result<EntityId> {
    serde_json::from_str(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

pub(crate) fn parse_stored_row(row: &rusqlite::Row) -> rusqlite::Result<StoredRanking> {
    let raw_id: String = row.get(0)?;
    let rank: i64 = row.get(1)?;

    Ok(StoredRanking {
        entity_id: decode_entity(0, &raw_id)?,
        rank: rank as usize,
        strength: row.get(2)?,
        win_probability_vs_average: row.get(3)?,
        recorded_at: row.get(4)?,
    })
}
