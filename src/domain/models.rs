use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::rating::{ContestRecord, EntityId};

/// Contest row as exported by the data-access layer.
///
/// Accepts both the neutral `side_a`/`side_b` naming and the home/away
/// naming of the pairwise comparison export.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContestRow {
    #[serde(alias = "home_team_id")]
    pub side_a_id: EntityId,
    #[serde(alias = "away_team_id")]
    pub side_b_id: EntityId,
    #[serde(alias = "home_won", deserialize_with = "deserialize_flag")]
    pub a_won: bool,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub margin: Option<f64>,
    #[serde(default, alias = "home_score", deserialize_with = "deserialize_lenient_number")]
    pub score_a: Option<f64>,
    #[serde(default, alias = "away_score", deserialize_with = "deserialize_lenient_number")]
    pub score_b: Option<f64>,
}

impl ContestRow {
    /// Converts to an engine record, deriving the margin from the scores
    /// when no explicit margin was given.
    pub fn into_record(self) -> ContestRecord {
        let margin = self.margin.or_else(|| self.score_margin());

        ContestRecord {
            side_a_id: self.side_a_id,
            side_b_id: self.side_b_id,
            a_won: self.a_won,
            margin: margin.filter(|m| *m >= 0.0),
        }
    }

    fn score_margin(&self) -> Option<f64> {
        match (self.score_a, self.score_b) {
            (Some(a), Some(b)) => Some((a - b).abs()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => Ok(flag),
        Flag::Int(flag) => Ok(flag != 0),
    }
}

/// Numbers and numeric strings are kept, anything else reads as missing.
fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }).filter(|n| n.is_finite()))
}
