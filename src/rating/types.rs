use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type DenseIndex = usize;
pub type Strength = f64;

/// Opaque external identifier of a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Int(id) => write!(f, "{}", id),
            EntityId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Integers parse as `Int`, everything else as `Text`.
impl FromStr for EntityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.trim()
            .parse::<i64>()
            .map(EntityId::Int)
            .unwrap_or_else(|_| EntityId::Text(s.to_string())))
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Int(id)
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        EntityId::Int(i64::from(id))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

/// One observed pairwise result, as handed over by the data-access layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRecord {
    pub side_a_id: EntityId,
    pub side_b_id: EntityId,
    pub a_won: bool,
    /// Non-negative magnitude of the score differential.
    #[serde(default)]
    pub margin: Option<f64>,
}

impl ContestRecord {
    pub fn new(side_a_id: impl Into<EntityId>, side_b_id: impl Into<EntityId>, a_won: bool) -> Self {
        Self {
            side_a_id: side_a_id.into(),
            side_b_id: side_b_id.into(),
            a_won,
            margin: None,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }
}

/// A contest record rewritten onto dense indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedRecord {
    pub side_a: DenseIndex,
    pub side_b: DenseIndex,
    pub a_won: bool,
    pub margin: Option<f64>,
}

impl IndexedRecord {
    pub fn winner(&self) -> DenseIndex {
        if self.a_won { self.side_a } else { self.side_b }
    }

    pub fn loser(&self) -> DenseIndex {
        if self.a_won { self.side_b } else { self.side_a }
    }
}

/// Directed winner -> loser pair. Repeated entries encode weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparison {
    pub winner: DenseIndex,
    pub loser: DenseIndex,
}

impl Comparison {
    pub fn new(winner: DenseIndex, loser: DenseIndex) -> Self {
        Self { winner, loser }
    }
}

/// Bidirectional mapping between external identifiers and dense indices.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    ids: Vec<EntityId>,
    positions: HashMap<EntityId, DenseIndex>,
}

impl EntityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dense index of `id`, assigning the next free one on first sight.
    pub fn intern(&mut self, id: &EntityId) -> DenseIndex {
        if let Some(&index) = self.positions.get(id) {
            return index;
        }

        let index = self.ids.len();
        self.ids.push(id.clone());
        self.positions.insert(id.clone(), index);
        index
    }

    pub fn index_of(&self, id: &EntityId) -> Option<DenseIndex> {
        self.positions.get(id).copied()
    }

    pub fn id_of(&self, index: DenseIndex) -> Option<&EntityId> {
        self.ids.get(index)
    }

    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Which solver representation produced the strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverStrategy {
    Sparse,
    Dense,
}

impl SolverStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            SolverStrategy::Sparse => "sparse",
            SolverStrategy::Dense => "dense",
        }
    }
}

/// One line of the ranked output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub entity_id: EntityId,
    pub rank: usize,
    pub strength: Strength,
    pub win_probability_vs_average: f64,
}

/// Headline figures of a single engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_records: usize,
    pub total_entities: usize,
    pub eligible_entities: usize,
    pub component_count: usize,
    pub connected_entities: usize,
    pub comparison_count: usize,
    pub synthetic_comparisons: usize,
    pub solver_strategy: SolverStrategy,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    pub rows: Vec<RankingRow>,
    pub statistics: RunStatistics,
}

impl RankingTable {
    pub fn top(&self, n: usize) -> &[RankingRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn find(&self, id: &EntityId) -> Option<&RankingRow> {
        self.rows.iter().find(|row| &row.entity_id == id)
    }
}
