use crate::errors::RatingError;

use super::types::{Comparison, ContestRecord, DenseIndex, EntityIndex, IndexedRecord};

/// Contest records rewritten onto a dense index space.
#[derive(Debug, Clone)]
pub struct IndexedContests {
    pub index: EntityIndex,
    pub records: Vec<IndexedRecord>,
}

/// Assigns dense indices in order of first appearance and rewrites every record.
pub fn index_records(records: &[ContestRecord]) -> Result<IndexedContests, RatingError> {
    let mut index = EntityIndex::new();
    let mut indexed = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        if record.side_a_id == record.side_b_id {
            return Err(RatingError::InvalidRecord {
                position,
                entity: record.side_a_id.to_string(),
            });
        }

        indexed.push(IndexedRecord {
            side_a: index.intern(&record.side_a_id),
            side_b: index.intern(&record.side_b_id),
            a_won: record.a_won,
            margin: record.margin,
        });
    }

    Ok(IndexedContests {
        index,
        records: indexed,
    })
}

/// A subset of a parent index space, re-densified.
///
/// Restricted indices follow ascending parent order, so processing order
/// survives every restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRestriction {
    parents: Vec<DenseIndex>,
    restricted: Vec<Option<DenseIndex>>,
}

impl IndexRestriction {
    pub fn keep(parent_len: usize, predicate: impl Fn(DenseIndex) -> bool) -> Self {
        let mut parents = Vec::new();
        let mut restricted = vec![None; parent_len];

        for parent in 0..parent_len {
            if predicate(parent) {
                restricted[parent] = Some(parents.len());
                parents.push(parent);
            }
        }

        Self {
            parents,
            restricted,
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parent_of(&self, index: DenseIndex) -> Option<DenseIndex> {
        self.parents.get(index).copied()
    }

    pub fn restrict(&self, parent: DenseIndex) -> Option<DenseIndex> {
        self.restricted.get(parent).copied().flatten()
    }

    /// Keeps comparisons whose both sides survive, remapped into the restricted space.
    pub fn restrict_comparisons(&self, comparisons: &[Comparison]) -> Vec<Comparison> {
        comparisons
            .iter()
            .filter_map(|c| {
                let winner = self.restrict(c.winner)?;
                let loser = self.restrict(c.loser)?;
                Some(Comparison::new(winner, loser))
            })
            .collect()
    }

    /// Chains `inner`, which restricts this restriction's space, into one mapping
    /// from `inner`'s indices straight back to this restriction's parents.
    pub fn then(&self, inner: &IndexRestriction) -> IndexRestriction {
        let parents: Vec<DenseIndex> = inner.parents.iter().map(|&mid| self.parents[mid]).collect();
        let mut restricted = vec![None; self.restricted.len()];

        for (index, &parent) in parents.iter().enumerate() {
            restricted[parent] = Some(index);
        }

        IndexRestriction {
            parents,
            restricted,
        }
    }
}
