use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::rating::{RankingRow, RankingTable};

/// Current table. Persisting it replaces whatever snapshot was there before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingSnapshot {
    pub rows: Vec<RankingRow>,
    pub updated_at: NaiveDateTime,
}

/// The same rows tagged with the run time. Persisting it only ever appends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub rows: Vec<RankingRow>,
    pub run_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingPublication {
    pub snapshot: RankingSnapshot,
    pub history: HistoryEntry,
}

impl RankingPublication {
    pub fn from_table(table: &RankingTable, run_at: NaiveDateTime) -> Self {
        Self {
            snapshot: RankingSnapshot {
                rows: table.rows.clone(),
                updated_at: run_at,
            },
            history: HistoryEntry {
                rows: table.rows.clone(),
                run_at,
            },
        }
    }

    /// History first, so a failed snapshot swap still leaves the run on record.
    pub fn publish(&self, store: &mut impl RankingStore) -> Result<()> {
        store.append_history(&self.history)?;
        store.replace_snapshot(&self.snapshot)
    }
}

/// Persistence seam for ranking results.
pub trait RankingStore {
    fn replace_snapshot(&mut self, snapshot: &RankingSnapshot) -> Result<()>;
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{EntityId, RunStatistics, SolverStrategy};
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingStore {
        calls: Vec<&'static str>,
        snapshot_rows: usize,
        history_rows: usize,
    }

    impl RankingStore for RecordingStore {
        fn replace_snapshot(&mut self, snapshot: &RankingSnapshot) -> Result<()> {
            self.calls.push("replace");
            self.snapshot_rows = snapshot.rows.len();
            Ok(())
        }

        fn append_history(&mut self, entry: &HistoryEntry) -> Result<()> {
            self.calls.push("append");
            self.history_rows += entry.rows.len();
            Ok(())
        }
    }

    fn table() -> RankingTable {
        RankingTable {
            rows: vec![RankingRow {
                entity_id: EntityId::Int(1),
                rank: 1,
                strength: 1.0,
                win_probability_vs_average: 0.5,
            }],
            statistics: RunStatistics {
                total_records: 1,
                total_entities: 2,
                eligible_entities: 2,
                component_count: 1,
                connected_entities: 1,
                comparison_count: 1,
                synthetic_comparisons: 0,
                solver_strategy: SolverStrategy::Sparse,
                iterations: 1,
            },
        }
    }

    #[test]
    fn test_publish_appends_history_then_replaces_snapshot() {
        let run_at = NaiveDate::from_ymd_opt(2025, 11, 11)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let publication = RankingPublication::from_table(&table(), run_at);
        let mut store = RecordingStore::default();

        publication.publish(&mut store).unwrap();
        publication.publish(&mut store).unwrap();

        assert_eq!(store.calls, vec!["append", "replace", "append", "replace"]);
        assert_eq!(store.snapshot_rows, 1);
        assert_eq!(store.history_rows, 2);
        assert_eq!(publication.history.run_at, publication.snapshot.updated_at);
    }
}
