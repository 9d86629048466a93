use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::info;
use serde::Serialize;

use super::publication::{RankingPublication, RankingStore};
use crate::config::settings::AppConfig;
use crate::domain;
use crate::rating::{self, ContestRecord, RankingRow, RankingTable, RunStatistics};

/// Outcome of one ranking run, as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_at: NaiveDateTime,
    pub persisted: bool,
    pub statistics: RunStatistics,
    pub top: Vec<RankingRow>,
}

pub struct ProcessingService {
    config: AppConfig,
}

impl ProcessingService {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.rating.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Loads, ranks and, when a store is given, publishes one snapshot.
    pub fn run<S: RankingStore>(&self, input: &Path, store: Option<&mut S>) -> Result<RunReport> {
        info!("=== Starting Ranking Run ===\n");

        // Step 1: Load contest records
        let records = domain::load_contest_records(input)?;

        // Step 2: Rank
        let table = self.rank_records(&records)?;
        let run_at = Utc::now().naive_utc();

        // Step 3: Publish snapshot and history
        let persisted = match store {
            Some(store) => {
                RankingPublication::from_table(&table, run_at).publish(store)?;
                true
            }
            None => {
                info!("  → Dry run, nothing persisted");
                false
            }
        };

        info!("=== Ranking Run Complete ===");
        Ok(self.build_report(table, run_at, persisted))
    }

    pub fn rank_records(&self, records: &[ContestRecord]) -> Result<RankingTable> {
        let table = rating::calculate_rankings(records, &self.config.rating)?;
        self.log_top(&table);
        Ok(table)
    }

    fn log_top(&self, table: &RankingTable) {
        info!(
            "  → Ranked {} of {} entities",
            table.rows.len(),
            table.statistics.total_entities
        );
        for row in table.top(5) {
            info!(
                "    #{} {} (strength {:.4}, p={:.4})",
                row.rank, row.entity_id, row.strength, row.win_probability_vs_average
            );
        }
    }

    fn build_report(&self, table: RankingTable, run_at: NaiveDateTime, persisted: bool) -> RunReport {
        let top = table.top(self.config.output.top_n).to_vec();

        RunReport {
            run_at,
            persisted,
            statistics: table.statistics,
            top,
        }
    }
}
