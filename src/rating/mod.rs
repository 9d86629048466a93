pub mod bradley_terry;
mod convergence;
pub mod eligibility;
pub mod engine;
pub mod indexing;
pub mod projection;
pub mod regularization;
pub mod types;
pub mod weighting;

pub use engine::calculate_rankings;
pub use types::{ContestRecord, EntityId, RankingRow, RankingTable, RunStatistics, SolverStrategy};
pub use weighting::calculate_weight;
