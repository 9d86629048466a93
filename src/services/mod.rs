pub mod processing;
pub mod publication;

pub use processing::{ProcessingService, RunReport};
pub use publication::{HistoryEntry, RankingPublication, RankingSnapshot, RankingStore};
