pub mod connection;
pub mod history;
pub mod models;
pub mod rankings;
pub mod setup;
pub mod store;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::StoredRanking;
pub use store::SqliteRankingStore;
