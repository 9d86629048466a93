pub mod models;
pub mod source;

pub use models::ContestRow;
pub use source::load_contest_records;
