pub mod settings;

pub use settings::{AppConfig, OutputSettings, RatingSettings, StorageSettings};
