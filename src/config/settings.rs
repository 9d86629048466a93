use anyhow::{Result, ensure};

pub struct RatingSettings {
    pub minimum_activity_threshold: u32,
    pub regularization_alpha: f64,
    pub enable_margin_weighting: bool,
    pub enable_degenerate_record_regularization: bool,
    pub margin_weight_cap: f64,
    pub solver_max_iterations: usize,
    pub solver_tolerance: f64,
    pub stationary_max_iterations: usize,
    pub stationary_tolerance: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            minimum_activity_threshold: 4,
            regularization_alpha: 0.01,
            enable_margin_weighting: false,
            enable_degenerate_record_regularization: true,
            margin_weight_cap: 3.0,
            solver_max_iterations: 100,
            solver_tolerance: 1e-8,
            stationary_max_iterations: 10_000,
            stationary_tolerance: 1e-12,
        }
    }
}

impl RatingSettings {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.regularization_alpha >= 0.0 && self.regularization_alpha.is_finite(),
            "regularization_alpha must be a non-negative number, got {}",
            self.regularization_alpha
        );
        ensure!(
            self.margin_weight_cap >= 1.0 && self.margin_weight_cap.is_finite(),
            "margin_weight_cap must be at least 1.0, got {}",
            self.margin_weight_cap
        );
        ensure!(
            self.solver_tolerance > 0.0 && self.stationary_tolerance > 0.0,
            "solver tolerances must be positive"
        );
        ensure!(
            self.solver_max_iterations > 0 && self.stationary_max_iterations > 0,
            "solver iteration limits must be positive"
        );
        Ok(())
    }
}

pub struct StorageSettings {
    pub database_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "bt_rankings.db".to_string()),
        }
    }
}

pub struct OutputSettings {
    pub top_n: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { top_n: 25 }
    }
}

pub struct AppConfig {
    pub rating: RatingSettings,
    pub storage: StorageSettings,
    pub output: OutputSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            storage: StorageSettings::default(),
            output: OutputSettings::default(),
        }
    }
}
