use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::config::settings::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "bt-rankings", author, version, about = "Bradley-Terry rankings from pairwise contest results")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Rank entities from a JSON file of contest records and store the result
    Rank(RankArgs),
    /// Print the current ranking snapshot
    Show {
        /// Database path (defaults to $DATABASE_PATH or bt_rankings.db)
        #[arg(long)]
        db: Option<String>,
        /// Number of rows to print
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Print every stored ranking of one entity
    History {
        /// Entity identifier
        #[arg(short, long)]
        entity: String,
        /// Database path (defaults to $DATABASE_PATH or bt_rankings.db)
        #[arg(long)]
        db: Option<String>,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RankArgs {
    /// JSON file with an array of contest records
    #[arg(short, long)]
    pub input: PathBuf,
    /// Database path (defaults to $DATABASE_PATH or bt_rankings.db)
    #[arg(long)]
    pub db: Option<String>,
    /// Weight results by margin of victory
    #[arg(long)]
    pub margin_weighting: bool,
    /// Skip the synthetic result injected for perfect records
    #[arg(long)]
    pub no_regularization: bool,
    /// Minimum number of contests an entity needs to be ranked
    #[arg(long)]
    pub min_activity: Option<u32>,
    /// Regularization term added to every pair in the solver
    #[arg(long)]
    pub alpha: Option<f64>,
    /// Largest repetition count a single result can receive
    #[arg(long)]
    pub margin_cap: Option<f64>,
    /// Solver iteration limit
    #[arg(long)]
    pub max_iterations: Option<usize>,
    /// Solver convergence tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Number of rows to print
    #[arg(short, long)]
    pub top: Option<usize>,
    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
    /// Rank without writing to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl RankArgs {
    /// Applies command line overrides on top of the defaults.
    pub fn apply(&self, config: &mut AppConfig) {
        let rating = &mut config.rating;
        rating.enable_margin_weighting |= self.margin_weighting;
        if self.no_regularization {
            rating.enable_degenerate_record_regularization = false;
        }
        if let Some(threshold) = self.min_activity {
            rating.minimum_activity_threshold = threshold;
        }
        if let Some(alpha) = self.alpha {
            rating.regularization_alpha = alpha;
        }
        if let Some(cap) = self.margin_cap {
            rating.margin_weight_cap = cap;
        }
        if let Some(iterations) = self.max_iterations {
            rating.solver_max_iterations = iterations;
        }
        if let Some(tolerance) = self.tolerance {
            rating.solver_tolerance = tolerance;
        }
        if let Some(db) = &self.db {
            config.storage.database_path = db.clone();
        }
        if let Some(top) = self.top {
            config.output.top_n = top;
        }
    }
}
