pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod output;
pub mod rating;
pub mod services;

use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::cli::{Command, RankArgs};
use crate::config::settings::AppConfig;
use crate::database::SqliteRankingStore;
use crate::rating::EntityId;
use crate::services::ProcessingService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_rank(args: &RankArgs) -> Result<()> {
    let mut config = AppConfig::new();
    args.apply(&mut config);

    let database_path = config.storage.database_path.clone();
    let service = ProcessingService::new(config)?;

    let report = if args.dry_run {
        service.run::<SqliteRankingStore>(&args.input, None)?
    } else {
        let mut store = SqliteRankingStore::open(&database_path)?;
        service.run(&args.input, Some(&mut store))?
    };

    if args.json {
        output::print_json(&report)
    } else {
        output::print_report(&report);
        Ok(())
    }
}

pub fn handle_show(db: Option<&str>, top: Option<usize>) -> Result<()> {
    let store = open_store(db)?;
    let limit = top.unwrap_or(AppConfig::new().output.top_n);
    output::print_stored(&store.current(Some(limit))?);
    Ok(())
}

pub fn handle_history(entity: &str, db: Option<&str>) -> Result<()> {
    let store = open_store(db)?;
    let entity_id: EntityId = entity.parse()?;
    output::print_history(&entity_id, &store.history_for(&entity_id)?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}

fn open_store(db: Option<&str>) -> Result<SqliteRankingStore> {
    let path = match db {
        Some(path) => path.to_string(),
        None => AppConfig::new().storage.database_path,
    };
    SqliteRankingStore::open(&path)
}
