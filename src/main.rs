use anyhow::Result;

use bt_rankings::cli::Command;
use bt_rankings::{handle_completions, handle_history, handle_rank, handle_show, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Rank(args) => handle_rank(args),
        Command::Show { db, top } => handle_show(db.as_deref(), *top),
        Command::History { entity, db } => handle_history(entity, db.as_deref()),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
