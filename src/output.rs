//! Output formatting: terminal tables and JSON.
use anyhow::Result;
use colored::Colorize;

use crate::database::StoredRanking;
use crate::rating::{EntityId, RankingRow};
use crate::services::RunReport;

pub fn print_report(report: &RunReport) {
    let stats = &report.statistics;

    print_rows(&report.top);
    println!(
        "\n{} of {} entities ranked ({} eligible, {} components) from {} records",
        stats.connected_entities.to_string().bold(),
        stats.total_entities,
        stats.eligible_entities,
        stats.component_count,
        stats.total_records,
    );
    println!(
        "{} comparisons ({} synthetic), {} solver, {} iterations",
        stats.comparison_count,
        stats.synthetic_comparisons,
        stats.solver_strategy.as_str(),
        stats.iterations,
    );

    if report.persisted {
        println!("{}", format!("Saved snapshot and history at {}", report.run_at).green());
    } else {
        println!("{}", "Dry run: nothing saved".yellow());
    }
}

pub fn print_json(report: &RunReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_rows(rows: &[RankingRow]) {
    let width = entity_width(rows.iter().map(|r| &r.entity_id));

    print_header(width);
    for row in rows {
        print_line(row.rank, &row.entity_id, row.strength, row.win_probability_vs_average, width);
    }
}

pub fn print_stored(rows: &[StoredRanking]) {
    if rows.is_empty() {
        println!("{}", "No rankings stored yet".yellow());
        return;
    }

    let width = entity_width(rows.iter().map(|r| &r.entity_id));
    print_header(width);
    for row in rows {
        print_line(row.rank, &row.entity_id, row.strength, row.win_probability_vs_average, width);
    }
    println!("\nUpdated at {}", rows[0].recorded_at);
}

pub fn print_history(entity_id: &EntityId, rows: &[StoredRanking]) {
    if rows.is_empty() {
        println!("{}", format!("No history for {}", entity_id).yellow());
        return;
    }

    println!("{}", format!("Ranking history of {}", entity_id).bold());
    println!("{:<20} | Rank |  Strength | P(vs avg)", "Run");
    println!("{}", "-".repeat(52));
    for row in rows {
        println!(
            "{:<20} | {:>4} | {:>9.4} | {:>9.4}",
            row.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            row.rank,
            row.strength,
            row.win_probability_vs_average,
        );
    }
}

fn entity_width<'a>(ids: impl Iterator<Item = &'a EntityId>) -> usize {
    ids.map(|id| id.to_string().len()).max().unwrap_or(6).max(6)
}

fn print_header(width: usize) {
    println!("{:>4} | {:<width$} |  Strength | P(vs avg)", "Rank".bold(), "Entity".bold());
    println!("{}", "-".repeat(width + 30));
}

fn print_line(rank: usize, entity_id: &EntityId, strength: f64, probability: f64, width: usize) {
    let rank = if rank <= 3 {
        rank.to_string().green().bold()
    } else {
        rank.to_string().normal()
    };

    println!(
        "{:>4} | {:<width$} | {:>9.4} | {:>9.4}",
        rank,
        entity_id.to_string(),
        strength,
        probability,
    );
}
