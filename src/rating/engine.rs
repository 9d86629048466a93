use log::info;

use super::bradley_terry::fit_strengths;
use super::eligibility::filter_comparisons;
use super::indexing::index_records;
use super::projection::project_rankings;
use super::regularization::{RegularizedComparisons, regularize_perfect_records};
use super::types::{ContestRecord, RankingRow, RankingTable, RunStatistics};
use super::weighting::weight_records;
use crate::config::settings::RatingSettings;
use crate::errors::RatingError;

/// Runs the whole rating pipeline over one snapshot of contest records.
///
/// Either every entity of the largest connected, active component receives a
/// rank, or the run fails as a whole.
pub fn calculate_rankings(
    records: &[ContestRecord],
    config: &RatingSettings,
) -> Result<RankingTable, RatingError> {
    info!("Calculating rankings for {} contest records", records.len());

    // 1. Map entity ids to dense indices
    let indexed = index_records(records)?;
    info!("  → Found {} unique entities", indexed.index.len());

    // 2. Expand results into weighted comparisons
    let weighted = weight_records(&indexed.records, config);
    info!(
        "  → {} comparisons (average weight {:.3})",
        weighted.comparisons.len(),
        weighted.average_weight()
    );

    // 3. Drop inactive entities and keep the largest connected component
    let subset = filter_comparisons(indexed.index.len(), &weighted, config)?;
    let entity_count = subset.entity_count();

    // 4. Offset perfect records
    let regularized = if config.enable_degenerate_record_regularization {
        regularize_perfect_records(entity_count, &subset.comparisons)
    } else {
        RegularizedComparisons {
            comparisons: subset.comparisons.clone(),
            synthetic: 0,
        }
    };

    // 5. Fit strengths
    let fit = fit_strengths(entity_count, &regularized.comparisons, config)?;
    log_strength_stats(&fit.strengths);

    // 6. Project onto win probability vs average and rank
    let rows = project_rankings(&fit.strengths)
        .into_iter()
        .map(|projected| {
            let entity_id = subset
                .restriction
                .parent_of(projected.index)
                .and_then(|i| indexed.index.id_of(i))
                .cloned()
                .ok_or_else(|| RatingError::NumericalInstability {
                    entity_count,
                    comparison_count: regularized.comparisons.len(),
                    reason: format!("solved index {} has no entity", projected.index),
                })?;

            Ok(RankingRow {
                entity_id,
                rank: projected.rank,
                strength: projected.strength,
                win_probability_vs_average: projected.win_probability_vs_average,
            })
        })
        .collect::<Result<Vec<_>, RatingError>>()?;

    let statistics = RunStatistics {
        total_records: records.len(),
        total_entities: indexed.index.len(),
        eligible_entities: subset.eligible_entities,
        component_count: subset.component_count,
        connected_entities: entity_count,
        comparison_count: regularized.comparisons.len(),
        synthetic_comparisons: regularized.synthetic,
        solver_strategy: fit.strategy,
        iterations: fit.iterations,
    };

    Ok(RankingTable { rows, statistics })
}

fn log_strength_stats(strengths: &[f64]) {
    let min = strengths.iter().copied().fold(f64::INFINITY, f64::min);
    let max = strengths.iter().copied().fold(0.0_f64, f64::max);
    let mean = strengths.iter().sum::<f64>() / strengths.len() as f64;

    info!(
        "  → Strength stats: min={:.4}, max={:.4}, mean={:.4}",
        min, max, mean
    );
}
