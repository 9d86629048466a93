use std::cmp::Ordering;

use super::types::{DenseIndex, Strength};

/// Strength of one solved entity projected against the field average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedEntity {
    pub index: DenseIndex,
    pub rank: usize,
    pub strength: Strength,
    pub win_probability_vs_average: f64,
}

/// Ranks solved entities by their probability of beating an average-strength opponent.
/// Ties keep processing order.
pub fn project_rankings(strengths: &[Strength]) -> Vec<ProjectedEntity> {
    let mean = calculate_mean(strengths);
    let mut projected: Vec<ProjectedEntity> = strengths
        .iter()
        .enumerate()
        .map(|(index, &strength)| ProjectedEntity {
            index,
            rank: 0,
            strength,
            win_probability_vs_average: probability_vs(strength, mean),
        })
        .collect();

    projected.sort_by(compare_descending);
    assign_ranks(&mut projected);
    projected
}

fn calculate_mean(strengths: &[Strength]) -> f64 {
    let sum: f64 = strengths.iter().sum();
    sum / strengths.len() as f64
}

fn probability_vs(strength: Strength, opponent: Strength) -> f64 {
    strength / (strength + opponent)
}

fn compare_descending(a: &ProjectedEntity, b: &ProjectedEntity) -> Ordering {
    b.win_probability_vs_average
        .partial_cmp(&a.win_probability_vs_average)
        .unwrap_or(Ordering::Equal)
}

fn assign_ranks(projected: &mut [ProjectedEntity]) {
    for (position, entity) in projected.iter_mut().enumerate() {
        entity.rank = position + 1;
    }
}
