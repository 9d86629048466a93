use log::{debug, info};

use super::types::{Comparison, DenseIndex};

/// Comparison list after the perfect-record pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularizedComparisons {
    pub comparisons: Vec<Comparison>,
    pub synthetic: usize,
}

/// Gives every undefeated entity one loss, and every winless entity one win,
/// against the first opponent it met.
pub fn regularize_perfect_records(entity_count: usize, comparisons: &[Comparison]) -> RegularizedComparisons {
    let (wins, losses) = count_results(entity_count, comparisons);
    let only_winning: Vec<DenseIndex> = (0..entity_count)
        .filter(|&i| wins[i] > 0 && losses[i] == 0)
        .collect();
    let only_losing: Vec<DenseIndex> = (0..entity_count)
        .filter(|&i| losses[i] > 0 && wins[i] == 0)
        .collect();

    info!(
        "  → {} entities with only wins, {} with only losses",
        only_winning.len(),
        only_losing.len()
    );

    let mut regularized = comparisons.to_vec();

    for &entity in &only_winning {
        if let Some(opponent) = first_beaten(entity, comparisons) {
            debug!("Synthetic loss: {} loses to {}", entity, opponent);
            regularized.push(Comparison::new(opponent, entity));
        }
    }

    for &entity in &only_losing {
        if let Some(opponent) = first_beaten_by(entity, comparisons) {
            debug!("Synthetic win: {} beats {}", entity, opponent);
            regularized.push(Comparison::new(entity, opponent));
        }
    }

    RegularizedComparisons {
        synthetic: regularized.len() - comparisons.len(),
        comparisons: regularized,
    }
}

fn count_results(entity_count: usize, comparisons: &[Comparison]) -> (Vec<usize>, Vec<usize>) {
    let mut wins = vec![0; entity_count];
    let mut losses = vec![0; entity_count];

    for comparison in comparisons {
        wins[comparison.winner] += 1;
        losses[comparison.loser] += 1;
    }

    (wins, losses)
}

fn first_beaten(entity: DenseIndex, comparisons: &[Comparison]) -> Option<DenseIndex> {
    comparisons
        .iter()
        .find(|c| c.winner == entity)
        .map(|c| c.loser)
}

fn first_beaten_by(entity: DenseIndex, comparisons: &[Comparison]) -> Option<DenseIndex> {
    comparisons
        .iter()
        .find(|c| c.loser == entity)
        .map(|c| c.winner)
}
