use std::collections::VecDeque;

use log::info;

use super::indexing::IndexRestriction;
use super::types::{Comparison, DenseIndex};
use super::weighting::WeightedComparisons;
use crate::config::settings::RatingSettings;
use crate::errors::RatingError;

/// Comparisons restricted to active entities in the largest connected component.
#[derive(Debug, Clone)]
pub struct ComparisonSubset {
    pub comparisons: Vec<Comparison>,
    /// Maps subset indices back to the ingest dense indices.
    pub restriction: IndexRestriction,
    pub eligible_entities: usize,
    pub component_count: usize,
}

impl ComparisonSubset {
    pub fn entity_count(&self) -> usize {
        self.restriction.len()
    }
}

pub fn filter_comparisons(
    entity_count: usize,
    weighted: &WeightedComparisons,
    config: &RatingSettings,
) -> Result<ComparisonSubset, RatingError> {
    let activity = restrict_to_active(entity_count, weighted, config);
    let active_comparisons = activity.restrict_comparisons(&weighted.comparisons);
    info!(
        "  → {} of {} entities meet the activity threshold ({} comparisons remain)",
        activity.len(),
        entity_count,
        active_comparisons.len()
    );

    if active_comparisons.is_empty() {
        return Err(RatingError::insufficient(
            "no comparisons remain after the minimum activity filter",
        ));
    }

    let components = find_components(activity.len(), &active_comparisons);
    let largest = select_largest(&components);
    info!(
        "  → {} connected components, largest has {} entities",
        components.len(),
        components[largest].len()
    );

    let members = &components[largest];
    let connectivity = IndexRestriction::keep(activity.len(), |i| members.binary_search(&i).is_ok());
    let comparisons = connectivity.restrict_comparisons(&active_comparisons);

    if comparisons.is_empty() {
        return Err(RatingError::insufficient(
            "largest connected component has no comparisons",
        ));
    }

    Ok(ComparisonSubset {
        comparisons,
        restriction: activity.then(&connectivity),
        eligible_entities: activity.len(),
        component_count: components.len(),
    })
}

fn restrict_to_active(
    entity_count: usize,
    weighted: &WeightedComparisons,
    config: &RatingSettings,
) -> IndexRestriction {
    let participation = count_participation(entity_count, &weighted.comparisons);
    let threshold = config.minimum_activity_threshold as f64 * weighted.average_weight();

    IndexRestriction::keep(entity_count, |i| participation[i] as f64 >= threshold)
}

/// Wins plus losses per entity, counted over the weighted multiset.
pub fn count_participation(entity_count: usize, comparisons: &[Comparison]) -> Vec<usize> {
    let mut counts = vec![0; entity_count];
    for comparison in comparisons {
        counts[comparison.winner] += 1;
        counts[comparison.loser] += 1;
    }
    counts
}

/// Connected components of the undirected comparison graph, in order of their
/// lowest member. Entities without any comparison are not part of the graph.
/// Members of each component are sorted ascending.
pub fn find_components(entity_count: usize, comparisons: &[Comparison]) -> Vec<Vec<DenseIndex>> {
    let neighbours = build_adjacency(entity_count, comparisons);
    let mut visited = vec![false; entity_count];
    let mut components = Vec::new();

    for start in 0..entity_count {
        if visited[start] || neighbours[start].is_empty() {
            continue;
        }
        components.push(collect_component(start, &neighbours, &mut visited));
    }

    components
}

fn build_adjacency(entity_count: usize, comparisons: &[Comparison]) -> Vec<Vec<DenseIndex>> {
    let mut neighbours = vec![Vec::new(); entity_count];
    for comparison in comparisons {
        neighbours[comparison.winner].push(comparison.loser);
        neighbours[comparison.loser].push(comparison.winner);
    }
    neighbours
}

fn collect_component(
    start: DenseIndex,
    neighbours: &[Vec<DenseIndex>],
    visited: &mut [bool],
) -> Vec<DenseIndex> {
    let mut members = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(node) = queue.pop_front() {
        members.push(node);
        for &next in &neighbours[node] {
            if !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }

    members.sort_unstable();
    members
}

/// First component reaching the maximum size wins ties.
fn select_largest(components: &[Vec<DenseIndex>]) -> usize {
    let mut best = 0;
    for (idx, component) in components.iter().enumerate() {
        if component.len() > components[best].len() {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unweighted(pairs: &[(usize, usize)]) -> WeightedComparisons {
        WeightedComparisons {
            comparisons: pairs.iter().map(|&(w, l)| Comparison::new(w, l)).collect(),
            record_count: pairs.len(),
        }
    }

    fn lenient() -> RatingSettings {
        RatingSettings {
            minimum_activity_threshold: 1,
            ..RatingSettings::default()
        }
    }

    #[test]
    fn test_components_ignore_direction() {
        let comparisons = vec![
            Comparison::new(1, 0),
            Comparison::new(2, 1),
            Comparison::new(4, 3),
        ];

        let components = find_components(6, &comparisons);
        assert_eq!(components, vec![vec![0, 1, 2], vec![3, 4]]);
    }

    #[test]
    fn test_restricts_to_largest_component() {
        let weighted = unweighted(&[(0, 1), (2, 3), (3, 4), (4, 2)]);
        let subset = filter_comparisons(5, &weighted, &lenient()).unwrap();

        assert_eq!(subset.entity_count(), 3);
        assert_eq!(subset.component_count, 2);
        assert_eq!(subset.restriction.parent_of(0), Some(2));
        assert_eq!(subset.comparisons.len(), 3);
        assert_eq!(subset.comparisons[0], Comparison::new(0, 1));
    }

    #[test]
    fn test_equal_components_pick_first_encountered() {
        let weighted = unweighted(&[(3, 2), (1, 0)]);
        let subset = filter_comparisons(4, &weighted, &lenient()).unwrap();

        assert_eq!(subset.restriction.parent_of(0), Some(0));
        assert_eq!(subset.restriction.parent_of(1), Some(1));
        assert_eq!(subset.comparisons, vec![Comparison::new(1, 0)]);
    }

    #[test]
    fn test_low_activity_entities_are_dropped() {
        // 0..=3 play a double round robin, 4 plays twice
        let mut pairs = Vec::new();
        for a in 0..4 {
            for b in (a + 1)..4 {
                pairs.push((a, b));
                pairs.push((b, a));
            }
        }
        pairs.push((4, 0));
        pairs.push((1, 4));

        let subset = filter_comparisons(5, &unweighted(&pairs), &RatingSettings::default()).unwrap();

        assert_eq!(subset.eligible_entities, 4);
        assert_eq!(subset.restriction.restrict(4), None);
        assert!(subset.comparisons.iter().all(|c| c.winner < 4 && c.loser < 4));
    }

    #[test]
    fn test_threshold_scales_with_average_weight() {
        // two tuples per record: each entity ends up with 4 tuples, below 4 * 2.0
        let pairs = [(0, 1), (0, 1), (1, 2), (1, 2), (2, 0), (2, 0)];
        let weighted = WeightedComparisons {
            comparisons: pairs.iter().map(|&(w, l)| Comparison::new(w, l)).collect(),
            record_count: 3,
        };

        let err = filter_comparisons(3, &weighted, &RatingSettings::default()).unwrap_err();
        assert!(matches!(err, RatingError::InsufficientData { .. }));
    }

    #[test]
    fn test_everything_filtered_is_insufficient() {
        let weighted = unweighted(&[(0, 1)]);
        let err = filter_comparisons(2, &weighted, &RatingSettings::default()).unwrap_err();
        assert!(matches!(err, RatingError::InsufficientData { .. }));
    }
}
