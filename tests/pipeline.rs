//! End-to-end tests of the rating pipeline over in-memory contest records.

use bt_rankings::config::settings::RatingSettings;
use bt_rankings::errors::RatingError;
use bt_rankings::rating::{ContestRecord, EntityId, RankingTable, calculate_rankings};

fn game(a: &str, b: &str, a_won: bool) -> ContestRecord {
    ContestRecord::new(a, b, a_won)
}

/// Every pair meets twice and splits the series.
fn split_round_robin(teams: &[&str]) -> Vec<ContestRecord> {
    let mut records = Vec::new();
    for (i, a) in teams.iter().enumerate() {
        for b in &teams[i + 1..] {
            records.push(game(a, b, true));
            records.push(game(a, b, false));
        }
    }
    records
}

/// Six teams, double round robin. The lower seed sweeps when the seed sum is
/// divisible by three, otherwise the series is split.
fn seeded_league(margin_for: impl Fn(usize, usize) -> Option<f64>) -> Vec<ContestRecord> {
    let teams = ["T0", "T1", "T2", "T3", "T4", "T5"];
    let mut records = Vec::new();

    for i in 0..teams.len() {
        for j in (i + 1)..teams.len() {
            let second_to_lower = (i + j) % 3 == 0;
            let mut first = game(teams[i], teams[j], true);
            let mut second = game(teams[i], teams[j], second_to_lower);

            first.margin = margin_for(i, j);
            second.margin = if second_to_lower { margin_for(i, j) } else { margin_for(j, i) };

            records.push(first);
            records.push(second);
        }
    }
    records
}

fn rank_of(table: &RankingTable, id: &str) -> usize {
    table.find(&EntityId::from(id)).map(|row| row.rank).unwrap()
}

fn ranked_ids(table: &RankingTable) -> Vec<EntityId> {
    table.rows.iter().map(|row| row.entity_id.clone()).collect()
}

fn assert_well_formed(table: &RankingTable) {
    let mut ranks: Vec<usize> = table.rows.iter().map(|row| row.rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, (1..=table.rows.len()).collect::<Vec<_>>());

    for row in &table.rows {
        assert!(row.strength.is_finite() && row.strength > 0.0);
        assert!(row.win_probability_vs_average > 0.0 && row.win_probability_vs_average < 1.0);
    }

    let strongest = table
        .rows
        .iter()
        .max_by(|a, b| a.strength.partial_cmp(&b.strength).unwrap())
        .unwrap();
    assert!(table.rows[0].strength >= strongest.strength - 1e-12);
}

#[test]
fn test_four_cycle_gives_equal_strengths() {
    let records = vec![
        game("A", "B", true),
        game("B", "C", true),
        game("C", "D", true),
        game("D", "A", true),
    ];
    let config = RatingSettings {
        minimum_activity_threshold: 1,
        ..RatingSettings::default()
    };

    let table = calculate_rankings(&records, &config).unwrap();

    assert_eq!(table.rows.len(), 4);
    assert_well_formed(&table);
    let first = table.rows[0].strength;
    for row in &table.rows {
        assert!((row.strength - first).abs() < 1e-6);
    }
    assert_eq!(table.statistics.synthetic_comparisons, 0);
}

#[test]
fn test_undefeated_entity_stays_finite() {
    let mut records = split_round_robin(&["A", "B", "C", "D"]);
    for opponent in ["A", "B", "C", "D", "A"] {
        records.push(game("E", opponent, true));
    }

    let regularized = calculate_rankings(&records, &RatingSettings::default()).unwrap();
    let unregularized = calculate_rankings(
        &records,
        &RatingSettings {
            enable_degenerate_record_regularization: false,
            ..RatingSettings::default()
        },
    )
    .unwrap();

    assert_well_formed(&regularized);
    assert_eq!(regularized.statistics.synthetic_comparisons, 1);
    assert_eq!(rank_of(&regularized, "E"), 1);

    let with_loss = regularized.find(&EntityId::from("E")).unwrap();
    let without_loss = unregularized.find(&EntityId::from("E")).unwrap();
    assert!(with_loss.strength.is_finite());
    assert!(with_loss.win_probability_vs_average < without_loss.win_probability_vs_average);
}

#[test]
fn test_low_activity_entity_is_not_ranked() {
    let mut records = split_round_robin(&["A", "B", "C", "D"]);
    records.push(game("X", "A", true));
    records.push(game("B", "X", true));

    let table = calculate_rankings(&records, &RatingSettings::default()).unwrap();

    assert_eq!(table.rows.len(), 4);
    assert!(table.find(&EntityId::from("X")).is_none());
    assert_eq!(table.statistics.total_entities, 5);
    assert_eq!(table.statistics.eligible_entities, 4);
}

#[test]
fn test_only_largest_component_is_ranked() {
    let mut records = seeded_league(|_, _| None);
    for _ in 0..3 {
        records.push(game("P", "Q", true));
        records.push(game("Q", "R", true));
        records.push(game("R", "P", true));
    }

    let table = calculate_rankings(&records, &RatingSettings::default()).unwrap();

    assert_well_formed(&table);
    assert_eq!(table.statistics.component_count, 2);
    assert_eq!(table.rows.len(), 6);
    for island in ["P", "Q", "R"] {
        assert!(table.find(&EntityId::from(island)).is_none());
    }
}

#[test]
fn test_equal_components_keep_first_encountered() {
    let mut records = split_round_robin(&["A", "B", "C"]);
    records.extend(split_round_robin(&["X", "Y", "Z"]));
    let config = RatingSettings {
        minimum_activity_threshold: 2,
        ..RatingSettings::default()
    };

    let table = calculate_rankings(&records, &config).unwrap();

    assert_eq!(table.rows.len(), 3);
    assert!(table.find(&EntityId::from("A")).is_some());
    assert!(table.find(&EntityId::from("X")).is_none());
}

#[test]
fn test_rerun_gives_identical_order() {
    let records = seeded_league(|_, _| None);
    let config = RatingSettings::default();

    let first = calculate_rankings(&records, &config).unwrap();
    let second = calculate_rankings(&records, &config).unwrap();

    assert_well_formed(&first);
    assert_eq!(ranked_ids(&first), ranked_ids(&second));
}

#[test]
fn test_bigger_margins_never_hurt_rank() {
    let config = RatingSettings {
        enable_margin_weighting: true,
        ..RatingSettings::default()
    };
    let baseline = seeded_league(|_, _| Some(0.0));
    let blowouts = seeded_league(|winner, _| if winner == 5 { Some(500.0) } else { Some(0.0) });

    let before = calculate_rankings(&baseline, &config).unwrap();
    let after = calculate_rankings(&blowouts, &config).unwrap();

    assert_eq!(after.rows.len(), 6);
    assert!(after.statistics.comparison_count > before.statistics.comparison_count);
    assert!(rank_of(&after, "T5") <= rank_of(&before, "T5"));
}

#[test]
fn test_self_comparison_fails_the_run() {
    let mut records = split_round_robin(&["A", "B", "C", "D"]);
    records.push(game("C", "C", true));

    let err = calculate_rankings(&records, &RatingSettings::default()).unwrap_err();
    assert!(matches!(err, RatingError::InvalidRecord { position: 12, .. }));
}

#[test]
fn test_too_little_data_fails_the_run() {
    let records = vec![game("A", "B", true), game("B", "C", true)];

    let err = calculate_rankings(&records, &RatingSettings::default()).unwrap_err();
    assert!(matches!(err, RatingError::InsufficientData { .. }));
}
