use super::types::{Comparison, IndexedRecord};
use crate::config::settings::RatingSettings;

// ln(1 + margin) is divided by this before being added to the base weight of 1
const MARGIN_SCALE: f64 = 3.0;

/// Weighted comparison multiset produced from the indexed records.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedComparisons {
    pub comparisons: Vec<Comparison>,
    pub record_count: usize,
}

impl WeightedComparisons {
    /// Average number of comparison tuples materialised per contest.
    pub fn average_weight(&self) -> f64 {
        if self.record_count == 0 {
            return 1.0;
        }
        self.comparisons.len() as f64 / self.record_count as f64
    }
}

pub fn weight_records(records: &[IndexedRecord], config: &RatingSettings) -> WeightedComparisons {
    let comparisons = records
        .iter()
        .flat_map(|record| expand_record(record, config))
        .collect();

    WeightedComparisons {
        comparisons,
        record_count: records.len(),
    }
}

fn expand_record(record: &IndexedRecord, config: &RatingSettings) -> Vec<Comparison> {
    let weight = if config.enable_margin_weighting {
        calculate_weight(record.margin, config.margin_weight_cap)
    } else {
        1
    };

    vec![Comparison::new(record.winner(), record.loser()); weight as usize]
}

/// Integer repetition count for a result: `min(1 + ln(1 + margin) / 3, cap)`,
/// rounded, never below 1.
pub fn calculate_weight(margin: Option<f64>, cap: f64) -> u32 {
    match usable_margin(margin) {
        Some(margin) => round_weight(apply_diminishing_returns(margin, cap)),
        None => 1,
    }
}

fn usable_margin(margin: Option<f64>) -> Option<f64> {
    margin.filter(|m| m.is_finite() && *m >= 0.0)
}

fn apply_diminishing_returns(margin: f64, cap: f64) -> f64 {
    let weight = 1.0 + margin.ln_1p() / MARGIN_SCALE;
    weight.min(cap)
}

fn round_weight(weight: f64) -> u32 {
    weight.round().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(winner: usize, loser: usize, margin: Option<f64>) -> IndexedRecord {
        IndexedRecord {
            side_a: winner,
            side_b: loser,
            a_won: true,
            margin,
        }
    }

    #[test]
    fn test_missing_margin_weighs_one() {
        assert_eq!(calculate_weight(None, 3.0), 1);
        assert_eq!(calculate_weight(Some(f64::NAN), 3.0), 1);
        assert_eq!(calculate_weight(Some(-7.0), 3.0), 1);
    }

    #[test]
    fn test_weight_steps() {
        assert_eq!(calculate_weight(Some(0.0), 3.0), 1);
        assert_eq!(calculate_weight(Some(3.0), 3.0), 1);
        assert_eq!(calculate_weight(Some(7.0), 3.0), 2);
        assert_eq!(calculate_weight(Some(1000.0), 3.0), 3);
    }

    #[test]
    fn test_cap_limits_weight() {
        assert_eq!(calculate_weight(Some(1000.0), 2.0), 2);
        assert_eq!(calculate_weight(Some(1000.0), 1.0), 1);
    }

    #[test]
    fn test_weighting_disabled_ignores_margin() {
        let config = RatingSettings::default();
        let weighted = weight_records(&[record(0, 1, Some(40.0))], &config);

        assert_eq!(weighted.comparisons, vec![Comparison::new(0, 1)]);
        assert_eq!(weighted.average_weight(), 1.0);
    }

    #[test]
    fn test_weighting_duplicates_winner_tuples() {
        let config = RatingSettings {
            enable_margin_weighting: true,
            ..RatingSettings::default()
        };
        let records = vec![record(0, 1, Some(1000.0)), record(1, 2, None)];
        let weighted = weight_records(&records, &config);

        assert_eq!(weighted.comparisons.len(), 4);
        assert_eq!(weighted.comparisons[..3], [Comparison::new(0, 1); 3]);
        assert_eq!(weighted.comparisons[3], Comparison::new(1, 2));
        assert_eq!(weighted.average_weight(), 2.0);
    }

    proptest! {
        #[test]
        fn prop_weight_is_monotone_and_bounded(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let w_small = calculate_weight(Some(small), 3.0);
            let w_large = calculate_weight(Some(large), 3.0);

            prop_assert!(w_small >= 1);
            prop_assert!(w_large <= 3);
            prop_assert!(w_small <= w_large);
        }
    }
}
