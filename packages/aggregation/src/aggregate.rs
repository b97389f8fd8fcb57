//! Grouping and incremental averaging.
//!
//! A single pass folds resolved rows into per-state accumulators, then a
//! second pass divides sums by counts. Accumulators are created on first
//! sight with zero sums and zero count, so a state's first contribution is
//! counted exactly once, and states with no contributing rows are never
//! materialized — there is no zero-division case.

use std::collections::HashMap;

use air_map_pollution_models::{PollutantReadings, PollutantSet, StateAccumulator, StateAverage};

/// Rounds to two decimal places, halves away from zero. `NaN` stays `NaN`.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups `(state, readings)` rows and computes per-state means.
///
/// Output preserves the order in which states were first seen; callers
/// wanting a sorted result sort the rows before grouping. Empty input
/// yields an empty vector.
#[must_use]
pub fn aggregate(rows: &[(String, PollutantReadings)], set: PollutantSet) -> Vec<StateAverage> {
    let mut order: Vec<String> = Vec::new();
    let mut accumulators: HashMap<String, StateAccumulator> = HashMap::new();

    for (state, readings) in rows {
        let acc = accumulators.entry(state.clone()).or_insert_with(|| {
            order.push(state.clone());
            StateAccumulator::default()
        });
        acc.add(readings);
    }

    order
        .into_iter()
        .map(|state| {
            let acc = accumulators[&state];
            #[allow(clippy::cast_precision_loss)]
            let count = acc.count as f64;
            StateAverage {
                state,
                no2: round2(acc.sum_no2 / count),
                o3: round2(acc.sum_o3 / count),
                ch2o: round2(acc.sum_ch2o / count),
                pm: match set {
                    PollutantSet::Standard => None,
                    PollutantSet::Extended => Some(round2(acc.sum_pm / count)),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn readings(no2: f64, o3: f64, ch2o: f64) -> PollutantReadings {
        PollutantReadings {
            no2,
            o3,
            ch2o,
            pm: None,
        }
    }

    #[test]
    fn averages_one_state() {
        let rows = vec![
            ("CA".to_string(), readings(10.0, 20.0, 5.0)),
            ("CA".to_string(), readings(30.0, 10.0, 5.0)),
        ];
        let averages = aggregate(&rows, PollutantSet::Standard);
        assert_eq!(averages.len(), 1);
        assert!((averages[0].no2 - 20.0).abs() < f64::EPSILON);
        assert!((averages[0].o3 - 15.0).abs() < f64::EPSILON);
        assert!((averages[0].ch2o - 5.0).abs() < f64::EPSILON);
        assert_eq!(averages[0].pm, None);
    }

    #[test]
    fn counts_are_conserved() {
        let rows = vec![
            ("CA".to_string(), readings(1.0, 1.0, 1.0)),
            ("TX".to_string(), readings(2.0, 2.0, 2.0)),
            ("CA".to_string(), readings(3.0, 3.0, 3.0)),
            ("NY".to_string(), readings(4.0, 4.0, 4.0)),
        ];

        let mut order: Vec<String> = Vec::new();
        let mut accumulators: HashMap<String, StateAccumulator> = HashMap::new();
        for (state, r) in &rows {
            let acc = accumulators.entry(state.clone()).or_insert_with(|| {
                order.push(state.clone());
                StateAccumulator::default()
            });
            acc.add(r);
        }
        let total: u64 = accumulators.values().map(|a| a.count).sum();
        assert_eq!(total, rows.len() as u64);
    }

    #[test]
    fn first_seen_order_is_preserved() {
        let rows = vec![
            ("TX".to_string(), readings(1.0, 1.0, 1.0)),
            ("AL".to_string(), readings(2.0, 2.0, 2.0)),
            ("TX".to_string(), readings(3.0, 3.0, 3.0)),
            ("CA".to_string(), readings(4.0, 4.0, 4.0)),
        ];
        let averages = aggregate(&rows, PollutantSet::Standard);
        let states: Vec<&str> = averages.iter().map(|a| a.state.as_str()).collect();
        assert_eq!(states, ["TX", "AL", "CA"]);
    }

    #[test]
    fn rounds_to_two_decimals_half_away_from_zero() {
        let rows = vec![
            ("CA".to_string(), readings(0.005, 1.0, 0.0)),
            ("CA".to_string(), readings(0.005, 2.0, 0.0)),
        ];
        let averages = aggregate(&rows, PollutantSet::Standard);
        assert!((averages[0].no2 - 0.01).abs() < f64::EPSILON);
        assert!((averages[0].o3 - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(aggregate(&[], PollutantSet::Standard).is_empty());
        assert!(aggregate(&[], PollutantSet::Extended).is_empty());
    }

    #[test]
    fn extended_set_averages_pm() {
        let rows = vec![
            (
                "WA".to_string(),
                PollutantReadings {
                    no2: 1.0,
                    o3: 2.0,
                    ch2o: 3.0,
                    pm: Some(10.0),
                },
            ),
            (
                "WA".to_string(),
                PollutantReadings {
                    no2: 3.0,
                    o3: 4.0,
                    ch2o: 5.0,
                    pm: Some(20.0),
                },
            ),
        ];
        let averages = aggregate(&rows, PollutantSet::Extended);
        assert_eq!(averages[0].pm, Some(15.0));
    }

    #[test]
    fn nan_reading_poisons_that_pollutants_average_only() {
        let rows = vec![
            ("CA".to_string(), readings(f64::NAN, 20.0, 5.0)),
            ("CA".to_string(), readings(30.0, 10.0, 5.0)),
        ];
        let averages = aggregate(&rows, PollutantSet::Standard);
        assert!(averages[0].no2.is_nan());
        assert!((averages[0].o3 - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rows = vec![
            ("CA".to_string(), readings(10.0, 20.0, 5.0)),
            ("TX".to_string(), readings(30.0, 10.0, 5.0)),
            ("CA".to_string(), readings(12.0, 18.0, 6.0)),
        ];
        assert_eq!(
            aggregate(&rows, PollutantSet::Standard),
            aggregate(&rows, PollutantSet::Standard)
        );
    }

    #[test]
    fn round2_behavior() {
        assert!((round2(20.004_999) - 20.0).abs() < f64::EPSILON);
        // 0.125 is exactly representable, so the half-case is real here.
        assert!((round2(0.125) - 0.13).abs() < f64::EPSILON);
        assert!((round2(-0.125) - -0.13).abs() < f64::EPSILON);
        assert!(round2(f64::NAN).is_nan());
    }
}
