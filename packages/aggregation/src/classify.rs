//! Dominant-pollutant classification.
//!
//! The maximum uses the upstream feed's `NaN` semantics: any `NaN` operand
//! makes the maximum `NaN`. The winning label is found by comparing
//! candidates against the maximum in fixed priority order (NO2, O3, CH2O,
//! then PM), so exact ties resolve deterministically by field priority.
//! When no comparison succeeds — the maximum is `NaN` — the label is the
//! explicit [`Pollutant::Unknown`] sentinel.

use air_map_pollution_models::{
    DominantPollutant, Pollutant, PollutantReadings, PollutantSet, StateAverage,
};

/// Maximum with `NaN` propagation: `NaN` if any operand is `NaN`.
fn nan_propagating_max(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::NEG_INFINITY, |max, value| {
        if max.is_nan() || value.is_nan() {
            f64::NAN
        } else if value > max {
            value
        } else {
            max
        }
    })
}

/// Classifies one state's averaged values.
#[must_use]
pub fn classify(average: &StateAverage, set: PollutantSet) -> DominantPollutant {
    let candidates: Vec<(Pollutant, f64)> = set
        .members()
        .iter()
        .filter_map(|&pollutant| average.get(pollutant).map(|value| (pollutant, value)))
        .collect();

    let max = nan_propagating_max(candidates.iter().map(|&(_, value)| value));

    let pollutant = candidates
        .iter()
        .find(|&&(_, value)| value == max)
        .map_or(Pollutant::Unknown, |&(pollutant, _)| pollutant);

    DominantPollutant {
        state: average.state.clone(),
        max_pollutant: max,
        pollutant,
    }
}

/// Classifies a single row's readings without averaging (the per-zip
/// endpoint works on raw rows, not grouped means).
#[must_use]
pub fn classify_readings(
    state: &str,
    readings: &PollutantReadings,
    set: PollutantSet,
) -> DominantPollutant {
    classify(
        &StateAverage {
            state: state.to_string(),
            no2: readings.no2,
            o3: readings.o3,
            ch2o: readings.ch2o,
            pm: readings.pm,
        },
        set,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average(no2: f64, o3: f64, ch2o: f64, pm: Option<f64>) -> StateAverage {
        StateAverage {
            state: "CA".to_string(),
            no2,
            o3,
            ch2o,
            pm,
        }
    }

    #[test]
    fn picks_the_maximum() {
        let result = classify(&average(20.0, 15.0, 5.0, None), PollutantSet::Standard);
        assert_eq!(result.pollutant, Pollutant::No2);
        assert!((result.max_pollutant - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exact_tie_resolves_by_priority_order() {
        // NO2 and O3 tie at 50: NO2 wins because it is checked first.
        let result = classify(&average(50.0, 50.0, 10.0, None), PollutantSet::Standard);
        assert_eq!(result.pollutant, Pollutant::No2);

        // O3 and CH2O tie: O3 outranks CH2O.
        let result = classify(&average(1.0, 30.0, 30.0, None), PollutantSet::Standard);
        assert_eq!(result.pollutant, Pollutant::O3);
    }

    #[test]
    fn extended_set_considers_pm() {
        let result = classify(
            &average(1.0, 2.0, 3.0, Some(40.0)),
            PollutantSet::Extended,
        );
        assert_eq!(result.pollutant, Pollutant::Pm);
        assert!((result.max_pollutant - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_nan_reports_unknown() {
        let result = classify(
            &average(f64::NAN, f64::NAN, f64::NAN, None),
            PollutantSet::Standard,
        );
        assert_eq!(result.pollutant, Pollutant::Unknown);
        assert!(result.max_pollutant.is_nan());
    }

    #[test]
    fn any_nan_poisons_the_maximum() {
        // One bad field is enough to lose the winner, matching the source
        // feed's max semantics.
        let result = classify(&average(10.0, f64::NAN, 5.0, None), PollutantSet::Standard);
        assert_eq!(result.pollutant, Pollutant::Unknown);
        assert!(result.max_pollutant.is_nan());
    }

    #[test]
    fn classifies_raw_readings() {
        let readings = PollutantReadings {
            no2: 3.0,
            o3: 9.0,
            ch2o: 1.0,
            pm: None,
        };
        let result = classify_readings("TX", &readings, PollutantSet::Standard);
        assert_eq!(result.state, "TX");
        assert_eq!(result.pollutant, Pollutant::O3);
    }
}
