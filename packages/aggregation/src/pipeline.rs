//! Pipeline assembly: resolve, order, group, classify.
//!
//! The two endpoints that group by state share this code and differ only
//! in configuration. The zip-code flow keeps first-seen order; the county
//! flow sorts rows by state *before* grouping, which makes its output
//! strictly alphabetical. Both orderings are deliberate, externally
//! observable behaviors.

use air_map_pollution_models::{
    DominantPollutant, PollutantReadings, PollutantSet, RawRecord, StateAverage,
};

use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::resolve::LocationResolver;

/// Output ordering policy for grouped results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputOrdering {
    /// States appear in the order their first row was seen (zip flow).
    FirstSeen,
    /// Rows are sorted by state before grouping (county flow); output is
    /// alphabetical by state code.
    StateSorted,
}

/// Resolves, orders, and groups records into per-state averages.
///
/// Records whose location key doesn't resolve are dropped silently.
#[must_use]
pub fn state_averages(
    records: &[RawRecord],
    resolver: &dyn LocationResolver,
    set: PollutantSet,
    ordering: OutputOrdering,
) -> Vec<StateAverage> {
    let mut rows: Vec<(String, PollutantReadings)> = records
        .iter()
        .filter_map(|record| {
            resolver
                .resolve(&record.location_key)
                .map(|state| (state, record.readings))
        })
        .collect();

    if ordering == OutputOrdering::StateSorted {
        rows.sort_by(|a, b| a.0.cmp(&b.0));
    }

    aggregate(&rows, set)
}

/// Classifies each state's averages into its dominant pollutant.
#[must_use]
pub fn dominant_pollutants(averages: &[StateAverage], set: PollutantSet) -> Vec<DominantPollutant> {
    averages
        .iter()
        .map(|average| classify(average, set))
        .collect()
}

#[cfg(test)]
mod tests {
    use air_map_pollution_models::Pollutant;

    use super::*;
    use crate::parse::{parse_chunked, parse_flat};
    use crate::resolve::{CountyResolver, StateCodeResolver};

    const FLAT: &str = "State,Zip,NO2,O3,CH2O\n\
        TX,75001,8.0,9.5,3.2\n\
        CA,90001,10,20,5\n\
        XX,00000,99,99,99\n\
        CA,90002,30,10,5\n";

    #[test]
    fn flat_flow_end_to_end() {
        let records = parse_flat(FLAT);
        let averages = state_averages(
            &records,
            &StateCodeResolver,
            PollutantSet::Standard,
            OutputOrdering::FirstSeen,
        );

        // The XX row is dropped; TX appears before CA (first seen).
        let states: Vec<&str> = averages.iter().map(|a| a.state.as_str()).collect();
        assert_eq!(states, ["TX", "CA"]);

        let ca = &averages[1];
        assert!((ca.no2 - 20.0).abs() < f64::EPSILON);
        assert!((ca.o3 - 15.0).abs() < f64::EPSILON);
        assert!((ca.ch2o - 5.0).abs() < f64::EPSILON);

        let dominant = dominant_pollutants(&averages, PollutantSet::Standard);
        assert_eq!(dominant[1].pollutant, Pollutant::No2);
        assert!((dominant[1].max_pollutant - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn county_flow_sorts_by_state_before_grouping() {
        // WA (53033) first in the file, then CA twice, then IL.
        let text = "53033\n1\n2\n3\n4\n\
            06037\n10\n20\n5\n2\n\
            06073\n30\n10\n5\n4\n\
            17031\n7\n8\n9\n10\n";
        let records = parse_chunked(text);
        let averages = state_averages(
            &records,
            &CountyResolver,
            PollutantSet::Extended,
            OutputOrdering::StateSorted,
        );

        let states: Vec<&str> = averages.iter().map(|a| a.state.as_str()).collect();
        assert_eq!(states, ["CA", "IL", "WA"]);

        let ca = &averages[0];
        assert!((ca.no2 - 20.0).abs() < f64::EPSILON);
        assert_eq!(ca.pm, Some(3.0));
    }

    #[test]
    fn unresolved_counties_are_dropped_not_errors() {
        let text = "99999\n1\n2\n3\n4\n";
        let records = parse_chunked(text);
        let averages = state_averages(
            &records,
            &CountyResolver,
            PollutantSet::Extended,
            OutputOrdering::StateSorted,
        );
        assert!(averages.is_empty());
    }

    #[test]
    fn resolved_row_counts_survive_grouping() {
        let records = parse_flat(FLAT);
        let resolved = records
            .iter()
            .filter(|r| StateCodeResolver.resolve(&r.location_key).is_some())
            .count();
        let averages = state_averages(
            &records,
            &StateCodeResolver,
            PollutantSet::Standard,
            OutputOrdering::FirstSeen,
        );
        // 2 states from 3 resolved rows; the dropped XX row is excluded.
        assert_eq!(resolved, 3);
        assert_eq!(averages.len(), 2);
    }
}
