//! County geo-id lookup table.
//!
//! Maps county geo ids (five-digit FIPS codes) to a `"countyName,stateCode"`
//! string, the value shape the upstream county feed was built around. The
//! table is baked into the binary at compile time via [`include_str!`] and
//! parsed once into a process-wide immutable map on first access.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Raw table rows, one `geo_id,countyName,stateCode` line each.
const COUNTY_CSV: &str = include_str!("../data/county_geo_ids.csv");

/// Geo id -> `"countyName,stateCode"`.
static COUNTY_TABLE: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    COUNTY_CSV
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(','))
        .collect()
});

/// Looks up the `"countyName,stateCode"` value for a county geo id.
///
/// Returns `None` for ids absent from the table; callers drop such rows
/// from aggregation rather than treating the miss as an error.
#[must_use]
pub fn county_state(geo_id: &str) -> Option<&'static str> {
    COUNTY_TABLE.get(geo_id).copied()
}

/// Resolves a county geo id directly to its two-letter state code (the
/// component after the last comma of the table value).
#[must_use]
pub fn state_for_county(geo_id: &str) -> Option<&'static str> {
    county_state(geo_id).and_then(|value| value.rsplit_once(',').map(|(_, state)| state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::is_state_code;

    #[test]
    fn known_county_resolves() {
        assert_eq!(county_state("17031"), Some("Cook County,IL"));
        assert_eq!(state_for_county("17031"), Some("IL"));
    }

    #[test]
    fn unknown_geo_id_is_none() {
        assert_eq!(county_state("99999"), None);
        assert_eq!(state_for_county("99999"), None);
    }

    #[test]
    fn every_value_carries_a_valid_state_code() {
        for (geo_id, value) in COUNTY_TABLE.iter() {
            let (_, state) = value
                .rsplit_once(',')
                .unwrap_or_else(|| panic!("malformed value for {geo_id}: {value}"));
            assert!(is_state_code(state), "bad state {state} for {geo_id}");
        }
    }

    #[test]
    fn table_is_non_trivial() {
        assert!(COUNTY_TABLE.len() > 250);
    }

    #[test]
    fn all_states_are_covered() {
        let covered: std::collections::HashSet<&str> = COUNTY_TABLE
            .values()
            .filter_map(|v| v.rsplit_once(',').map(|(_, s)| s))
            .collect();
        assert_eq!(covered.len(), 51);
    }
}
