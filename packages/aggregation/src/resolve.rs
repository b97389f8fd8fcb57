//! Location resolution — raw keys to canonical state codes.
//!
//! Resolution is a pure lookup over static data. A key that doesn't
//! resolve returns `None` and the row is excluded from aggregation; a miss
//! is never an error.

use air_map_geography_models::{is_state_code, state_for_county};

/// Maps a raw location key to a two-letter state code.
pub trait LocationResolver {
    /// Resolves `key`, or returns `None` to drop the row.
    fn resolve(&self, key: &str) -> Option<String>;
}

/// Flat-source resolver: the key is already a state code and only has to
/// pass membership in the closed 51-code set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCodeResolver;

impl LocationResolver for StateCodeResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        is_state_code(key).then(|| key.to_string())
    }
}

/// Chunked-source resolver: the key is a county geo id looked up in the
/// static county table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountyResolver;

impl LocationResolver for CountyResolver {
    fn resolve(&self, key: &str) -> Option<String> {
        let state = state_for_county(key);
        if state.is_none() {
            log::debug!("county geo id {key} not in lookup table, dropping row");
        }
        state.map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_code_passes_membership() {
        assert_eq!(StateCodeResolver.resolve("CA"), Some("CA".to_string()));
        assert_eq!(StateCodeResolver.resolve("PR"), None);
        assert_eq!(StateCodeResolver.resolve(""), None);
    }

    #[test]
    fn county_resolves_through_table() {
        assert_eq!(CountyResolver.resolve("06037"), Some("CA".to_string()));
        assert_eq!(CountyResolver.resolve("00000"), None);
    }
}
