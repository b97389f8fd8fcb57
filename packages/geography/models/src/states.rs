//! The accepted US state code set.
//!
//! Rows from the zip-code source are grouped by these two-letter codes;
//! anything outside the set is dropped before aggregation.

/// The 50 US states plus DC, in the order the upstream data feed lists
/// them. Territories (Puerto Rico, Guam, ...) are deliberately excluded.
pub const STATE_CODES: &[&str] = &[
    "NY", "MA", "RI", "NH", "ME", "VT", "CT", "NJ", "PA", "DE", "DC", "VA", "MD", "WV", "NC", "SC",
    "GA", "FL", "AL", "TN", "MS", "KY", "OH", "IN", "MI", "IA", "WI", "MN", "SD", "ND", "MT", "IL",
    "MO", "KS", "NE", "LA", "AR", "OK", "TX", "CO", "WY", "ID", "UT", "AZ", "NM", "NV", "CA", "HI",
    "OR", "WA", "AK",
];

/// Tests whether `code` is a recognized state code (exact, case-sensitive
/// match against [`STATE_CODES`]).
#[must_use]
pub fn is_state_code(code: &str) -> bool {
    STATE_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_count() {
        assert_eq!(STATE_CODES.len(), 51);
    }

    #[test]
    fn includes_dc() {
        assert!(is_state_code("DC"));
    }

    #[test]
    fn excludes_territories() {
        assert!(!is_state_code("PR"));
        assert!(!is_state_code("GU"));
        assert!(!is_state_code("VI"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        assert!(is_state_code("CA"));
        assert!(!is_state_code("ca"));
    }

    #[test]
    fn no_duplicates() {
        let mut sorted: Vec<&str> = STATE_CODES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), STATE_CODES.len());
    }
}
