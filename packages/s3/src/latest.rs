//! Latest-file selection by key-embedded timestamp.
//!
//! The feed names its files `YYYY/MM/DD hh:mm.csv`. The key is turned into
//! a parseable timestamp by replacing the space with `T`, stripping the
//! last four characters (`.csv`), and appending `Z` — this exact transform
//! is what the feed's consumers have always applied, so it is reproduced
//! as-is. Keys that don't survive the transform parse as the earliest
//! possible instant and can never win the scan.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamp layout after the key transform.
const KEY_FORMAT: &str = "%Y/%m/%dT%H:%MZ";

/// Parses the timestamp embedded in an object key.
///
/// Returns `None` for keys that don't match the feed's naming scheme.
#[must_use]
pub fn parse_key_timestamp(key: &str) -> Option<DateTime<Utc>> {
    let transformed = key.replace(' ', "T");
    let stem = transformed.get(..transformed.len().checked_sub(4)?)?;
    let candidate = format!("{stem}Z");
    NaiveDateTime::parse_from_str(&candidate, KEY_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Picks the CSV key with the greatest embedded timestamp.
///
/// A linear scan with a single running best candidate; keys that fail to
/// parse are treated as earliest-possible. On equal timestamps the earlier
/// key in the listing wins. Returns `None` when no `.csv` keys exist.
#[must_use]
pub fn latest_csv_key<'a, I>(keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter(|key| key.ends_with(".csv"))
        .fold(None, |best: Option<(&str, DateTime<Utc>)>, key| {
            let timestamp = parse_key_timestamp(key).unwrap_or(DateTime::<Utc>::MIN_UTC);
            match best {
                Some((_, best_timestamp)) if timestamp <= best_timestamp => best,
                _ => Some((key, timestamp)),
            }
        })
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feed_keys() {
        let ts = parse_key_timestamp("2024/05/12 10:30.csv").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-12T10:30:00+00:00");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(parse_key_timestamp("readme.txt").is_none());
        assert!(parse_key_timestamp("2024-05-12 10:30.csv").is_none());
        assert!(parse_key_timestamp("").is_none());
        assert!(parse_key_timestamp("csv").is_none());
    }

    #[test]
    fn greatest_timestamp_wins() {
        let keys = [
            "2024/05/12 10:30.csv",
            "2024/05/12 11:00.csv",
            "2023/12/31 23:59.csv",
        ];
        assert_eq!(
            latest_csv_key(keys.iter().copied()),
            Some("2024/05/12 11:00.csv")
        );
    }

    #[test]
    fn non_csv_keys_are_ignored() {
        let keys = ["2024/05/12 10:30.csv", "2099/01/01 00:00.json"];
        assert_eq!(
            latest_csv_key(keys.iter().copied()),
            Some("2024/05/12 10:30.csv")
        );
    }

    #[test]
    fn malformed_csv_keys_never_win() {
        let keys = ["notes.csv", "2024/05/12 10:30.csv"];
        assert_eq!(
            latest_csv_key(keys.iter().copied()),
            Some("2024/05/12 10:30.csv")
        );
    }

    #[test]
    fn empty_listing_yields_none() {
        assert_eq!(latest_csv_key(std::iter::empty()), None);
    }

    #[test]
    fn only_malformed_keys_still_picks_one() {
        // Everything parses as earliest-possible; the first key stands.
        let keys = ["a.csv", "b.csv"];
        assert_eq!(latest_csv_key(keys.iter().copied()), Some("a.csv"));
    }
}
