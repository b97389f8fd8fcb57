//! Record parsing for the two source shapes.
//!
//! **Flat mode** (zip-code source): one record per line, comma-separated,
//! fixed column order `[State, Zip, NO2, O3, CH2O]`. The header line is
//! discarded unconditionally by position — it is never validated.
//!
//! **Chunked mode** (county source): runs of exactly 5 consecutive lines
//! describe one location — line 0 carries the county geo id, lines 1-4 the
//! NO2, O3, CH2O and PM readings. Only the first column of each line is
//! meaningful. A trailing partial chunk is dropped entirely.
//!
//! Numeric fields that fail to parse become `NaN` and flow through the
//! downstream sums unchanged; no row is rejected for a bad number.

use air_map_pollution_models::{PollutantReadings, RawRecord};

/// Lines per location in the chunked source shape.
const CHUNK_SIZE: usize = 5;

/// Parses a numeric field, falling back to `NaN` on failure.
fn parse_or_nan(field: Option<&str>) -> f64 {
    field
        .map_or(f64::NAN, |value| value.trim().parse().unwrap_or(f64::NAN))
}

/// Splits raw CSV text into records of string fields, skipping empty lines.
#[must_use]
pub fn csv_rows(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(Result::ok)
        .map(|record| record.iter().map(str::to_string).collect())
        .collect()
}

/// Groups records into runs of 5, the chunked source's location shape.
///
/// The trailing group may be partial here — this is the raw view served by
/// the "latest file" endpoint. Record construction via [`parse_chunked`]
/// drops the partial chunk.
#[must_use]
pub fn chunk_rows(rows: Vec<Vec<String>>) -> Vec<Vec<Vec<String>>> {
    let mut chunks = Vec::with_capacity(rows.len().div_ceil(CHUNK_SIZE));
    let mut iter = rows.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(CHUNK_SIZE).collect());
    }
    chunks
}

/// Parses flat-mode text into records, discarding the header row.
///
/// Records with 5+ fields use the `[State, Zip, NO2, O3, CH2O]` layout;
/// records with exactly 4 fields omit the zip column. Anything narrower is
/// dropped.
#[must_use]
pub fn parse_flat(text: &str) -> Vec<RawRecord> {
    csv_rows(text)
        .into_iter()
        .skip(1)
        .filter_map(|fields| {
            let field = |i: usize| fields.get(i).map(String::as_str);
            match fields.len() {
                0..=3 => None,
                4 => Some(RawRecord {
                    location_key: fields[0].clone(),
                    zip: None,
                    readings: PollutantReadings {
                        no2: parse_or_nan(field(1)),
                        o3: parse_or_nan(field(2)),
                        ch2o: parse_or_nan(field(3)),
                        pm: None,
                    },
                }),
                _ => Some(RawRecord {
                    location_key: fields[0].clone(),
                    zip: Some(fields[1].clone()),
                    readings: PollutantReadings {
                        no2: parse_or_nan(field(2)),
                        o3: parse_or_nan(field(3)),
                        ch2o: parse_or_nan(field(4)),
                        pm: None,
                    },
                }),
            }
        })
        .collect()
}

/// Parses chunked-mode text into records, one per complete 5-line run.
///
/// A trailing run of fewer than 5 lines is discarded whole — never
/// partially processed.
#[must_use]
pub fn parse_chunked(text: &str) -> Vec<RawRecord> {
    let rows = csv_rows(text);
    let dropped = rows.len() % CHUNK_SIZE;
    if dropped > 0 {
        log::debug!("dropping trailing partial chunk of {dropped} line(s)");
    }

    let first_column = |row: &[String]| parse_or_nan(row.first().map(String::as_str));

    rows.chunks_exact(CHUNK_SIZE)
        .map(|chunk| RawRecord {
            location_key: chunk[0].first().cloned().unwrap_or_default(),
            zip: None,
            readings: PollutantReadings {
                no2: first_column(&chunk[1]),
                o3: first_column(&chunk[2]),
                ch2o: first_column(&chunk[3]),
                pm: Some(first_column(&chunk[4])),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = "State,Zip,NO2,O3,CH2O\nCA,90001,10.5,20.1,5.0\nTX,75001,8.0,9.5,3.2\n";

    #[test]
    fn flat_skips_header_by_position() {
        let records = parse_flat(FLAT);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].location_key, "CA");
        assert_eq!(records[0].zip.as_deref(), Some("90001"));
        assert!((records[0].readings.no2 - 10.5).abs() < f64::EPSILON);
        assert_eq!(records[0].readings.pm, None);
    }

    #[test]
    fn flat_header_is_never_validated() {
        // A data-looking first line is still discarded.
        let records = parse_flat("CA,90001,1.0,2.0,3.0\nTX,75001,8.0,9.5,3.2\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location_key, "TX");
    }

    #[test]
    fn flat_bad_number_becomes_nan() {
        let records = parse_flat("h,h,h,h,h\nCA,90001,oops,20.1,5.0\n");
        assert!(records[0].readings.no2.is_nan());
        assert!((records[0].readings.o3 - 20.1).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_four_field_rows_omit_zip() {
        let records = parse_flat("header,a,b,c\nCA,10.0,20.0,5.0\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].zip, None);
        assert!((records[0].readings.ch2o - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_empty_input_is_empty() {
        assert!(parse_flat("").is_empty());
        assert!(parse_flat("State,Zip,NO2,O3,CH2O\n").is_empty());
    }

    fn chunked_text(locations: &[(&str, [f64; 4])], trailing: usize) -> String {
        let mut text = String::new();
        for (key, values) in locations {
            text.push_str(&format!("{key}\n"));
            for value in values {
                text.push_str(&format!("{value}\n"));
            }
        }
        for i in 0..trailing {
            text.push_str(&format!("extra{i}\n"));
        }
        text
    }

    #[test]
    fn chunked_parses_complete_runs() {
        let text = chunked_text(&[("17031", [1.0, 2.0, 3.0, 4.0])], 0);
        let records = parse_chunked(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location_key, "17031");
        assert_eq!(records[0].readings.pm, Some(4.0));
    }

    #[test]
    fn chunked_drops_trailing_partial_chunk() {
        // 5*2 + k lines: exactly 2 records, the k extras discarded whole.
        for k in 1..5 {
            let text = chunked_text(
                &[("17031", [1.0, 2.0, 3.0, 4.0]), ("06037", [5.0, 6.0, 7.0, 8.0])],
                k,
            );
            let records = parse_chunked(&text);
            assert_eq!(records.len(), 2, "trailing {k} lines must be dropped");
        }
    }

    #[test]
    fn chunked_only_first_column_is_read() {
        let text = "17031,ignored\n1.0,9.9\n2.0\n3.0\n4.0\n";
        let records = parse_chunked(text);
        assert_eq!(records[0].location_key, "17031");
        assert!((records[0].readings.no2 - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn chunked_bad_reading_becomes_nan() {
        let text = "17031\nbad\n2.0\n3.0\n4.0\n";
        let records = parse_chunked(text);
        assert!(records[0].readings.no2.is_nan());
    }

    #[test]
    fn raw_chunks_keep_the_partial_tail() {
        let rows = csv_rows("a\nb\nc\nd\ne\nf\ng\n");
        let chunks = chunk_rows(rows);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 5);
        assert_eq!(chunks[1].len(), 2);
    }
}
