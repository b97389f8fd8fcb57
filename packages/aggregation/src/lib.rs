#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The state aggregation pipeline.
//!
//! Both pollutant sources flow through the same five stages: raw delimited
//! text is parsed into typed rows, each row's location key is resolved to a
//! two-letter state code (rows that don't resolve are dropped), resolved
//! rows are grouped by state into running accumulators, per-state means are
//! computed and rounded, and the dominant pollutant is classified per state.
//!
//! The two sources differ only in configuration: the zip-code flat file is
//! a three-pollutant source grouped in first-seen order, while the S3
//! county feed is a four-pollutant source sorted by state before grouping.
//! Those knobs — pollutant set, location resolver, output ordering — are
//! parameters of one pipeline, not two copies of it.

pub mod aggregate;
pub mod classify;
pub mod parse;
pub mod pipeline;
pub mod resolve;

pub use aggregate::{aggregate, round2};
pub use classify::{classify, classify_readings};
pub use parse::{chunk_rows, csv_rows, parse_chunked, parse_flat};
pub use pipeline::{OutputOrdering, dominant_pollutants, state_averages};
pub use resolve::{CountyResolver, LocationResolver, StateCodeResolver};
