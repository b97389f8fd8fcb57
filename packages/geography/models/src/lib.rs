#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Static US geography lookups for the air map.
//!
//! Both aggregation sources resolve their raw location keys through this
//! crate: the zip-code flat file carries state codes checked against the
//! closed 51-code set, and the S3 county feed carries county geo ids looked
//! up in the embedded county table. All data is read-only and loaded once
//! per process.

pub mod counties;
pub mod states;

pub use counties::{county_state, state_for_county};
pub use states::{STATE_CODES, is_state_code};
