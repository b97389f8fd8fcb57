#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Pollutant taxonomy and measurement types.
//!
//! This crate defines the canonical pollutant model used across the entire
//! air-map system. Both aggregation sources (the zip-code flat file and the
//! S3 county feed) normalize their rows into these shared types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A tracked pollutant.
///
/// `Unknown` is the sentinel reported when a dominant-pollutant comparison
/// cannot name a winner (every candidate value was `NaN`). It never appears
/// in parsed input.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Pollutant {
    /// Nitrogen dioxide.
    #[serde(rename = "NO2")]
    #[strum(serialize = "NO2")]
    No2,
    /// Ozone.
    #[serde(rename = "O3")]
    #[strum(serialize = "O3")]
    O3,
    /// Formaldehyde.
    #[serde(rename = "CH2O")]
    #[strum(serialize = "CH2O")]
    Ch2o,
    /// Particulate matter.
    #[serde(rename = "PM")]
    #[strum(serialize = "PM")]
    Pm,
    /// No pollutant could be named (all candidate values were `NaN`).
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

/// Which pollutants a data source reports.
///
/// The zip-code flat file carries three pollutants; the S3 county feed adds
/// particulate matter. The member order is the fixed tie-break priority used
/// by the dominant-pollutant classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutantSet {
    /// NO2, O3, CH2O (zip-code source).
    Standard,
    /// NO2, O3, CH2O, PM (S3 county source).
    Extended,
}

impl PollutantSet {
    /// Returns the members of this set in classifier priority order.
    #[must_use]
    pub const fn members(self) -> &'static [Pollutant] {
        match self {
            Self::Standard => &[Pollutant::No2, Pollutant::O3, Pollutant::Ch2o],
            Self::Extended => &[
                Pollutant::No2,
                Pollutant::O3,
                Pollutant::Ch2o,
                Pollutant::Pm,
            ],
        }
    }
}

/// One row's pollutant readings.
///
/// Values are whatever the source text parsed to — a field that failed
/// numeric parsing is carried as `NaN` rather than rejected, and flows
/// through sums unchanged. `pm` is `None` for three-pollutant sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantReadings {
    /// Nitrogen dioxide reading.
    pub no2: f64,
    /// Ozone reading.
    pub o3: f64,
    /// Formaldehyde reading.
    pub ch2o: f64,
    /// Particulate matter reading, when the source reports it.
    pub pm: Option<f64>,
}

impl PollutantReadings {
    /// Returns the reading for `pollutant`, or `None` if this row doesn't
    /// carry it.
    #[must_use]
    pub const fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::No2 => Some(self.no2),
            Pollutant::O3 => Some(self.o3),
            Pollutant::Ch2o => Some(self.ch2o),
            Pollutant::Pm => self.pm,
            Pollutant::Unknown => None,
        }
    }
}

/// One parsed measurement row, before location resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Raw grouping key: a two-letter state code (flat source) or a county
    /// geo id (chunked source).
    pub location_key: String,
    /// Zip code, carried only by the flat source.
    pub zip: Option<String>,
    /// The row's pollutant readings.
    pub readings: PollutantReadings,
}

/// Running per-state accumulator used during a single aggregation pass.
///
/// Starts at zero sums and zero count; the first contribution increments
/// `count` to 1. Never shared across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StateAccumulator {
    /// Sum of NO2 readings.
    pub sum_no2: f64,
    /// Sum of O3 readings.
    pub sum_o3: f64,
    /// Sum of CH2O readings.
    pub sum_ch2o: f64,
    /// Sum of PM readings (stays 0 for three-pollutant sources).
    pub sum_pm: f64,
    /// Number of contributing rows.
    pub count: u64,
}

impl StateAccumulator {
    /// Folds one row's readings into the accumulator.
    pub fn add(&mut self, readings: &PollutantReadings) {
        self.sum_no2 += readings.no2;
        self.sum_o3 += readings.o3;
        self.sum_ch2o += readings.ch2o;
        if let Some(pm) = readings.pm {
            self.sum_pm += pm;
        }
        self.count += 1;
    }
}

/// Per-state arithmetic means, rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateAverage {
    /// Two-letter state code.
    pub state: String,
    /// Mean NO2.
    pub no2: f64,
    /// Mean O3.
    pub o3: f64,
    /// Mean CH2O.
    pub ch2o: f64,
    /// Mean PM, when the source reports it.
    pub pm: Option<f64>,
}

impl StateAverage {
    /// Returns the averaged value for `pollutant`, or `None` if absent.
    #[must_use]
    pub const fn get(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::No2 => Some(self.no2),
            Pollutant::O3 => Some(self.o3),
            Pollutant::Ch2o => Some(self.ch2o),
            Pollutant::Pm => self.pm,
            Pollutant::Unknown => None,
        }
    }
}

/// The dominant pollutant for one state: the maximum averaged value and the
/// pollutant that attained it.
///
/// Response-only projection; created per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DominantPollutant {
    /// Two-letter state code.
    pub state: String,
    /// The maximum pollutant value (`NaN` when every candidate was `NaN`).
    pub max_pollutant: f64,
    /// Which pollutant attained the maximum.
    pub pollutant: Pollutant,
}
