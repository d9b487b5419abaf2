//! Typed dataset records.

use serde::{Deserialize, Serialize};

/// One parsed CSV row: a (year, month) pair with its two smoothed metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRecord {
    pub year: i32,
    /// Calendar month, always within `1..=12`.
    pub month: u32,
    pub deaths_smoothed: f64,
    pub vaccinations_smoothed: f64,
}

impl DataRecord {
    pub fn new(year: i32, month: u32, deaths_smoothed: f64, vaccinations_smoothed: f64) -> Self {
        Self {
            year,
            month,
            deaths_smoothed,
            vaccinations_smoothed,
        }
    }

    /// Value of the given metric for this row.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Deaths => self.deaths_smoothed,
            Metric::Vaccinations => self.vaccinations_smoothed,
        }
    }
}

/// The two series plotted on every slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Deaths,
    Vaccinations,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Deaths, Metric::Vaccinations];

    /// CSV column holding this metric.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Deaths => "new_deaths_smoothed",
            Metric::Vaccinations => "new_vaccinations_smoothed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Deaths => "Deaths",
            Metric::Vaccinations => "Vaccinations",
        }
    }

    pub fn axis_title(self) -> &'static str {
        match self {
            Metric::Deaths => "New deaths (smoothed)",
            Metric::Vaccinations => "New vaccinations (smoothed)",
        }
    }
}
