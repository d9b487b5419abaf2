//! Slide Registry
//! The ordered, immutable list of slides shown by the presentation.

use crate::data::Metric;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to read slides file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid slides JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Slide list is empty")]
    Empty,
}

/// A labelled callout pinned to one month of a slide's year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub month: u32,
    pub deaths: f64,
    pub vaccinations: f64,
    pub text: String,
}

impl Annotation {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Deaths => self.deaths,
            Metric::Vaccinations => self.vaccinations,
        }
    }
}

/// One year-scoped narrative and its chart annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: u32,
    pub title: String,
    #[serde(alias = "content")]
    pub narrative: String,
    pub year: i32,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Ordered slides. Never empty; navigation addresses slides by position.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: Vec<Slide>,
}

impl SlideRegistry {
    pub fn new(slides: Vec<Slide>) -> Result<Self, RegistryError> {
        if slides.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { slides })
    }

    /// The three slides of the COVID-19 presentation.
    pub fn builtin() -> Self {
        Self {
            slides: builtin_slides(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let slides: Vec<Slide> = serde_json::from_str(json)?;
        Self::new(slides)
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Position of the first slide for `year`.
    pub fn index_for_year(&self, year: i32) -> Option<usize> {
        self.slides.iter().position(|s| s.year == year)
    }

    /// Smallest and largest slide year, for the year selector bounds.
    pub fn year_range(&self) -> (i32, i32) {
        let years = self.slides.iter().map(|s| s.year);
        let min = years.clone().min().unwrap_or_default();
        let max = years.max().unwrap_or_default();
        (min, max)
    }
}

fn builtin_slides() -> Vec<Slide> {
    vec![
        Slide {
            id: 1,
            title: "2021: COVID-19 Deaths and Vaccinations".into(),
            narrative: "2021 saw a significant number of COVID-19 deaths, while vaccination \
                        efforts began ramping up."
                .into(),
            year: 2021,
            annotations: vec![
                Annotation {
                    month: 1,
                    deaths: 190740.85799999986,
                    vaccinations: 60356748.0,
                    text: "January 2021: High deaths, vaccination rollout begins.".into(),
                },
                Annotation {
                    month: 5,
                    deaths: 36450.272000000004,
                    vaccinations: 114530378.0,
                    text: "May 2021: Continued vaccination efforts.".into(),
                },
            ],
        },
        Slide {
            id: 2,
            title: "2022: Continued Efforts".into(),
            narrative: "2022 continued with significant efforts in vaccinations and a decrease \
                        in deaths."
                .into(),
            year: 2022,
            annotations: vec![Annotation {
                month: 3,
                deaths: 80424.85000000005,
                vaccinations: 161874846.0,
                text: "March 2022: Increased vaccinations, fewer deaths.".into(),
            }],
        },
        Slide {
            id: 3,
            title: "2023: Stabilization".into(),
            narrative: "2023 saw a stabilization in deaths and continued vaccinations.".into(),
            year: 2023,
            annotations: vec![Annotation {
                month: 4,
                deaths: 43591.153999999944,
                vaccinations: 183419494.0,
                text: "April 2023: Stable deaths and high vaccination rates.".into(),
            }],
        },
    ]
}
