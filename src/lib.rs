//! Covid Slides - slide-driven COVID-19 deaths & vaccination charts
//!
//! Each slide binds a year to a narrative and a few annotated line charts
//! rendered from a CSV time series. The core (loading, scales, scene
//! rendering, navigation) is headless; `gui` hosts it in an eframe window.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod presenter;
pub mod slides;

pub use config::VizConfig;
pub use presenter::Presenter;
