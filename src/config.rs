//! Viewer configuration
//! Optional JSON file; every field falls back to the defaults below.

use crate::charts::{AnnotationPolicy, Layout, Margins, RenderOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "covid_slides.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub data_path: PathBuf,
    /// Slides JSON replacing the built-in slides.
    pub slides_path: Option<PathBuf>,
    pub layout: Layout,
    pub y_padding: f64,
    pub mirror_right_axis: bool,
    pub annotation_policy: AnnotationPolicy,
    pub show_markers: bool,
    pub month_names: bool,
    pub abbreviate_values: bool,
    pub show_titles: bool,
    pub margins: Margins,
    pub min_plot_size: [f64; 2],
    pub cache_dataset: bool,
    pub log_level: String,
    pub window_size: [f32; 2],
    pub open_after_export: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            data_path: PathBuf::from("data/covid_yearly_data.csv"),
            slides_path: None,
            layout: render.layout,
            y_padding: render.y_padding,
            mirror_right_axis: render.mirror_right_axis,
            annotation_policy: render.annotation_policy,
            show_markers: render.show_markers,
            month_names: render.month_names,
            abbreviate_values: render.abbreviate_values,
            show_titles: render.show_titles,
            margins: render.margins,
            min_plot_size: [render.min_plot_size.0, render.min_plot_size.1],
            cache_dataset: false,
            log_level: "info".to_string(),
            window_size: [1200.0, 800.0],
            open_after_export: false,
        }
    }
}

impl VizConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read `path` if it exists; otherwise, or on a bad file, use defaults.
    ///
    /// A bad file's error is handed back so the caller can report it once
    /// logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            layout: self.layout,
            y_padding: self.y_padding,
            mirror_right_axis: self.mirror_right_axis,
            annotation_policy: self.annotation_policy,
            show_markers: self.show_markers,
            month_names: self.month_names,
            abbreviate_values: self.abbreviate_values,
            show_titles: self.show_titles,
            margins: self.margins,
            min_plot_size: (self.min_plot_size[0], self.min_plot_size[1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(VizConfig::from_json("{}").unwrap(), VizConfig::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = VizConfig::from_json(
            r#"{"layout": "side_by_side", "annotation_policy": "clamp", "y_padding": 1.0}"#,
        )
        .unwrap();
        assert_eq!(config.layout, Layout::SideBySide);
        assert_eq!(config.annotation_policy, AnnotationPolicy::Clamp);

        let options = config.render_options();
        assert_eq!(options.y_padding, 1.0);
        assert!(options.show_markers);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        assert!(matches!(
            VizConfig::from_json(r#"{"layout": "grid"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_file_falls_back() {
        let (config, err) = VizConfig::load_or_default(Path::new("no/such/config.json"));
        assert_eq!(config, VizConfig::default());
        assert!(err.is_none());
    }

    #[test]
    fn invalid_file_falls_back_with_error() {
        let path = std::env::temp_dir().join(format!(
            "covid_slides_bad_config_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"layout": "grid"}"#).unwrap();

        let (config, err) = VizConfig::load_or_default(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config, VizConfig::default());
        assert!(matches!(err, Some(ConfigError::Json(_))));
    }
}
