//! Control Panel Widget
//! Left side panel with slide buttons, previous/next, the year slider and export.

use crate::presenter::Presenter;
use egui::{Color32, RichText};

/// Left side control panel with navigation and export controls.
pub struct ControlPanel {
    /// Slider value; synced from the presenter every frame.
    pub year: i32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            year: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, presenter: &Presenter) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;
        let registry = presenter.registry();
        let current = presenter.active_button();
        self.year = presenter.year_selector();

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("COVID-19 Slides")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Deaths & vaccinations by year")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Slides Section =====
        ui.label(RichText::new("Slides").size(14.0).strong());
        ui.add_space(5.0);

        for (index, slide) in registry.slides().iter().enumerate() {
            let label = RichText::new(format!("{}. {}", index + 1, slide.year)).size(13.0);
            if ui.selectable_label(index == current, label).clicked() {
                action = ControlPanelAction::GoTo(index);
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(current > 0, egui::Button::new("◀ Previous"))
                .clicked()
            {
                action = ControlPanelAction::Previous;
            }
            if ui
                .add_enabled(current + 1 < presenter.slide_count(), egui::Button::new("Next ▶"))
                .clicked()
            {
                action = ControlPanelAction::Next;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Year Section =====
        ui.label(RichText::new("Year").size(14.0).strong());
        ui.add_space(5.0);

        let (min_year, max_year) = registry.year_range();
        let slider = egui::Slider::new(&mut self.year, min_year..=max_year).step_by(1.0);
        if ui.add(slider).changed() {
            action = ControlPanelAction::SelectYear(self.year);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let export_enabled = presenter.dataset().is_some();
            ui.add_enabled_ui(export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("Export Chart").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if presenter.is_loading() {
            Color32::from_rgb(100, 149, 237)
        } else {
            Color32::GRAY
        };
        let status = if presenter.is_loading() {
            "Loading data..."
        } else {
            self.status.as_str()
        };
        ui.label(RichText::new(status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    GoTo(usize),
    Previous,
    Next,
    SelectYear(i32),
    Export,
}
