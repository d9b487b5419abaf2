//! Covid Slides Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{export_surfaces, ChartRenderer};
use crate::config::VizConfig;
use crate::data::DataLoader;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::presenter::Presenter;
use crate::slides::{RegistryError, SlideRegistry};
use egui::SidePanel;
use tracing::{info, warn};

/// Main application window.
pub struct CovidSlidesApp {
    config: VizConfig,
    presenter: Presenter,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl CovidSlidesApp {
    /// Build the presenter from config and show the first slide.
    pub fn from_config(config: VizConfig) -> Result<Self, RegistryError> {
        let registry = match &config.slides_path {
            Some(path) => {
                info!(path = %path.display(), "loading slides");
                SlideRegistry::from_path(path)?
            }
            None => SlideRegistry::builtin(),
        };

        let loader = DataLoader::csv(config.cache_dataset);
        let renderer = ChartRenderer::new(config.render_options());
        let mut presenter = Presenter::new(registry, loader, config.data_path.clone(), renderer);
        presenter.start();

        Ok(Self {
            config,
            presenter,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        })
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::GoTo(index) => {
                self.presenter.go_to(index);
            }
            ControlPanelAction::Previous => {
                self.presenter.previous();
            }
            ControlPanelAction::Next => {
                self.presenter.next();
            }
            ControlPanelAction::SelectYear(year) => {
                if !self.presenter.select_by_year(year) {
                    self.control_panel
                        .set_status(&format!("No slide for {year}"));
                }
            }
            ControlPanelAction::Export => self.handle_export(),
            ControlPanelAction::None => {}
        }
    }

    /// Handle chart export - save the current slide's charts as SVG or PNG
    fn handle_export(&mut self) {
        let year = self.presenter.current_slide().year;
        let output_path = match rfd::FileDialog::new()
            .add_filter("SVG Image", &["svg"])
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("covid_{year}.svg"))
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match export_surfaces(&self.presenter.layout_surfaces(), &output_path) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
                if self.config.open_after_export {
                    if let Err(err) = open::that(&output_path) {
                        warn!(path = %output_path.display(), error = %err, "could not open export");
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "export failed");
                self.control_panel
                    .set_status(&format!("Export Error: {err}"));
            }
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (left, right) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if left {
            self.presenter.previous();
        }
        if right {
            self.presenter.next();
        }
    }
}

impl eframe::App for CovidSlidesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        if self.presenter.poll() {
            if let Some(dataset) = self.presenter.dataset() {
                let status = match dataset.skipped_rows {
                    0 => format!("Loaded {} rows", dataset.records.len()),
                    skipped => format!(
                        "Loaded {} rows ({} skipped)",
                        dataset.records.len(),
                        skipped
                    ),
                };
                self.control_panel.set_status(&status);
            }
        }

        // Request repaint while loading
        if self.presenter.is_loading() {
            ctx.request_repaint();
        }

        self.handle_keys(ctx);

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(220.0)
            .max_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, &self.presenter);
                    self.handle_action(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ctx, ui, &mut self.presenter);
        });
    }
}
