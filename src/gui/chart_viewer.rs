//! Chart Viewer Widget
//! Central area that sizes the chart surfaces, paints their scenes and routes hovering.

use crate::charts::scene::{Anchor, ChartPanel, Color, SceneNode, Surface, TextNode};
use crate::charts::Layout;
use crate::presenter::Presenter;
use egui::epaint::{CubicBezierShape, TextShape};
use egui::{Align2, Color32, FontId, Pos2, RichText, Stroke};
use kurbo::{PathEl, Point};

const SURFACE_SPACING: f32 = 10.0;

/// Paints presenter surfaces and the shared tooltip.
#[derive(Default)]
pub struct ChartViewer {
    /// Screen position of the surface the tooltip belongs to.
    tooltip_origin: Option<Pos2>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the chart surfaces for the current layout
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, presenter: &mut Presenter) {
        let text = presenter.text().clone();
        ui.vertical(|ui| {
            ui.label(RichText::new(&text.title).size(20.0).strong());
            ui.label(RichText::new(&text.narrative).size(14.0));
            if let Some(message) = &text.message {
                ui.label(
                    RichText::new(message)
                        .size(13.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        });
        ui.add_space(10.0);

        let layout = presenter.renderer().layout();
        let names = layout.surface_names();
        let available = ui.available_size();
        let width = match layout {
            Layout::SideBySide => {
                (available.x - SURFACE_SPACING * (names.len() as f32 - 1.0)) / names.len() as f32
            }
            Layout::Stacked | Layout::Overlaid => available.x,
        };
        let size = egui::vec2(width.max(1.0), available.y.max(1.0));

        let mut hovered = false;
        ui.horizontal(|ui| {
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    ui.add_space(SURFACE_SPACING);
                }
                presenter.resize_surface(name, size.x as f64, size.y as f64);

                let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
                let origin = response.rect.min;
                painter.rect_filled(response.rect, 4.0, Color32::WHITE);
                if let Some(surface) = presenter.surfaces().get(name) {
                    Self::paint_surface(&painter, origin, surface);
                }

                if let Some(pointer) = response.hover_pos() {
                    let local = pointer - origin;
                    if presenter.hover(name, Point::new(local.x as f64, local.y as f64)) {
                        self.tooltip_origin = Some(origin);
                        hovered = true;
                    }
                }
            }
        });

        if !hovered {
            presenter.hover_exit();
            self.tooltip_origin = None;
        }
        self.show_tooltip(ctx, presenter);
    }

    fn show_tooltip(&self, ctx: &egui::Context, presenter: &Presenter) {
        let tooltip = presenter.tooltip();
        let Some(origin) = self.tooltip_origin else {
            return;
        };
        if !tooltip.is_visible() {
            return;
        }

        let pos = origin + egui::vec2(tooltip.position().x as f32, tooltip.position().y as f32);
        egui::Area::new(egui::Id::new("chart_tooltip"))
            .order(egui::Order::Tooltip)
            .fixed_pos(pos)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(RichText::new(tooltip.text()).size(12.0));
                });
            });
    }

    fn paint_surface(painter: &egui::Painter, origin: Pos2, surface: &Surface) {
        for panel in surface.panels() {
            Self::paint_panel(painter, origin, panel);
        }
    }

    fn paint_panel(painter: &egui::Painter, origin: Pos2, panel: &ChartPanel) {
        let to_screen = |p: Point| {
            let p = panel.to_surface(p);
            origin + egui::vec2(p.x as f32, p.y as f32)
        };

        for node in &panel.nodes {
            match node {
                SceneNode::Series {
                    path, color, width, ..
                } => {
                    let stroke = Stroke::new(*width as f32, color32(*color));
                    let mut current = None;
                    for el in path.elements() {
                        match *el {
                            PathEl::MoveTo(p) => current = Some(to_screen(p)),
                            PathEl::LineTo(p) => {
                                let end = to_screen(p);
                                if let Some(start) = current {
                                    painter.line_segment([start, end], stroke);
                                }
                                current = Some(end);
                            }
                            PathEl::CurveTo(c1, c2, p) => {
                                let end = to_screen(p);
                                if let Some(start) = current {
                                    painter.add(CubicBezierShape::from_points_stroke(
                                        [start, to_screen(c1), to_screen(c2), end],
                                        false,
                                        Color32::TRANSPARENT,
                                        stroke,
                                    ));
                                }
                                current = Some(end);
                            }
                            PathEl::QuadTo(_, p) => current = Some(to_screen(p)),
                            PathEl::ClosePath => {}
                        }
                    }
                }
                SceneNode::Line { from, to, color } => {
                    painter.line_segment(
                        [to_screen(*from), to_screen(*to)],
                        Stroke::new(1.0, color32(*color)),
                    );
                }
                SceneNode::Marker(marker) => {
                    painter.circle_filled(
                        to_screen(marker.center),
                        marker.radius as f32,
                        color32(marker.color),
                    );
                }
                SceneNode::Text(text) => Self::paint_text(painter, to_screen(text.position), text),
            }
        }
    }

    fn paint_text(painter: &egui::Painter, pos: Pos2, text: &TextNode) {
        let font = FontId::proportional(text.role.font_size());
        let color = color32(text.color);

        if text.vertical {
            let galley = painter.layout_no_wrap(text.text.clone(), font, color);
            let size = galley.size();
            // Rotating about the galley's top-left corner; shift so it is centred on `pos`.
            let top_left = pos + egui::vec2(-size.y / 2.0, size.x / 2.0);
            painter.add(
                TextShape::new(top_left, galley, color).with_angle(-std::f32::consts::FRAC_PI_2),
            );
            return;
        }

        let align = match text.anchor {
            Anchor::Start => Align2::LEFT_CENTER,
            Anchor::Middle => Align2::CENTER_CENTER,
            Anchor::End => Align2::RIGHT_CENTER,
        };
        painter.text(pos, align, &text.text, font, color);
    }
}

fn color32(color: Color) -> Color32 {
    Color32::from_rgb(color.0, color.1, color.2)
}
