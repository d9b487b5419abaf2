//! Chart Renderer
//! Paints a slide's year onto chart surfaces.
//!
//! Per panel, in order:
//! 1. Clear the surface
//! 2. Size the plot area from the surface minus margins (clamped)
//! 3. Scales: x fixed to months, one padded y scale per metric
//! 4. Smoothed series lines, deaths red and vaccinations green
//! 5. Optional point markers (hover targets)
//! 6. Month axis at the bottom, value axes at the left (and right)
//! 7. Optional chart and axis titles
//! 8. Annotation labels at `(x(month), y(value))`

use crate::charts::curve::monotone_x;
use crate::charts::format::{month_tick, value_tick};
use crate::charts::scale::{derive_scale, month_scale, LinearScale};
use crate::charts::scene::{
    Anchor, ChartPanel, Color, Marker, MarkerDatum, SceneNode, SurfaceSet, TextNode, TextRole,
};
use crate::data::{DataProcessor, DataRecord, Metric};
use crate::slides::Slide;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub const SHARED_SURFACE: &str = "chart";
pub const DEATHS_SURFACE: &str = "deaths-chart";
pub const VACCINATIONS_SURFACE: &str = "vaccinations-chart";

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const VALUE_TICKS: usize = 6;
const MARKER_RADIUS: f64 = 4.0;
const SERIES_WIDTH: f64 = 2.0;
/// Right margin floor when a right-hand value axis is drawn.
const RIGHT_AXIS_MARGIN: f64 = 60.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Required chart surface `{0}` is missing")]
    MissingSurface(String),
}

/// How the two series share drawing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One surface, deaths chart stacked above vaccinations chart.
    #[default]
    Stacked,
    /// One surface, one chart with both series and a value axis on each side.
    Overlaid,
    /// Two surfaces, one chart each.
    SideBySide,
}

impl Layout {
    /// Surfaces the host must provide for this layout.
    pub fn surface_names(self) -> &'static [&'static str] {
        match self {
            Layout::Stacked | Layout::Overlaid => &[SHARED_SURFACE],
            Layout::SideBySide => &[DEATHS_SURFACE, VACCINATIONS_SURFACE],
        }
    }
}

/// What to do with annotation labels that land outside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationPolicy {
    /// Draw at the computed position; painters clip at the surface edge.
    #[default]
    Free,
    /// Pull the label back inside the plot area.
    Clamp,
    /// Skip labels outside the plot area.
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 30.0,
            right: 30.0,
            bottom: 45.0,
            left: 70.0,
        }
    }
}

/// Renderer settings; see `VizConfig` for the user-facing names.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub layout: Layout,
    pub y_padding: f64,
    pub mirror_right_axis: bool,
    pub annotation_policy: AnnotationPolicy,
    pub show_markers: bool,
    pub month_names: bool,
    pub abbreviate_values: bool,
    pub show_titles: bool,
    pub margins: Margins,
    pub min_plot_size: (f64, f64),
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            y_padding: 1.2,
            mirror_right_axis: false,
            annotation_policy: AnnotationPolicy::default(),
            show_markers: true,
            month_names: true,
            abbreviate_values: true,
            show_titles: true,
            margins: Margins::default(),
            min_plot_size: (40.0, 40.0),
        }
    }
}

/// Counts from one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub points: usize,
    pub annotations_drawn: usize,
    pub annotations_outside: usize,
}

/// Panel placement inside a surface.
struct PanelSlot {
    surface: &'static str,
    origin: Vec2,
    width: f64,
    height: f64,
    metrics: &'static [Metric],
}

pub struct ChartRenderer {
    options: RenderOptions,
}

impl ChartRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn layout(&self) -> Layout {
        self.options.layout
    }

    /// Fully redraw the layout's surfaces for `slide`.
    ///
    /// Fails without touching any surface when one the layout needs is absent.
    pub fn render(
        &self,
        slide: &Slide,
        records: &[DataRecord],
        surfaces: &mut SurfaceSet,
    ) -> Result<RenderSummary, RenderError> {
        let names = self.options.layout.surface_names();
        if let Some(missing) = names.iter().find(|name| !surfaces.contains(name)) {
            error!(surface = missing, slide = slide.id, "chart surface missing, render aborted");
            return Err(RenderError::MissingSurface(missing.to_string()));
        }

        let rows = DataProcessor::select_year(records, slide.year);
        let mut summary = RenderSummary {
            points: rows.len(),
            ..Default::default()
        };

        let mut slots = Vec::new();
        for &name in names {
            let Some(surface) = surfaces.get_mut(name) else {
                continue;
            };
            surface.clear();
            slots.extend(self.panel_slots(name, surface.size()));
        }

        for slot in slots {
            let panel = self.build_panel(&slot, slide, &rows, &mut summary);
            if let Some(surface) = surfaces.get_mut(slot.surface) {
                surface.add_panel(panel);
            }
        }

        debug!(
            slide = slide.id,
            year = slide.year,
            points = summary.points,
            annotations = summary.annotations_drawn,
            "rendered slide"
        );
        Ok(summary)
    }

    fn has_right_axis(&self) -> bool {
        self.options.mirror_right_axis || self.options.layout == Layout::Overlaid
    }

    fn panel_slots(&self, surface: &'static str, (width, height): (f64, f64)) -> Vec<PanelSlot> {
        let m = self.options.margins;
        let right = if self.has_right_axis() {
            m.right.max(RIGHT_AXIS_MARGIN)
        } else {
            m.right
        };
        let (min_w, min_h) = self.options.min_plot_size;
        let plot_w = (width - m.left - right).max(min_w);
        let origin = Vec2::new(m.left, m.top);

        match (self.options.layout, surface) {
            (Layout::Stacked, _) => {
                let plot_h = ((height - 2.0 * (m.top + m.bottom)) / 2.0).max(min_h);
                let step = plot_h + m.top + m.bottom;
                vec![
                    PanelSlot {
                        surface,
                        origin,
                        width: plot_w,
                        height: plot_h,
                        metrics: &[Metric::Deaths],
                    },
                    PanelSlot {
                        surface,
                        origin: origin + Vec2::new(0.0, step),
                        width: plot_w,
                        height: plot_h,
                        metrics: &[Metric::Vaccinations],
                    },
                ]
            }
            (Layout::Overlaid, _) => vec![PanelSlot {
                surface,
                origin,
                width: plot_w,
                height: (height - m.top - m.bottom).max(min_h),
                metrics: &Metric::ALL,
            }],
            (Layout::SideBySide, name) => vec![PanelSlot {
                surface,
                origin,
                width: plot_w,
                height: (height - m.top - m.bottom).max(min_h),
                metrics: if name == VACCINATIONS_SURFACE {
                    &[Metric::Vaccinations]
                } else {
                    &[Metric::Deaths]
                },
            }],
        }
    }

    fn build_panel(
        &self,
        slot: &PanelSlot,
        slide: &Slide,
        rows: &[DataRecord],
        summary: &mut RenderSummary,
    ) -> ChartPanel {
        let mut panel = ChartPanel::new(slot.origin, slot.width, slot.height, month_scale(slot.width));
        for &metric in slot.metrics {
            let values = DataProcessor::metric_values(rows, metric);
            panel
                .y
                .push((metric, derive_scale(&values, slot.height, self.options.y_padding)));
        }

        for (metric, y) in panel.y.clone() {
            self.draw_series(&mut panel, metric, &y, slide.year, rows);
        }
        self.draw_month_axis(&mut panel);
        self.draw_value_axes(&mut panel);
        if self.options.show_titles {
            self.draw_titles(&mut panel, slide.year);
        }
        self.draw_annotations(&mut panel, slide, summary);
        panel
    }

    fn draw_series(
        &self,
        panel: &mut ChartPanel,
        metric: Metric,
        y: &LinearScale,
        year: i32,
        rows: &[DataRecord],
    ) {
        let color = Color::for_metric(metric);
        let mut points: Vec<(Point, &DataRecord)> = rows
            .iter()
            .map(|r| (Point::new(panel.x.apply(r.month as f64), y.apply(r.value(metric))), r))
            .collect();
        // The curve needs ascending x; the filtered rows keep source order.
        points.sort_by(|a, b| a.0.x.total_cmp(&b.0.x));

        let path_points: Vec<Point> = points.iter().map(|(p, _)| *p).collect();
        panel.push(SceneNode::Series {
            metric,
            path: monotone_x(&path_points),
            color,
            width: SERIES_WIDTH,
        });

        if self.options.show_markers {
            for (center, record) in points {
                panel.push(SceneNode::Marker(Marker {
                    center,
                    radius: MARKER_RADIUS,
                    color,
                    datum: MarkerDatum {
                        metric,
                        year,
                        month: record.month,
                        value: record.value(metric),
                    },
                }));
            }
        }
    }

    fn draw_month_axis(&self, panel: &mut ChartPanel) {
        let h = panel.height;
        panel.push(SceneNode::Line {
            from: Point::new(0.0, h),
            to: Point::new(panel.width, h),
            color: Color::AXIS,
        });
        for month in 1..=12u32 {
            let x = panel.x.apply(month as f64);
            panel.push(SceneNode::Line {
                from: Point::new(x, h),
                to: Point::new(x, h + TICK_SIZE),
                color: Color::AXIS,
            });
            panel.push(SceneNode::Text(TextNode {
                position: Point::new(x, h + TICK_SIZE + TICK_PADDING + 6.0),
                text: month_tick(month, self.options.month_names),
                role: TextRole::TickLabel,
                anchor: Anchor::Middle,
                vertical: false,
                color: Color::AXIS,
            }));
        }
    }

    fn draw_value_axes(&self, panel: &mut ChartPanel) {
        let axes: Vec<(Metric, LinearScale, bool)> = match panel.y.as_slice() {
            [(metric, y)] if self.options.mirror_right_axis => {
                vec![(*metric, *y, false), (*metric, *y, true)]
            }
            [(metric, y)] => vec![(*metric, *y, false)],
            [(left, yl), (right, yr), ..] => vec![(*left, *yl, false), (*right, *yr, true)],
            [] => Vec::new(),
        };

        for (metric, y, on_right) in axes {
            let (x, direction, anchor) = if on_right {
                (panel.width, 1.0, Anchor::Start)
            } else {
                (0.0, -1.0, Anchor::End)
            };
            let color = if panel.y.len() > 1 {
                Color::for_metric(metric)
            } else {
                Color::AXIS
            };

            panel.push(SceneNode::Line {
                from: Point::new(x, 0.0),
                to: Point::new(x, panel.height),
                color,
            });
            for tick in y.ticks(VALUE_TICKS) {
                let py = y.apply(tick);
                panel.push(SceneNode::Line {
                    from: Point::new(x, py),
                    to: Point::new(x + direction * TICK_SIZE, py),
                    color,
                });
                panel.push(SceneNode::Text(TextNode {
                    position: Point::new(x + direction * (TICK_SIZE + TICK_PADDING), py),
                    text: value_tick(tick, self.options.abbreviate_values),
                    role: TextRole::TickLabel,
                    anchor,
                    vertical: false,
                    color,
                }));
            }
        }
    }

    fn draw_titles(&self, panel: &mut ChartPanel, year: i32) {
        let metrics: Vec<Metric> = panel.metrics().collect();
        let title = match metrics.as_slice() {
            [metric] => format!("{} in {}", metric.label(), year),
            _ => format!("Deaths and vaccinations in {year}"),
        };
        let margins = self.options.margins;

        panel.push(SceneNode::Text(TextNode {
            position: Point::new(panel.width / 2.0, -margins.top / 2.0),
            text: title,
            role: TextRole::ChartTitle,
            anchor: Anchor::Middle,
            vertical: false,
            color: Color::BLACK,
        }));
        panel.push(SceneNode::Text(TextNode {
            position: Point::new(panel.width / 2.0, panel.height + margins.bottom - 8.0),
            text: "Month".to_string(),
            role: TextRole::AxisTitle,
            anchor: Anchor::Middle,
            vertical: false,
            color: Color::AXIS,
        }));
        if let Some(metric) = metrics.first() {
            panel.push(SceneNode::Text(TextNode {
                position: Point::new(-margins.left + 12.0, panel.height / 2.0),
                text: metric.axis_title().to_string(),
                role: TextRole::AxisTitle,
                anchor: Anchor::Middle,
                vertical: true,
                color: Color::AXIS,
            }));
        }
    }

    fn draw_annotations(&self, panel: &mut ChartPanel, slide: &Slide, summary: &mut RenderSummary) {
        // Overlaid charts annotate the primary (left axis) series only.
        let Some((metric, y)) = panel.y.first().copied() else {
            return;
        };

        for annotation in &slide.annotations {
            let x_px = panel.x.apply(annotation.month as f64);
            let y_px = y.apply(annotation.value(metric));
            let inside = panel.x.range_contains(x_px) && y.range_contains(y_px);
            if !inside {
                summary.annotations_outside += 1;
            }

            let position = match self.options.annotation_policy {
                AnnotationPolicy::Free => Point::new(x_px, y_px),
                AnnotationPolicy::Clamp => {
                    Point::new(panel.x.clamp_to_range(x_px), y.clamp_to_range(y_px))
                }
                AnnotationPolicy::Hide if !inside => continue,
                AnnotationPolicy::Hide => Point::new(x_px, y_px),
            };

            panel.push(SceneNode::Text(TextNode {
                position,
                text: annotation.text.clone(),
                role: TextRole::Annotation,
                anchor: Anchor::Start,
                vertical: false,
                color: Color::ANNOTATION,
            }));
            summary.annotations_drawn += 1;
        }
    }
}
