//! Retained-mode chart scene.
//!
//! A [`Surface`] is a drawable region of a given pixel size holding one or
//! more [`ChartPanel`]s. Panel nodes use panel-local coordinates: `(0, 0)` is
//! the top-left corner of the plot area and `panel.origin` is the margin
//! offset inside the surface. Painters (egui on screen, plotters on export)
//! only read the scene; the renderer is the only writer.

use crate::charts::scale::LinearScale;
use crate::data::Metric;
use kurbo::{BezPath, Point, Vec2};
use std::collections::BTreeMap;

/// Opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const AXIS: Color = Color(68, 68, 68);
    pub const ANNOTATION: Color = Color(33, 37, 41);
    pub const DEATHS: Color = Color(220, 53, 69);
    pub const VACCINATIONS: Color = Color(40, 167, 69);

    pub fn for_metric(metric: Metric) -> Color {
        match metric {
            Metric::Deaths => Color::DEATHS,
            Metric::Vaccinations => Color::VACCINATIONS,
        }
    }
}

/// What a text node labels; painters pick font sizes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    ChartTitle,
    AxisTitle,
    TickLabel,
    Annotation,
}

impl TextRole {
    pub fn font_size(self) -> f32 {
        match self {
            TextRole::ChartTitle => 14.0,
            TextRole::AxisTitle => 12.0,
            TextRole::TickLabel => 10.0,
            TextRole::Annotation => 11.0,
        }
    }
}

/// Horizontal anchor of a text node relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub position: Point,
    pub text: String,
    pub role: TextRole,
    pub anchor: Anchor,
    /// Rotated 90 degrees counter-clockwise (y-axis titles).
    pub vertical: bool,
    pub color: Color,
}

/// Data behind a marker, shown by the tooltip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerDatum {
    pub metric: Metric,
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
    pub datum: MarkerDatum,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Series {
        metric: Metric,
        path: BezPath,
        color: Color,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Marker(Marker),
    Text(TextNode),
}

/// One chart: its plot rectangle, scales, and drawn nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub origin: Vec2,
    pub width: f64,
    pub height: f64,
    pub x: LinearScale,
    pub y: Vec<(Metric, LinearScale)>,
    pub nodes: Vec<SceneNode>,
}

impl ChartPanel {
    pub fn new(origin: Vec2, width: f64, height: f64, x: LinearScale) -> Self {
        Self {
            origin,
            width,
            height,
            x,
            y: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn y_scale(&self, metric: Metric) -> Option<&LinearScale> {
        self.y.iter().find(|(m, _)| *m == metric).map(|(_, s)| s)
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.y.iter().map(|(m, _)| *m)
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.nodes.iter().filter_map(|node| match node {
            SceneNode::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    pub fn texts(&self, role: TextRole) -> impl Iterator<Item = &TextNode> {
        self.nodes.iter().filter_map(move |node| match node {
            SceneNode::Text(text) if text.role == role => Some(text),
            _ => None,
        })
    }

    pub fn series(&self, metric: Metric) -> Option<&BezPath> {
        self.nodes.iter().find_map(|node| match node {
            SceneNode::Series { metric: m, path, .. } if *m == metric => Some(path),
            _ => None,
        })
    }

    /// Panel-local to surface coordinates.
    pub fn to_surface(&self, point: Point) -> Point {
        point + self.origin
    }
}

/// A named drawable region.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    name: String,
    width: f64,
    height: f64,
    panels: Vec<ChartPanel>,
}

impl Surface {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            panels: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Returns whether the size changed.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Remove all drawn content. Safe on an empty surface.
    pub fn clear(&mut self) {
        self.panels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panels(&self) -> &[ChartPanel] {
        &self.panels
    }

    pub fn add_panel(&mut self, panel: ChartPanel) {
        self.panels.push(panel);
    }

    /// Marker under `point` (surface coordinates), if any. `slop` widens the hit area.
    pub fn hit_test(&self, point: Point, slop: f64) -> Option<&Marker> {
        self.panels.iter().find_map(|panel| {
            let local = point - panel.origin;
            panel
                .markers()
                .find(|m| m.center.distance(local) <= m.radius + slop)
        })
    }
}

/// The host's drawable regions, addressed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSet {
    surfaces: BTreeMap<String, Surface>,
}

impl SurfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces for each name, all of the given size.
    pub fn with_names(names: &[&str], width: f64, height: f64) -> Self {
        let mut set = Self::new();
        for name in names {
            set.insert(Surface::new(*name, width, height));
        }
        set
    }

    pub fn insert(&mut self, surface: Surface) {
        self.surfaces.insert(surface.name.clone(), surface);
    }

    pub fn remove(&mut self, name: &str) -> Option<Surface> {
        self.surfaces.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.surfaces.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Surface> {
        self.surfaces.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Surface> {
        self.surfaces.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.values()
    }

    pub fn clear_all(&mut self) {
        self.surfaces.values_mut().for_each(Surface::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::scale::month_scale;

    fn panel_with_marker() -> ChartPanel {
        let mut panel = ChartPanel::new(Vec2::new(50.0, 20.0), 100.0, 100.0, month_scale(100.0));
        panel.push(SceneNode::Marker(Marker {
            center: Point::new(10.0, 10.0),
            radius: 4.0,
            color: Color::DEATHS,
            datum: MarkerDatum {
                metric: Metric::Deaths,
                year: 2021,
                month: 1,
                value: 5.0,
            },
        }));
        panel
    }

    #[test]
    fn hit_test_uses_panel_origin() {
        let mut surface = Surface::new("chart", 200.0, 200.0);
        surface.add_panel(panel_with_marker());

        assert!(surface.hit_test(Point::new(60.0, 30.0), 0.0).is_some());
        assert!(surface.hit_test(Point::new(10.0, 10.0), 0.0).is_none());
        assert!(surface.hit_test(Point::new(65.0, 30.0), 2.0).is_some());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut surface = Surface::new("chart", 200.0, 200.0);
        surface.clear();
        surface.add_panel(panel_with_marker());
        surface.clear();
        surface.clear();
        assert!(surface.is_empty());
    }

    #[test]
    fn set_size_reports_changes() {
        let mut surface = Surface::new("chart", 200.0, 200.0);
        assert!(!surface.set_size(200.0, 200.0));
        assert!(surface.set_size(300.0, 200.0));
        assert_eq!(surface.size(), (300.0, 200.0));
    }
}
