//! Static chart export.
//! Paints rendered surfaces through plotters backends, side by side, into SVG or PNG.

use crate::charts::scene::{Anchor, ChartPanel, Color as SceneColor, SceneNode, Surface, TextNode};
use kurbo::{BezPath, PathEl, Point};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Flattening tolerance for curves, in pixels.
const FLATTEN_TOLERANCE: f64 = 0.25;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,
    #[error("Unsupported export format `{0}` (use .svg or .png)")]
    UnsupportedFormat(String),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            _ => Err(ExportError::UnsupportedFormat(ext)),
        }
    }
}

fn draw_err<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Draw(err.to_string())
}

/// Canvas size for surfaces laid out left to right.
fn canvas_size(surfaces: &[&Surface]) -> (u32, u32) {
    let width: f64 = surfaces.iter().map(|s| s.size().0.max(1.0)).sum();
    let height = surfaces
        .iter()
        .map(|s| s.size().1.max(1.0))
        .fold(1.0, f64::max);
    (width.ceil() as u32, height.ceil() as u32)
}

/// Write surfaces to `path`; the extension picks the format.
pub fn export_surfaces(surfaces: &[&Surface], path: &Path) -> Result<(), ExportError> {
    if surfaces.is_empty() {
        return Err(ExportError::Empty);
    }
    let size = canvas_size(surfaces);

    match ExportFormat::from_path(path)? {
        ExportFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_surfaces(&root, surfaces)?;
            root.present().map_err(draw_err)?;
        }
        ExportFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_surfaces(&root, surfaces)?;
            root.present().map_err(draw_err)?;
        }
    }

    info!(path = %path.display(), width = size.0, height = size.1, "exported charts");
    Ok(())
}

/// Render surfaces to an SVG document in memory.
pub fn surfaces_to_svg(surfaces: &[&Surface]) -> Result<String, ExportError> {
    if surfaces.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, canvas_size(surfaces)).into_drawing_area();
        draw_surfaces(&root, surfaces)?;
        root.present().map_err(draw_err)?;
    }
    Ok(buffer)
}

fn draw_surfaces<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    surfaces: &[&Surface],
) -> Result<(), ExportError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let mut offset = 0u32;
    for surface in surfaces {
        let (w, h) = surface.size();
        let (w, h) = (w.max(1.0).ceil() as u32, h.max(1.0).ceil() as u32);
        let area = root.clone().shrink((offset, 0u32), (w, h));
        for panel in surface.panels() {
            draw_panel(&area, panel)?;
        }
        offset += w;
    }
    Ok(())
}

fn rgb(color: SceneColor) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn pixel(point: Point) -> (i32, i32) {
    (point.x.round() as i32, point.y.round() as i32)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ChartPanel,
) -> Result<(), ExportError> {
    for node in &panel.nodes {
        match node {
            SceneNode::Series { path, color, width, .. } => {
                let style = ShapeStyle::from(&rgb(*color)).stroke_width(width.round() as u32);
                for polyline in flatten(path) {
                    let points: Vec<(i32, i32)> = polyline
                        .into_iter()
                        .map(|p| pixel(panel.to_surface(p)))
                        .collect();
                    area.draw(&PathElement::new(points, style))
                        .map_err(draw_err)?;
                }
            }
            SceneNode::Line { from, to, color } => {
                let points = vec![pixel(panel.to_surface(*from)), pixel(panel.to_surface(*to))];
                area.draw(&PathElement::new(points, &rgb(*color)))
                    .map_err(draw_err)?;
            }
            SceneNode::Marker(marker) => {
                let center = pixel(panel.to_surface(marker.center));
                area.draw(&Circle::new(
                    center,
                    marker.radius.round() as i32,
                    rgb(marker.color).filled(),
                ))
                .map_err(draw_err)?;
            }
            SceneNode::Text(text) => draw_text(area, panel, text)?,
        }
    }
    Ok(())
}

fn draw_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &ChartPanel,
    text: &TextNode,
) -> Result<(), ExportError> {
    let h_pos = match text.anchor {
        Anchor::Start => HPos::Left,
        Anchor::Middle => HPos::Center,
        Anchor::End => HPos::Right,
    };
    let mut font = ("sans-serif", text.role.font_size() as f64).into_font();
    if text.vertical {
        font = font.transform(FontTransform::Rotate270);
    }
    let style = font.color(&rgb(text.color)).pos(Pos::new(h_pos, VPos::Center));

    area.draw(&Text::new(
        text.text.clone(),
        pixel(panel.to_surface(text.position)),
        style,
    ))
    .map_err(draw_err)?;
    Ok(())
}

/// Split a path into flattened polylines, one per subpath.
fn flatten(path: &BezPath) -> Vec<Vec<Point>> {
    let mut polylines: Vec<Vec<Point>> = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => polylines.push(vec![p]),
        PathEl::LineTo(p) => {
            if let Some(current) = polylines.last_mut() {
                current.push(p);
            }
        }
        _ => {}
    });
    polylines.retain(|line| line.len() > 1);
    polylines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{ChartRenderer, Layout, RenderOptions};
    use crate::charts::scene::SurfaceSet;
    use crate::data::DataRecord;
    use crate::slides::SlideRegistry;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/chart.SVG")).unwrap(),
            ExportFormat::Svg
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("chart.png")).unwrap(),
            ExportFormat::Png
        );
        assert!(matches!(
            ExportFormat::from_path(Path::new("chart.pdf")),
            Err(ExportError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }

    #[test]
    fn flatten_keeps_endpoints() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((10.0, 0.0), (20.0, 10.0), (30.0, 10.0));
        let lines = flatten(&path);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(lines[0].last(), Some(&Point::new(30.0, 10.0)));
    }

    #[test]
    fn svg_contains_annotation_text() {
        let registry = SlideRegistry::builtin();
        let slide = registry.get(1).unwrap();
        let records = vec![
            DataRecord::new(2022, 1, 95210.4, 150221330.0),
            DataRecord::new(2022, 3, 80424.85, 161874846.0),
        ];
        let mut surfaces = SurfaceSet::with_names(Layout::Stacked.surface_names(), 640.0, 480.0);
        ChartRenderer::new(RenderOptions::default())
            .render(slide, &records, &mut surfaces)
            .unwrap();

        let all: Vec<&Surface> = surfaces.iter().collect();
        let svg = surfaces_to_svg(&all).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("March 2022: Increased vaccinations, fewer deaths."));
    }

    #[test]
    fn empty_export_is_rejected() {
        assert!(matches!(surfaces_to_svg(&[]), Err(ExportError::Empty)));
    }
}
