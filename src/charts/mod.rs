//! Charts module - scales, scene graph, rendering and export

pub mod curve;
pub mod export;
pub mod format;
mod renderer;
pub mod scale;
pub mod scene;

pub use export::{export_surfaces, surfaces_to_svg, ExportError, ExportFormat};
pub use renderer::{
    AnnotationPolicy, ChartRenderer, Layout, Margins, RenderError, RenderOptions, RenderSummary,
    DEATHS_SURFACE, SHARED_SURFACE, VACCINATIONS_SURFACE,
};
pub use scale::{derive_scale, month_scale, LinearScale};
pub use scene::{ChartPanel, Marker, MarkerDatum, SceneNode, Surface, SurfaceSet, TextRole};
