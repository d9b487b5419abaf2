//! Presenter - the interaction controller behind the window.
//!
//! Owns the navigation state, the chart surfaces, the text panel and the
//! tooltip. Every slide transition starts a fresh dataset load; when the
//! load reports back through [`Presenter::poll`] the current slide is
//! rendered. Loads superseded by a later transition are dropped unseen, so
//! the charts always end up showing the latest slide.

mod tooltip;

pub use tooltip::{describe, Tooltip};

use crate::charts::{ChartRenderer, RenderError, Surface, SurfaceSet};
use crate::data::{DataLoader, Dataset, LoadResult, PendingLoad};
use crate::slides::{NavigationController, Slide, SlideRegistry};
use kurbo::Point;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Extra hit radius around markers for hovering.
const HOVER_SLOP: f64 = 3.0;

/// Slide title, narrative and an optional error message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPanel {
    pub title: String,
    pub narrative: String,
    pub message: Option<String>,
}

pub struct Presenter {
    nav: NavigationController,
    loader: DataLoader,
    data_path: PathBuf,
    renderer: ChartRenderer,
    surfaces: SurfaceSet,
    text: TextPanel,
    year_selector: i32,
    generation: u64,
    pending: Option<PendingLoad>,
    dataset: Option<Arc<Dataset>>,
    tooltip: Tooltip,
}

impl Presenter {
    /// Build a presenter with one surface per name the renderer's layout needs.
    pub fn new(
        registry: SlideRegistry,
        loader: DataLoader,
        data_path: impl Into<PathBuf>,
        renderer: ChartRenderer,
    ) -> Self {
        let surfaces = SurfaceSet::with_names(renderer.layout().surface_names(), 0.0, 0.0);
        let nav = NavigationController::new(registry);
        let year_selector = nav.current_slide().year;

        Self {
            nav,
            loader,
            data_path: data_path.into(),
            renderer,
            surfaces,
            text: TextPanel::default(),
            year_selector,
            generation: 0,
            pending: None,
            dataset: None,
            tooltip: Tooltip::new(),
        }
    }

    /// Show the initial slide.
    pub fn start(&mut self) {
        self.activate(self.nav.current());
    }

    // ===== Navigation =====

    pub fn go_to(&mut self, index: usize) -> bool {
        self.nav.go_to(index).map(|i| self.activate(i)).is_some()
    }

    pub fn next(&mut self) -> bool {
        self.nav.next().map(|i| self.activate(i)).is_some()
    }

    pub fn previous(&mut self) -> bool {
        self.nav.previous().map(|i| self.activate(i)).is_some()
    }

    /// Year selector input. Unknown years leave the slide unchanged.
    pub fn select_by_year(&mut self, year: i32) -> bool {
        self.year_selector = year;
        self.nav
            .select_by_year(year)
            .map(|i| self.activate(i))
            .is_some()
    }

    fn activate(&mut self, index: usize) {
        let slide = self.nav.current_slide();
        debug!(index, year = slide.year, "activating slide");

        self.text = TextPanel {
            title: slide.title.clone(),
            narrative: slide.narrative.clone(),
            message: None,
        };
        self.year_selector = slide.year;
        self.tooltip.hide();
        self.begin_load();
    }

    // ===== Loading =====

    fn begin_load(&mut self) {
        self.generation += 1;
        let pending = self.loader.spawn(&self.data_path, self.generation);
        if let Some(stale) = self.pending.replace(pending) {
            debug!(generation = stale.generation(), "superseded pending load");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply a finished load, if any. Returns whether the view changed.
    pub fn poll(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(PendingLoad::try_take) else {
            return false;
        };
        self.pending = None;
        self.apply_load(result);
        true
    }

    /// Block until the pending load finishes, then apply it.
    pub fn wait(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.apply_load(pending.wait());
        true
    }

    fn apply_load(&mut self, result: LoadResult) {
        match result {
            Ok(dataset) => {
                self.dataset = Some(dataset);
                self.render();
            }
            Err(err) => {
                warn!(path = %self.data_path.display(), error = %err, "dataset load failed");
                self.dataset = None;
                self.surfaces.clear_all();
                self.text.message = Some(format!("Could not load chart data: {err}"));
            }
        }
    }

    fn render(&mut self) {
        let Some(dataset) = self.dataset.clone() else {
            return;
        };
        let slide = self.nav.current_slide();
        match self.renderer.render(slide, &dataset.records, &mut self.surfaces) {
            Ok(summary) => {
                if summary.points == 0 {
                    warn!(year = slide.year, "no rows for slide year");
                }
            }
            Err(RenderError::MissingSurface(name)) => {
                error!(surface = %name, "render skipped");
            }
        }
    }

    /// Re-render the current slide from the last dataset without reloading.
    pub fn refresh(&mut self) {
        self.tooltip.hide();
        self.render();
    }

    // ===== Surfaces =====

    /// Report a surface's on-screen size; re-renders when it changed.
    pub fn resize_surface(&mut self, name: &str, width: f64, height: f64) -> bool {
        let changed = self
            .surfaces
            .get_mut(name)
            .map(|s| s.set_size(width, height))
            .unwrap_or(false);
        if changed {
            self.refresh();
        }
        changed
    }

    pub fn surfaces(&self) -> &SurfaceSet {
        &self.surfaces
    }

    /// Mutable access for hosts that add or remove regions.
    pub fn surfaces_mut(&mut self) -> &mut SurfaceSet {
        &mut self.surfaces
    }

    /// Surfaces of the active layout, in layout order.
    pub fn layout_surfaces(&self) -> Vec<&Surface> {
        self.renderer
            .layout()
            .surface_names()
            .iter()
            .filter_map(|name| self.surfaces.get(name))
            .collect()
    }

    // ===== Tooltip =====

    /// Pointer moved over `surface` at `point` (surface coordinates).
    pub fn hover(&mut self, surface: &str, point: Point) -> bool {
        let hit = self
            .surfaces
            .get(surface)
            .and_then(|s| s.hit_test(point, HOVER_SLOP))
            .map(|m| m.datum);
        match hit {
            Some(datum) => {
                self.tooltip.show(&datum, point);
                true
            }
            None => {
                self.tooltip.hide();
                false
            }
        }
    }

    pub fn hover_exit(&mut self) {
        self.tooltip.hide();
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    // ===== Accessors =====

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn current_slide(&self) -> &Slide {
        self.nav.current_slide()
    }

    pub fn slide_count(&self) -> usize {
        self.nav.slide_count()
    }

    pub fn registry(&self) -> &SlideRegistry {
        self.nav.registry()
    }

    /// Position of the highlighted slide button.
    pub fn active_button(&self) -> usize {
        self.nav.current()
    }

    pub fn year_selector(&self) -> i32 {
        self.year_selector
    }

    pub fn text(&self) -> &TextPanel {
        &self.text
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn renderer(&self) -> &ChartRenderer {
        &self.renderer
    }
}
