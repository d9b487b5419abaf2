//! Navigation state machine over slide positions.

use crate::slides::{Slide, SlideRegistry};
use tracing::debug;

/// Owns the current slide index. Every method keeps `current < registry.len()`.
///
/// Transition methods return the new index when the slide changed and `None`
/// for no-ops (already at an edge, out-of-range index, unknown year).
#[derive(Debug, Clone)]
pub struct NavigationController {
    registry: SlideRegistry,
    current: usize,
}

impl NavigationController {
    pub fn new(registry: SlideRegistry) -> Self {
        Self {
            registry,
            current: 0,
        }
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &Slide {
        &self.registry.slides()[self.current]
    }

    pub fn slide_count(&self) -> usize {
        self.registry.len()
    }

    pub fn go_to(&mut self, index: usize) -> Option<usize> {
        if index >= self.registry.len() {
            debug!(index, count = self.registry.len(), "ignoring out-of-range slide");
            return None;
        }
        self.transition(index)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.current + 1 >= self.registry.len() {
            return None;
        }
        self.transition(self.current + 1)
    }

    pub fn previous(&mut self) -> Option<usize> {
        let index = self.current.checked_sub(1)?;
        self.transition(index)
    }

    pub fn select_by_year(&mut self, year: i32) -> Option<usize> {
        match self.registry.index_for_year(year) {
            Some(index) => self.transition(index),
            None => {
                debug!(year, "no slide for year");
                None
            }
        }
    }

    /// Selecting the slide that is already current still counts as a
    /// transition, so buttons re-render like the page did.
    fn transition(&mut self, index: usize) -> Option<usize> {
        debug!(from = self.current, to = index, "slide transition");
        self.current = index;
        Some(index)
    }
}
